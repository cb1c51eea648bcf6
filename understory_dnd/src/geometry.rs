// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle and point helpers used by hit testing and collision detection.
//!
//! All helpers normalize their inputs with [`Rect::abs`], so rectangles with
//! swapped corners behave like their normalized form.

use kurbo::{Point, Rect, Vec2};

/// Area of `rect`; never negative.
#[must_use]
#[inline]
pub fn area(rect: Rect) -> f64 {
    rect.abs().area()
}

/// Returns `true` for rectangles that cannot take part in collision checks:
/// zero width or height, or non-finite coordinates.
#[must_use]
pub fn is_degenerate(rect: Rect) -> bool {
    let a = area(rect);
    !(a > 0.0 && a.is_finite())
}

/// Area of the overlap between `a` and `b`, or `0.0` when they do not overlap.
#[must_use]
pub fn intersection_area(a: Rect, b: Rect) -> f64 {
    a.abs().intersect(b.abs()).area()
}

/// Returns `true` if `a` and `b` share a region of positive area.
#[must_use]
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    intersection_area(a, b) > 0.0
}

/// Center point of `rect`.
#[must_use]
#[inline]
pub fn center(rect: Rect) -> Point {
    rect.abs().center()
}

/// Whether `point` lies inside `rect` (left/top edges inclusive, right/bottom exclusive).
#[must_use]
#[inline]
pub fn contains(rect: Rect, point: Point) -> bool {
    rect.abs().contains(point)
}

/// Euclidean distance between two points.
#[must_use]
#[inline]
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// `rect` moved by `offset`.
#[must_use]
#[inline]
pub fn translate(rect: Rect, offset: Vec2) -> Rect {
    rect + offset
}
