// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collision detection: which droppable is the drag over?
//!
//! [`CollisionDetector::detect`] takes the drag geometry and the candidate
//! droppables in registration order and returns the winning id, if any. It
//! is a pure function of its inputs. Ties always go to the earlier
//! candidate, and degenerate candidate rects (zero area, non-finite) are
//! skipped.
//!
//! Candidate filtering (disabled droppables, accept rules, detached elements)
//! is the caller's job; the kernel does it before calling `detect`.
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_dnd::collision::{CollisionAlgorithm, CollisionDetector, DragGeometry};
//! use understory_dnd::id::DndId;
//!
//! let outer = DndId::from("outer");
//! let inner = DndId::from("inner");
//! let candidates = [
//!     (&outer, Rect::new(0.0, 0.0, 200.0, 200.0)),
//!     (&inner, Rect::new(0.0, 0.0, 50.0, 50.0)),
//! ];
//! let drag = DragGeometry::at_pointer(Point::new(10.0, 10.0));
//!
//! let detector = CollisionDetector::new(CollisionAlgorithm::PointerWithin);
//! assert_eq!(detector.detect(&drag, candidates), Some(inner));
//! ```

use kurbo::{Point, Rect, Size};

use crate::geometry::{area, center, contains, distance, intersection_area, is_degenerate, overlaps};
use crate::id::DndId;

/// Strategy used to pick the droppable under a drag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionAlgorithm {
    /// Droppables containing the pointer; the smallest wins.
    #[default]
    PointerWithin,
    /// Droppables overlapping the dragged rect; the largest overlap wins.
    RectangleIntersection,
    /// The droppable whose center is closest to the dragged rect's center.
    ClosestCenter,
}

/// Where the drag is.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragGeometry {
    /// Current pointer position.
    pub pointer: Point,
    /// Current rect of the dragged element.
    pub rect: Rect,
}

impl DragGeometry {
    /// Geometry for a drag with no measurable element: a zero-size rect at `pointer`.
    #[must_use]
    pub fn at_pointer(pointer: Point) -> Self {
        Self {
            pointer,
            rect: Rect::from_origin_size(pointer, Size::ZERO),
        }
    }
}

/// Configured collision strategy.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionDetector {
    /// Strategy.
    pub algorithm: CollisionAlgorithm,
    /// For [`CollisionAlgorithm::ClosestCenter`]: only consider droppables
    /// that overlap the dragged rect.
    pub require_overlap: bool,
}

impl CollisionDetector {
    /// A detector using `algorithm`.
    #[must_use]
    pub const fn new(algorithm: CollisionAlgorithm) -> Self {
        Self {
            algorithm,
            require_overlap: false,
        }
    }

    /// Set whether closest-center candidates must overlap the dragged rect.
    #[must_use]
    pub const fn with_required_overlap(mut self, require_overlap: bool) -> Self {
        self.require_overlap = require_overlap;
        self
    }

    /// Pick the winning candidate.
    ///
    /// `candidates` must be in registration order; the first of equally good
    /// candidates wins.
    pub fn detect<'a>(
        &self,
        geometry: &DragGeometry,
        candidates: impl IntoIterator<Item = (&'a DndId, Rect)>,
    ) -> Option<DndId> {
        let mut best: Option<(&'a DndId, f64)> = None;
        for (id, rect) in candidates {
            if is_degenerate(rect) {
                continue;
            }
            // Lower cost is better.
            let Some(cost) = self.cost(geometry, rect) else {
                continue;
            };
            if best.is_none_or(|(_, best_cost)| cost < best_cost) {
                best = Some((id, cost));
            }
        }
        let winner = best.map(|(id, _)| id.clone());
        tracing::trace!(algorithm = ?self.algorithm, over = ?winner, "collision");
        winner
    }

    fn cost(&self, geometry: &DragGeometry, rect: Rect) -> Option<f64> {
        match self.algorithm {
            CollisionAlgorithm::PointerWithin => {
                contains(rect, geometry.pointer).then(|| area(rect))
            }
            CollisionAlgorithm::RectangleIntersection => {
                let overlap = intersection_area(rect, geometry.rect);
                (overlap > 0.0).then_some(-overlap)
            }
            CollisionAlgorithm::ClosestCenter => {
                if self.require_overlap && !overlaps(rect, geometry.rect) {
                    return None;
                }
                let d = distance(center(rect), center(geometry.rect));
                d.is_finite().then_some(d)
            }
        }
    }
}
