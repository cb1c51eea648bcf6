// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kernel plugins.
//!
//! A plugin is installed once, when the kernel is built, and torn down when
//! the kernel is destroyed. Plugins are installed in the order they were
//! added to [`KernelOptions`](crate::kernel::KernelOptions) and torn down in
//! reverse order. During [`Plugin::install`] a plugin typically subscribes to
//! events or registers a position modifier; if it needs the kernel later it
//! should keep a [`WeakKernel`](crate::kernel::WeakKernel), not a `Kernel`.

use kurbo::Point;

use crate::kernel::Kernel;

/// Extension installed into a [`Kernel`].
pub trait Plugin {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Hook the plugin into `kernel`.
    fn install(&mut self, kernel: &Kernel);

    /// Release whatever [`Plugin::install`] set up.
    ///
    /// Runs before the kernel clears its subscribers and registry.
    fn teardown(&mut self) {}
}

/// Snaps drag positions to a square grid.
///
/// Cells that are not positive and finite leave positions untouched.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SnapToGrid {
    /// Grid cell size in pixels.
    pub cell: f64,
}

impl SnapToGrid {
    /// A grid with `cell`-sized squares.
    #[must_use]
    pub const fn new(cell: f64) -> Self {
        Self { cell }
    }

    /// The grid point nearest to `point`.
    #[must_use]
    pub fn snap(&self, point: Point) -> Point {
        if !(self.cell > 0.0 && self.cell.is_finite()) {
            return point;
        }
        ((point.to_vec2() / self.cell).round() * self.cell).to_point()
    }
}

impl Plugin for SnapToGrid {
    fn name(&self) -> &str {
        "snap-to-grid"
    }

    fn install(&mut self, kernel: &Kernel) {
        let grid = *self;
        kernel.add_modifier(move |point| grid.snap(point));
    }
}
