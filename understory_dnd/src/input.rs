// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw input fed to sensors by the host.
//!
//! These mirror what a browser (or any windowing layer) delivers: pointer
//! down/move/up/cancel with a pointer id and device kind, key presses with the
//! currently focused element, window blur, and animation-frame ticks.
//! Timestamps are host-supplied milliseconds; the kernel never reads a clock.

use kurbo::Point;

use crate::id::DndId;

/// Identifier the host assigns to a pointer (mouse, pen, or one touch point).
pub type PointerId = u64;

/// Device behind a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// A mouse.
    Mouse,
    /// A pen or stylus.
    Pen,
    /// A touch point.
    Touch,
}

/// Keys sensors react to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Space bar.
    Space,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Anything else.
    Other,
}

/// One pointer sample.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerInput {
    /// Which pointer this sample belongs to.
    pub pointer: PointerId,
    /// Device kind.
    pub kind: PointerKind,
    /// Position in the same space as element rects.
    pub position: Point,
    /// `true` when the primary button is the one involved.
    pub primary: bool,
    /// Host timestamp in milliseconds.
    pub time_ms: u64,
}

impl PointerInput {
    /// A primary-button sample.
    #[must_use]
    pub fn new(kind: PointerKind, pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self {
            pointer,
            kind,
            position,
            primary: true,
            time_ms,
        }
    }

    /// A mouse sample for pointer `0`.
    #[must_use]
    pub fn mouse(position: Point, time_ms: u64) -> Self {
        Self::new(PointerKind::Mouse, 0, position, time_ms)
    }

    /// A touch sample for touch point `pointer`.
    #[must_use]
    pub fn touch(pointer: PointerId, position: Point, time_ms: u64) -> Self {
        Self::new(PointerKind::Touch, pointer, position, time_ms)
    }

    /// Mark this sample as involving a non-primary button.
    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.primary = false;
        self
    }
}

/// Raw input event.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// A button was pressed or a touch began.
    PointerDown(PointerInput),
    /// A pointer moved.
    PointerMove(PointerInput),
    /// A button was released or a touch ended.
    PointerUp(PointerInput),
    /// The platform aborted the pointer stream.
    PointerCancel {
        /// Aborted pointer.
        pointer: PointerId,
        /// Its device kind.
        kind: PointerKind,
    },
    /// A key was pressed.
    KeyDown {
        /// The key.
        key: Key,
        /// Draggable id of the focused element, if the focused element is one.
        focused: Option<DndId>,
    },
    /// The window or document lost focus.
    Blur,
    /// Animation-frame callback.
    Tick {
        /// Host timestamp in milliseconds.
        time_ms: u64,
    },
}
