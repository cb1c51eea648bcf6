// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drag session: what is being dragged, by whom, and how far it has moved.
//!
//! ## Usage
//!
//! 1) Begin a session with [`DragSession::start`], passing the dragged
//!    element's snapshot, the owning sensor, the start position, and the
//!    element's rect at that moment.
//! 2) On each move, call [`DragSession::update`] to get the movement delta
//!    since the previous position.
//! 3) Read [`DragSession::total_offset`] and [`DragSession::dragged_rect`]
//!    for collision checks.
//! 4) Reset with [`DragSession::end`].
//!
//! ## Minimal example
//!
//! ```
//! use kurbo::{Point, Rect, Vec2};
//! use understory_dnd::event::DraggableSnapshot;
//! use understory_dnd::id::{DndId, Payload};
//! use understory_dnd::sensor::SensorKind;
//! use understory_dnd::session::DragSession;
//!
//! let card = DraggableSnapshot {
//!     id: DndId::from("card"),
//!     kind: None,
//!     data: Payload::empty(),
//! };
//! let mut session = DragSession::default();
//! session.start(
//!     card,
//!     SensorKind::Pointer,
//!     Point::new(10.0, 20.0),
//!     Some(Rect::new(0.0, 0.0, 40.0, 40.0)),
//! );
//! assert!(session.is_dragging());
//!
//! assert_eq!(session.update(Point::new(15.0, 25.0)), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(session.total_offset(), Some(Vec2::new(5.0, 5.0)));
//! assert_eq!(session.dragged_rect(), Some(Rect::new(5.0, 5.0, 45.0, 45.0)));
//! ```

use kurbo::{Point, Rect, Size, Vec2};

use crate::event::DraggableSnapshot;
use crate::geometry::translate;
use crate::id::DndId;
use crate::sensor::SensorKind;

/// Lifecycle of a [`DragSession`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragStatus {
    /// No drag in progress.
    #[default]
    Idle,
    /// A draggable is being dragged.
    Dragging,
    /// The drag was released and `drop` / `drag:end` are being published.
    Ending,
}

/// State of the current drag, owned by the kernel.
///
/// [`Kernel::session`](crate::kernel::Kernel::session) hands out clones of
/// it; mutating a clone has no effect on the kernel.
#[derive(Clone, Debug, Default)]
pub struct DragSession {
    /// Lifecycle state.
    pub status: DragStatus,
    /// The dragged element.
    pub active: Option<DraggableSnapshot>,
    /// Sensor that owns the gesture.
    pub sensor: Option<SensorKind>,
    /// Position where the drag started.
    pub start_pos: Option<Point>,
    /// Position before the most recent update.
    pub last_pos: Option<Point>,
    /// Most recent position.
    pub current_pos: Option<Point>,
    /// Dragged element's rect at drag start, `None` if it was detached.
    pub initial_rect: Option<Rect>,
    /// Droppable currently under the drag.
    pub over: Option<DndId>,
}

impl DragSession {
    /// Begin tracking a drag of `active` owned by `sensor`.
    ///
    /// Replaces any previous session.
    pub fn start(
        &mut self,
        active: DraggableSnapshot,
        sensor: SensorKind,
        pos: Point,
        initial_rect: Option<Rect>,
    ) {
        *self = Self {
            status: DragStatus::Dragging,
            active: Some(active),
            sensor: Some(sensor),
            start_pos: Some(pos),
            last_pos: Some(pos),
            current_pos: Some(pos),
            initial_rect,
            over: None,
        };
    }

    /// Record a new position, returning the movement since the previous one.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        self.start_pos?;
        let previous = self.current_pos.replace(pos);
        self.last_pos = previous.or(Some(pos));
        previous.map(|previous| pos - previous)
    }

    /// Total movement from the start position to the current one.
    #[must_use]
    pub fn total_offset(&self) -> Option<Vec2> {
        Some(self.current_pos? - self.start_pos?)
    }

    /// The dragged element's rect at its current position.
    ///
    /// This is the rect at drag start moved by [`Self::total_offset`]. An
    /// element that was detached at drag start is treated as a zero-size rect
    /// at the pointer.
    #[must_use]
    pub fn dragged_rect(&self) -> Option<Rect> {
        let current = self.current_pos?;
        match self.initial_rect {
            Some(rect) => Some(translate(rect, self.total_offset()?)),
            None => Some(Rect::from_origin_size(current, Size::ZERO)),
        }
    }

    /// Id of the dragged element.
    #[must_use]
    pub fn active_id(&self) -> Option<&DndId> {
        self.active.as_ref().map(|active| &active.id)
    }

    /// Whether `sensor` dragging `draggable` owns this session.
    #[must_use]
    pub fn is_owned_by(&self, sensor: SensorKind, draggable: &DndId) -> bool {
        self.status == DragStatus::Dragging
            && self.sensor == Some(sensor)
            && self.active_id() == Some(draggable)
    }

    /// End the drag and reset to [`DragStatus::Idle`].
    pub fn end(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` while [`DragStatus::Dragging`].
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.status == DragStatus::Dragging
    }
}
