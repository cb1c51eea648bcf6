// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names and payloads published on the [`EventBus`](crate::bus::EventBus).
//!
//! Every payload is an owned snapshot: ids, positions, and shared
//! [`Payload`]s. Nothing in an event points back into kernel state, so a
//! subscriber can keep, clone, or drop events freely.
//!
//! ## Ordering
//!
//! For a single gesture the kernel publishes:
//!
//! ```text
//! sensor:start, drag:start,
//! ( sensor:move, [drag:leave], [drag:enter], drag:move )*,
//! ( sensor:end, [drop], drag:end ) | ( sensor:cancel, drag:cancel )
//! ```
//!
//! `drag:leave` for the previous droppable always precedes `drag:enter` for
//! the next one, and both precede the `drag:move` of the same step.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;
use kurbo::{Point, Vec2};

use crate::error::{HandlerError, UnknownEventName};
use crate::id::{DndId, Payload};
use crate::sensor::{SensorEvent, SensorKind, SensorPhase};

/// Name of an event channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `drag:start`
    DragStart,
    /// `drag:move`
    DragMove,
    /// `drag:enter`
    DragEnter,
    /// `drag:leave`
    DragLeave,
    /// `drag:end`
    DragEnd,
    /// `drag:cancel`
    DragCancel,
    /// `drop`
    Drop,
    /// `sort`
    Sort,
    /// `sensor:start`
    SensorStart,
    /// `sensor:move`
    SensorMove,
    /// `sensor:end`
    SensorEnd,
    /// `sensor:cancel`
    SensorCancel,
    /// `error`
    Error,
}

impl EventKind {
    /// Every channel, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::DragStart,
        Self::DragMove,
        Self::DragEnter,
        Self::DragLeave,
        Self::DragEnd,
        Self::DragCancel,
        Self::Drop,
        Self::Sort,
        Self::SensorStart,
        Self::SensorMove,
        Self::SensorEnd,
        Self::SensorCancel,
        Self::Error,
    ];

    /// The wire name adapters subscribe with, e.g. `"drag:start"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStart => "drag:start",
            Self::DragMove => "drag:move",
            Self::DragEnter => "drag:enter",
            Self::DragLeave => "drag:leave",
            Self::DragEnd => "drag:end",
            Self::DragCancel => "drag:cancel",
            Self::Drop => "drop",
            Self::Sort => "sort",
            Self::SensorStart => "sensor:start",
            Self::SensorMove => "sensor:move",
            Self::SensorEnd => "sensor:end",
            Self::SensorCancel => "sensor:cancel",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventName(String::from(s)))
    }
}

/// What subscribers see of a draggable.
#[derive(Clone, Debug)]
pub struct DraggableSnapshot {
    /// Draggable id.
    pub id: DndId,
    /// Type tag matched by [`Accept::Kinds`](crate::registry::Accept::Kinds).
    pub kind: Option<String>,
    /// Application data.
    pub data: Payload,
}

/// What subscribers see of a droppable.
#[derive(Clone, Debug)]
pub struct DroppableSnapshot {
    /// Droppable id.
    pub id: DndId,
    /// Application data.
    pub data: Payload,
}

impl DroppableSnapshot {
    /// Snapshot for a droppable that is no longer registered.
    pub(crate) fn orphan(id: DndId) -> Self {
        Self {
            id,
            data: Payload::empty(),
        }
    }
}

/// An event published by the kernel or a layer built on it.
#[derive(Clone, Debug)]
pub enum DndEvent {
    /// A drag began.
    DragStart {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// Position where the drag was committed.
        position: Point,
        /// Sensor that owns the gesture.
        sensor: SensorKind,
    },
    /// The drag moved. Always the last event of a move step.
    DragMove {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// Current position.
        position: Point,
        /// Movement since the previous position.
        delta: Vec2,
        /// Total movement since the drag started.
        offset: Vec2,
        /// Droppable currently under the drag, if any.
        over: Option<DndId>,
    },
    /// The drag moved over a droppable.
    DragEnter {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// The droppable entered.
        droppable: DroppableSnapshot,
        /// Current position.
        position: Point,
    },
    /// The drag left a droppable.
    DragLeave {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// The droppable left.
        droppable: DroppableSnapshot,
        /// Current position.
        position: Point,
    },
    /// The draggable was released over a droppable that accepts it.
    /// Always followed by [`DndEvent::DragEnd`].
    Drop {
        /// The dropped element.
        draggable: DraggableSnapshot,
        /// The receiving droppable.
        droppable: DroppableSnapshot,
        /// Release position.
        position: Point,
    },
    /// The drag finished normally.
    DragEnd {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// Receiving droppable, or `None` when released over empty space.
        droppable: Option<DroppableSnapshot>,
        /// Release position.
        position: Point,
    },
    /// The drag was cancelled; no drop happened.
    DragCancel {
        /// The dragged element.
        draggable: DraggableSnapshot,
        /// Last known position.
        position: Point,
    },
    /// A sortable list was reordered.
    Sort {
        /// Sortable id.
        sortable: DndId,
        /// The moved item.
        draggable: DndId,
        /// Index before the move.
        from: usize,
        /// Index after the move.
        to: usize,
        /// Full order after the move.
        order: Vec<DndId>,
    },
    /// Normalized sensor output, published before the kernel acts on it.
    Sensor(SensorEvent),
    /// A handler failed while handling another event.
    Error {
        /// Channel the failing handler was subscribed to.
        source_event: EventKind,
        /// What the handler returned.
        error: HandlerError,
    },
}

impl DndEvent {
    /// Channel this event is published on.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Self::DragStart { .. } => EventKind::DragStart,
            Self::DragMove { .. } => EventKind::DragMove,
            Self::DragEnter { .. } => EventKind::DragEnter,
            Self::DragLeave { .. } => EventKind::DragLeave,
            Self::Drop { .. } => EventKind::Drop,
            Self::DragEnd { .. } => EventKind::DragEnd,
            Self::DragCancel { .. } => EventKind::DragCancel,
            Self::Sort { .. } => EventKind::Sort,
            Self::Sensor(event) => match event.phase {
                SensorPhase::Start => EventKind::SensorStart,
                SensorPhase::Move => EventKind::SensorMove,
                SensorPhase::End => EventKind::SensorEnd,
                SensorPhase::Cancel => EventKind::SensorCancel,
            },
            Self::Error { .. } => EventKind::Error,
        }
    }

    /// Id of the draggable this event concerns, if any.
    #[must_use]
    pub fn draggable_id(&self) -> Option<&DndId> {
        match self {
            Self::DragStart { draggable, .. }
            | Self::DragMove { draggable, .. }
            | Self::DragEnter { draggable, .. }
            | Self::DragLeave { draggable, .. }
            | Self::Drop { draggable, .. }
            | Self::DragEnd { draggable, .. }
            | Self::DragCancel { draggable, .. } => Some(&draggable.id),
            Self::Sort { draggable, .. } => Some(draggable),
            Self::Sensor(event) => Some(&event.draggable),
            Self::Error { .. } => None,
        }
    }
}
