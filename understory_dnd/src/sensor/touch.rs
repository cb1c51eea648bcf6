// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch sensor.
//!
//! A touch on a draggable must be held for [`TouchSensorOptions::delay_ms`]
//! before it becomes a drag, so swipes keep scrolling the page. Moving further
//! than [`TouchSensorOptions::tolerance`] during the hold hands the gesture
//! back to the page. Once the delay has elapsed, the next move or
//! [`InputEvent::Tick`] commits the drag.
//!
//! A second touch point while holding aborts the hold; while dragging it
//! cancels the drag.

use kurbo::Point;

use super::{ActivatorLookup, Sensor, SensorEvent, SensorKind, SensorPhase};
use crate::geometry::distance;
use crate::id::DndId;
use crate::input::{InputEvent, PointerId, PointerKind};

/// Configuration for [`TouchSensor`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchSensorOptions {
    /// Hold time in milliseconds before a touch becomes a drag (default: 250).
    pub delay_ms: u64,
    /// Movement in pixels allowed during the hold (default: 5).
    pub tolerance: f64,
}

impl Default for TouchSensorOptions {
    fn default() -> Self {
        Self {
            delay_ms: 250,
            tolerance: 5.0,
        }
    }
}

impl TouchSensorOptions {
    /// Set the hold delay.
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Set the movement tolerance during the hold.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

#[derive(Clone, Debug, Default)]
enum State {
    #[default]
    Idle,
    Holding {
        pointer: PointerId,
        draggable: DndId,
        origin: Point,
        since_ms: u64,
    },
    Dragging {
        pointer: PointerId,
        draggable: DndId,
        last: Point,
    },
}

/// Sensor for [`PointerKind::Touch`] input.
#[derive(Clone, Debug, Default)]
pub struct TouchSensor {
    options: TouchSensorOptions,
    state: State,
}

impl TouchSensor {
    /// Create a sensor with `options`.
    #[must_use]
    pub fn new(options: TouchSensorOptions) -> Self {
        Self {
            options,
            state: State::Idle,
        }
    }

    fn event(&self, draggable: DndId, phase: SensorPhase, position: Point) -> SensorEvent {
        SensorEvent::new(SensorKind::Touch, draggable, phase, position)
    }

    fn held_long_enough(&self, since_ms: u64, now_ms: u64) -> bool {
        now_ms.saturating_sub(since_ms) >= self.options.delay_ms
    }

    fn commit(&mut self, pointer: PointerId, draggable: DndId, at: Point) -> Option<SensorEvent> {
        self.state = State::Dragging {
            pointer,
            draggable: draggable.clone(),
            last: at,
        };
        Some(self.event(draggable, SensorPhase::Start, at))
    }

    fn abort(&mut self) -> Option<SensorEvent> {
        match core::mem::take(&mut self.state) {
            State::Dragging {
                draggable, last, ..
            } => Some(self.event(draggable, SensorPhase::Cancel, last)),
            State::Holding { .. } | State::Idle => None,
        }
    }
}

impl Sensor for TouchSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Touch
    }

    fn handle(
        &mut self,
        input: &InputEvent,
        targets: &dyn ActivatorLookup,
    ) -> Option<SensorEvent> {
        match input {
            InputEvent::PointerDown(p) if p.kind == PointerKind::Touch => match &self.state {
                State::Idle => {
                    let draggable = targets.activator_at(p.position)?;
                    if self.options.delay_ms == 0 {
                        return self.commit(p.pointer, draggable, p.position);
                    }
                    self.state = State::Holding {
                        pointer: p.pointer,
                        draggable,
                        origin: p.position,
                        since_ms: p.time_ms,
                    };
                    None
                }
                // A second finger: pinch or scroll, not a drag.
                State::Holding { pointer, .. } | State::Dragging { pointer, .. }
                    if *pointer != p.pointer =>
                {
                    self.abort()
                }
                _ => None,
            },
            InputEvent::PointerMove(p) if p.kind == PointerKind::Touch => match &mut self.state {
                State::Holding {
                    pointer,
                    draggable,
                    origin,
                    since_ms,
                } if *pointer == p.pointer => {
                    if distance(*origin, p.position) > self.options.tolerance {
                        self.state = State::Idle;
                        return None;
                    }
                    if p.time_ms.saturating_sub(*since_ms) < self.options.delay_ms {
                        return None;
                    }
                    let draggable = draggable.clone();
                    self.commit(p.pointer, draggable, p.position)
                }
                State::Dragging {
                    pointer,
                    draggable,
                    last,
                } if *pointer == p.pointer => {
                    *last = p.position;
                    let draggable = draggable.clone();
                    Some(self.event(draggable, SensorPhase::Move, p.position))
                }
                _ => None,
            },
            InputEvent::Tick { time_ms } => match &self.state {
                State::Holding {
                    pointer,
                    draggable,
                    origin,
                    since_ms,
                } if self.held_long_enough(*since_ms, *time_ms) => {
                    let (pointer, draggable, origin) = (*pointer, draggable.clone(), *origin);
                    self.commit(pointer, draggable, origin)
                }
                _ => None,
            },
            InputEvent::PointerUp(p) if p.kind == PointerKind::Touch => match &self.state {
                State::Holding { pointer, .. } if *pointer == p.pointer => {
                    self.state = State::Idle;
                    None
                }
                State::Dragging {
                    pointer, draggable, ..
                } if *pointer == p.pointer => {
                    let draggable = draggable.clone();
                    self.state = State::Idle;
                    Some(self.event(draggable, SensorPhase::End, p.position))
                }
                _ => None,
            },
            InputEvent::PointerCancel {
                pointer,
                kind: PointerKind::Touch,
            } => match &self.state {
                State::Holding { pointer: own, .. } | State::Dragging { pointer: own, .. }
                    if own == pointer =>
                {
                    self.abort()
                }
                _ => None,
            },
            InputEvent::Blur => self.abort(),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.state = State::Idle;
    }

    fn is_active(&self) -> bool {
        matches!(self.state, State::Dragging { .. })
    }
}
