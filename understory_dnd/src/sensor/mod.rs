// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensors: translate raw [`InputEvent`]s into a normalized drag stream.
//!
//! A sensor is a small state machine. It decides when raw input becomes a
//! drag (distance threshold, hold delay, activation key), reports positions
//! while the drag lasts, and decides whether the gesture ends normally or is
//! cancelled. Every gesture a sensor reports has the shape
//!
//! ```text
//! Start, Move*, (End | Cancel)
//! ```
//!
//! with exactly one terminal event and nothing after it. Sensors never touch
//! the kernel's session; they only read draggable geometry through
//! [`ActivatorLookup`]. When no draggable can be resolved (nothing under the
//! press, disabled, or detached) the sensor simply does not activate.
//!
//! Built-in sensors:
//! - [`PointerSensor`]: mouse and pen, with a minimum travel distance.
//! - [`TouchSensor`]: touch, with a hold delay and a movement tolerance.
//! - [`KeyboardSensor`]: activation key on the focused draggable, arrows to move.

use kurbo::Point;

use crate::id::DndId;
use crate::input::InputEvent;

mod keyboard;
mod pointer;
mod touch;

pub use keyboard::{KeyboardSensor, KeyboardSensorOptions};
pub use pointer::{PointerSensor, PointerSensorOptions};
pub use touch::{TouchSensor, TouchSensorOptions};

/// Which sensor produced a gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// [`PointerSensor`].
    Pointer,
    /// [`TouchSensor`].
    Touch,
    /// [`KeyboardSensor`].
    Keyboard,
    /// An application-provided sensor.
    Custom(u32),
}

/// Position of an event within its gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SensorPhase {
    /// The gesture became a drag.
    Start,
    /// The drag moved.
    Move,
    /// The drag was released.
    End,
    /// The drag was aborted.
    Cancel,
}

impl SensorPhase {
    /// `true` for [`SensorPhase::End`] and [`SensorPhase::Cancel`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::End | Self::Cancel)
    }
}

/// Normalized sensor output.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorEvent {
    /// Producing sensor.
    pub sensor: SensorKind,
    /// Draggable the gesture started on.
    pub draggable: DndId,
    /// Phase within the gesture.
    pub phase: SensorPhase,
    /// Current position.
    pub position: Point,
}

impl SensorEvent {
    /// Build an event.
    #[must_use]
    pub fn new(sensor: SensorKind, draggable: DndId, phase: SensorPhase, position: Point) -> Self {
        Self {
            sensor,
            draggable,
            phase,
            position,
        }
    }
}

/// Read-only view of draggables that sensors use to pick a gesture target.
pub trait ActivatorLookup {
    /// Draggable that a press at `point` would pick up.
    ///
    /// Implementations skip disabled and detached draggables and honour drag
    /// handles.
    fn activator_at(&self, point: Point) -> Option<DndId>;

    /// Center of draggable `id`, if it is enabled and attached.
    fn activator_center(&self, id: &DndId) -> Option<Point>;
}

/// An input adapter.
pub trait Sensor {
    /// Identity reported in every [`SensorEvent`].
    fn kind(&self) -> SensorKind;

    /// Feed one raw input event; returns the drag event it produced, if any.
    fn handle(
        &mut self,
        input: &InputEvent,
        targets: &dyn ActivatorLookup,
    ) -> Option<SensorEvent>;

    /// Forget any pending or active gesture without emitting anything.
    fn reset(&mut self);

    /// Whether a gesture has started and has not reached its terminal event.
    fn is_active(&self) -> bool;
}

bitflags::bitflags! {
    /// Built-in sensors a kernel enables.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct SensorSet: u8 {
        /// Mouse and pen.
        const POINTER  = 0b0000_0001;
        /// Touch.
        const TOUCH    = 0b0000_0010;
        /// Keyboard.
        const KEYBOARD = 0b0000_0100;
    }
}

impl Default for SensorSet {
    fn default() -> Self {
        Self::all()
    }
}
