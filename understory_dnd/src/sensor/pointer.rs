// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse and pen sensor.
//!
//! A primary-button press on a draggable arms the sensor. The drag starts once
//! the pointer has travelled at least [`PointerSensorOptions::distance`] from
//! the press, so a plain click never becomes a drag. Releasing while armed is a
//! click and produces nothing.

use kurbo::Point;

use super::{ActivatorLookup, Sensor, SensorEvent, SensorKind, SensorPhase};
use crate::geometry::distance;
use crate::id::DndId;
use crate::input::{InputEvent, Key, PointerId, PointerKind};

/// Configuration for [`PointerSensor`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSensorOptions {
    /// Travel in pixels required before a press becomes a drag (default: 5).
    /// `0.0` starts the drag on press.
    pub distance: f64,
    /// Whether Escape cancels an active drag (default: true).
    pub cancel_on_escape: bool,
}

impl Default for PointerSensorOptions {
    fn default() -> Self {
        Self {
            distance: 5.0,
            cancel_on_escape: true,
        }
    }
}

impl PointerSensorOptions {
    /// Set the activation distance.
    #[must_use]
    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = distance;
        self
    }

    /// Keep drags alive when Escape is pressed.
    #[must_use]
    pub fn no_escape_cancel(mut self) -> Self {
        self.cancel_on_escape = false;
        self
    }
}

#[derive(Clone, Debug, Default)]
enum State {
    #[default]
    Idle,
    Armed {
        pointer: PointerId,
        draggable: DndId,
        origin: Point,
    },
    Dragging {
        pointer: PointerId,
        draggable: DndId,
        last: Point,
    },
}

/// Sensor for [`PointerKind::Mouse`] and [`PointerKind::Pen`] input.
#[derive(Clone, Debug, Default)]
pub struct PointerSensor {
    options: PointerSensorOptions,
    state: State,
}

impl PointerSensor {
    /// Create a sensor with `options`.
    #[must_use]
    pub fn new(options: PointerSensorOptions) -> Self {
        Self {
            options,
            state: State::Idle,
        }
    }

    fn event(&self, draggable: DndId, phase: SensorPhase, position: Point) -> SensorEvent {
        SensorEvent::new(SensorKind::Pointer, draggable, phase, position)
    }

    fn cancel(&mut self) -> Option<SensorEvent> {
        match core::mem::take(&mut self.state) {
            State::Dragging {
                draggable, last, ..
            } => Some(self.event(draggable, SensorPhase::Cancel, last)),
            State::Armed { .. } | State::Idle => None,
        }
    }
}

impl Sensor for PointerSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Pointer
    }

    fn handle(
        &mut self,
        input: &InputEvent,
        targets: &dyn ActivatorLookup,
    ) -> Option<SensorEvent> {
        match input {
            InputEvent::PointerDown(p) if p.kind != PointerKind::Touch => {
                if !matches!(self.state, State::Idle) || !p.primary {
                    return None;
                }
                let draggable = targets.activator_at(p.position)?;
                if self.options.distance <= 0.0 {
                    self.state = State::Dragging {
                        pointer: p.pointer,
                        draggable: draggable.clone(),
                        last: p.position,
                    };
                    return Some(self.event(draggable, SensorPhase::Start, p.position));
                }
                self.state = State::Armed {
                    pointer: p.pointer,
                    draggable,
                    origin: p.position,
                };
                None
            }
            InputEvent::PointerMove(p) if p.kind != PointerKind::Touch => match &mut self.state {
                State::Armed {
                    pointer,
                    draggable,
                    origin,
                } if *pointer == p.pointer => {
                    if distance(*origin, p.position) < self.options.distance {
                        return None;
                    }
                    let draggable = draggable.clone();
                    self.state = State::Dragging {
                        pointer: p.pointer,
                        draggable: draggable.clone(),
                        last: p.position,
                    };
                    Some(self.event(draggable, SensorPhase::Start, p.position))
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
            InputEvent::PointerUp(p) if p.kind != PointerKind::Touch => match &self.state {
                State::Armed { pointer, .. } if *pointer == p.pointer => {
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
            InputEvent::PointerCancel { pointer, kind } if *kind != PointerKind::Touch => {
                match &self.state {
                    State::Armed { pointer: own, .. } | State::Dragging { pointer: own, .. }
                        if own == pointer =>
                    {
                        self.cancel()
                    }
                    _ => None,
                }
            }
            InputEvent::KeyDown {
                key: Key::Escape, ..
            } if self.options.cancel_on_escape => self.cancel(),
            InputEvent::Blur => self.cancel(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerInput;
    use crate::sensor::test_support::Targets;
    use alloc::vec::Vec;
    use kurbo::Rect;

    fn targets() -> Targets {
        Targets::one("card", Rect::new(0.0, 0.0, 100.0, 100.0))
    }

    fn down(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerDown(PointerInput::mouse(Point::new(x, y), 0))
    }

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMove(PointerInput::mouse(Point::new(x, y), 0))
    }

    fn up(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerUp(PointerInput::mouse(Point::new(x, y), 0))
    }

    fn run(sensor: &mut PointerSensor, inputs: &[InputEvent]) -> Vec<SensorPhase> {
        let targets = targets();
        inputs
            .iter()
            .filter_map(|input| sensor.handle(input, &targets))
            .map(|event| event.phase)
            .collect()
    }

    #[test]
    fn click_without_travel_is_not_a_drag() {
        let mut sensor = PointerSensor::default();
        let phases = run(&mut sensor, &[down(10.0, 10.0), moved(12.0, 10.0), up(12.0, 10.0)]);
        assert!(phases.is_empty());
        assert!(!sensor.is_active());
    }

    #[test]
    fn travel_past_threshold_starts_then_moves_then_ends() {
        let mut sensor = PointerSensor::default();
        let phases = run(
            &mut sensor,
            &[
                down(10.0, 10.0),
                moved(16.0, 10.0),
                moved(30.0, 10.0),
                up(30.0, 10.0),
            ],
        );
        assert_eq!(
            phases,
            [SensorPhase::Start, SensorPhase::Move, SensorPhase::End]
        );
        assert!(!sensor.is_active());
    }

    #[test]
    fn zero_distance_starts_on_press() {
        let mut sensor = PointerSensor::new(PointerSensorOptions::default().with_distance(0.0));
        let phases = run(&mut sensor, &[down(10.0, 10.0)]);
        assert_eq!(phases, [SensorPhase::Start]);
        assert!(sensor.is_active());
    }

    #[test]
    fn press_outside_any_draggable_does_nothing() {
        let mut sensor = PointerSensor::default();
        let phases = run(&mut sensor, &[down(500.0, 500.0), moved(600.0, 600.0)]);
        assert!(phases.is_empty());
    }

    #[test]
    fn secondary_button_does_not_arm() {
        let mut sensor = PointerSensor::default();
        let targets = targets();
        let press = InputEvent::PointerDown(
            PointerInput::mouse(Point::new(10.0, 10.0), 0).secondary(),
        );
        assert_eq!(sensor.handle(&press, &targets), None);
        assert_eq!(sensor.handle(&moved(50.0, 50.0), &targets), None);
    }

    #[test]
    fn escape_cancels_once() {
        let mut sensor = PointerSensor::default();
        let escape = InputEvent::KeyDown {
            key: Key::Escape,
            focused: None,
        };
        let phases = run(
            &mut sensor,
            &[
                down(10.0, 10.0),
                moved(40.0, 10.0),
                escape.clone(),
                escape,
                moved(50.0, 10.0),
                up(50.0, 10.0),
            ],
        );
        assert_eq!(phases, [SensorPhase::Start, SensorPhase::Cancel]);
    }

    #[test]
    fn escape_ignored_when_disabled() {
        let mut sensor = PointerSensor::new(PointerSensorOptions::default().no_escape_cancel());
        let escape = InputEvent::KeyDown {
            key: Key::Escape,
            focused: None,
        };
        let phases = run(
            &mut sensor,
            &[down(10.0, 10.0), moved(40.0, 10.0), escape, up(40.0, 10.0)],
        );
        assert_eq!(phases, [SensorPhase::Start, SensorPhase::End]);
    }

    #[test]
    fn blur_and_platform_cancel_abort() {
        let mut sensor = PointerSensor::default();
        let phases = run(
            &mut sensor,
            &[down(10.0, 10.0), moved(40.0, 10.0), InputEvent::Blur],
        );
        assert_eq!(phases, [SensorPhase::Start, SensorPhase::Cancel]);

        let cancel = InputEvent::PointerCancel {
            pointer: 0,
            kind: PointerKind::Mouse,
        };
        let phases = run(&mut sensor, &[down(10.0, 10.0), moved(40.0, 10.0), cancel]);
        assert_eq!(phases, [SensorPhase::Start, SensorPhase::Cancel]);
    }

    #[test]
    fn cancel_reports_last_position() {
        let mut sensor = PointerSensor::default();
        let targets = targets();
        sensor.handle(&down(10.0, 10.0), &targets);
        sensor.handle(&moved(40.0, 20.0), &targets);
        let cancel = sensor.handle(&InputEvent::Blur, &targets).unwrap();
        assert_eq!(cancel.position, Point::new(40.0, 20.0));
    }

    #[test]
    fn other_pointers_are_ignored() {
        let mut sensor = PointerSensor::default();
        let targets = targets();
        sensor.handle(&down(10.0, 10.0), &targets);
        let other = InputEvent::PointerMove(PointerInput::new(
            PointerKind::Pen,
            7,
            Point::new(90.0, 90.0),
            0,
        ));
        assert_eq!(sensor.handle(&other, &targets), None);
    }

    #[test]
    fn touch_input_is_left_to_the_touch_sensor() {
        let mut sensor = PointerSensor::new(PointerSensorOptions::default().with_distance(0.0));
        let targets = targets();
        let touch = InputEvent::PointerDown(PointerInput::touch(1, Point::new(10.0, 10.0), 0));
        assert_eq!(sensor.handle(&touch, &targets), None);
    }

    #[test]
    fn reset_drops_the_gesture_silently() {
        let mut sensor = PointerSensor::default();
        let targets = targets();
        sensor.handle(&down(10.0, 10.0), &targets);
        sensor.handle(&moved(40.0, 10.0), &targets);
        sensor.reset();
        assert!(!sensor.is_active());
        assert_eq!(sensor.handle(&up(40.0, 10.0), &targets), None);
    }
}
