// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard sensor.
//!
//! Space or Enter on a focused draggable picks it up at its center. Arrow keys
//! move the drag by [`KeyboardSensorOptions::step`] pixels, Space or Enter
//! drops it, and Escape or losing focus cancels.

use kurbo::{Point, Vec2};

use super::{ActivatorLookup, Sensor, SensorEvent, SensorKind, SensorPhase};
use crate::id::DndId;
use crate::input::{InputEvent, Key};

/// Configuration for [`KeyboardSensor`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeyboardSensorOptions {
    /// Distance in pixels moved per arrow key press (default: 25).
    pub step: f64,
}

impl Default for KeyboardSensorOptions {
    fn default() -> Self {
        Self { step: 25.0 }
    }
}

impl KeyboardSensorOptions {
    /// Set the arrow key step.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

/// Sensor for keyboard-driven drags.
#[derive(Clone, Debug, Default)]
pub struct KeyboardSensor {
    options: KeyboardSensorOptions,
    active: Option<(DndId, Point)>,
}

impl KeyboardSensor {
    /// Create a sensor with `options`.
    #[must_use]
    pub fn new(options: KeyboardSensorOptions) -> Self {
        Self {
            options,
            active: None,
        }
    }

    fn event(draggable: DndId, phase: SensorPhase, position: Point) -> SensorEvent {
        SensorEvent::new(SensorKind::Keyboard, draggable, phase, position)
    }

    fn direction(key: Key) -> Option<Vec2> {
        match key {
            Key::ArrowUp => Some(Vec2::new(0.0, -1.0)),
            Key::ArrowDown => Some(Vec2::new(0.0, 1.0)),
            Key::ArrowLeft => Some(Vec2::new(-1.0, 0.0)),
            Key::ArrowRight => Some(Vec2::new(1.0, 0.0)),
            _ => None,
        }
    }
}

impl Sensor for KeyboardSensor {
    fn kind(&self) -> SensorKind {
        SensorKind::Keyboard
    }

    fn handle(
        &mut self,
        input: &InputEvent,
        targets: &dyn ActivatorLookup,
    ) -> Option<SensorEvent> {
        match input {
            InputEvent::KeyDown { key, focused } => match (self.active.take(), *key) {
                (None, Key::Space | Key::Enter) => {
                    let id = focused.as_ref()?;
                    let center = targets.activator_center(id)?;
                    self.active = Some((id.clone(), center));
                    Some(Self::event(id.clone(), SensorPhase::Start, center))
                }
                (Some((id, position)), Key::Space | Key::Enter) => {
                    Some(Self::event(id, SensorPhase::End, position))
                }
                (Some((id, position)), Key::Escape) => {
                    Some(Self::event(id, SensorPhase::Cancel, position))
                }
                (Some((id, position)), key) => {
                    let Some(direction) = Self::direction(key) else {
                        self.active = Some((id, position));
                        return None;
                    };
                    let next = position + direction * self.options.step;
                    self.active = Some((id.clone(), next));
                    Some(Self::event(id, SensorPhase::Move, next))
                }
                (None, _) => None,
            },
            InputEvent::Blur => self
                .active
                .take()
                .map(|(id, position)| Self::event(id, SensorPhase::Cancel, position)),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.active = None;
    }

    fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
