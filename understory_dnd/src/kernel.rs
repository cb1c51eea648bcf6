// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drag-and-drop kernel.
//!
//! A [`Kernel`] owns the registry, the sensors, the drag session, and the
//! event bus, and runs the drag state machine:
//!
//! ```text
//! Idle --Start--> Dragging --Move--> Dragging
//!                 Dragging --End---> Ending --> Idle
//!                 Dragging --Cancel--------->  Idle
//! ```
//!
//! Every [`SensorEvent`] is published on its `sensor:*` channel before the
//! transition runs. Events that do not fit the current state (a move while
//! idle, a second start, events from another sensor or for another
//! draggable) are ignored.
//!
//! ## Reentrancy
//!
//! Handlers run synchronously while a transition is in progress and may call
//! back into the kernel: register or destroy records, subscribe, query the
//! session, even destroy the kernel. The kernel holds no internal borrow
//! while a handler runs, and after every publish it checks that the drag it
//! was working on is still the current one before continuing.
//!
//! A handler that captures a `Kernel` keeps it alive for as long as the
//! handler is subscribed; capture a [`WeakKernel`] instead.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use understory_dnd::event::{DndEvent, EventKind};
//! use understory_dnd::input::{InputEvent, PointerInput};
//! use understory_dnd::kernel::{Kernel, KernelOptions};
//! use understory_dnd::registry::{DraggableOptions, DroppableOptions};
//!
//! let kernel = Kernel::new(KernelOptions::default());
//! let _card = kernel
//!     .draggable(Rc::new(Rect::new(0.0, 0.0, 40.0, 40.0)), DraggableOptions::new("card"))
//!     .unwrap();
//! let _bin = kernel
//!     .droppable(Rc::new(Rect::new(100.0, 0.0, 200.0, 100.0)), DroppableOptions::new("bin"))
//!     .unwrap();
//!
//! let dropped = Rc::new(RefCell::new(None));
//! let sink = dropped.clone();
//! kernel.on(EventKind::Drop, move |event| {
//!     if let DndEvent::Drop { droppable, .. } = event {
//!         *sink.borrow_mut() = Some(droppable.id.clone());
//!     }
//! });
//!
//! kernel.handle_input(&InputEvent::PointerDown(PointerInput::mouse(Point::new(20.0, 20.0), 0)));
//! kernel.handle_input(&InputEvent::PointerMove(PointerInput::mouse(Point::new(150.0, 50.0), 16)));
//! kernel.handle_input(&InputEvent::PointerUp(PointerInput::mouse(Point::new(150.0, 50.0), 32)));
//!
//! assert_eq!(dropped.borrow().as_ref().unwrap(), "bin");
//! assert!(!kernel.is_dragging());
//! ```

use alloc::boxed::Box;
use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use kurbo::{Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::bus::{EventBus, Subscription};
use crate::collision::{CollisionAlgorithm, CollisionDetector, DragGeometry};
use crate::element::ElementRef;
use crate::error::{DndError, HandlerError};
use crate::event::{DndEvent, DraggableSnapshot, DroppableSnapshot, EventKind};
use crate::geometry::is_degenerate;
use crate::handle::{DraggableHandle, DroppableHandle};
use crate::id::DndId;
use crate::input::InputEvent;
use crate::plugin::Plugin;
use crate::registry::{
    Accept, DraggableOptions, DraggableRecord, DroppableOptions, DroppableRecord, Registry,
};
use crate::sensor::{
    KeyboardSensor, KeyboardSensorOptions, PointerSensor, PointerSensorOptions, Sensor,
    SensorEvent, SensorKind, SensorPhase, SensorSet, TouchSensor, TouchSensorOptions,
};
use crate::session::{DragSession, DragStatus};

type Modifier = Rc<dyn Fn(Point) -> Point>;

/// Kernel configuration.
pub struct KernelOptions {
    /// Built-in sensors to enable (default: all).
    pub sensors: SensorSet,
    /// Options for the pointer sensor.
    pub pointer: PointerSensorOptions,
    /// Options for the touch sensor.
    pub touch: TouchSensorOptions,
    /// Options for the keyboard sensor.
    pub keyboard: KeyboardSensorOptions,
    /// Collision strategy (default: [`CollisionAlgorithm::PointerWithin`]).
    pub collision: CollisionAlgorithm,
    /// With [`CollisionAlgorithm::ClosestCenter`], require candidates to
    /// overlap the dragged rect.
    pub center_requires_overlap: bool,
    /// Additional sensors, fed after the built-in ones.
    pub custom_sensors: Vec<Box<dyn Sensor>>,
    /// Plugins, installed in order.
    pub plugins: Vec<Box<dyn Plugin>>,
}

impl Default for KernelOptions {
    fn default() -> Self {
        Self {
            sensors: SensorSet::all(),
            pointer: PointerSensorOptions::default(),
            touch: TouchSensorOptions::default(),
            keyboard: KeyboardSensorOptions::default(),
            collision: CollisionAlgorithm::default(),
            center_requires_overlap: false,
            custom_sensors: Vec::new(),
            plugins: Vec::new(),
        }
    }
}

impl KernelOptions {
    /// Enable only `sensors` among the built-in ones.
    #[must_use]
    pub fn with_sensors(mut self, sensors: SensorSet) -> Self {
        self.sensors = sensors;
        self
    }

    /// Configure the pointer sensor.
    #[must_use]
    pub fn with_pointer(mut self, options: PointerSensorOptions) -> Self {
        self.pointer = options;
        self
    }

    /// Configure the touch sensor.
    #[must_use]
    pub fn with_touch(mut self, options: TouchSensorOptions) -> Self {
        self.touch = options;
        self
    }

    /// Configure the keyboard sensor.
    #[must_use]
    pub fn with_keyboard(mut self, options: KeyboardSensorOptions) -> Self {
        self.keyboard = options;
        self
    }

    /// Choose the collision strategy.
    #[must_use]
    pub fn with_collision(mut self, algorithm: CollisionAlgorithm) -> Self {
        self.collision = algorithm;
        self
    }

    /// Require overlap for [`CollisionAlgorithm::ClosestCenter`].
    #[must_use]
    pub fn with_center_overlap(mut self, required: bool) -> Self {
        self.center_requires_overlap = required;
        self
    }

    /// Add an application-provided sensor.
    #[must_use]
    pub fn with_sensor(mut self, sensor: impl Sensor + 'static) -> Self {
        self.custom_sensors.push(Box::new(sensor));
        self
    }

    /// Add a plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }
}

impl fmt::Debug for KernelOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: SmallVec<[&str; 4]> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("KernelOptions")
            .field("sensors", &self.sensors)
            .field("pointer", &self.pointer)
            .field("touch", &self.touch)
            .field("keyboard", &self.keyboard)
            .field("collision", &self.collision)
            .field("center_requires_overlap", &self.center_requires_overlap)
            .field("custom_sensors", &self.custom_sensors.len())
            .field("plugins", &plugins)
            .finish()
    }
}

struct Shared {
    registry: RefCell<Registry>,
    bus: EventBus,
    sensors: RefCell<Vec<Box<dyn Sensor>>>,
    session: RefCell<DragSession>,
    /// Bumped on every drag start; lets a transition notice that a handler
    /// ended its drag (and maybe started another) while it was publishing.
    generation: Cell<u64>,
    detector: CollisionDetector,
    modifiers: RefCell<Vec<Modifier>>,
    plugins: RefCell<Vec<Box<dyn Plugin>>>,
    destroyed: Cell<bool>,
}

/// Handle to a drag-and-drop kernel.
///
/// Cloning yields another handle to the same kernel.
#[derive(Clone)]
pub struct Kernel {
    shared: Rc<Shared>,
}

/// Non-owning handle to a [`Kernel`].
#[derive(Clone, Default)]
pub struct WeakKernel {
    shared: Weak<Shared>,
}

impl WeakKernel {
    /// The kernel, if it still exists.
    #[must_use]
    pub fn upgrade(&self) -> Option<Kernel> {
        self.shared.upgrade().map(|shared| Kernel { shared })
    }
}

impl fmt::Debug for WeakKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakKernel")
            .field("alive", &(self.shared.strong_count() > 0))
            .finish()
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new(KernelOptions::default())
    }
}

impl Kernel {
    /// Build a kernel and install its plugins.
    #[must_use]
    pub fn new(options: KernelOptions) -> Self {
        let KernelOptions {
            sensors: enabled,
            pointer,
            touch,
            keyboard,
            collision,
            center_requires_overlap,
            custom_sensors,
            mut plugins,
        } = options;

        let mut sensors: Vec<Box<dyn Sensor>> = Vec::new();
        if enabled.contains(SensorSet::POINTER) {
            sensors.push(Box::new(PointerSensor::new(pointer)));
        }
        if enabled.contains(SensorSet::TOUCH) {
            sensors.push(Box::new(TouchSensor::new(touch)));
        }
        if enabled.contains(SensorSet::KEYBOARD) {
            sensors.push(Box::new(KeyboardSensor::new(keyboard)));
        }
        sensors.extend(custom_sensors);

        let kernel = Self {
            shared: Rc::new(Shared {
                registry: RefCell::new(Registry::new()),
                bus: EventBus::new(),
                sensors: RefCell::new(sensors),
                session: RefCell::new(DragSession::default()),
                generation: Cell::new(0),
                detector: CollisionDetector::new(collision)
                    .with_required_overlap(center_requires_overlap),
                modifiers: RefCell::new(Vec::new()),
                plugins: RefCell::new(Vec::new()),
                destroyed: Cell::new(false),
            }),
        };

        for plugin in &mut plugins {
            tracing::debug!(plugin = plugin.name(), "installing plugin");
            plugin.install(&kernel);
        }
        *kernel.shared.plugins.borrow_mut() = plugins;
        kernel
    }

    /// A non-owning handle to this kernel.
    #[must_use]
    pub fn downgrade(&self) -> WeakKernel {
        WeakKernel {
            shared: Rc::downgrade(&self.shared),
        }
    }

    /// Whether `self` and `other` are handles to the same kernel.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }

    /// Register `element` as a draggable.
    pub fn draggable(
        &self,
        element: ElementRef,
        options: DraggableOptions,
    ) -> Result<DraggableHandle, DndError> {
        self.ensure_alive()?;
        let id = options.id.clone();
        self.shared
            .registry
            .borrow_mut()
            .register_draggable(DraggableRecord::new(element, options))?;
        tracing::debug!(%id, "draggable registered");
        Ok(DraggableHandle::new(id, self.downgrade()))
    }

    /// Register `element` as a droppable.
    pub fn droppable(
        &self,
        element: ElementRef,
        options: DroppableOptions,
    ) -> Result<DroppableHandle, DndError> {
        self.ensure_alive()?;
        let id = options.id.clone();
        self.shared
            .registry
            .borrow_mut()
            .register_droppable(DroppableRecord::new(element, options))?;
        tracing::debug!(%id, "droppable registered");
        Ok(DroppableHandle::new(id, self.downgrade()))
    }

    /// Subscribe to `kind`.
    pub fn on(&self, kind: EventKind, handler: impl Fn(&DndEvent) + 'static) -> Subscription {
        self.shared.bus.on(kind, handler)
    }

    /// Subscribe a handler that may fail; failures are republished on
    /// [`EventKind::Error`].
    pub fn on_fallible(
        &self,
        kind: EventKind,
        handler: impl Fn(&DndEvent) -> Result<(), HandlerError> + 'static,
    ) -> Subscription {
        self.shared.bus.on_fallible(kind, handler)
    }

    /// Subscribe to the next `kind` event only.
    pub fn once(&self, kind: EventKind, handler: impl Fn(&DndEvent) + 'static) -> Subscription {
        self.shared.bus.once(kind, handler)
    }

    /// Remove a subscription.
    pub fn off(&self, subscription: &Subscription) -> bool {
        self.shared.bus.off(subscription)
    }

    /// Publish an event on the kernel's bus. Used by layers such as sortable
    /// lists to emit their own events. Does nothing once destroyed.
    pub fn emit(&self, event: &DndEvent) {
        if !self.is_destroyed() {
            self.shared.bus.emit(event);
        }
    }

    /// The kernel's event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    /// Feed raw input to every enabled sensor and act on what they report.
    pub fn handle_input(&self, input: &InputEvent) {
        if self.is_destroyed() {
            return;
        }
        let produced: SmallVec<[SensorEvent; 2]> = {
            let registry = self.shared.registry.borrow();
            let mut sensors = self.shared.sensors.borrow_mut();
            sensors
                .iter_mut()
                .filter_map(|sensor| sensor.handle(input, &*registry))
                .collect()
        };
        for event in produced {
            self.dispatch_sensor(event);
        }
    }

    /// Advance time-based sensors (touch hold delay).
    pub fn tick(&self, time_ms: u64) {
        self.handle_input(&InputEvent::Tick { time_ms });
    }

    /// Publish a sensor event and run the transition it triggers.
    ///
    /// This is the entry point for sensors that live outside the kernel.
    pub fn dispatch_sensor(&self, event: SensorEvent) {
        if self.is_destroyed() {
            return;
        }
        self.shared.bus.emit(&DndEvent::Sensor(event.clone()));
        if self.is_destroyed() {
            return;
        }
        match event.phase {
            SensorPhase::Start => self.start(event),
            SensorPhase::Move => self.move_to(event),
            SensorPhase::End => self.end(event),
            SensorPhase::Cancel => self.cancel(event),
        }
    }

    /// Current state machine status.
    #[must_use]
    pub fn status(&self) -> DragStatus {
        self.shared.session.borrow().status
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.shared.session.borrow().is_dragging()
    }

    /// Copy of the current drag session.
    #[must_use]
    pub fn session(&self) -> DragSession {
        self.shared.session.borrow().clone()
    }

    /// Current rect of droppable `id`, `None` if unknown or detached.
    #[must_use]
    pub fn droppable_rect(&self, id: &str) -> Option<Rect> {
        self.shared.registry.borrow().droppable(id)?.rect()
    }

    /// Current rect of draggable `id`, `None` if unknown or detached.
    #[must_use]
    pub fn draggable_rect(&self, id: &str) -> Option<Rect> {
        self.shared.registry.borrow().draggable(id)?.rect()
    }

    /// Whether draggable `id` is registered.
    #[must_use]
    pub fn has_draggable(&self, id: &str) -> bool {
        self.shared.registry.borrow().draggable(id).is_some()
    }

    /// Whether droppable `id` is registered.
    #[must_use]
    pub fn has_droppable(&self, id: &str) -> bool {
        self.shared.registry.borrow().droppable(id).is_some()
    }

    /// Add a position modifier. Modifiers run in the order they were added on
    /// every position a sensor reports, before the session sees it.
    pub fn add_modifier(&self, modifier: impl Fn(Point) -> Point + 'static) {
        if !self.is_destroyed() {
            self.shared.modifiers.borrow_mut().push(Rc::new(modifier));
        }
    }

    /// Whether [`Kernel::destroy`] has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.shared.destroyed.get()
    }

    /// Tear the kernel down.
    ///
    /// An active drag is cancelled (subscribers see `drag:cancel`), plugins
    /// are torn down in reverse install order, sensors are reset, and the
    /// registry and bus are cleared. Every handle becomes unusable. Calling
    /// this again does nothing.
    pub fn destroy(&self) {
        if self.shared.destroyed.replace(true) {
            return;
        }
        tracing::debug!("destroying kernel");

        let position = {
            let session = self.shared.session.borrow();
            session.is_dragging().then_some(session.current_pos).flatten()
        };
        if let Some(position) = position {
            self.cancel_session(position);
        }

        let mut plugins = core::mem::take(&mut *self.shared.plugins.borrow_mut());
        for plugin in plugins.iter_mut().rev() {
            tracing::debug!(plugin = plugin.name(), "tearing down plugin");
            plugin.teardown();
        }
        drop(plugins);

        {
            let mut sensors = self.shared.sensors.borrow_mut();
            for sensor in sensors.iter_mut() {
                sensor.reset();
            }
            sensors.clear();
        }
        self.shared.modifiers.borrow_mut().clear();
        self.shared.registry.borrow_mut().clear();
        self.shared.session.borrow_mut().end();
        self.shared.bus.clear();
    }

    pub(crate) fn ensure_alive(&self) -> Result<(), DndError> {
        if self.is_destroyed() {
            Err(DndError::UseAfterDestroy)
        } else {
            Ok(())
        }
    }

    /// Apply `f` to draggable `id`.
    pub(crate) fn update_draggable<R>(
        &self,
        id: &DndId,
        f: impl FnOnce(&mut DraggableRecord) -> R,
    ) -> Result<R, DndError> {
        self.ensure_alive()?;
        let mut registry = self.shared.registry.borrow_mut();
        let record = registry
            .draggable_mut(id.as_str())
            .ok_or(DndError::UseAfterDestroy)?;
        Ok(f(record))
    }

    /// Apply `f` to droppable `id`.
    pub(crate) fn update_droppable<R>(
        &self,
        id: &DndId,
        f: impl FnOnce(&mut DroppableRecord) -> R,
    ) -> Result<R, DndError> {
        self.ensure_alive()?;
        let mut registry = self.shared.registry.borrow_mut();
        let record = registry
            .droppable_mut(id.as_str())
            .ok_or(DndError::UseAfterDestroy)?;
        Ok(f(record))
    }

    /// Unregister draggable `id`, cancelling its drag if it is being dragged.
    pub(crate) fn remove_draggable(&self, id: &DndId) {
        let removed = self
            .shared
            .registry
            .borrow_mut()
            .unregister_draggable(id.as_str());
        if removed.is_none() {
            return;
        }
        tracing::debug!(%id, "draggable destroyed");

        let position = {
            let session = self.shared.session.borrow();
            (session.is_dragging() && session.active_id() == Some(id))
                .then_some(session.current_pos)
                .flatten()
        };
        if let Some(position) = position {
            let owner = self.shared.session.borrow().sensor;
            if let Some(kind) = owner {
                self.reset_sensors(kind);
            }
            self.cancel_session(position);
        }
    }

    /// Unregister droppable `id`, leaving it first if the drag is over it.
    pub(crate) fn remove_droppable(&self, id: &DndId) {
        let Some(record) = self
            .shared
            .registry
            .borrow_mut()
            .unregister_droppable(id.as_str())
        else {
            return;
        };
        tracing::debug!(%id, "droppable destroyed");

        let leave = {
            let mut session = self.shared.session.borrow_mut();
            if session.is_dragging() && session.over.as_ref() == Some(id) {
                session.over = None;
                session.active.clone().zip(session.current_pos)
            } else {
                None
            }
        };
        if let Some((draggable, position)) = leave {
            self.shared.bus.emit(&DndEvent::DragLeave {
                draggable,
                droppable: record.snapshot(),
                position,
            });
        }
    }

    fn start(&self, event: SensorEvent) {
        let owner = {
            let session = self.shared.session.borrow();
            (session.status != DragStatus::Idle).then_some(session.sensor)
        };
        if let Some(owner) = owner {
            tracing::debug!(draggable = %event.draggable, "start ignored: already dragging");
            // The owning sensor is mid-gesture; any other sensor must not
            // believe it started a drag.
            if owner != Some(event.sensor) {
                self.reset_sensors(event.sensor);
            }
            return;
        }
        let found = {
            let registry = self.shared.registry.borrow();
            registry
                .draggable(event.draggable.as_str())
                .filter(|record| !record.disabled)
                .map(|record| (record.snapshot(), record.rect()))
        };
        let Some((draggable, rect)) = found else {
            tracing::debug!(draggable = %event.draggable, "start ignored: unknown or disabled draggable");
            self.reset_sensors(event.sensor);
            return;
        };

        let position = self.modify(event.position);
        let generation = self.shared.generation.get().wrapping_add(1);
        self.shared.generation.set(generation);
        self.shared
            .session
            .borrow_mut()
            .start(draggable.clone(), event.sensor, position, rect);
        tracing::debug!(draggable = %draggable.id, sensor = ?event.sensor, "drag started");

        self.shared.bus.emit(&DndEvent::DragStart {
            draggable,
            position,
            sensor: event.sensor,
        });
        if self.is_live(generation) {
            self.refresh_over(generation, position);
        }
    }

    fn move_to(&self, event: SensorEvent) {
        if !self.owns(&event) {
            tracing::debug!(draggable = %event.draggable, "move ignored");
            return;
        }
        let generation = self.shared.generation.get();
        let position = self.modify(event.position);
        let (draggable, delta, offset) = {
            let mut session = self.shared.session.borrow_mut();
            let delta = session.update(position).unwrap_or(Vec2::ZERO);
            let offset = session.total_offset().unwrap_or(Vec2::ZERO);
            (session.active.clone(), delta, offset)
        };
        let Some(draggable) = draggable else {
            return;
        };

        if !self.refresh_over(generation, position) {
            return;
        }
        let over = self.shared.session.borrow().over.clone();
        self.shared.bus.emit(&DndEvent::DragMove {
            draggable,
            position,
            delta,
            offset,
            over,
        });
    }

    fn end(&self, event: SensorEvent) {
        if !self.owns(&event) {
            tracing::debug!(draggable = %event.draggable, "end ignored");
            return;
        }
        let generation = self.shared.generation.get();
        let position = self.modify(event.position);
        let (draggable, over) = {
            let mut session = self.shared.session.borrow_mut();
            session.update(position);
            session.status = DragStatus::Ending;
            (session.active.clone(), session.over.clone())
        };
        let Some(draggable) = draggable else {
            return;
        };

        let target = over.and_then(|id| self.accepting_droppable(&id, &draggable));
        tracing::debug!(
            draggable = %draggable.id,
            droppable = ?target.as_ref().map(|d| &d.id),
            "drag ended"
        );
        if let Some(droppable) = &target {
            self.shared.bus.emit(&DndEvent::Drop {
                draggable: draggable.clone(),
                droppable: droppable.clone(),
                position,
            });
            if self.is_destroyed() {
                return;
            }
        }
        self.shared.bus.emit(&DndEvent::DragEnd {
            draggable,
            droppable: target,
            position,
        });
        if self.shared.generation.get() == generation {
            self.shared.session.borrow_mut().end();
        }
    }

    fn cancel(&self, event: SensorEvent) {
        if !self.owns(&event) {
            tracing::debug!(draggable = %event.draggable, "cancel ignored");
            return;
        }
        let position = self.modify(event.position);
        self.cancel_session(position);
    }

    /// End the session and publish `drag:cancel`.
    fn cancel_session(&self, position: Point) {
        let draggable = {
            let mut session = self.shared.session.borrow_mut();
            let active = session.active.take();
            session.end();
            active
        };
        let Some(draggable) = draggable else {
            return;
        };
        tracing::debug!(draggable = %draggable.id, "drag cancelled");
        self.shared
            .bus
            .emit(&DndEvent::DragCancel { draggable, position });
    }

    /// Recompute the droppable under the drag and publish leave/enter.
    ///
    /// Returns `false` if a handler ended the drag.
    fn refresh_over(&self, generation: u64, position: Point) -> bool {
        let next = self.collide();
        let (previous, draggable) = {
            let mut session = self.shared.session.borrow_mut();
            if session.over == next {
                return true;
            }
            let previous = core::mem::replace(&mut session.over, next.clone());
            (previous, session.active.clone())
        };
        let Some(draggable) = draggable else {
            return false;
        };

        if let Some(previous) = previous {
            self.shared.bus.emit(&DndEvent::DragLeave {
                draggable: draggable.clone(),
                droppable: self.droppable_snapshot(previous),
                position,
            });
            if !self.is_live(generation) {
                return false;
            }
        }
        if let Some(next) = next {
            self.shared.bus.emit(&DndEvent::DragEnter {
                draggable,
                droppable: self.droppable_snapshot(next),
                position,
            });
            if !self.is_live(generation) {
                return false;
            }
        }
        true
    }

    /// Droppable under the current drag geometry.
    fn collide(&self) -> Option<DndId> {
        let (geometry, draggable) = {
            let session = self.shared.session.borrow();
            let pointer = session.current_pos?;
            let rect = session.dragged_rect()?;
            (DragGeometry { pointer, rect }, session.active.clone()?)
        };
        let candidates: Vec<(DndId, Rect, Accept)> = {
            let registry = self.shared.registry.borrow();
            registry
                .droppables()
                .filter(|record| !record.disabled)
                .filter_map(|record| {
                    let rect = record.rect().filter(|rect| !is_degenerate(*rect))?;
                    Some((record.id.clone(), rect, record.accept.clone()))
                })
                .collect()
        };
        // Accept predicates are application code; no borrow is held here.
        let accepted: Vec<(DndId, Rect)> = candidates
            .into_iter()
            .filter(|(_, _, accept)| accept.accepts(&draggable))
            .map(|(id, rect, _)| (id, rect))
            .collect();
        self.shared
            .detector
            .detect(&geometry, accepted.iter().map(|(id, rect)| (id, *rect)))
    }

    fn accepting_droppable(
        &self,
        id: &DndId,
        draggable: &DraggableSnapshot,
    ) -> Option<DroppableSnapshot> {
        let (snapshot, accept) = {
            let registry = self.shared.registry.borrow();
            let record = registry.droppable(id.as_str())?;
            if record.disabled {
                return None;
            }
            (record.snapshot(), record.accept.clone())
        };
        accept.accepts(draggable).then_some(snapshot)
    }

    fn droppable_snapshot(&self, id: DndId) -> DroppableSnapshot {
        let registry = self.shared.registry.borrow();
        match registry.droppable(id.as_str()) {
            Some(record) => record.snapshot(),
            None => DroppableSnapshot::orphan(id),
        }
    }

    fn modify(&self, position: Point) -> Point {
        let modifiers: SmallVec<[Modifier; 2]> =
            self.shared.modifiers.borrow().iter().cloned().collect();
        modifiers
            .iter()
            .fold(position, |position, modifier| modifier(position))
    }

    fn owns(&self, event: &SensorEvent) -> bool {
        self.shared
            .session
            .borrow()
            .is_owned_by(event.sensor, &event.draggable)
    }

    fn is_live(&self, generation: u64) -> bool {
        !self.is_destroyed()
            && self.shared.generation.get() == generation
            && self.is_dragging()
    }

    /// Return every sensor of `kind` to idle.
    fn reset_sensors(&self, kind: SensorKind) {
        for sensor in self.shared.sensors.borrow_mut().iter_mut() {
            if sensor.kind() == kind {
                sensor.reset();
            }
        }
    }
}

impl fmt::Debug for Kernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.shared.registry.borrow();
        f.debug_struct("Kernel")
            .field("status", &self.shared.session.borrow().status)
            .field("draggables", &registry.draggable_count())
            .field("droppables", &registry.droppable_count())
            .field("detector", &self.shared.detector)
            .field("destroyed", &self.shared.destroyed.get())
            .finish_non_exhaustive()
    }
}
