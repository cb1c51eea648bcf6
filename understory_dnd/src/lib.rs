// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dnd --heading-base-level=0

//! Understory DnD: a headless drag-and-drop kernel.
//!
//! Applications mark elements as draggable or droppable, feed raw input into
//! the kernel, and subscribe to a typed event stream describing what the user
//! is doing. The kernel never draws anything and never touches a document;
//! it measures elements through the [`element::Element`] trait and reports
//! through the [`bus::EventBus`].
//!
//! - [`registry`]: draggable and droppable records, kept in registration order.
//! - [`sensor`]: pointer, touch, and keyboard adapters that turn raw
//!   [`input::InputEvent`]s into a normalized `Start, Move*, End | Cancel` stream.
//! - [`collision`]: picks the droppable under the drag (pointer-within,
//!   rectangle intersection, closest center).
//! - [`bus`]: synchronous, ordered publish/subscribe.
//! - [`kernel`]: the state machine tying these together, plus handles and plugins.
//!
//! ## Event stream
//!
//! For one gesture subscribers see `drag:start`, then per move an optional
//! `drag:leave`, an optional `drag:enter`, and `drag:move`, and finally either
//! `drop` (when released over an accepting droppable) followed by `drag:end`,
//! or `drag:cancel`. A cancelled drag never produces `drop`. See
//! [`event`] for the payloads.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//! use kurbo::Rect;
//! use understory_dnd::element::BoxElement;
//! use understory_dnd::event::{DndEvent, EventKind};
//! use understory_dnd::input::{InputEvent, Key};
//! use understory_dnd::kernel::{Kernel, KernelOptions};
//! use understory_dnd::registry::{Accept, DraggableOptions, DroppableOptions};
//!
//! let kernel = Kernel::new(KernelOptions::default());
//!
//! let card = BoxElement::new(Rect::new(0.0, 0.0, 50.0, 50.0));
//! kernel
//!     .draggable(card.clone(), DraggableOptions::new("card").with_kind("card"))
//!     .unwrap();
//! kernel
//!     .droppable(
//!         Rc::new(Rect::new(0.0, 50.0, 50.0, 100.0)),
//!         DroppableOptions::new("below").with_accept(Accept::kinds(["card"])),
//!     )
//!     .unwrap();
//!
//! let weak = kernel.downgrade();
//! kernel.on(EventKind::Drop, move |event| {
//!     if let DndEvent::Drop { droppable, .. } = event {
//!         assert_eq!(droppable.id, "below");
//!         assert!(weak.upgrade().is_some());
//!     }
//! });
//!
//! // Keyboard: pick up the focused card, move it down two steps, drop it.
//! let key = |key| InputEvent::KeyDown { key, focused: Some("card".into()) };
//! kernel.handle_input(&key(Key::Space));
//! kernel.handle_input(&key(Key::ArrowDown));
//! kernel.handle_input(&key(Key::ArrowDown));
//! assert!(kernel.is_dragging());
//! kernel.handle_input(&key(Key::Space));
//! assert!(!kernel.is_dragging());
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Use floating point implementations from `libm` in `no_std` builds.
//!
//! This crate is `no_std` compatible (with `alloc`). Everything is
//! single-threaded: kernels, handles, and subscriptions are `!Send`.

#![no_std]

extern crate alloc;

pub mod bus;
pub mod collision;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod handle;
pub mod id;
pub mod input;
pub mod kernel;
pub mod plugin;
pub mod registry;
pub mod sensor;
pub mod session;

pub use bus::{EventBus, Subscription};
pub use collision::{CollisionAlgorithm, CollisionDetector, DragGeometry};
pub use element::{BoxElement, Element, ElementRef};
pub use error::{DndError, HandlerError, RecordKind, UnknownEventName};
pub use event::{DndEvent, DraggableSnapshot, DroppableSnapshot, EventKind};
pub use handle::{DraggableHandle, DroppableHandle};
pub use id::{DndId, Payload};
pub use input::{InputEvent, Key, PointerInput, PointerKind};
pub use kernel::{Kernel, KernelOptions, WeakKernel};
pub use plugin::{Plugin, SnapToGrid};
pub use registry::{Accept, DraggableOptions, DroppableOptions};
pub use sensor::{Sensor, SensorEvent, SensorKind, SensorPhase, SensorSet};
pub use session::{DragSession, DragStatus};
