// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_sortable --heading-base-level=0

//! Understory Sortable: reorderable lists on top of [`understory_dnd`].
//!
//! A sortable list is an ordered sequence of item ids plus a container
//! element. The container is registered as a droppable under the list's id;
//! each item is expected to be registered by the application as both a
//! draggable and a droppable under the item's id. When an item is dropped on
//! another item of the same list, or on the container, the list moves the item
//! and publishes one [`DndEvent::Sort`] carrying the complete new order.
//!
//! The list only uses the kernel's public API: it subscribes to `drop`, reads
//! droppable rectangles, and publishes through [`Kernel::emit`].
//!
//! Dropping an item back onto its own position publishes nothing and leaves
//! the order untouched.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use kurbo::{Point, Rect};
//! use understory_dnd::event::{DndEvent, EventKind};
//! use understory_dnd::input::{InputEvent, PointerInput};
//! use understory_dnd::kernel::{Kernel, KernelOptions};
//! use understory_dnd::registry::{DraggableOptions, DroppableOptions};
//! use understory_sortable::{SortableExt, SortableOptions};
//!
//! let kernel = Kernel::new(KernelOptions::default());
//! let ids = ["a", "b", "c", "d"];
//! for (i, id) in ids.iter().enumerate() {
//!     let y = i as f64 * 20.0;
//!     let row = Rc::new(Rect::new(0.0, y, 100.0, y + 20.0));
//!     kernel.draggable(row.clone(), DraggableOptions::new(*id)).unwrap();
//!     kernel.droppable(row, DroppableOptions::new(*id)).unwrap();
//! }
//! let list = kernel
//!     .sortable(
//!         Rc::new(Rect::new(0.0, 0.0, 100.0, 80.0)),
//!         SortableOptions::new("list").with_items(ids),
//!     )
//!     .unwrap();
//!
//! let orders = Rc::new(RefCell::new(Vec::new()));
//! let sink = orders.clone();
//! kernel.on(EventKind::Sort, move |event| {
//!     if let DndEvent::Sort { order, .. } = event {
//!         sink.borrow_mut().push(order.clone());
//!     }
//! });
//!
//! // Drag "a" onto "c".
//! let at = |x, y| PointerInput::mouse(Point::new(x, y), 0);
//! kernel.handle_input(&InputEvent::PointerDown(at(10.0, 10.0)));
//! kernel.handle_input(&InputEvent::PointerMove(at(10.0, 50.0)));
//! kernel.handle_input(&InputEvent::PointerUp(at(10.0, 50.0)));
//!
//! assert_eq!(list.items(), ["b", "c", "a", "d"]);
//! assert_eq!(orders.borrow().len(), 1);
//! ```
//!
//! ## Features
//!
//! - `std` (enabled by default): Use the Rust standard library.
//! - `libm`: Use floating point implementations from `libm` in `no_std` builds.
//!
//! This crate is `no_std` compatible (with `alloc`).

#![no_std]

extern crate alloc;

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Point;
use understory_dnd::bus::Subscription;
use understory_dnd::element::ElementRef;
use understory_dnd::error::{DndError, RecordKind};
use understory_dnd::event::{DndEvent, EventKind};
use understory_dnd::geometry::center;
use understory_dnd::handle::DroppableHandle;
use understory_dnd::id::DndId;
use understory_dnd::kernel::{Kernel, WeakKernel};
use understory_dnd::registry::{Accept, DroppableOptions};

/// Layout direction of a sortable list.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Items are stacked top to bottom.
    #[default]
    Vertical,
    /// Items are laid out left to right.
    Horizontal,
}

impl Axis {
    /// The coordinate of `point` along this axis.
    #[must_use]
    pub fn coordinate(self, point: Point) -> f64 {
        match self {
            Self::Vertical => point.y,
            Self::Horizontal => point.x,
        }
    }
}

/// Options for [`SortableExt::sortable`].
#[derive(Clone, Debug, Default)]
pub struct SortableOptions {
    /// Id of the list; the container droppable is registered under it.
    pub id: DndId,
    /// Item ids in their current order.
    pub items: Vec<DndId>,
    /// Layout direction, used when an item is dropped on the container.
    pub direction: Axis,
    /// When set, the container only accepts draggables of this kind, and
    /// drops of other kinds are ignored.
    pub group: Option<String>,
}

impl SortableOptions {
    /// Options for an empty vertical list.
    #[must_use]
    pub fn new(id: impl Into<DndId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the initial item order.
    #[must_use]
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DndId>,
    {
        self.items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the layout direction.
    #[must_use]
    pub fn with_direction(mut self, direction: Axis) -> Self {
        self.direction = direction;
        self
    }

    /// Restrict the list to draggables whose kind is `group`.
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }
}

/// Adds [`sortable`](SortableExt::sortable) to [`Kernel`].
pub trait SortableExt {
    /// Register `container` as a sortable list.
    ///
    /// Fails with [`DndError::DuplicateId`] when `options.items` repeats an id
    /// or a droppable already uses the list id, and with
    /// [`DndError::MissingId`] when the list id is empty.
    fn sortable(
        &self,
        container: ElementRef,
        options: SortableOptions,
    ) -> Result<SortableHandle, DndError>;
}

impl SortableExt for Kernel {
    fn sortable(
        &self,
        container: ElementRef,
        options: SortableOptions,
    ) -> Result<SortableHandle, DndError> {
        check_unique(&options.items)?;
        let accept = match &options.group {
            Some(group) => Accept::kinds([group.clone()]),
            None => Accept::Always,
        };
        let droppable =
            self.droppable(container, DroppableOptions::new(&options.id).with_accept(accept))?;

        let list = Rc::new(SortableList {
            id: options.id,
            items: RefCell::new(options.items),
            direction: options.direction,
            group: options.group,
            disabled: Cell::new(false),
            kernel: self.downgrade(),
        });
        let handler_list = list.clone();
        let subscription = self.on(EventKind::Drop, move |event| handler_list.on_drop(event));
        tracing::debug!(id = %list.id, items = list.items.borrow().len(), "sortable registered");

        Ok(SortableHandle {
            list,
            droppable,
            subscription,
            destroyed: Cell::new(false),
        })
    }
}

fn check_unique(items: &[DndId]) -> Result<(), DndError> {
    for (i, id) in items.iter().enumerate() {
        if items[..i].contains(id) {
            return Err(DndError::DuplicateId {
                kind: RecordKind::Draggable,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

struct SortableList {
    id: DndId,
    items: RefCell<Vec<DndId>>,
    direction: Axis,
    group: Option<String>,
    disabled: Cell<bool>,
    kernel: WeakKernel,
}

impl SortableList {
    fn on_drop(&self, event: &DndEvent) {
        let DndEvent::Drop {
            draggable,
            droppable,
            position,
        } = event
        else {
            return;
        };
        if self.disabled.get() {
            return;
        }
        if self
            .group
            .as_deref()
            .is_some_and(|group| draggable.kind.as_deref() != Some(group))
        {
            return;
        }
        let Some(kernel) = self.kernel.upgrade() else {
            return;
        };

        let (from, to) = {
            let items = self.items.borrow();
            let Some(from) = items.iter().position(|id| *id == draggable.id) else {
                return;
            };
            let to = if droppable.id == self.id {
                self.index_at(&kernel, &items, from, *position)
            } else if let Some(target) = items.iter().position(|id| *id == droppable.id) {
                target
            } else {
                return;
            };
            (from, to)
        };

        if from == to {
            tracing::debug!(list = %self.id, item = %draggable.id, "drop at own position, order unchanged");
            return;
        }
        let order = {
            let mut items = self.items.borrow_mut();
            move_item(&mut items, from, to);
            items.clone()
        };
        tracing::debug!(list = %self.id, item = %draggable.id, from, to, "sorted");
        kernel.emit(&DndEvent::Sort {
            sortable: self.id.clone(),
            draggable: draggable.id.clone(),
            from,
            to,
            order,
        });
    }

    /// Index the dragged item lands on when dropped on the container: the
    /// number of other items whose centers lie before `position`.
    fn index_at(&self, kernel: &Kernel, items: &[DndId], from: usize, position: Point) -> usize {
        let pointer = self.direction.coordinate(position);
        items
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != from)
            .filter_map(|(_, id)| kernel.droppable_rect(id.as_str()))
            .filter(|rect| self.direction.coordinate(center(*rect)) < pointer)
            .count()
    }
}

/// Handle to a sortable list returned by [`SortableExt::sortable`].
///
/// Unlike draggable and droppable handles, this one owns the list's order:
/// the list keeps working after the handle is dropped, but its order can only
/// be read back through the handle or [`DndEvent::Sort`].
pub struct SortableHandle {
    list: Rc<SortableList>,
    droppable: DroppableHandle,
    subscription: Subscription,
    destroyed: Cell<bool>,
}

impl SortableHandle {
    /// The list id.
    #[must_use]
    pub fn id(&self) -> &DndId {
        &self.list.id
    }

    /// Current item order.
    #[must_use]
    pub fn items(&self) -> Vec<DndId> {
        self.list.items.borrow().clone()
    }

    /// Replace the item order, for example after the application changed
    /// its model. Does not publish `sort`.
    pub fn set_items<I, S>(&self, items: I) -> Result<(), DndError>
    where
        I: IntoIterator<Item = S>,
        S: Into<DndId>,
    {
        self.ensure_alive()?;
        let items: Vec<DndId> = items.into_iter().map(Into::into).collect();
        check_unique(&items)?;
        *self.list.items.borrow_mut() = items;
        Ok(())
    }

    /// Stop reacting to drops and unregister the container.
    pub fn destroy(&self) -> Result<(), DndError> {
        self.ensure_alive()?;
        self.destroyed.set(true);
        self.subscription.unsubscribe();
        self.droppable.destroy()
    }

    /// Whether [`Self::destroy`] (or the kernel's destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.get() || self.droppable.is_destroyed()
    }

    /// Resume reordering and accept drops on the container again.
    pub fn enable(&self) -> Result<(), DndError> {
        self.ensure_alive()?;
        self.list.disabled.set(false);
        self.droppable.enable()
    }

    /// Ignore drops until [`Self::enable`] is called.
    pub fn disable(&self) -> Result<(), DndError> {
        self.ensure_alive()?;
        self.list.disabled.set(true);
        self.droppable.disable()
    }

    fn ensure_alive(&self) -> Result<(), DndError> {
        if self.is_destroyed() {
            Err(DndError::UseAfterDestroy)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for SortableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortableHandle")
            .field("id", &self.list.id)
            .field("items", &self.list.items.borrow())
            .field("direction", &self.list.direction)
            .field("group", &self.list.group)
            .field("disabled", &self.list.disabled.get())
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

/// Move the element at `from` so it ends up at index `to`, shifting the
/// elements in between by one.
///
/// Returns `false`, leaving `items` untouched, when either index is out of
/// bounds or they are equal.
///
/// ```rust
/// let mut items = ['a', 'b', 'c', 'd'];
/// assert!(understory_sortable::move_item(&mut items, 0, 2));
/// assert_eq!(items, ['b', 'c', 'a', 'd']);
/// ```
pub fn move_item<T>(items: &mut [T], from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    if from < to {
        items[from..=to].rotate_left(1);
    } else {
        items[to..=from].rotate_right(1);
    }
    true
}
