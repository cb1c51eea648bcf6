// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronous publish/subscribe dispatcher.
//!
//! Handlers run in subscription order, on the caller's stack, before
//! [`EventBus::emit`] returns.
//!
//! - The handler list is snapshotted before dispatch: a handler subscribed
//!   during an emit does not see that emission.
//! - A handler unsubscribed during an emit is skipped if it has not run yet.
//! - A handler that returns an error does not stop delivery. The failure is
//!   logged, republished on [`EventKind::Error`], and the remaining handlers
//!   still run. Failures of `error` handlers are only logged.
//!
//! Handlers may call back into the bus (subscribe, unsubscribe, emit): no
//! internal borrow is held while a handler runs.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_dnd::bus::EventBus;
//! use understory_dnd::event::{DndEvent, EventKind};
//! use understory_dnd::id::DndId;
//!
//! let bus = EventBus::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//!
//! let log = seen.clone();
//! let sub = bus.on(EventKind::Sort, move |event| {
//!     log.borrow_mut().push(event.kind());
//! });
//!
//! let sort = DndEvent::Sort {
//!     sortable: DndId::from("list"),
//!     draggable: DndId::from("a"),
//!     from: 0,
//!     to: 1,
//!     order: vec![DndId::from("b"), DndId::from("a")],
//! };
//! bus.emit(&sort);
//! sub.unsubscribe();
//! bus.emit(&sort);
//!
//! assert_eq!(*seen.borrow(), vec![EventKind::Sort]);
//! ```

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;
use smallvec::SmallVec;

use crate::error::HandlerError;
use crate::event::{DndEvent, EventKind};

type Handler = Rc<dyn Fn(&DndEvent) -> Result<(), HandlerError>>;

struct Slot {
    id: u64,
    kind: EventKind,
    once: bool,
    handler: Handler,
}

#[derive(Default)]
struct Slots {
    entries: Vec<Slot>,
    next_id: u64,
}

impl Slots {
    fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|slot| slot.id != id);
        self.entries.len() != before
    }

    fn contains(&self, id: u64) -> bool {
        self.entries.iter().any(|slot| slot.id == id)
    }
}

/// Event dispatcher shared by the kernel, its plugins, and subscribers.
///
/// Cloning an `EventBus` yields another handle to the same subscriber list.
#[derive(Clone, Default)]
pub struct EventBus {
    slots: Rc<RefCell<Slots>>,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `handler` to `kind`.
    pub fn on(&self, kind: EventKind, handler: impl Fn(&DndEvent) + 'static) -> Subscription {
        self.subscribe(
            kind,
            false,
            Rc::new(move |event| {
                handler(event);
                Ok(())
            }),
        )
    }

    /// Subscribe a handler that may fail.
    ///
    /// An `Err` is republished on [`EventKind::Error`]; dispatch continues.
    pub fn on_fallible(
        &self,
        kind: EventKind,
        handler: impl Fn(&DndEvent) -> Result<(), HandlerError> + 'static,
    ) -> Subscription {
        self.subscribe(kind, false, Rc::new(handler))
    }

    /// Subscribe `handler` for the next `kind` event only.
    pub fn once(&self, kind: EventKind, handler: impl Fn(&DndEvent) + 'static) -> Subscription {
        self.subscribe(
            kind,
            true,
            Rc::new(move |event| {
                handler(event);
                Ok(())
            }),
        )
    }

    /// Remove a subscription. Equivalent to [`Subscription::unsubscribe`].
    pub fn off(&self, subscription: &Subscription) -> bool {
        subscription.unsubscribe()
    }

    /// Deliver `event` to every handler subscribed to its kind.
    pub fn emit(&self, event: &DndEvent) {
        let kind = event.kind();
        let snapshot: SmallVec<[(u64, bool, Handler); 8]> = self
            .slots
            .borrow()
            .entries
            .iter()
            .filter(|slot| slot.kind == kind)
            .map(|slot| (slot.id, slot.once, slot.handler.clone()))
            .collect();

        for (id, once, handler) in snapshot {
            let live = if once {
                self.slots.borrow_mut().remove(id)
            } else {
                self.slots.borrow().contains(id)
            };
            if !live {
                continue;
            }
            if let Err(error) = handler(event) {
                tracing::warn!(event = kind.as_str(), %error, "event handler failed");
                if kind != EventKind::Error {
                    self.emit(&DndEvent::Error {
                        source_event: kind,
                        error,
                    });
                }
            }
        }
    }

    /// Number of handlers currently subscribed to `kind`.
    #[must_use]
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.slots
            .borrow()
            .entries
            .iter()
            .filter(|slot| slot.kind == kind)
            .count()
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.slots.borrow_mut().entries.clear();
    }

    fn subscribe(&self, kind: EventKind, once: bool, handler: Handler) -> Subscription {
        let mut slots = self.slots.borrow_mut();
        let id = slots.next_id;
        slots.next_id += 1;
        slots.entries.push(Slot {
            id,
            kind,
            once,
            handler,
        });
        Subscription {
            id,
            kind,
            slots: Rc::downgrade(&self.slots),
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots = self.slots.borrow();
        f.debug_struct("EventBus")
            .field("handlers", &slots.entries.len())
            .finish_non_exhaustive()
    }
}

/// Token returned by [`EventBus::on`]; call [`Subscription::unsubscribe`] to detach.
///
/// Dropping the token does not unsubscribe.
pub struct Subscription {
    id: u64,
    kind: EventKind,
    slots: Weak<RefCell<Slots>>,
}

impl Subscription {
    /// Detach the handler. Returns `false` if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        self.slots
            .upgrade()
            .is_some_and(|slots| slots.borrow_mut().remove(self.id))
    }

    /// Whether the handler is still subscribed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.slots
            .upgrade()
            .is_some_and(|slots| slots.borrow().contains(self.id))
    }

    /// Channel the handler listens on.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DndId;
    use alloc::vec;
    use core::cell::Cell;

    fn sort_event() -> DndEvent {
        DndEvent::Sort {
            sortable: DndId::from("list"),
            draggable: DndId::from("a"),
            from: 0,
            to: 1,
            order: vec![DndId::from("b"), DndId::from("a")],
        }
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        for n in 0..3 {
            let seen = seen.clone();
            bus.on(EventKind::Sort, move |_| seen.borrow_mut().push(n));
        }
        bus.emit(&sort_event());
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn only_matching_kind_is_invoked() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        bus.on(EventKind::Drop, move |_| h.set(h.get() + 1));
        bus.emit(&sort_event());
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn handler_added_during_emit_misses_that_emit() {
        let bus = EventBus::new();
        let late_hits = Rc::new(Cell::new(0));

        let inner_bus = bus.clone();
        let late = late_hits.clone();
        bus.on(EventKind::Sort, move |_| {
            let late = late.clone();
            inner_bus.on(EventKind::Sort, move |_| late.set(late.get() + 1));
        });

        bus.emit(&sort_event());
        assert_eq!(late_hits.get(), 0);

        bus.emit(&sort_event());
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn handler_removed_during_emit_is_skipped() {
        let bus = EventBus::new();
        let second_hits = Rc::new(Cell::new(0));
        let second_sub: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let target = second_sub.clone();
        bus.on(EventKind::Sort, move |_| {
            if let Some(sub) = target.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let h = second_hits.clone();
        *second_sub.borrow_mut() = Some(bus.on(EventKind::Sort, move |_| h.set(h.get() + 1)));

        bus.emit(&sort_event());
        assert_eq!(second_hits.get(), 0);
        assert_eq!(bus.handler_count(EventKind::Sort), 1);
    }

    #[test]
    fn failing_handler_does_not_block_the_rest() {
        let bus = EventBus::new();
        let after = Rc::new(Cell::new(false));
        let errors = Rc::new(RefCell::new(Vec::new()));

        bus.on_fallible(EventKind::Sort, |_| Err(HandlerError::new("boom")));
        let a = after.clone();
        bus.on(EventKind::Sort, move |_| a.set(true));
        let e = errors.clone();
        bus.on(EventKind::Error, move |event| {
            if let DndEvent::Error {
                source_event,
                error,
            } = event
            {
                e.borrow_mut().push((*source_event, error.clone()));
            }
        });

        bus.emit(&sort_event());

        assert!(after.get());
        assert_eq!(
            *errors.borrow(),
            vec![(EventKind::Sort, HandlerError::new("boom"))]
        );
    }

    #[test]
    fn failing_error_handler_is_not_republished() {
        let bus = EventBus::new();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        bus.on_fallible(EventKind::Error, move |_| {
            c.set(c.get() + 1);
            Err(HandlerError::new("again"))
        });
        bus.on_fallible(EventKind::Sort, |_| Err(HandlerError::new("boom")));

        bus.emit(&sort_event());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn once_fires_a_single_time() {
        let bus = EventBus::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = bus.once(EventKind::Sort, move |_| h.set(h.get() + 1));
        assert!(sub.is_active());

        bus.emit(&sort_event());
        bus.emit(&sort_event());

        assert_eq!(hits.get(), 1);
        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn off_and_clear() {
        let bus = EventBus::new();
        let sub = bus.on(EventKind::Drop, |_| {});
        bus.on(EventKind::Drop, |_| {});
        assert_eq!(bus.handler_count(EventKind::Drop), 2);

        assert!(bus.off(&sub));
        assert!(!bus.off(&sub));
        assert_eq!(bus.handler_count(EventKind::Drop), 1);

        bus.clear();
        assert_eq!(bus.handler_count(EventKind::Drop), 0);
    }

    #[test]
    fn subscription_outliving_bus_is_inert() {
        let bus = EventBus::new();
        let sub = bus.on(EventKind::Drop, |_| {});
        drop(bus);
        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }
}
