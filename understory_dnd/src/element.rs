// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The boundary between the kernel and the host's element tree.
//!
//! The kernel never owns elements. It only asks them where they are, through
//! [`Element::rect`], whenever it needs geometry: when a sensor resolves the
//! element under a press, and on every collision check. A host (a DOM binding,
//! a retained widget tree, a test) implements [`Element`] for whatever node
//! handle it already has.
//!
//! Implementations are called while the kernel is mid-update, so they must not
//! call back into the kernel.

use alloc::rc::Rc;
use core::cell::Cell;
use kurbo::Rect;

/// A host element the kernel can measure.
pub trait Element {
    /// Current bounding box in the same coordinate space as input positions,
    /// or `None` when the element is detached.
    fn rect(&self) -> Option<Rect>;

    /// Whether the element is still attached to the document.
    fn is_connected(&self) -> bool {
        self.rect().is_some()
    }
}

/// Shared handle to a host element.
pub type ElementRef = Rc<dyn Element>;

/// A fixed rectangle is an element that never moves and never detaches.
impl Element for Rect {
    fn rect(&self) -> Option<Rect> {
        Some(*self)
    }
}

/// An element whose box the host pushes in after each layout pass.
///
/// ```
/// use kurbo::Rect;
/// use understory_dnd::element::{BoxElement, Element};
///
/// let card = BoxElement::new(Rect::new(0.0, 0.0, 100.0, 40.0));
/// card.set_rect(Rect::new(0.0, 50.0, 100.0, 90.0));
/// assert_eq!(card.rect(), Some(Rect::new(0.0, 50.0, 100.0, 90.0)));
///
/// card.detach();
/// assert!(!card.is_connected());
/// assert_eq!(card.rect(), None);
/// ```
#[derive(Debug)]
pub struct BoxElement {
    rect: Cell<Rect>,
    connected: Cell<bool>,
}

impl BoxElement {
    /// Create an attached element at `rect`.
    #[must_use]
    pub fn new(rect: Rect) -> Rc<Self> {
        Rc::new(Self {
            rect: Cell::new(rect),
            connected: Cell::new(true),
        })
    }

    /// Update the element's box.
    pub fn set_rect(&self, rect: Rect) {
        self.rect.set(rect);
    }

    /// Mark the element as removed from the document.
    pub fn detach(&self) {
        self.connected.set(false);
    }

    /// Mark the element as attached again.
    pub fn attach(&self) {
        self.connected.set(true);
    }
}

impl Element for BoxElement {
    fn rect(&self) -> Option<Rect> {
        self.connected.get().then(|| self.rect.get())
    }

    fn is_connected(&self) -> bool {
        self.connected.get()
    }
}
