// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identifiers and opaque payloads attached to registered records.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::borrow::Borrow;
use core::fmt;

/// Identifier of a draggable, droppable, or sortable.
///
/// Ids are immutable strings that are cheap to clone, so every event snapshot
/// can carry its own copy. Draggable and droppable ids live in separate
/// namespaces: the same id may name one of each at the same time.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DndId(Arc<str>);

impl DndId {
    /// Create an id from a string slice.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    /// Borrow the id as a string slice.
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` for the empty id, which registration rejects.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for DndId {
    /// The empty id.
    fn default() -> Self {
        Self(Arc::from(""))
    }
}

impl From<&str> for DndId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<&String> for DndId {
    fn from(id: &String) -> Self {
        Self::new(id)
    }
}

impl From<String> for DndId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<&Self> for DndId {
    fn from(id: &Self) -> Self {
        id.clone()
    }
}

impl Borrow<str> for DndId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for DndId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DndId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for DndId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Display for DndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for DndId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DndId({:?})", &*self.0)
    }
}

/// Application data attached to a draggable or droppable.
///
/// The kernel never looks inside a payload. It is shared by reference into
/// every event that concerns its record, so subscribers can read it but cannot
/// swap it out from under the kernel.
#[derive(Clone, Default)]
pub struct Payload(Option<Rc<dyn Any>>);

impl Payload {
    /// Wrap a value.
    #[must_use]
    pub fn new<T: Any>(value: T) -> Self {
        Self(Some(Rc::new(value)))
    }

    /// A payload with no data.
    #[must_use]
    pub const fn empty() -> Self {
        Self(None)
    }

    /// Returns `true` if no data is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Borrow the data as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref()
    }

    /// Returns `true` if both payloads share the same allocation (or are both empty).
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_some() {
            f.write_str("Payload(..)")
        } else {
            f.write_str("Payload(empty)")
        }
    }
}
