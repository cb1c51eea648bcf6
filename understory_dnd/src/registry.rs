// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of draggable and droppable records.
//!
//! Each kind lives in its own table: a hash map for lookup by id plus an
//! insertion-order list. Every iteration the kernel performs (hit testing,
//! collision candidates) walks the order list, so "first registered wins" is
//! a stable tie-break.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use hashbrown::HashMap;
use kurbo::{Point, Rect};

use crate::element::ElementRef;
use crate::error::{DndError, RecordKind};
use crate::event::{DraggableSnapshot, DroppableSnapshot};
use crate::geometry::{area, center, contains, is_degenerate};
use crate::id::{DndId, Payload};
use crate::sensor::ActivatorLookup;

/// Which draggables a droppable accepts.
#[derive(Clone, Default)]
pub enum Accept {
    /// Every draggable.
    #[default]
    Always,
    /// Draggables whose [`kind`](DraggableSnapshot::kind) is in the list.
    Kinds(Vec<String>),
    /// Draggables for which the predicate returns `true`.
    Predicate(Rc<dyn Fn(&DraggableSnapshot) -> bool>),
}

impl Accept {
    /// Accept draggables tagged with any of `kinds`.
    pub fn kinds<I, S>(kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Kinds(kinds.into_iter().map(Into::into).collect())
    }

    /// Accept draggables for which `predicate` returns `true`.
    pub fn predicate(predicate: impl Fn(&DraggableSnapshot) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(predicate))
    }

    /// Whether `draggable` may be dropped here.
    #[must_use]
    pub fn accepts(&self, draggable: &DraggableSnapshot) -> bool {
        match self {
            Self::Always => true,
            Self::Kinds(kinds) => draggable
                .kind
                .as_deref()
                .is_some_and(|kind| kinds.iter().any(|k| k == kind)),
            Self::Predicate(predicate) => predicate(draggable),
        }
    }
}

impl fmt::Debug for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("Always"),
            Self::Kinds(kinds) => f.debug_tuple("Kinds").field(kinds).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Registration options for a draggable.
#[derive(Clone, Default)]
pub struct DraggableOptions {
    /// Unique draggable id. Must not be empty.
    pub id: DndId,
    /// Application data carried in every event about this draggable.
    pub data: Payload,
    /// Disabled draggables cannot start a drag.
    pub disabled: bool,
    /// Drag handle: when set, presses must land inside this element.
    pub handle: Option<ElementRef>,
    /// Type tag matched by [`Accept::Kinds`].
    pub kind: Option<String>,
}

impl DraggableOptions {
    /// Options for draggable `id`.
    #[must_use]
    pub fn new(id: impl Into<DndId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attach application data.
    #[must_use]
    pub fn with_data<T: core::any::Any>(mut self, data: T) -> Self {
        self.data = Payload::new(data);
        self
    }

    /// Attach an existing payload.
    #[must_use]
    pub fn with_payload(mut self, data: Payload) -> Self {
        self.data = data;
        self
    }

    /// Register the draggable disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Restrict activation to presses inside `handle`.
    #[must_use]
    pub fn with_handle(mut self, handle: ElementRef) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Tag the draggable with a type matched by [`Accept::Kinds`].
    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }
}

impl fmt::Debug for DraggableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraggableOptions")
            .field("id", &self.id)
            .field("data", &self.data)
            .field("disabled", &self.disabled)
            .field("handle", &self.handle.is_some())
            .field("kind", &self.kind)
            .finish()
    }
}

/// Registration options for a droppable.
#[derive(Clone, Debug, Default)]
pub struct DroppableOptions {
    /// Unique droppable id. Must not be empty.
    pub id: DndId,
    /// Application data carried in every event about this droppable.
    pub data: Payload,
    /// Disabled droppables are never collision candidates.
    pub disabled: bool,
    /// Which draggables may be dropped here.
    pub accept: Accept,
}

impl DroppableOptions {
    /// Options for droppable `id`.
    #[must_use]
    pub fn new(id: impl Into<DndId>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Attach application data.
    #[must_use]
    pub fn with_data<T: core::any::Any>(mut self, data: T) -> Self {
        self.data = Payload::new(data);
        self
    }

    /// Attach an existing payload.
    #[must_use]
    pub fn with_payload(mut self, data: Payload) -> Self {
        self.data = data;
        self
    }

    /// Register the droppable disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Set the accept rule.
    #[must_use]
    pub fn with_accept(mut self, accept: Accept) -> Self {
        self.accept = accept;
        self
    }
}

/// A registered draggable.
#[derive(Clone)]
pub struct DraggableRecord {
    /// Draggable id.
    pub id: DndId,
    /// Host element.
    pub element: ElementRef,
    /// Application data.
    pub data: Payload,
    /// Whether the draggable may start a drag.
    pub disabled: bool,
    /// Optional drag handle.
    pub handle: Option<ElementRef>,
    /// Type tag.
    pub kind: Option<String>,
}

impl DraggableRecord {
    /// Build a record for `element` from registration options.
    #[must_use]
    pub fn new(element: ElementRef, options: DraggableOptions) -> Self {
        Self {
            id: options.id,
            element,
            data: options.data,
            disabled: options.disabled,
            handle: options.handle,
            kind: options.kind,
        }
    }

    /// Owned view for event payloads.
    #[must_use]
    pub fn snapshot(&self) -> DraggableSnapshot {
        DraggableSnapshot {
            id: self.id.clone(),
            kind: self.kind.clone(),
            data: self.data.clone(),
        }
    }

    /// Current rect of the element, `None` when detached.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.element.rect()
    }

    /// Whether a press at `point` lands on this draggable's handle.
    ///
    /// Without a handle the whole element is the handle.
    fn handle_contains(&self, point: Point) -> bool {
        match &self.handle {
            None => true,
            Some(handle) => handle.rect().is_some_and(|rect| contains(rect, point)),
        }
    }
}

impl fmt::Debug for DraggableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraggableRecord")
            .field("id", &self.id)
            .field("rect", &self.rect())
            .field("data", &self.data)
            .field("disabled", &self.disabled)
            .field("handle", &self.handle.is_some())
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A registered droppable.
#[derive(Clone)]
pub struct DroppableRecord {
    /// Droppable id.
    pub id: DndId,
    /// Host element.
    pub element: ElementRef,
    /// Application data.
    pub data: Payload,
    /// Whether the droppable takes part in collision checks.
    pub disabled: bool,
    /// Accept rule.
    pub accept: Accept,
}

impl DroppableRecord {
    /// Build a record for `element` from registration options.
    #[must_use]
    pub fn new(element: ElementRef, options: DroppableOptions) -> Self {
        Self {
            id: options.id,
            element,
            data: options.data,
            disabled: options.disabled,
            accept: options.accept,
        }
    }

    /// Owned view for event payloads.
    #[must_use]
    pub fn snapshot(&self) -> DroppableSnapshot {
        DroppableSnapshot {
            id: self.id.clone(),
            data: self.data.clone(),
        }
    }

    /// Current rect of the element, `None` when detached.
    #[must_use]
    pub fn rect(&self) -> Option<Rect> {
        self.element.rect()
    }
}

impl fmt::Debug for DroppableRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DroppableRecord")
            .field("id", &self.id)
            .field("rect", &self.rect())
            .field("data", &self.data)
            .field("disabled", &self.disabled)
            .field("accept", &self.accept)
            .finish_non_exhaustive()
    }
}

/// Id-keyed records with a stable iteration order.
#[derive(Clone, Debug)]
struct Table<R> {
    records: HashMap<DndId, R>,
    order: Vec<DndId>,
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            records: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<R> Table<R> {
    fn insert(&mut self, kind: RecordKind, id: DndId, record: R) -> Result<(), DndError> {
        if id.is_empty() {
            return Err(DndError::MissingId { kind });
        }
        if self.records.contains_key(&id) {
            return Err(DndError::DuplicateId { kind, id });
        }
        self.order.push(id.clone());
        self.records.insert(id, record);
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Option<R> {
        let record = self.records.remove(id)?;
        self.order.retain(|entry| entry.as_str() != id);
        Some(record)
    }

    fn get(&self, id: &str) -> Option<&R> {
        self.records.get(id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut R> {
        self.records.get_mut(id)
    }

    fn iter(&self) -> impl Iterator<Item = &R> + Clone + '_ {
        let records = &self.records;
        self.order.iter().filter_map(move |id| records.get(id))
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.records.clear();
        self.order.clear();
    }
}

/// Draggable and droppable records, keyed by id.
///
/// Draggable and droppable ids are separate namespaces.
///
/// ```
/// use kurbo::{Point, Rect};
/// use std::rc::Rc;
/// use understory_dnd::registry::{DraggableOptions, DraggableRecord, Registry};
///
/// let mut registry = Registry::new();
/// let outer = DraggableRecord::new(
///     Rc::new(Rect::new(0.0, 0.0, 200.0, 200.0)),
///     DraggableOptions::new("outer"),
/// );
/// let inner = DraggableRecord::new(
///     Rc::new(Rect::new(0.0, 0.0, 50.0, 50.0)),
///     DraggableOptions::new("inner"),
/// );
/// registry.register_draggable(outer).unwrap();
/// registry.register_draggable(inner).unwrap();
///
/// assert_eq!(registry.draggable_at(Point::new(10.0, 10.0)).unwrap(), "inner");
/// assert_eq!(registry.draggable_at(Point::new(100.0, 100.0)).unwrap(), "outer");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Registry {
    draggables: Table<DraggableRecord>,
    droppables: Table<DroppableRecord>,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a draggable.
    ///
    /// Fails with [`DndError::DuplicateId`] if a draggable with the same id is
    /// registered, or [`DndError::MissingId`] if the id is empty.
    pub fn register_draggable(&mut self, record: DraggableRecord) -> Result<(), DndError> {
        let id = record.id.clone();
        self.draggables.insert(RecordKind::Draggable, id, record)
    }

    /// Add a droppable.
    ///
    /// Fails with [`DndError::DuplicateId`] if a droppable with the same id is
    /// registered, or [`DndError::MissingId`] if the id is empty.
    pub fn register_droppable(&mut self, record: DroppableRecord) -> Result<(), DndError> {
        let id = record.id.clone();
        self.droppables.insert(RecordKind::Droppable, id, record)
    }

    /// Remove a draggable. Removing an unknown id does nothing.
    pub fn unregister_draggable(&mut self, id: &str) -> Option<DraggableRecord> {
        self.draggables.remove(id)
    }

    /// Remove a droppable. Removing an unknown id does nothing.
    pub fn unregister_droppable(&mut self, id: &str) -> Option<DroppableRecord> {
        self.droppables.remove(id)
    }

    /// Look up a draggable.
    #[must_use]
    pub fn draggable(&self, id: &str) -> Option<&DraggableRecord> {
        self.draggables.get(id)
    }

    /// Look up a droppable.
    #[must_use]
    pub fn droppable(&self, id: &str) -> Option<&DroppableRecord> {
        self.droppables.get(id)
    }

    /// Mutable access to a draggable.
    pub fn draggable_mut(&mut self, id: &str) -> Option<&mut DraggableRecord> {
        self.draggables.get_mut(id)
    }

    /// Mutable access to a droppable.
    pub fn droppable_mut(&mut self, id: &str) -> Option<&mut DroppableRecord> {
        self.droppables.get_mut(id)
    }

    /// Draggables in registration order.
    pub fn draggables(&self) -> impl Iterator<Item = &DraggableRecord> + Clone + '_ {
        self.draggables.iter()
    }

    /// Droppables in registration order.
    pub fn droppables(&self) -> impl Iterator<Item = &DroppableRecord> + Clone + '_ {
        self.droppables.iter()
    }

    /// Number of registered draggables.
    #[must_use]
    pub fn draggable_count(&self) -> usize {
        self.draggables.len()
    }

    /// Number of registered droppables.
    #[must_use]
    pub fn droppable_count(&self) -> usize {
        self.droppables.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draggables.len() == 0 && self.droppables.len() == 0
    }

    /// Draggable a press at `point` would pick up.
    ///
    /// Among enabled, attached draggables whose rect (and handle, if any)
    /// contains `point`, the smallest wins; equal areas go to the first
    /// registered.
    #[must_use]
    pub fn draggable_at(&self, point: Point) -> Option<DndId> {
        let mut best: Option<(&DndId, f64)> = None;
        for record in self.draggables() {
            if record.disabled {
                continue;
            }
            let Some(rect) = record.rect() else {
                continue;
            };
            if is_degenerate(rect) || !contains(rect, point) || !record.handle_contains(point) {
                continue;
            }
            let a = area(rect);
            if best.is_none_or(|(_, best_area)| a < best_area) {
                best = Some((&record.id, a));
            }
        }
        best.map(|(id, _)| id.clone())
    }

    /// Remove every record.
    pub fn clear(&mut self) {
        self.draggables.clear();
        self.droppables.clear();
    }
}

impl ActivatorLookup for Registry {
    fn activator_at(&self, point: Point) -> Option<DndId> {
        self.draggable_at(point)
    }

    fn activator_center(&self, id: &DndId) -> Option<Point> {
        let record = self.draggable(id.as_str())?;
        if record.disabled {
            return None;
        }
        record.rect().map(center)
    }
}
