// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles returned by [`Kernel::draggable`] and [`Kernel::droppable`].
//!
//! A handle is the only way to change or remove a registered record. It does
//! not keep the kernel alive, and dropping it does not unregister anything.
//! Once the handle has been destroyed, or its kernel has, every method returns
//! [`DndError::UseAfterDestroy`].

use alloc::string::String;
use core::cell::Cell;
use core::fmt;

use crate::error::DndError;
use crate::id::{DndId, Payload};
use crate::kernel::{Kernel, WeakKernel};
use crate::registry::Accept;

struct HandleCore {
    id: DndId,
    kernel: WeakKernel,
    destroyed: Cell<bool>,
}

impl HandleCore {
    fn new(id: DndId, kernel: WeakKernel) -> Self {
        Self {
            id,
            kernel,
            destroyed: Cell::new(false),
        }
    }

    fn kernel(&self) -> Result<Kernel, DndError> {
        if self.destroyed.get() {
            return Err(DndError::UseAfterDestroy);
        }
        let kernel = self.kernel.upgrade().ok_or(DndError::UseAfterDestroy)?;
        kernel.ensure_alive()?;
        Ok(kernel)
    }

    fn take(&self) -> Result<Kernel, DndError> {
        let kernel = self.kernel()?;
        self.destroyed.set(true);
        Ok(kernel)
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
            || self
                .kernel
                .upgrade()
                .is_none_or(|kernel| kernel.is_destroyed())
    }

    fn debug(&self, name: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(name)
            .field("id", &self.id)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}

/// Handle to a registered draggable.
pub struct DraggableHandle {
    core: HandleCore,
}

impl DraggableHandle {
    pub(crate) fn new(id: DndId, kernel: WeakKernel) -> Self {
        Self {
            core: HandleCore::new(id, kernel),
        }
    }

    /// The draggable's id.
    #[must_use]
    pub fn id(&self) -> &DndId {
        &self.core.id
    }

    /// Unregister the draggable. A drag of it in progress is cancelled.
    ///
    /// The id can be registered again afterwards.
    pub fn destroy(&self) -> Result<(), DndError> {
        self.core.take()?.remove_draggable(&self.core.id);
        Ok(())
    }

    /// Whether [`Self::destroy`] (or the kernel's destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }

    /// Allow the draggable to start drags.
    pub fn enable(&self) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_draggable(&self.core.id, |record| record.disabled = false)
    }

    /// Prevent the draggable from starting drags. A drag already in progress
    /// continues.
    pub fn disable(&self) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_draggable(&self.core.id, |record| record.disabled = true)
    }

    /// Whether the draggable is disabled.
    pub fn is_disabled(&self) -> Result<bool, DndError> {
        self.core
            .kernel()?
            .update_draggable(&self.core.id, |record| record.disabled)
    }

    /// Replace the application data.
    pub fn set_data(&self, data: Payload) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_draggable(&self.core.id, |record| record.data = data)
    }

    /// Replace the type tag matched by [`Accept::Kinds`].
    pub fn set_kind(&self, kind: Option<String>) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_draggable(&self.core.id, |record| record.kind = kind)
    }
}

impl fmt::Debug for DraggableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.core.debug("DraggableHandle", f)
    }
}

/// Handle to a registered droppable.
pub struct DroppableHandle {
    core: HandleCore,
}

impl DroppableHandle {
    pub(crate) fn new(id: DndId, kernel: WeakKernel) -> Self {
        Self {
            core: HandleCore::new(id, kernel),
        }
    }

    /// The droppable's id.
    #[must_use]
    pub fn id(&self) -> &DndId {
        &self.core.id
    }

    /// Unregister the droppable. If a drag is over it, `drag:leave` is
    /// published for it.
    pub fn destroy(&self) -> Result<(), DndError> {
        self.core.take()?.remove_droppable(&self.core.id);
        Ok(())
    }

    /// Whether [`Self::destroy`] (or the kernel's destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }

    /// Make the droppable a collision candidate again.
    pub fn enable(&self) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_droppable(&self.core.id, |record| record.disabled = false)
    }

    /// Exclude the droppable from collision checks. Takes effect on the next
    /// move.
    pub fn disable(&self) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_droppable(&self.core.id, |record| record.disabled = true)
    }

    /// Whether the droppable is disabled.
    pub fn is_disabled(&self) -> Result<bool, DndError> {
        self.core
            .kernel()?
            .update_droppable(&self.core.id, |record| record.disabled)
    }

    /// Replace the application data.
    pub fn set_data(&self, data: Payload) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_droppable(&self.core.id, |record| record.data = data)
    }

    /// Replace the accept rule.
    pub fn set_accept(&self, accept: Accept) -> Result<(), DndError> {
        self.core
            .kernel()?
            .update_droppable(&self.core.id, |record| record.accept = accept)
    }
}

impl fmt::Debug for DroppableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.core.debug("DroppableHandle", f)
    }
}
