// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Usage errors ([`DndError`]) are returned synchronously from the call that
//! caused them. Failures inside the drag itself never surface here: a failing
//! event handler is reported through the bus as a [`DndEvent::Error`](crate::event::DndEvent::Error),
//! and anything the kernel cannot measure is treated as "no target".

use alloc::string::String;
use core::fmt;

use crate::id::DndId;

/// Which registry a record lives in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// A draggable element.
    Draggable,
    /// A droppable zone.
    Droppable,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Draggable => "draggable",
            Self::Droppable => "droppable",
        })
    }
}

/// Programmer errors reported by the registration and handle APIs.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DndError {
    /// A live record of the same kind already uses this id.
    #[error("a {kind} with id `{id}` is already registered")]
    DuplicateId {
        /// Registry the collision happened in.
        kind: RecordKind,
        /// The contested id.
        id: DndId,
    },
    /// The handle (or the kernel behind it) was destroyed.
    #[error("handle used after it was destroyed")]
    UseAfterDestroy,
    /// Registration options carried an empty id.
    #[error("{kind} options are missing an id")]
    MissingId {
        /// Registry the record was meant for.
        kind: RecordKind,
    },
}

/// Error returned by a fallible event handler.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    /// Create an error with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message passed to [`HandlerError::new`].
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An event name that does not match any [`EventKind`](crate::event::EventKind).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name `{0}`")]
pub struct UnknownEventName(pub String);

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn messages_name_the_record() {
        let err = DndError::DuplicateId {
            kind: RecordKind::Draggable,
            id: DndId::from("x"),
        };
        assert_eq!(err.to_string(), "a draggable with id `x` is already registered");
        assert_eq!(
            DndError::MissingId {
                kind: RecordKind::Droppable
            }
            .to_string(),
            "droppable options are missing an id"
        );
    }

    #[test]
    fn handler_error_displays_message() {
        let err = HandlerError::new("boom");
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");
    }
}
