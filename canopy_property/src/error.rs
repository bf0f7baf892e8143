// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for property conversion, event dispatch, and tree structure.
//!
//! All failures here are synchronous and programmer-visible; nothing is
//! retried or recovered at runtime. Unknown property names are deliberately
//! *not* an error anywhere in this crate (lenient schema).

use alloc::string::String;
use core::fmt;

/// A style value could not be converted to its canonical form.
///
/// Conversion failures surface to the caller performing the assignment;
/// they are never swallowed by the cascade.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConvertError {
    /// Input did not match `#RRGGBB`/`#RRGGBBAA` or a 4-number list.
    MalformedColor(String),
    /// Input was not a number or a numeric string.
    NotANumber(String),
    /// Input was not a known alignment keyword or a number.
    UnknownAlignment(String),
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedColor(input) => write!(f, "cannot convert {input} to a color"),
            Self::NotANumber(input) => write!(f, "cannot convert {input} to a number"),
            Self::UnknownAlignment(input) => write!(f, "cannot convert {input} to an alignment"),
        }
    }
}

impl core::error::Error for ConvertError {}

/// Failure reported by an event listener.
///
/// Dispatch is aborted at the failing listener; later listeners for the
/// same event do not run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerError(String);

impl ListenerError {
    /// Creates a listener error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListenerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "event listener failed: {}", self.0)
    }
}

impl core::error::Error for ListenerError {}

/// Errors surfaced by [`PropertySet`](crate::PropertySet) and
/// [`PropertyTree`](crate::PropertyTree) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyError {
    /// A value assignment failed conversion.
    Convert(ConvertError),
    /// An event listener failed; delivery was aborted.
    Listener(ListenerError),
    /// A composite property name collides with an existing property.
    DuplicateComposite(String),
    /// Detaching a class that was never attached.
    ClassNotAttached(String),
    /// A node id refers to a removed or reused slot.
    StaleNode,
    /// Re-parenting would make a node its own ancestor.
    WouldCycle,
}

impl fmt::Display for PropertyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert(err) => write!(f, "{err}"),
            Self::Listener(err) => write!(f, "{err}"),
            Self::DuplicateComposite(name) => {
                write!(f, "composite property {name:?} collides with an existing property")
            }
            Self::ClassNotAttached(name) => write!(f, "class {name:?} is not attached"),
            Self::StaleNode => write!(f, "node id is stale"),
            Self::WouldCycle => write!(f, "re-parenting would create a cycle"),
        }
    }
}

impl core::error::Error for PropertyError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Convert(err) => Some(err),
            Self::Listener(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConvertError> for PropertyError {
    fn from(err: ConvertError) -> Self {
        Self::Convert(err)
    }
}

impl From<ListenerError> for PropertyError {
    fn from(err: ListenerError) -> Self {
        Self::Listener(err)
    }
}
