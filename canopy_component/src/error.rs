// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget-layer errors.

use std::fmt;

use canopy_property::{ConvertError, PropertyError, Value};

/// Errors from sizing, layout, rendering, and pointer dispatch.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderError {
    /// The four border sides differ. Only uniform borders draw; this is an
    /// explicit unimplemented feature, never averaged away.
    NonUniformBorder,
    /// A box-model rect property resolved to something other than four
    /// non-negative numbers.
    BadRectValue {
        /// The offending property name.
        name: String,
        /// The value it resolved to.
        value: Value,
    },
    /// A property operation failed underneath.
    Property(PropertyError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonUniformBorder => {
                write!(f, "non-uniform borders are not implemented")
            }
            Self::BadRectValue { name, value } => {
                write!(f, "{name} must be four non-negative numbers, got {value:?}")
            }
            Self::Property(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Property(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PropertyError> for RenderError {
    fn from(err: PropertyError) -> Self {
        Self::Property(err)
    }
}

impl From<ConvertError> for RenderError {
    fn from(err: ConvertError) -> Self {
        Self::Property(PropertyError::Convert(err))
    }
}
