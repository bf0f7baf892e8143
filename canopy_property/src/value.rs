// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dynamic value type flowing through the property cascade.

use alloc::string::String;
use alloc::vec::Vec;

use peniko::Color;

use crate::error::ConvertError;

/// A converter applied to a resolved property value before it is cached.
///
/// Converters normalize raw style input (`"#FF0000"`, `"center"`, `"12"`)
/// into canonical values. They must be idempotent on their own output,
/// because inherited values arrive already converted by the parent.
///
/// A converter is never invoked with [`Value::Null`]; the cascade passes
/// `Null` through untouched.
pub type Convert = fn(&Value) -> Result<Value, ConvertError>;

/// A dynamically typed property value.
///
/// `Null` is the "no value" sentinel used by every layer of the cascade:
/// an explicit, class, or inherited slot holding `Null` is skipped during
/// resolution, and assigning `Null` clears a slot.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number. All numeric properties use `f64`.
    Number(f64),
    /// A string.
    Str(String),
    /// A color.
    Color(Color),
    /// An ordered list of values (composite property reads, color literals).
    List(Vec<Value>),
}

impl Value {
    /// Returns `true` if this is [`Value::Null`].
    #[must_use]
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the contained number, if any.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the contained boolean, if any.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the contained string, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained color, if any.
    #[must_use]
    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns the contained list, if any.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

// Colors compare by their raw components; `f32` bitwise semantics are fine
// for cache-change detection, which is all the cascade needs.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Color(a), Self::Color(b)) => a.components == b.components,
            (Self::List(a), Self::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(String::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn null_is_default() {
        assert!(Value::default().is_null());
        assert!(!Value::from(0.0).is_null());
    }

    #[test]
    fn accessors_are_shape_strict() {
        assert_eq!(Value::from(2.5).as_number(), Some(2.5));
        assert_eq!(Value::from("2.5").as_number(), None);
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
    }

    #[test]
    fn colors_compare_by_components() {
        let a = Value::from(Color::from_rgba8(1, 2, 3, 255));
        let b = Value::from(Color::from_rgba8(1, 2, 3, 255));
        let c = Value::from(Color::from_rgba8(1, 2, 4, 255));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn lists_compare_elementwise() {
        let a = Value::List(vec![1.0.into(), 2.0.into()]);
        let b = Value::List(vec![1.0.into(), 2.0.into()]);
        let c = Value::List(vec![1.0.into()]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Value::Null);
    }
}
