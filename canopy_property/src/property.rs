// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single cascading property slot.
//!
//! Each property keeps one slot per source layer and a cached computed
//! value. Resolution order, highest precedence first:
//!
//! 1. the explicit value set directly on the owner,
//! 2. the value supplied by an attached style class,
//! 3. the value inherited from the owner's parent, when inheritance is
//!    enabled for this property,
//! 4. the registered default.
//!
//! Every slot write triggers a synchronous recompute; the caller receives
//! `Some((old, new))` when the cached value actually changed and decides
//! what to do about it (fire events, propagate to children).

use alloc::string::String;

use crate::error::ConvertError;
use crate::value::{Convert, Value};

/// The default supplied when no other layer provides a value.
///
/// `Lazy` defers construction until the property is first resolved, for
/// defaults that are cheap to describe but not to build (the original use
/// case was text nodes created on demand).
#[derive(Clone, Debug)]
pub enum PropertyDefault {
    /// A plain value.
    Value(Value),
    /// A value built on first resolution.
    Lazy(fn() -> Value),
}

impl PropertyDefault {
    /// Resolves the default to a concrete value.
    #[must_use]
    pub fn resolve(&self) -> Value {
        match self {
            Self::Value(v) => v.clone(),
            Self::Lazy(f) => f(),
        }
    }
}

impl From<Value> for PropertyDefault {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

/// One named property with its cascade slots and cached computed value.
#[derive(Clone, Debug)]
pub struct Property {
    name: String,
    default: PropertyDefault,
    convert: Option<Convert>,
    default_inherit: bool,
    inherit_override: Option<bool>,
    explicit: Value,
    class_value: Value,
    inherited: Value,
    computed: Value,
    updating: bool,
}

impl Property {
    /// Creates a property with a default, an optional converter, and an
    /// inheritance flag. The computed cache starts at the resolved default.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        default: impl Into<PropertyDefault>,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Self {
        let mut prop = Self {
            name: name.into(),
            default: default.into(),
            convert,
            default_inherit: inherit,
            inherit_override: None,
            explicit: Value::Null,
            class_value: Value::Null,
            inherited: Value::Null,
            computed: Value::Null,
            updating: false,
        };
        // Initial resolution cannot fail for a well-formed default and has
        // no previous value to diff against.
        prop.computed = prop.resolve().unwrap_or(Value::Null);
        prop
    }

    /// The property name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cached computed value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.computed
    }

    /// The converter, if any. Composite parents share it with lookups that
    /// need to normalize state-qualified raw values.
    #[must_use]
    pub fn convert(&self) -> Option<Convert> {
        self.convert
    }

    /// Whether this property currently inherits from the owner's parent.
    #[must_use]
    pub fn inherit(&self) -> bool {
        self.inherit_override.unwrap_or(self.default_inherit)
    }

    /// The explicit slot, unresolved.
    #[must_use]
    pub fn explicit(&self) -> &Value {
        &self.explicit
    }

    /// Marks this property as mid-dispatch. While set, slot writes update
    /// the slots but report no change, which breaks listener feedback loops.
    pub(crate) fn set_updating(&mut self, updating: bool) {
        self.updating = updating;
    }

    /// Sets the explicit value. `Null` clears the slot.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails
    /// conversion; the slots are still updated.
    pub fn set_value(&mut self, value: Value) -> Result<Option<(Value, Value)>, ConvertError> {
        self.explicit = value;
        self.recompute()
    }

    /// Sets the class slot. `Null` clears it.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails
    /// conversion.
    pub fn set_class_value(
        &mut self,
        value: Value,
    ) -> Result<Option<(Value, Value)>, ConvertError> {
        self.class_value = value;
        self.recompute()
    }

    /// Sets the inherited slot with the parent's already-converted value.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if re-conversion fails, which a
    /// well-behaved (idempotent) converter never does.
    pub fn set_inherited(&mut self, value: Value) -> Result<Option<(Value, Value)>, ConvertError> {
        self.inherited = value;
        self.recompute()
    }

    /// Replaces the default.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails
    /// conversion.
    pub fn set_default(
        &mut self,
        default: impl Into<PropertyDefault>,
    ) -> Result<Option<(Value, Value)>, ConvertError> {
        self.default = default.into();
        self.recompute()
    }

    /// Overrides the inheritance flag for this property instance.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails
    /// conversion.
    pub fn set_inherit(&mut self, inherit: bool) -> Result<Option<(Value, Value)>, ConvertError> {
        self.inherit_override = Some(inherit);
        self.recompute()
    }

    fn resolve(&self) -> Result<Value, ConvertError> {
        let raw = if !self.explicit.is_null() {
            self.explicit.clone()
        } else if !self.class_value.is_null() {
            self.class_value.clone()
        } else if self.inherit() && !self.inherited.is_null() {
            self.inherited.clone()
        } else {
            self.default.resolve()
        };
        match (&self.convert, raw) {
            (_, Value::Null) => Ok(Value::Null),
            (Some(f), raw) => f(&raw),
            (None, raw) => Ok(raw),
        }
    }

    /// Re-resolves the cascade and refreshes the cache. Returns
    /// `Some((old, new))` when the computed value changed.
    fn recompute(&mut self) -> Result<Option<(Value, Value)>, ConvertError> {
        let new = self.resolve()?;
        if self.updating || new == self.computed {
            return Ok(None);
        }
        let old = core::mem::replace(&mut self.computed, new.clone());
        Ok(Some((old, new)))
    }
}
