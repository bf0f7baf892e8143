// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector inputs and selector predicates for style matching.
//!
//! This module intentionally starts small: a selector is a single name
//! matched against a [`SelectorInputs`] snapshot (no combinators, no
//! specificity). Precedence comes entirely from rule registration order.

use alloc::string::String;

/// A borrowed snapshot of selector inputs for a single element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectorInputs<'a> {
    /// The element's unique id.
    pub id: &'a str,
    /// The element's type tags, most general first (so a `Button` carries
    /// `["Component", "Text", "Button"]`).
    pub type_tags: &'a [&'a str],
}

impl SelectorInputs<'static> {
    /// Empty selector inputs (no id, no type tags).
    pub const EMPTY: Self = Self {
        id: "",
        type_tags: &[],
    };
}

/// A single-name selector.
///
/// The name matches an element whose id equals it, or whose type-tag list
/// contains it. `"titleBar"` targets one element; `"Button"` targets every
/// button (and anything else tagged `Button`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector(String);

impl Selector {
    /// Creates a selector for the given id or type tag.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The selector name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this selector matches the snapshot.
    #[must_use]
    pub fn matches(&self, inputs: &SelectorInputs<'_>) -> bool {
        inputs.id == self.0 || inputs.type_tags.contains(&self.0.as_str())
    }
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_by_id() {
        let selector = Selector::new("titleBar");
        let inputs = SelectorInputs {
            id: "titleBar",
            type_tags: &["Component", "Box"],
        };
        assert!(selector.matches(&inputs));
        assert!(!selector.matches(&SelectorInputs::EMPTY));
    }

    #[test]
    fn matches_by_any_type_tag() {
        let inputs = SelectorInputs {
            id: "ok",
            type_tags: &["Component", "Text", "Button"],
        };
        assert!(Selector::new("Button").matches(&inputs));
        assert!(Selector::new("Text").matches(&inputs));
        assert!(Selector::new("Component").matches(&inputs));
        assert!(!Selector::new("Box").matches(&inputs));
    }
}
