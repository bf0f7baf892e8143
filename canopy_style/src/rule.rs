// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule-based style selection.
//!
//! A [`RuleSet`] is an append-only collection of [`StyleRule`]s. Rules are
//! matched against a [`SelectorInputs`] snapshot in registration order, and
//! the first rule providing a given property wins once the matched classes
//! are attached in that order. The embedder applies the resulting classes
//! as managed (auto) classes; classes attached by hand outrank them.

use alloc::vec::Vec;

use canopy_property::StyleClass;

use crate::selector::{Selector, SelectorInputs};

/// A selector paired with the class it applies.
#[derive(Clone, Debug)]
pub struct StyleRule {
    selector: Selector,
    class: StyleClass,
}

impl StyleRule {
    /// Creates a rule applying `class` to elements matching `selector`.
    #[must_use]
    pub fn new(selector: impl Into<Selector>, class: StyleClass) -> Self {
        Self {
            selector: selector.into(),
            class,
        }
    }

    /// The rule's selector.
    #[must_use]
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// The rule's class payload.
    #[must_use]
    pub fn class(&self) -> &StyleClass {
        &self.class
    }
}

/// An ordered, append-only collection of style rules.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    rules: Vec<StyleRule>,
}

impl RuleSet {
    /// Creates an empty rule set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule. Existing rules are never reordered or replaced.
    pub fn add(&mut self, rule: StyleRule) {
        self.rules.push(rule);
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All rules, in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &StyleRule> {
        self.rules.iter()
    }

    /// The classes of every rule matching the snapshot, in registration
    /// order.
    #[must_use]
    pub fn classes_for(&self, inputs: &SelectorInputs<'_>) -> Vec<StyleClass> {
        self.rules
            .iter()
            .filter(|rule| rule.selector.matches(inputs))
            .map(|rule| rule.class.clone())
            .collect()
    }
}
