// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Style: selector-based style rules.
//!
//! A [`StyleRule`] pairs a single-name [`Selector`] with a
//! [`StyleClass`](canopy_property::StyleClass) payload. A [`RuleSet`]
//! collects rules append-only; the embedder snapshots each element's id
//! and type tags into [`SelectorInputs`] and applies the matching classes
//! in registration order.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_property::StyleClass;
//! use canopy_style::{RuleSet, SelectorInputs, StyleRule};
//!
//! let mut rules = RuleSet::new();
//! rules.add(StyleRule::new(
//!     "Button",
//!     StyleClass::new("button-style").with("backgroundColor", "#333333"),
//! ));
//!
//! let inputs = SelectorInputs {
//!     id: "ok",
//!     type_tags: &["Component", "Text", "Button"],
//! };
//! assert_eq!(rules.classes_for(&inputs).len(), 1);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

mod rule;
mod selector;

pub use rule::{RuleSet, StyleRule};
pub use selector::{Selector, SelectorInputs};
