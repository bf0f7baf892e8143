// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Property: cascading property storage with inheritance and events.
//!
//! This crate is the data layer of Canopy. It stores named, dynamically
//! typed values on objects, resolves them through a fixed cascade, and
//! pushes changes eagerly through an object tree so reads never recompute.
//!
//! ## Core Concepts
//!
//! ### Resolution order
//!
//! Each [`Property`] resolves its computed value from four slots, highest
//! precedence first:
//!
//! - **Explicit** - set directly on the owner
//! - **Class** - supplied by an attached [`StyleClass`]
//! - **Inherited** - the parent's computed value, when inheritance is on
//! - **Default** - registered, possibly lazily constructed
//!
//! The winning value runs through the property's converter before it is
//! cached, so consumers always read canonical shapes.
//!
//! ### Composites
//!
//! A composite name like `margin` fans out over part properties
//! (`marginLeft` .. `marginBottom`). Writing a composite distributes the
//! value: a string with one token per part or a list of matching length
//! maps per-part, anything else broadcasts. Reading a composite collects
//! the parts into a [`Value::List`].
//!
//! ### Trees and change batches
//!
//! [`PropertyTree`] arranges [`PropertySet`]s under generational
//! [`NodeId`]s. Tree mutators fire listeners synchronously and return
//! every `(NodeId, Change)` they produced, in dispatch order.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_property::{PropertySet, PropertyTree, StyleClass, Value, convert};
//!
//! let mut tree: PropertyTree<()> = PropertyTree::new();
//! let root = tree.insert(PropertySet::new("root"), (), None).unwrap();
//! tree.add_property(root, "fontSize", Value::from(16.0), Some(convert::to_number), true)
//!     .unwrap();
//!
//! let child = tree.insert(PropertySet::new("child"), (), Some(root)).unwrap();
//! tree.add_property(child, "fontSize", Value::from(16.0), Some(convert::to_number), true)
//!     .unwrap();
//!
//! // A parent write cascades into the child's inherited slot.
//! tree.set_value(root, "fontSize", "24".into()).unwrap();
//! assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(24.0));
//!
//! // A style class sits between explicit values and inheritance.
//! tree.attach_class(child, StyleClass::new("big").with("fontSize", 32.0))
//!     .unwrap();
//! assert_eq!(tree.value(child, "fontSize").unwrap(), Value::Number(32.0));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. It does not depend on `std`.

#![no_std]

extern crate alloc;

pub mod convert;
mod error;
mod property;
mod set;
mod tree;
mod value;

pub use error::{ConvertError, ListenerError, PropertyError};
pub use property::{Property, PropertyDefault};
pub use set::{Change, Changes, Listener, PropertySet, StyleClass};
pub use tree::{NodeId, PropertyTree, TreeChanges};
pub use value::{Convert, Value};
