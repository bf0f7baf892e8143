// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Widgets.
//!
//! A retained widget tree built on [`canopy_property`]: every widget is a
//! node whose appearance is entirely property-driven, with a sealed
//! box-model pass for sizing and rendering. Widget kinds are a small
//! closed set ([`Kind`]); variation comes from properties and style
//! classes rather than subclassing.
//!
//! The tree provides:
//! - box-model size computation with caching and bottom-up invalidation,
//! - row/column layout for the container kinds,
//! - rendering through the [`canopy_imaging::Surface`] trait,
//! - hit testing and pointer behavior (hover and click states).
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_component::{Kind, WidgetTree};
//! use canopy_imaging::{FixedMetrics, RasterSurface};
//!
//! let mut widgets = WidgetTree::new();
//! let row = widgets.insert(Kind::HBox, "row", None)?;
//! let label = widgets.insert(Kind::Text, "label", Some(row))?;
//! widgets.set(label, "text", "hello")?;
//! widgets.set(label, "fontColor", "#FFFFFF")?;
//!
//! let shaper = FixedMetrics;
//! let size = widgets.compute_size(row, &shaper)?;
//! widgets.update_layout(row, size, &shaper)?;
//!
//! let mut surface = RasterSurface::new(64, 24);
//! widgets.render(row, &mut surface, &shaper, size)?;
//! # Ok::<(), canopy_component::RenderError>(())
//! ```

mod error;
mod kind;
mod layout;
mod pointer;
mod render;
mod schema;
mod tree;

pub use error::RenderError;
pub use kind::{Kind, WidgetData};
pub use tree::WidgetTree;
