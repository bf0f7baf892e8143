// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Manager.
//!
//! The embedder-facing entry point: a [`Manager`] owns the widget tree
//! and style rules and runs the per-frame pipeline against three host
//! capabilities ([`HostWindow`], [`PointerDevice`], [`TextureConsumer`]).
//! The host keeps the event loop; the manager only does work inside
//! [`Manager::frame`] and the pointer button calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_imaging::FixedMetrics;
//! use canopy_manager::{HostWindow, Manager, PointerDevice, TextureConsumer};
//! use canopy_component::Kind;
//! use kurbo::Point;
//!
//! struct Window;
//! impl HostWindow for Window {
//!     fn pixel_size(&self) -> (u32, u32) {
//!         (320, 240)
//!     }
//! }
//!
//! struct Pointer;
//! impl PointerDevice for Pointer {
//!     fn position(&self) -> Option<Point> {
//!         None
//!     }
//! }
//!
//! struct Sink;
//! impl TextureConsumer for Sink {
//!     fn present(&mut self, width: u32, height: u32, pixels: &[u8]) {
//!         assert_eq!(pixels.len(), (width * height * 4) as usize);
//!     }
//! }
//!
//! let mut manager = Manager::new(FixedMetrics)?;
//! let label = manager.insert(Kind::Text, "greeting", None)?;
//! manager.widgets_mut().set(label, "text", "hello")?;
//! manager.show();
//! manager.frame(&Window, &Pointer, &mut Sink)?;
//! # Ok::<(), canopy_component::RenderError>(())
//! ```

mod host;
mod manager;

pub use host::{HostWindow, PointerDevice, TextureConsumer};
pub use manager::Manager;
