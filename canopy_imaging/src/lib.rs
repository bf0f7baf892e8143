// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Imaging: the drawing and text-measurement seams.
//!
//! Components draw through the [`Surface`] trait and measure text through
//! [`TextShaper`]; both are small by design so real engines can adapt
//! their own renderers. [`RasterSurface`] and [`FixedMetrics`] are the
//! bundled software implementations used by tests and headless frames.
//!
//! ## Coordinate model
//!
//! Surfaces are stateful: a current translation offset, clip, fill color,
//! stroke color, and stroke width, with [`Surface::save`] /
//! [`Surface::restore`] snapshotting the whole state. All drawing
//! coordinates are local; the accumulated translation maps them to device
//! pixels, y-down with the origin at the top left.
//!
//! ## Quick Start
//!
//! ```rust
//! use canopy_imaging::{RasterSurface, Surface};
//! use kurbo::Rect;
//! use peniko::Color;
//!
//! let mut surface = RasterSurface::new(16, 16);
//! surface.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
//! surface.save();
//! surface.translate(4.0, 4.0);
//! surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
//! surface.restore();
//! assert_eq!(surface.pixel(4, 4), [255, 0, 0, 255]);
//! ```

mod raster;
mod text;

use kurbo::{Point, Rect};
use peniko::Color;

pub use raster::RasterSurface;
pub use text::{FixedMetrics, FontSpec, TextShaper};

/// A stateful drawing target.
///
/// Implementations keep a state stack of translation offset, clip, fill
/// color, stroke color, and stroke width. Drawing is immediate; there is
/// no retained scene.
pub trait Surface {
    /// Pushes the current state onto the stack.
    fn save(&mut self);

    /// Pops the most recently saved state. A restore without a matching
    /// save is ignored.
    fn restore(&mut self);

    /// Accumulates a translation applied to subsequent coordinates.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Intersects the clip with `rect` (in current local coordinates).
    /// Clips only shrink; restoring is the way back out.
    fn clip_rect(&mut self, rect: Rect);

    /// Sets the fill color for [`Surface::fill_rect`] and
    /// [`Surface::fill_text`].
    fn set_fill_color(&mut self, color: Color);

    /// Sets the stroke color for [`Surface::stroke_rect`].
    fn set_stroke_color(&mut self, color: Color);

    /// Sets the stroke width, in pixels.
    fn set_stroke_width(&mut self, width: f64);

    /// Fills `rect` with the current fill color.
    fn fill_rect(&mut self, rect: Rect);

    /// Strokes a frame just inside `rect` with the current stroke color
    /// and width.
    fn stroke_rect(&mut self, rect: Rect);

    /// Draws `text` with its top-left corner at `origin`, using the
    /// current fill color.
    fn fill_text(&mut self, font: &FontSpec, text: &str, origin: Point);
}
