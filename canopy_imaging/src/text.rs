// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement.
//!
//! Real shaping and font loading belong to the embedding engine; this
//! module only defines the measurement seam the layout pass needs, plus a
//! deterministic implementation for tests and headless use.

use kurbo::Size;

/// The font parameters a component resolves from its properties.
#[derive(Clone, Debug, PartialEq)]
pub struct FontSpec {
    /// Font family name, as the embedder understands it.
    pub family: String,
    /// Size in pixels.
    pub size: f64,
}

impl FontSpec {
    /// Creates a spec.
    #[must_use]
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Measures text so layout can size text components before drawing.
pub trait TextShaper {
    /// The tight extents of `text` in `font`, in pixels. Newlines separate
    /// lines; the result covers the widest line by the stacked line
    /// heights.
    fn measure(&self, font: &FontSpec, text: &str) -> Size;
}

/// Deterministic metrics independent of any font data: every glyph
/// advances `0.6 em` and lines are `1.2 em` tall.
///
/// Not a substitute for real shaping; sizes are plausible, not accurate.
#[derive(Copy, Clone, Debug, Default)]
pub struct FixedMetrics;

impl FixedMetrics {
    /// Horizontal advance per glyph, as a fraction of the font size.
    pub const ADVANCE: f64 = 0.6;
    /// Line height, as a fraction of the font size.
    pub const LINE_HEIGHT: f64 = 1.2;
}

impl TextShaper for FixedMetrics {
    fn measure(&self, font: &FontSpec, text: &str) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }
        let mut lines = 0_usize;
        let mut widest = 0_usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        #[allow(
            clippy::cast_precision_loss,
            reason = "glyph and line counts are far below f64 precision limits"
        )]
        Size::new(
            widest as f64 * Self::ADVANCE * font.size,
            lines as f64 * Self::LINE_HEIGHT * font.size,
        )
    }
}
