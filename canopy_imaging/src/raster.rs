// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A software reference surface.
//!
//! [`RasterSurface`] rasterizes the [`Surface`] vocabulary into a straight
//! (non-premultiplied) RGBA8 buffer. It exists for tests, headless runs,
//! and as the buffer a frame pass hands to a texture consumer. It is not a
//! production rasterizer: coverage is per pixel center with no
//! antialiasing.

use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;

use crate::text::{FixedMetrics, FontSpec, TextShaper};
use crate::Surface;

#[derive(Clone, Debug)]
struct DrawState {
    offset: Vec2,
    /// Device-space clip, already intersected with the surface bounds.
    clip: Rect,
    fill: Color,
    stroke: Color,
    stroke_width: f64,
}

/// A straight-alpha RGBA8 pixel buffer implementing [`Surface`].
#[derive(Clone, Debug)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl RasterSurface {
    /// Creates a transparent surface of the given pixel size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let bounds = Rect::new(0.0, 0.0, f64::from(width), f64::from(height));
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            state: DrawState {
                offset: Vec2::ZERO,
                clip: bounds,
                fill: Color::BLACK,
                stroke: Color::BLACK,
                stroke_width: 1.0,
            },
            stack: Vec::new(),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel buffer, row-major RGBA8 with straight alpha.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// One pixel's RGBA bytes. Out-of-bounds reads return transparent.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        let base = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[base],
            self.pixels[base + 1],
            self.pixels[base + 2],
            self.pixels[base + 3],
        ]
    }

    /// Resets every pixel to transparent and drops saved state.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.stack.clear();
        self.state = DrawState {
            offset: Vec2::ZERO,
            clip: Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height)),
            fill: Color::BLACK,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        };
    }

    fn paint(&mut self, rect: Rect, color: Color) {
        let [red, green, blue, alpha] = color.components;
        if alpha <= 0.0 {
            return;
        }
        let device = (rect + self.state.offset).intersect(self.state.clip);
        if device.width() <= 0.0 || device.height() <= 0.0 {
            return;
        }
        let (x_range, y_range) = pixel_ranges(device, self.width, self.height);
        for y in y_range {
            for x in x_range.clone() {
                #[allow(
                    clippy::cast_precision_loss,
                    reason = "pixel coordinates fit f64 exactly"
                )]
                let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                if !device.contains(center) {
                    continue;
                }
                let base = (y * self.width as usize + x) * 4;
                blend_over(
                    &mut self.pixels[base..base + 4],
                    [red, green, blue, alpha],
                );
            }
        }
    }
}

impl Surface for RasterSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.offset += Vec2::new(dx, dy);
    }

    fn clip_rect(&mut self, rect: Rect) {
        self.state.clip = (rect + self.state.offset).intersect(self.state.clip);
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_stroke_width(&mut self, width: f64) {
        self.state.stroke_width = width.max(0.0);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.paint(rect, self.state.fill);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        let w = self.state.stroke_width.min(rect.width() / 2.0).min(rect.height() / 2.0);
        if w <= 0.0 {
            return;
        }
        let color = self.state.stroke;
        // Frame just inside the rect: top and bottom bands full width,
        // side bands between them.
        self.paint(Rect::new(rect.x0, rect.y0, rect.x1, rect.y0 + w), color);
        self.paint(Rect::new(rect.x0, rect.y1 - w, rect.x1, rect.y1), color);
        self.paint(Rect::new(rect.x0, rect.y0 + w, rect.x0 + w, rect.y1 - w), color);
        self.paint(Rect::new(rect.x1 - w, rect.y0 + w, rect.x1, rect.y1 - w), color);
    }

    fn fill_text(&mut self, font: &FontSpec, text: &str, origin: Point) {
        // Text renders as its coverage block; glyph rasterization belongs
        // to the embedding engine.
        let Size { width, height } = FixedMetrics.measure(font, text);
        self.paint(
            Rect::new(origin.x, origin.y, origin.x + width, origin.y + height),
            self.state.fill,
        );
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "bounds are clamped to the surface extents before casting"
)]
fn pixel_ranges(
    device: Rect,
    width: u32,
    height: u32,
) -> (core::ops::Range<usize>, core::ops::Range<usize>) {
    let x0 = device.x0.floor().max(0.0) as usize;
    let x1 = (device.x1.ceil().max(0.0) as usize).min(width as usize);
    let y0 = device.y0.floor().max(0.0) as usize;
    let y1 = (device.y1.ceil().max(0.0) as usize).min(height as usize);
    (x0..x1, y0..y1)
}

/// Straight-alpha source-over blend into one RGBA8 pixel.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channel math is clamped to 0..=255 before casting"
)]
fn blend_over(dst: &mut [u8], src: [f32; 4]) {
    let sa = src[3].clamp(0.0, 1.0);
    if sa >= 1.0 {
        for (out, channel) in dst.iter_mut().zip(src) {
            *out = (channel.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        return;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        dst.fill(0);
        return;
    }
    for i in 0..3 {
        let dc = f32::from(dst[i]) / 255.0;
        let blended = (src[i] * sa + dc * da * (1.0 - sa)) / out_a;
        dst[i] = (blended.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_covers_the_rect_and_nothing_else() {
        let mut surface = RasterSurface::new(8, 8);
        surface.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
        surface.fill_rect(Rect::new(2.0, 2.0, 5.0, 4.0));
        assert_eq!(surface.pixel(2, 2), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(4, 3), [255, 0, 0, 255]);
        assert_eq!(surface.pixel(5, 2), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(2, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn translate_offsets_drawing() {
        let mut surface = RasterSurface::new(8, 8);
        surface.set_fill_color(Color::from_rgba8(0, 255, 0, 255));
        surface.translate(3.0, 3.0);
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(surface.pixel(3, 3), [0, 255, 0, 255]);
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn clip_restricts_and_restore_lifts_it() {
        let mut surface = RasterSurface::new(8, 8);
        surface.set_fill_color(Color::from_rgba8(0, 0, 255, 255));
        surface.save();
        surface.clip_rect(Rect::new(0.0, 0.0, 2.0, 2.0));
        surface.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0));
        assert_eq!(surface.pixel(1, 1), [0, 0, 255, 255]);
        assert_eq!(surface.pixel(3, 3), [0, 0, 0, 0]);

        surface.restore();
        surface.fill_rect(Rect::new(3.0, 3.0, 4.0, 4.0));
        assert_eq!(surface.pixel(3, 3), [0, 0, 255, 255]);
    }

    #[test]
    fn stroke_paints_a_frame_inside_the_rect() {
        let mut surface = RasterSurface::new(8, 8);
        surface.set_stroke_color(Color::from_rgba8(255, 255, 255, 255));
        surface.set_stroke_width(1.0);
        surface.stroke_rect(Rect::new(1.0, 1.0, 7.0, 7.0));
        assert_eq!(surface.pixel(1, 1), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(6, 6), [255, 255, 255, 255]);
        assert_eq!(surface.pixel(3, 3), [0, 0, 0, 0]);
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn translucent_fills_blend_over() {
        let mut surface = RasterSurface::new(2, 1);
        surface.set_fill_color(Color::from_rgba8(255, 0, 0, 255));
        surface.fill_rect(Rect::new(0.0, 0.0, 2.0, 1.0));
        surface.set_fill_color(Color::new([0.0, 0.0, 1.0, 0.5]));
        surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        let blended = surface.pixel(0, 0);
        assert_eq!(blended[3], 255);
        assert!(blended[0] > 100 && blended[0] < 155, "red half-faded: {blended:?}");
        assert!(blended[2] > 100 && blended[2] < 155, "blue half-in: {blended:?}");
        assert_eq!(surface.pixel(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn clear_resets_pixels_and_state() {
        let mut surface = RasterSurface::new(4, 4);
        surface.translate(1.0, 1.0);
        surface.set_fill_color(Color::from_rgba8(9, 9, 9, 255));
        surface.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        surface.clear();
        assert_eq!(surface.pixel(1, 1), [0, 0, 0, 0]);
        surface.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        // Offset was reset, so the fill lands at the origin.
        assert_eq!(surface.pixel(0, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn text_paints_its_coverage_block() {
        let mut surface = RasterSurface::new(32, 16);
        surface.set_fill_color(Color::from_rgba8(0, 255, 0, 255));
        let font = FontSpec::new("sans", 10.0);
        surface.fill_text(&font, "ab", Point::new(2.0, 2.0));
        // 2 glyphs * 0.6 em * 10px = 12px wide, 12px tall.
        assert_eq!(surface.pixel(2, 2), [0, 255, 0, 255]);
        assert_eq!(surface.pixel(13, 2), [0, 255, 0, 255]);
        assert_eq!(surface.pixel(14, 2), [0, 0, 0, 0]);
    }
}
