// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host integration traits.
//!
//! The manager never talks to a windowing system or GPU directly. The
//! embedder hands it these three capabilities each frame and keeps full
//! control of the event loop.

use kurbo::Point;

/// The host surface the interface is sized against.
pub trait HostWindow {
    /// The current drawable size in pixels.
    fn pixel_size(&self) -> (u32, u32);
}

/// A pointing device in the host's normalized coordinate space.
pub trait PointerDevice {
    /// The pointer position in normalized device coordinates, `[-1, 1]`
    /// on both axes with `+y` up, or `None` when the pointer is outside
    /// the window.
    fn position(&self) -> Option<Point>;
}

/// A sink for the finished frame.
pub trait TextureConsumer {
    /// Receives the frame as tightly packed RGBA8 rows.
    fn present(&mut self, width: u32, height: u32, pixels: &[u8]);
}
