//! Per-sample maps. Every result saturates to `0..=255`.
//!
//! The 8-bit variants run over the whole stored buffer, padding bytes
//! included; padding is never read back as pixel data.

use rgb::ComponentMap;

use crate::image::{Bmp8, Bmp24};
use crate::pixel::RGB8;

#[inline]
fn brighten(sample: u8, delta: i32) -> u8 {
    i32::from(sample).saturating_add(delta).clamp(0, 255) as u8
}

impl Bmp8 {
    /// `255 - v` for every sample.
    pub fn negative(&mut self) {
        for s in self.data.buf_mut().iter_mut() {
            *s = 255 - *s;
        }
    }

    /// Add `delta` to every sample, clamping to `0..=255`.
    pub fn brightness(&mut self, delta: i32) {
        for s in self.data.buf_mut().iter_mut() {
            *s = brighten(*s, delta);
        }
    }

    /// Samples `>= threshold` become 255, everything else 0.
    pub fn threshold(&mut self, threshold: i32) {
        for s in self.data.buf_mut().iter_mut() {
            *s = if i32::from(*s) >= threshold { 255 } else { 0 };
        }
    }
}

impl Bmp24 {
    pub fn negative(&mut self) {
        for px in self.pixels.buf_mut().iter_mut() {
            *px = px.map(|c| 255 - c);
        }
    }

    pub fn brightness(&mut self, delta: i32) {
        for px in self.pixels.buf_mut().iter_mut() {
            *px = px.map(|c| brighten(c, delta));
        }
    }

    /// Replace each channel with the truncated mean of the three.
    pub fn grayscale(&mut self) {
        for px in self.pixels.buf_mut().iter_mut() {
            let sum = u16::from(px.r) + u16::from(px.g) + u16::from(px.b);
            let gray = (sum / 3) as u8;
            *px = RGB8::new(gray, gray, gray);
        }
    }
}
