//! Square-kernel convolution.
//!
//! Out-of-bounds taps are skipped rather than padded or clamped, so pixels
//! near the border see a smaller effective kernel. The 24-bit path filters
//! every pixel; the 8-bit path only filters pixels whose whole neighbourhood
//! is inside the image and leaves the border as it was.

use imgref::ImgVec;

use crate::error::BmpError;
use crate::image::{Bmp8, Bmp24};
use crate::pixel::RGB8;

/// An odd-sized square matrix of weights, indexed `[row][column]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kernel<const N: usize> {
    weights: [[f32; N]; N],
}

impl<const N: usize> Kernel<N> {
    pub fn new(weights: [[f32; N]; N]) -> Result<Self, BmpError> {
        if N % 2 == 0 {
            return Err(BmpError::InvalidKernel(N));
        }
        Ok(Self { weights })
    }

    /// Distance from the centre to the edge (`N / 2`).
    pub const fn radius(&self) -> usize {
        N / 2
    }

    pub fn weights(&self) -> &[[f32; N]; N] {
        &self.weights
    }

    #[inline]
    fn tap(&self, dx: isize, dy: isize) -> f32 {
        let r = (N / 2) as isize;
        self.weights[(dy + r) as usize][(dx + r) as usize]
    }
}

const NINTH: f32 = 1.0 / 9.0;
const SIXTEENTH: f32 = 1.0 / 16.0;

pub const BOX_BLUR: Kernel<3> = Kernel {
    weights: [[NINTH; 3]; 3],
};

pub const GAUSSIAN_BLUR: Kernel<3> = Kernel {
    weights: [
        [SIXTEENTH, 2.0 * SIXTEENTH, SIXTEENTH],
        [2.0 * SIXTEENTH, 4.0 * SIXTEENTH, 2.0 * SIXTEENTH],
        [SIXTEENTH, 2.0 * SIXTEENTH, SIXTEENTH],
    ],
};

pub const OUTLINE: Kernel<3> = Kernel {
    weights: [[-1.0, -1.0, -1.0], [-1.0, 8.0, -1.0], [-1.0, -1.0, -1.0]],
};

pub const EMBOSS: Kernel<3> = Kernel {
    weights: [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]],
};

pub const SHARPEN: Kernel<3> = Kernel {
    weights: [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]],
};

/// Clamp to `0..=255`, then truncate.
#[inline]
fn saturate(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Visit every in-bounds tap around `(x, y)` as `(index, weight)`.
#[inline]
fn for_each_tap<const N: usize>(
    kernel: &Kernel<N>,
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    stride: usize,
    mut f: impl FnMut(usize, f32),
) {
    let r = (N / 2) as isize;
    for dy in -r..=r {
        let sy = y as isize + dy;
        if sy < 0 || sy >= height as isize {
            continue;
        }
        for dx in -r..=r {
            let sx = x as isize + dx;
            if sx < 0 || sx >= width as isize {
                continue;
            }
            f(sy as usize * stride + sx as usize, kernel.tap(dx, dy));
        }
    }
}

/// Kernel response at `(x, y)` of an RGB grid, per channel.
pub fn convolve_rgb<const N: usize>(
    pixels: &ImgVec<RGB8>,
    x: usize,
    y: usize,
    kernel: &Kernel<N>,
) -> RGB8 {
    let buf = pixels.buf();
    let (mut r, mut g, mut b) = (0f32, 0f32, 0f32);
    for_each_tap(
        kernel,
        x,
        y,
        pixels.width(),
        pixels.height(),
        pixels.stride(),
        |i, w| {
            let px = buf[i];
            r += f32::from(px.r) * w;
            g += f32::from(px.g) * w;
            b += f32::from(px.b) * w;
        },
    );
    RGB8::new(saturate(r), saturate(g), saturate(b))
}

/// Kernel response at `(x, y)` of a padded 8-bit buffer.
pub fn convolve_gray<const N: usize>(
    samples: &ImgVec<u8>,
    x: usize,
    y: usize,
    kernel: &Kernel<N>,
) -> u8 {
    let buf = samples.buf();
    let mut acc = 0f32;
    for_each_tap(
        kernel,
        x,
        y,
        samples.width(),
        samples.height(),
        samples.stride(),
        |i, w| acc += f32::from(buf[i]) * w,
    );
    saturate(acc)
}

impl Bmp24 {
    /// Convolve every pixel into a fresh grid, then swap it in.
    pub fn apply_kernel<const N: usize>(&mut self, kernel: &Kernel<N>) {
        let width = self.pixels.width();
        let height = self.pixels.height();
        let mut out = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                out.push(convolve_rgb(&self.pixels, x, y, kernel));
            }
        }
        self.pixels = ImgVec::new(out, width, height);
    }
}

impl Bmp8 {
    /// Convolve the interior into a copy of the buffer, then swap it in.
    /// Pixels closer than `N / 2` to an edge keep their value.
    pub fn apply_kernel<const N: usize>(&mut self, kernel: &Kernel<N>) {
        let r = kernel.radius();
        let width = self.data.width();
        let height = self.data.height();
        let stride = self.data.stride();
        let mut out = self.data.buf().clone();
        for y in r..height.saturating_sub(r) {
            for x in r..width.saturating_sub(r) {
                out[y * stride + x] = convolve_gray(&self.data, x, y, kernel);
            }
        }
        self.data = ImgVec::new_stride(out, width, height, stride);
    }
}
