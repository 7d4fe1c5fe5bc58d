//! Histogram equalization.
//!
//! 8-bit images are remapped directly. 24-bit images are equalized on the
//! luma channel only: each pixel goes through YUV, its Y is replaced by the
//! lookup value, and U and V are kept so hue does not shift.

use crate::error::BmpError;
use crate::image::{Bmp8, Bmp24};
use crate::pixel::RGB8;

pub const LEVELS: usize = 256;

/// Per-level sample counts.
pub type Histogram = [u64; LEVELS];

/// Running sum: `cdf[0] = hist[0]`, `cdf[i] = cdf[i - 1] + hist[i]`.
pub fn cumulative(hist: &Histogram) -> Histogram {
    let mut cdf = [0u64; LEVELS];
    let mut acc = 0u64;
    for (out, &count) in cdf.iter_mut().zip(hist) {
        acc += count;
        *out = acc;
    }
    cdf
}

/// Build the equalization lookup table for `total` samples.
///
/// `map[i] = round((cdf[i] - cdf_min) / (total - cdf_min) * 255)`, clamped,
/// where `cdf_min` is the first nonzero cumulative count. Levels below the
/// first populated one map to 0. Fails with [`BmpError::DivisionGuard`] when
/// every sample sits on one level.
pub fn equalization_lut(hist: &Histogram, total: u64) -> Result<[u8; LEVELS], BmpError> {
    let cdf = cumulative(hist);
    let cdf_min = cdf.iter().copied().find(|&c| c != 0).unwrap_or(0);
    if total <= cdf_min {
        return Err(BmpError::DivisionGuard);
    }

    let span = (total - cdf_min) as f64;
    let mut lut = [0u8; LEVELS];
    for (entry, &c) in lut.iter_mut().zip(&cdf) {
        let scaled = (c as f64 - cdf_min as f64) / span * 255.0;
        *entry = scaled.round().clamp(0.0, 255.0) as u8;
    }
    Ok(lut)
}

/// RGB to YUV (BT.601 analogue coefficients).
#[inline]
pub fn rgb_to_yuv(px: RGB8) -> (f32, f32, f32) {
    let (r, g, b) = (f32::from(px.r), f32::from(px.g), f32::from(px.b));
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = -0.14713 * r - 0.28886 * g + 0.436 * b;
    let v = 0.615 * r - 0.51499 * g - 0.10001 * b;
    (y, u, v)
}

/// YUV to RGB, each channel rounded and clamped.
#[inline]
pub fn yuv_to_rgb(y: f32, u: f32, v: f32) -> RGB8 {
    let to_u8 = |c: f32| c.round().clamp(0.0, 255.0) as u8;
    RGB8::new(
        to_u8(y + 1.13983 * v),
        to_u8(y - 0.39465 * u - 0.58060 * v),
        to_u8(y + 2.03211 * u),
    )
}

#[inline]
fn luma_level(y: f32) -> usize {
    y.round().clamp(0.0, 255.0) as usize
}

impl Bmp8 {
    /// Histogram of the visible samples; row padding is not counted.
    pub fn histogram(&self) -> Histogram {
        let mut hist = [0u64; LEVELS];
        for row in self.data.rows() {
            for &s in row {
                hist[usize::from(s)] += 1;
            }
        }
        hist
    }

    /// Equalize the visible samples in place. On [`BmpError::DivisionGuard`]
    /// the image is left as it was.
    pub fn equalize(&mut self) -> Result<(), BmpError> {
        let total = u64::from(self.width) * u64::from(self.height);
        let lut = equalization_lut(&self.histogram(), total).inspect_err(|_| {
            tracing::warn!(total, "8-bit image has a single level; not equalized");
        })?;

        let width = self.data.width();
        let stride = self.data.stride();
        for row in self.data.buf_mut().chunks_exact_mut(stride) {
            for s in &mut row[..width] {
                *s = lut[usize::from(*s)];
            }
        }
        Ok(())
    }
}

impl Bmp24 {
    /// Histogram of rounded, clamped luma.
    pub fn luma_histogram(&self) -> Histogram {
        let mut hist = [0u64; LEVELS];
        for &px in self.pixels.buf() {
            let (y, _, _) = rgb_to_yuv(px);
            hist[luma_level(y)] += 1;
        }
        hist
    }

    /// Equalize luma in place, keeping chroma. On
    /// [`BmpError::DivisionGuard`] the image is left as it was.
    pub fn equalize(&mut self) -> Result<(), BmpError> {
        let total = u64::from(self.width) * u64::from(self.height);
        let lut = equalization_lut(&self.luma_histogram(), total).inspect_err(|_| {
            tracing::warn!(total, "24-bit image has a single luma level; not equalized");
        })?;

        for px in self.pixels.buf_mut().iter_mut() {
            let (y, u, v) = rgb_to_yuv(*px);
            let mapped = f32::from(lut[luma_level(y)]);
            *px = yuv_to_rgb(mapped, u, v);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cumulative_sums() {
        let mut hist = [0u64; LEVELS];
        hist[0] = 1;
        hist[3] = 2;
        hist[255] = 4;
        let cdf = cumulative(&hist);
        assert_eq!(cdf[0], 1);
        assert_eq!(cdf[2], 1);
        assert_eq!(cdf[3], 3);
        assert_eq!(cdf[254], 3);
        assert_eq!(cdf[255], 7);
    }

    #[test]
    fn lut_is_monotone() {
        let mut hist = [0u64; LEVELS];
        for (i, h) in hist.iter_mut().enumerate() {
            *h = ((i * 37) % 11) as u64;
        }
        let total = hist.iter().sum();
        let lut = equalization_lut(&hist, total).unwrap();
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn lut_spans_full_range() {
        let mut hist = [0u64; LEVELS];
        hist[0] = 5;
        hist[128] = 3;
        hist[255] = 2;
        let lut = equalization_lut(&hist, 10).unwrap();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[255], 255);
        // (8 - 5) / (10 - 5) * 255 = 153.
        assert_eq!(lut[128], 153);
    }

    #[test]
    fn levels_below_first_populated_map_to_zero() {
        let mut hist = [0u64; LEVELS];
        hist[40] = 1;
        hist[90] = 1;
        let lut = equalization_lut(&hist, 2).unwrap();
        assert_eq!(lut[0], 0);
        assert_eq!(lut[39], 0);
        assert_eq!(lut[40], 0);
        assert_eq!(lut[90], 255);
    }

    #[test]
    fn single_level_is_guarded() {
        let mut hist = [0u64; LEVELS];
        hist[77] = 12;
        assert!(matches!(
            equalization_lut(&hist, 12),
            Err(BmpError::DivisionGuard)
        ));
    }

    #[test]
    fn gray_equalize_skips_padding() {
        let mut img = Bmp8::from_samples(3, 2, &[50, 100, 200, 50, 100, 200]).unwrap();
        let hist = img.histogram();
        assert_eq!(hist[0], 0);
        assert_eq!(hist.iter().sum::<u64>(), 6);

        img.equalize().unwrap();
        // cdf: 2, 4, 6 with cdf_min 2; 2/4 * 255 = 127.5 rounds up.
        assert_eq!(img.data(), &[0, 128, 255, 0, 0, 128, 255, 0]);
    }

    #[test]
    fn uniform_images_stay_untouched() {
        let mut gray = Bmp8::from_samples(5, 3, &[42; 15]).unwrap();
        let before = gray.clone();
        assert!(matches!(gray.equalize(), Err(BmpError::DivisionGuard)));
        assert_eq!(gray, before);

        let mut colour = Bmp24::from_pixels(4, 2, &[RGB8::new(10, 200, 30); 8]).unwrap();
        let before = colour.clone();
        assert!(matches!(colour.equalize(), Err(BmpError::DivisionGuard)));
        assert_eq!(colour, before);
    }

    #[test]
    fn colour_equalize_stretches_gray_levels() {
        let dark = RGB8::new(100, 100, 100);
        let light = RGB8::new(150, 150, 150);
        let mut img = Bmp24::from_pixels(4, 1, &[dark, light, dark, light]).unwrap();
        img.equalize().unwrap();
        assert_eq!(img.pixel(0, 0), RGB8::new(0, 0, 0));
        assert_eq!(img.pixel(1, 0), RGB8::new(255, 255, 255));
    }

    #[test]
    fn colour_equalize_keeps_chroma() {
        let dark = RGB8::new(60, 60, 60);
        let warm = RGB8::new(150, 110, 90);
        let light = RGB8::new(220, 220, 220);
        let mut img = Bmp24::from_pixels(4, 1, &[dark, warm, warm, light]).unwrap();
        let (_, u0, v0) = rgb_to_yuv(warm);

        img.equalize().unwrap();
        // Luma 120 holds 3 of 4 samples cumulatively: (3 - 1) / (4 - 1) * 255 = 170.
        let out = img.pixel(1, 0);
        let (y1, u1, v1) = rgb_to_yuv(out);
        assert!((y1 - 170.0).abs() <= 1.0, "{out:?}");
        assert!((u1 - u0).abs() <= 1.0, "{u0} -> {u1}");
        assert!((v1 - v0).abs() <= 1.0, "{v0} -> {v1}");
        assert!(out.r > out.g && out.g > out.b, "{out:?}");
        assert_eq!(img.pixel(2, 0), out);
    }

    #[test]
    fn yuv_roundtrip_is_close() {
        for px in [
            RGB8::new(0, 0, 0),
            RGB8::new(255, 255, 255),
            RGB8::new(12, 200, 99),
            RGB8::new(250, 3, 128),
        ] {
            let (y, u, v) = rgb_to_yuv(px);
            let back = yuv_to_rgb(y, u, v);
            assert!(back.r.abs_diff(px.r) <= 1, "{px:?} -> {back:?}");
            assert!(back.g.abs_diff(px.g) <= 1, "{px:?} -> {back:?}");
            assert!(back.b.abs_diff(px.b) <= 1, "{px:?} -> {back:?}");
        }
    }
}
