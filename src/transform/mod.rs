//! In-place image transforms: point maps, convolution filters and
//! histogram equalization.

pub mod convolve;
pub mod equalize;
mod point;

use crate::error::BmpError;
use crate::image::Bitmap;
use crate::pixel::BitDepth;

use convolve::{BOX_BLUR, EMBOSS, GAUSSIAN_BLUR, OUTLINE, SHARPEN};

/// A transform that can be applied to a loaded [`Bitmap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Filter {
    Negative,
    /// Add a signed offset to every sample.
    Brightness(i32),
    /// Binarize at the given level. 8-bit only.
    Threshold(i32),
    /// Average the three channels. 24-bit only.
    Grayscale,
    BoxBlur,
    GaussianBlur,
    Outline,
    Emboss,
    Sharpen,
    Equalize,
}

const GRAY8_MENU: [Filter; 9] = [
    Filter::Negative,
    Filter::Brightness(0),
    Filter::Threshold(0),
    Filter::BoxBlur,
    Filter::GaussianBlur,
    Filter::Outline,
    Filter::Emboss,
    Filter::Sharpen,
    Filter::Equalize,
];

const RGB24_MENU: [Filter; 9] = [
    Filter::Negative,
    Filter::Brightness(0),
    Filter::Grayscale,
    Filter::Equalize,
    Filter::BoxBlur,
    Filter::GaussianBlur,
    Filter::Outline,
    Filter::Emboss,
    Filter::Sharpen,
];

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Brightness(_) => "brightness",
            Self::Threshold(_) => "threshold",
            Self::Grayscale => "grayscale",
            Self::BoxBlur => "box blur",
            Self::GaussianBlur => "gaussian blur",
            Self::Outline => "outline",
            Self::Emboss => "emboss",
            Self::Sharpen => "sharpen",
            Self::Equalize => "histogram equalization",
        }
    }

    /// Whether the filter takes a numeric argument.
    pub fn takes_parameter(&self) -> bool {
        matches!(self, Self::Brightness(_) | Self::Threshold(_))
    }

    /// Filters offered for `depth`, in menu order.
    pub fn menu(depth: BitDepth) -> &'static [Filter] {
        match depth {
            BitDepth::Gray8 => &GRAY8_MENU,
            BitDepth::Rgb24 => &RGB24_MENU,
        }
    }

    /// Look up a 1-based menu entry for `depth`. `param` fills in the
    /// brightness delta or threshold level and is ignored otherwise.
    pub fn from_index(depth: BitDepth, index: usize, param: i32) -> Option<Filter> {
        let filter = *Self::menu(depth).get(index.checked_sub(1)?)?;
        Some(match filter {
            Self::Brightness(_) => Self::Brightness(param),
            Self::Threshold(_) => Self::Threshold(param),
            other => other,
        })
    }

    pub fn supports(&self, depth: BitDepth) -> bool {
        match self {
            Self::Threshold(_) => depth == BitDepth::Gray8,
            Self::Grayscale => depth == BitDepth::Rgb24,
            _ => true,
        }
    }
}

impl Bitmap {
    /// Apply `filter` in place.
    ///
    /// Fails with [`BmpError::UnsupportedFilter`] for a depth the filter does
    /// not exist for, and with [`BmpError::DivisionGuard`] when equalizing a
    /// single-level image. The image is unchanged on error.
    pub fn apply(&mut self, filter: Filter) -> Result<(), BmpError> {
        let depth = self.depth();
        match (self, filter) {
            (Self::Gray8(img), Filter::Negative) => img.negative(),
            (Self::Gray8(img), Filter::Brightness(delta)) => img.brightness(delta),
            (Self::Gray8(img), Filter::Threshold(level)) => img.threshold(level),
            (Self::Gray8(img), Filter::BoxBlur) => img.apply_kernel(&BOX_BLUR),
            (Self::Gray8(img), Filter::GaussianBlur) => img.apply_kernel(&GAUSSIAN_BLUR),
            (Self::Gray8(img), Filter::Outline) => img.apply_kernel(&OUTLINE),
            (Self::Gray8(img), Filter::Emboss) => img.apply_kernel(&EMBOSS),
            (Self::Gray8(img), Filter::Sharpen) => img.apply_kernel(&SHARPEN),
            (Self::Gray8(img), Filter::Equalize) => img.equalize()?,
            (Self::Rgb24(img), Filter::Negative) => img.negative(),
            (Self::Rgb24(img), Filter::Brightness(delta)) => img.brightness(delta),
            (Self::Rgb24(img), Filter::Grayscale) => img.grayscale(),
            (Self::Rgb24(img), Filter::BoxBlur) => img.apply_kernel(&BOX_BLUR),
            (Self::Rgb24(img), Filter::GaussianBlur) => img.apply_kernel(&GAUSSIAN_BLUR),
            (Self::Rgb24(img), Filter::Outline) => img.apply_kernel(&OUTLINE),
            (Self::Rgb24(img), Filter::Emboss) => img.apply_kernel(&EMBOSS),
            (Self::Rgb24(img), Filter::Sharpen) => img.apply_kernel(&SHARPEN),
            (Self::Rgb24(img), Filter::Equalize) => img.equalize()?,
            (Self::Gray8(_), Filter::Grayscale) | (Self::Rgb24(_), Filter::Threshold(_)) => {
                return Err(BmpError::UnsupportedFilter {
                    filter: filter.name(),
                    depth: depth.bits(),
                });
            }
        }
        tracing::debug!(filter = filter.name(), bits = depth.bits(), "applied filter");
        Ok(())
    }
}
