pub use rgb::RGB8;

/// Bit depths this crate reads and writes.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 8-bit indexed grayscale with a 256-entry palette.
    Gray8,
    /// 24-bit true colour, BGR on disk.
    Rgb24,
}

impl BitDepth {
    /// Map the `bits per pixel` header field to a supported depth.
    pub fn from_bits(bits: u16) -> Option<Self> {
        match bits {
            8 => Some(Self::Gray8),
            24 => Some(Self::Rgb24),
            _ => None,
        }
    }

    /// Value stored in the `bits per pixel` header field.
    pub fn bits(self) -> u16 {
        match self {
            Self::Gray8 => 8,
            Self::Rgb24 => 24,
        }
    }

    /// Bytes per pixel on disk.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb24 => 3,
        }
    }
}

/// Zero bytes appended to an 8-bit scanline to reach a multiple of 4.
#[inline]
pub fn row_padding(width: usize) -> usize {
    (4 - width % 4) % 4
}

/// Width in bytes of an 8-bit scanline including its padding.
#[inline]
pub fn padded_row_width(width: usize) -> usize {
    width + row_padding(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_widths() {
        assert_eq!(padded_row_width(1), 4);
        assert_eq!(padded_row_width(3), 4);
        assert_eq!(padded_row_width(4), 4);
        assert_eq!(padded_row_width(5), 8);
        assert_eq!(padded_row_width(0), 0);
        assert_eq!(row_padding(6), 2);
    }

    #[test]
    fn depth_bits() {
        assert_eq!(BitDepth::from_bits(8), Some(BitDepth::Gray8));
        assert_eq!(BitDepth::from_bits(24), Some(BitDepth::Rgb24));
        assert_eq!(BitDepth::from_bits(32), None);
        assert_eq!(BitDepth::Rgb24.bits(), 24);
        assert_eq!(BitDepth::Rgb24.bytes_per_pixel(), 3);
    }
}
