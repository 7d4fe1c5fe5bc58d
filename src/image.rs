use std::fmt;
use std::path::Path;

use imgref::ImgVec;

use crate::bmp::header::{
    BMP_SIGNATURE, BmpFileHeader, BmpInfoHeader, FILE_HEADER_SIZE, HEADER_SIZE, INFO_HEADER_SIZE,
    PALETTE_SIZE, RawHeader,
};
use crate::buffer::{allocate_grid, allocate_padded};
use crate::error::BmpError;
use crate::pixel::{BitDepth, RGB8};

/// Pixels per metre written into freshly built headers (72 DPI).
const DEFAULT_RESOLUTION: i32 = 2835;

/// A 24-bit true-colour bitmap.
///
/// Both headers are kept exactly as loaded so that saving an untouched image
/// reproduces the original bytes. Pixel row 0 is the top visual row.
#[derive(Clone, Debug)]
pub struct Bmp24 {
    pub(crate) file_header: BmpFileHeader,
    pub(crate) info_header: BmpInfoHeader,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixels: ImgVec<RGB8>,
}

impl Bmp24 {
    /// Build an image from top-down, row-major pixels with fresh headers.
    pub fn from_pixels(width: u32, height: u32, pixels: &[RGB8]) -> Result<Self, BmpError> {
        let mut grid = allocate_grid(width, height, None)?;
        if pixels.len() != grid.buf().len() {
            return Err(BmpError::InvalidHeader(format!(
                "expected {} pixels for {width}x{height}, got {}",
                grid.buf().len(),
                pixels.len()
            )));
        }
        grid.buf_mut().copy_from_slice(pixels);

        let image_size = width.saturating_mul(3).saturating_mul(height);
        let file_header = BmpFileHeader {
            signature: BMP_SIGNATURE,
            file_size: image_size.saturating_add(HEADER_SIZE as u32),
            reserved1: 0,
            reserved2: 0,
            offset: HEADER_SIZE as u32,
        };
        let info_header = BmpInfoHeader {
            size: INFO_HEADER_SIZE as u32,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits: 24,
            compression: 0,
            image_size,
            x_resolution: DEFAULT_RESOLUTION,
            y_resolution: DEFAULT_RESOLUTION,
            colors_used: 0,
            important_colors: 0,
        };
        Ok(Self {
            file_header,
            info_header,
            width,
            height,
            pixels: grid,
        })
    }

    pub fn file_header(&self) -> &BmpFileHeader {
        &self.file_header
    }

    pub fn info_header(&self) -> &BmpInfoHeader {
        &self.info_header
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_depth(&self) -> u16 {
        24
    }

    /// The pixel grid, top row first.
    pub fn pixels(&self) -> &ImgVec<RGB8> {
        &self.pixels
    }

    /// Mutable access to the pixels, top row first, `width` per row.
    pub fn pixels_mut(&mut self) -> &mut [RGB8] {
        self.pixels.buf_mut()
    }

    /// Pixel at column `x` of visual row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> RGB8 {
        self.pixels.buf()[y * self.pixels.stride() + x]
    }

    /// Recompute the file size and image size header fields from the
    /// current dimensions. Saving never does this on its own.
    pub fn sync_header_sizes(&mut self) {
        let image_size = self.width.saturating_mul(3).saturating_mul(self.height);
        self.info_header.image_size = image_size;
        self.file_header.file_size = self.file_header.offset.saturating_add(image_size);
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
            depth: BitDepth::Rgb24,
            data_size: self.info_header.image_size,
        }
    }

    /// Write the image to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BmpError> {
        crate::bmp::save_bmp24(self, path.as_ref())
    }

    /// Write the image to any seekable sink.
    pub fn write_to<W: std::io::Write + std::io::Seek>(&self, sink: &mut W) -> Result<(), BmpError> {
        crate::bmp::encode::encode_bmp24(self, sink)
    }
}

/// An 8-bit indexed grayscale bitmap.
///
/// The 54 header bytes and the 1024-byte palette are opaque and written back
/// unchanged. Samples stay in disk order (bottom row first for ordinary
/// files) and every row keeps its zero padding, so the buffer's stride is the
/// padded row width.
#[derive(Clone, Debug)]
pub struct Bmp8 {
    pub(crate) header: RawHeader,
    pub(crate) palette: Box<[u8; PALETTE_SIZE]>,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data_size: u32,
    pub(crate) data: ImgVec<u8>,
}

impl Bmp8 {
    /// Build an image from `width * height` unpadded samples in disk row
    /// order, with a linear gray palette and fresh headers.
    pub fn from_samples(width: u32, height: u32, samples: &[u8]) -> Result<Self, BmpError> {
        let mut data = allocate_padded(width, height, None)?;
        let w = width as usize;
        if samples.len() != w * height as usize {
            return Err(BmpError::InvalidHeader(format!(
                "expected {} samples for {width}x{height}, got {}",
                w * height as usize,
                samples.len()
            )));
        }
        let stride = data.stride();
        for (row, src) in data
            .buf_mut()
            .chunks_exact_mut(stride)
            .zip(samples.chunks_exact(w))
        {
            row[..w].copy_from_slice(src);
        }

        let data_size = data.buf().len() as u32;
        let offset = (HEADER_SIZE + PALETTE_SIZE) as u32;
        let file_header = BmpFileHeader {
            signature: BMP_SIGNATURE,
            file_size: offset.saturating_add(data_size),
            reserved1: 0,
            reserved2: 0,
            offset,
        };
        let info_header = BmpInfoHeader {
            size: INFO_HEADER_SIZE as u32,
            width: width as i32,
            height: height as i32,
            planes: 1,
            bits: 8,
            compression: 0,
            image_size: data_size,
            x_resolution: DEFAULT_RESOLUTION,
            y_resolution: DEFAULT_RESOLUTION,
            colors_used: 256,
            important_colors: 0,
        };
        let mut raw = [0u8; HEADER_SIZE];
        raw[..FILE_HEADER_SIZE].copy_from_slice(&file_header.to_bytes());
        raw[FILE_HEADER_SIZE..].copy_from_slice(&info_header.to_bytes());

        let mut palette = Box::new([0u8; PALETTE_SIZE]);
        for (level, entry) in palette.chunks_exact_mut(4).enumerate() {
            entry[..3].fill(level as u8);
        }

        Ok(Self {
            header: RawHeader(raw),
            palette,
            width,
            height,
            data_size,
            data,
        })
    }

    pub fn header(&self) -> &RawHeader {
        &self.header
    }

    pub fn palette(&self) -> &[u8; PALETTE_SIZE] {
        &self.palette
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_depth(&self) -> u16 {
        8
    }

    /// Image data size as recorded in the header.
    pub fn data_size(&self) -> u32 {
        self.data_size
    }

    /// Samples with row padding; `stride()` is the padded row width.
    pub fn samples(&self) -> &ImgVec<u8> {
        &self.data
    }

    /// Every stored byte, padding included.
    pub fn data(&self) -> &[u8] {
        self.data.buf()
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        self.data.buf_mut()
    }

    /// Sample at column `x` of stored row `row` (disk order).
    pub fn sample(&self, x: usize, row: usize) -> u8 {
        self.data.buf()[row * self.data.stride() + x]
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.width,
            height: self.height,
            depth: BitDepth::Gray8,
            data_size: self.data_size,
        }
    }

    /// Write the image to `path`, replacing any existing file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BmpError> {
        crate::bmp::save_bmp8(self, path.as_ref())
    }

    /// Write the image to any seekable sink.
    pub fn write_to<W: std::io::Write + std::io::Seek>(&self, sink: &mut W) -> Result<(), BmpError> {
        crate::bmp::encode::encode_bmp8(self, sink)
    }
}

impl PartialEq for Bmp24 {
    fn eq(&self, other: &Self) -> bool {
        self.file_header == other.file_header
            && self.info_header == other.info_header
            && self.width == other.width
            && self.height == other.height
            && self.pixels.buf() == other.pixels.buf()
    }
}

impl PartialEq for Bmp8 {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header
            && self.palette == other.palette
            && self.width == other.width
            && self.height == other.height
            && self.data_size == other.data_size
            && self.data.buf() == other.data.buf()
    }
}

/// A loaded bitmap of either supported depth.
#[derive(Clone, Debug, PartialEq)]
pub enum Bitmap {
    Gray8(Bmp8),
    Rgb24(Bmp24),
}

impl Bitmap {
    pub fn depth(&self) -> BitDepth {
        match self {
            Self::Gray8(_) => BitDepth::Gray8,
            Self::Rgb24(_) => BitDepth::Rgb24,
        }
    }

    pub fn width(&self) -> u32 {
        match self {
            Self::Gray8(img) => img.width(),
            Self::Rgb24(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Gray8(img) => img.height(),
            Self::Rgb24(img) => img.height(),
        }
    }

    pub fn info(&self) -> ImageInfo {
        match self {
            Self::Gray8(img) => img.info(),
            Self::Rgb24(img) => img.info(),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BmpError> {
        match self {
            Self::Gray8(img) => img.save(path),
            Self::Rgb24(img) => img.save(path),
        }
    }

    pub fn write_to<W: std::io::Write + std::io::Seek>(&self, sink: &mut W) -> Result<(), BmpError> {
        match self {
            Self::Gray8(img) => img.write_to(sink),
            Self::Rgb24(img) => img.write_to(sink),
        }
    }

    pub fn as_gray8(&self) -> Option<&Bmp8> {
        match self {
            Self::Gray8(img) => Some(img),
            Self::Rgb24(_) => None,
        }
    }

    pub fn as_rgb24(&self) -> Option<&Bmp24> {
        match self {
            Self::Rgb24(img) => Some(img),
            Self::Gray8(_) => None,
        }
    }
}

impl From<Bmp8> for Bitmap {
    fn from(img: Bmp8) -> Self {
        Self::Gray8(img)
    }
}

impl From<Bmp24> for Bitmap {
    fn from(img: Bmp24) -> Self {
        Self::Rgb24(img)
    }
}

/// Basic metadata for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub depth: BitDepth,
    /// Image data size field from the header.
    pub data_size: u32,
}

impl fmt::Display for ImageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Width: {}", self.width)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Color Depth: {}", self.depth.bits())?;
        write!(f, "Data Size: {}", self.data_size)
    }
}
