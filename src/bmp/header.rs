//! Byte-exact BMP header structures.
//!
//! All multi-byte fields are little-endian. Fields are decoded from fixed
//! offsets with `from_le_bytes`, never by reinterpreting memory, so the layout
//! is the same on every target.

/// `"BM"` read as a little-endian `u16`.
pub const BMP_SIGNATURE: u16 = 0x4D42;

/// Size of the file header on disk.
pub const FILE_HEADER_SIZE: usize = 14;
/// Size of a `BITMAPINFOHEADER` on disk.
pub const INFO_HEADER_SIZE: usize = 40;
/// File header plus info header.
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;
/// 256 palette entries of 4 bytes each.
pub const PALETTE_SIZE: usize = 1024;

/// Offset of the `bits per pixel` field from the start of the file.
pub const DEPTH_OFFSET: u64 = 28;

#[inline]
fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

#[inline]
fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline]
fn i32_at(bytes: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// The 14-byte `BITMAPFILEHEADER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpFileHeader {
    pub signature: u16,
    /// Total file size as recorded by the writer. Not validated by default.
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Byte position where the pixel payload begins.
    pub offset: u32,
}

impl BmpFileHeader {
    pub fn from_bytes(bytes: &[u8; FILE_HEADER_SIZE]) -> Self {
        Self {
            signature: u16_at(bytes, 0),
            file_size: u32_at(bytes, 2),
            reserved1: u16_at(bytes, 6),
            reserved2: u16_at(bytes, 8),
            offset: u32_at(bytes, 10),
        }
    }

    pub fn to_bytes(&self) -> [u8; FILE_HEADER_SIZE] {
        let mut out = [0u8; FILE_HEADER_SIZE];
        out[0..2].copy_from_slice(&self.signature.to_le_bytes());
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        out[6..8].copy_from_slice(&self.reserved1.to_le_bytes());
        out[8..10].copy_from_slice(&self.reserved2.to_le_bytes());
        out[10..14].copy_from_slice(&self.offset.to_le_bytes());
        out
    }

    pub fn is_bmp(&self) -> bool {
        self.signature == BMP_SIGNATURE
    }
}

/// The 40-byte `BITMAPINFOHEADER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BmpInfoHeader {
    pub size: u32,
    pub width: i32,
    /// Positive for bottom-up storage, negative for top-down.
    pub height: i32,
    pub planes: u16,
    pub bits: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_resolution: i32,
    pub y_resolution: i32,
    pub colors_used: u32,
    pub important_colors: u32,
}

impl BmpInfoHeader {
    pub fn from_bytes(bytes: &[u8; INFO_HEADER_SIZE]) -> Self {
        Self {
            size: u32_at(bytes, 0),
            width: i32_at(bytes, 4),
            height: i32_at(bytes, 8),
            planes: u16_at(bytes, 12),
            bits: u16_at(bytes, 14),
            compression: u32_at(bytes, 16),
            image_size: u32_at(bytes, 20),
            x_resolution: i32_at(bytes, 24),
            y_resolution: i32_at(bytes, 28),
            colors_used: u32_at(bytes, 32),
            important_colors: u32_at(bytes, 36),
        }
    }

    pub fn to_bytes(&self) -> [u8; INFO_HEADER_SIZE] {
        let mut out = [0u8; INFO_HEADER_SIZE];
        out[0..4].copy_from_slice(&self.size.to_le_bytes());
        out[4..8].copy_from_slice(&self.width.to_le_bytes());
        out[8..12].copy_from_slice(&self.height.to_le_bytes());
        out[12..14].copy_from_slice(&self.planes.to_le_bytes());
        out[14..16].copy_from_slice(&self.bits.to_le_bytes());
        out[16..20].copy_from_slice(&self.compression.to_le_bytes());
        out[20..24].copy_from_slice(&self.image_size.to_le_bytes());
        out[24..28].copy_from_slice(&self.x_resolution.to_le_bytes());
        out[28..32].copy_from_slice(&self.y_resolution.to_le_bytes());
        out[32..36].copy_from_slice(&self.colors_used.to_le_bytes());
        out[36..40].copy_from_slice(&self.important_colors.to_le_bytes());
        out
    }

    /// Rows are stored from the bottom of the image upwards.
    pub fn is_bottom_up(&self) -> bool {
        self.height > 0
    }
}

/// The 54 header bytes of an 8-bit file, kept exactly as read.
///
/// Only the fields the codec needs are exposed; everything else is carried
/// through untouched on save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawHeader(pub [u8; HEADER_SIZE]);

impl RawHeader {
    pub fn signature(&self) -> u16 {
        u16_at(&self.0, 0)
    }

    pub fn file_size(&self) -> u32 {
        u32_at(&self.0, 2)
    }

    pub fn width(&self) -> i32 {
        i32_at(&self.0, 18)
    }

    pub fn height(&self) -> i32 {
        i32_at(&self.0, 22)
    }

    pub fn planes(&self) -> u16 {
        u16_at(&self.0, 26)
    }

    pub fn bits(&self) -> u16 {
        u16_at(&self.0, DEPTH_OFFSET as usize)
    }

    pub fn compression(&self) -> u32 {
        u32_at(&self.0, 30)
    }

    pub fn data_size(&self) -> u32 {
        u32_at(&self.0, 34)
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.0
    }
}
