//! BMP decoder for uncompressed 8-bit grayscale and 24-bit RGB files.

use std::io::{Read, Seek, SeekFrom};

use imgref::ImgVec;

use super::header::{
    BmpFileHeader, BmpInfoHeader, DEPTH_OFFSET, FILE_HEADER_SIZE, HEADER_SIZE, INFO_HEADER_SIZE,
    PALETTE_SIZE, RawHeader,
};
use crate::buffer::{allocate_grid, allocate_padded};
use crate::error::BmpError;
use crate::image::{Bmp8, Bmp24};
use crate::io::{read_at, read_exact_at};
use crate::limits::Limits;
use crate::pixel::{BitDepth, RGB8, padded_row_width};

// ── Permissiveness ──────────────────────────────────────────────────

/// Controls how strictly the decoder validates input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permissiveness {
    /// Also reject a file size field that disagrees with the actual length,
    /// and a nonzero image size field that disagrees with the payload size.
    Strict,

    /// Default behavior. Reject planes != 1, compressed files and truncated
    /// pixel data.
    #[default]
    Standard,

    /// Log planes/compression violations instead of failing, and zero-fill
    /// pixel data missing from truncated files.
    Permissive,
}

// ── Shared validation ───────────────────────────────────────────────

fn check_signature(signature: u16) -> Result<(), BmpError> {
    if signature != super::header::BMP_SIGNATURE {
        return Err(BmpError::InvalidFormat(signature));
    }
    Ok(())
}

fn check_depth(found: u16, expected: BitDepth) -> Result<(), BmpError> {
    if found != expected.bits() {
        return Err(BmpError::UnsupportedDepth {
            found,
            expected: match expected {
                BitDepth::Gray8 => "8",
                BitDepth::Rgb24 => "24",
            },
        });
    }
    Ok(())
}

fn check_planes_and_compression(
    planes: u16,
    compression: u32,
    permissiveness: Permissiveness,
) -> Result<(), BmpError> {
    let permissive = permissiveness == Permissiveness::Permissive;
    if planes != 1 {
        if !permissive {
            return Err(BmpError::InvalidHeader(format!(
                "BMP planes field is {planes}, expected 1"
            )));
        }
        tracing::warn!(planes, "ignoring BMP planes field");
    }
    if compression != 0 {
        if !permissive {
            return Err(BmpError::InvalidHeader(format!(
                "compressed BMP (compression {compression}) is not supported"
            )));
        }
        tracing::warn!(compression, "treating compressed BMP as uncompressed");
    }
    Ok(())
}

fn check_dimensions(width: i32, height: i32) -> Result<(u32, u32), BmpError> {
    if width <= 0 {
        return Err(BmpError::InvalidHeader(format!("BMP width is {width}")));
    }
    if height == 0 || height == i32::MIN {
        return Err(BmpError::InvalidHeader(format!("BMP height is {height}")));
    }
    Ok((width as u32, height.unsigned_abs()))
}

fn check_file_size<R: Seek + ?Sized>(reader: &mut R, recorded: u32) -> Result<(), BmpError> {
    let actual = reader.seek(SeekFrom::End(0))?;
    if recorded != 0 && u64::from(recorded) != actual {
        return Err(BmpError::InvalidHeader(format!(
            "BMP file size field ({recorded}) doesn't match actual size ({actual})"
        )));
    }
    Ok(())
}

fn check_image_size(recorded: u32, expected: u64) -> Result<(), BmpError> {
    if recorded != 0 && u64::from(recorded) != expected {
        return Err(BmpError::InvalidHeader(format!(
            "BMP image data size field ({recorded}) doesn't match expected ({expected})"
        )));
    }
    Ok(())
}

/// Fail with `ShortRead` when the stream ends before `start + len`, so a
/// lying header cannot force a large allocation.
fn check_payload_fits<R: Seek + ?Sized>(reader: &mut R, start: u64, len: u64) -> Result<(), BmpError> {
    let end = reader.seek(SeekFrom::End(0))?;
    let available = end.saturating_sub(start);
    if available < len {
        return Err(BmpError::ShortRead {
            offset: start,
            wanted: usize::try_from(len).unwrap_or(usize::MAX),
            got: usize::try_from(available).unwrap_or(usize::MAX),
        });
    }
    Ok(())
}

/// Fill `buf` from `position`, zero-filling a missing tail when permissive.
fn read_payload<R: Read + Seek + ?Sized>(
    reader: &mut R,
    position: u64,
    buf: &mut [u8],
    permissiveness: Permissiveness,
) -> Result<bool, BmpError> {
    let got = read_at(reader, position, buf)?;
    if got == buf.len() {
        return Ok(true);
    }
    if permissiveness != Permissiveness::Permissive {
        return Err(BmpError::ShortRead {
            offset: position,
            wanted: buf.len(),
            got,
        });
    }
    buf[got..].fill(0);
    Ok(false)
}

// ── Depth sniff ─────────────────────────────────────────────────────

/// Read the signature and the `bits per pixel` field straight from the
/// stream, without parsing the rest of the header.
pub(crate) fn sniff_depth<R: Read + Seek + ?Sized>(reader: &mut R) -> Result<BitDepth, BmpError> {
    let mut signature = [0u8; 2];
    read_exact_at(reader, 0, &mut signature)?;
    check_signature(u16::from_le_bytes(signature))?;

    let mut bits = [0u8; 2];
    read_exact_at(reader, DEPTH_OFFSET, &mut bits)?;
    let bits = u16::from_le_bytes(bits);
    BitDepth::from_bits(bits).ok_or(BmpError::UnsupportedDepth {
        found: bits,
        expected: "8 or 24",
    })
}

// ── 24-bit ──────────────────────────────────────────────────────────

/// Decode a 24-bit file. Header fields are read with positioned reads so the
/// two headers never depend on in-memory struct layout.
pub(crate) fn decode_bmp24<R: Read + Seek + ?Sized>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bmp24, BmpError> {
    let mut fh_bytes = [0u8; FILE_HEADER_SIZE];
    read_exact_at(reader, 0, &mut fh_bytes)?;
    let file_header = BmpFileHeader::from_bytes(&fh_bytes);
    check_signature(file_header.signature)?;

    let mut ih_bytes = [0u8; INFO_HEADER_SIZE];
    read_exact_at(reader, FILE_HEADER_SIZE as u64, &mut ih_bytes)?;
    let info_header = BmpInfoHeader::from_bytes(&ih_bytes);
    check_depth(info_header.bits, BitDepth::Rgb24)?;
    check_planes_and_compression(info_header.planes, info_header.compression, permissiveness)?;

    let (width, height) = check_dimensions(info_header.width, info_header.height)?;
    if (file_header.offset as usize) < HEADER_SIZE {
        return Err(BmpError::InvalidHeader(format!(
            "pixel data offset {} overlaps the headers",
            file_header.offset
        )));
    }
    let row_bytes = width as usize * BitDepth::Rgb24.bytes_per_pixel();
    let payload_len = row_bytes as u64 * u64::from(height);
    if permissiveness == Permissiveness::Strict {
        check_file_size(reader, file_header.file_size)?;
        check_image_size(info_header.image_size, payload_len)?;
    }
    if permissiveness != Permissiveness::Permissive {
        check_payload_fits(reader, u64::from(file_header.offset), payload_len)?;
    }
    if row_bytes % 4 != 0 {
        tracing::warn!(
            width,
            "24-bit rows are not 4-byte aligned; reading them unpadded"
        );
    }

    let mut pixels = allocate_grid(width, height, limits)?;
    read_rgb_rows(
        reader,
        &mut pixels,
        u64::from(file_header.offset),
        info_header.is_bottom_up(),
        permissiveness,
    )?;

    tracing::debug!(width, height, "decoded 24-bit BMP");
    Ok(Bmp24 {
        file_header,
        info_header,
        width,
        height,
        pixels,
    })
}

fn read_rgb_rows<R: Read + Seek + ?Sized>(
    reader: &mut R,
    pixels: &mut ImgVec<RGB8>,
    offset: u64,
    bottom_up: bool,
    permissiveness: Permissiveness,
) -> Result<(), BmpError> {
    let width = pixels.width();
    let height = pixels.height();
    let row_bytes = width * 3;
    let mut disk_row_buf = vec![0u8; row_bytes];
    let mut truncated = false;

    for (y, row) in pixels.buf_mut().chunks_exact_mut(width).enumerate() {
        let disk_row = if bottom_up { height - 1 - y } else { y };
        let position = offset + (disk_row * row_bytes) as u64;
        if !read_payload(reader, position, &mut disk_row_buf, permissiveness)? {
            truncated = true;
        }
        for (px, bgr) in row.iter_mut().zip(disk_row_buf.chunks_exact(3)) {
            *px = RGB8::new(bgr[2], bgr[1], bgr[0]);
        }
    }

    if truncated {
        tracing::warn!("BMP pixel data truncated; missing pixels set to black");
    }
    Ok(())
}

// ── 8-bit ───────────────────────────────────────────────────────────

/// Decode an 8-bit file. The header and palette are read as opaque blocks
/// and the payload, which follows the palette directly, is kept in disk order
/// with its row padding.
pub(crate) fn decode_bmp8<R: Read + Seek + ?Sized>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bmp8, BmpError> {
    let mut raw = [0u8; HEADER_SIZE];
    read_exact_at(reader, 0, &mut raw)?;
    let header = RawHeader(raw);
    check_signature(header.signature())?;
    check_depth(header.bits(), BitDepth::Gray8)?;
    check_planes_and_compression(header.planes(), header.compression(), permissiveness)?;

    let mut palette = Box::new([0u8; PALETTE_SIZE]);
    if !read_payload(reader, HEADER_SIZE as u64, &mut palette[..], permissiveness)? {
        tracing::warn!("BMP palette truncated; missing entries set to 0");
    }

    let (width, height) = check_dimensions(header.width(), header.height())?;
    let payload_at = (HEADER_SIZE + PALETTE_SIZE) as u64;
    let payload_len = padded_row_width(width as usize) as u64 * u64::from(height);
    if permissiveness == Permissiveness::Strict {
        check_file_size(reader, header.file_size())?;
        check_image_size(header.data_size(), payload_len)?;
    }
    if permissiveness != Permissiveness::Permissive {
        check_payload_fits(reader, payload_at, payload_len)?;
    }

    let mut data = allocate_padded(width, height, limits)?;
    if !read_payload(reader, payload_at, data.buf_mut(), permissiveness)? {
        tracing::warn!("BMP pixel data truncated; missing samples set to 0");
    }

    tracing::debug!(width, height, "decoded 8-bit BMP");
    Ok(Bmp8 {
        data_size: header.data_size(),
        header,
        palette,
        width,
        height,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::RGB8;
    use std::io::Cursor;

    fn bmp24_bytes() -> Vec<u8> {
        let img = Bmp24::from_pixels(4, 1, &[RGB8::new(1, 2, 3); 4]).unwrap();
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out).unwrap();
        out.into_inner()
    }

    fn bmp8_bytes(width: u32, height: u32) -> Vec<u8> {
        let samples: Vec<u8> = (0..width * height).map(|i| i as u8).collect();
        let img = Bmp8::from_samples(width, height, &samples).unwrap();
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out).unwrap();
        out.into_inner()
    }

    #[test]
    fn oversized_header_on_short_stream_fails_before_allocating() {
        let mut gray = bmp8_bytes(4, 1);
        gray[18..22].copy_from_slice(&65535i32.to_le_bytes());
        gray[22..26].copy_from_slice(&65535i32.to_le_bytes());
        let mut colour = bmp24_bytes();
        colour[18..22].copy_from_slice(&65535i32.to_le_bytes());
        colour[22..26].copy_from_slice(&65535i32.to_le_bytes());
        // Clear the recorded image sizes so Strict gets as far as the length check.
        gray[34..38].fill(0);
        colour[34..38].fill(0);

        for mode in [Permissiveness::Standard, Permissiveness::Strict] {
            match decode_bmp8(&mut Cursor::new(&gray), None, mode) {
                Err(BmpError::ShortRead { offset, wanted, got }) => {
                    assert_eq!(offset, 1078);
                    assert_eq!(wanted as u64, 65536 * 65535);
                    assert_eq!(got, 4);
                }
                other => panic!("expected ShortRead, got {other:?}"),
            }
            match decode_bmp24(&mut Cursor::new(&colour), None, mode) {
                Err(BmpError::ShortRead { offset, wanted, got }) => {
                    assert_eq!(offset, 54);
                    assert_eq!(wanted as u64, 65535 * 3 * 65535);
                    assert_eq!(got, 12);
                }
                other => panic!("expected ShortRead, got {other:?}"),
            }
        }
    }

    #[test]
    fn strict_checks_image_size_field() {
        let mut colour = bmp24_bytes();
        assert!(decode_bmp24(&mut Cursor::new(&colour), None, Permissiveness::Strict).is_ok());
        colour[34..38].copy_from_slice(&13u32.to_le_bytes());
        assert!(matches!(
            decode_bmp24(&mut Cursor::new(&colour), None, Permissiveness::Strict),
            Err(BmpError::InvalidHeader(_))
        ));
        assert!(decode_bmp24(&mut Cursor::new(&colour), None, Permissiveness::Standard).is_ok());
        // Zero means "not recorded".
        colour[34..38].copy_from_slice(&0u32.to_le_bytes());
        assert!(decode_bmp24(&mut Cursor::new(&colour), None, Permissiveness::Strict).is_ok());

        let mut gray = bmp8_bytes(3, 2);
        assert!(decode_bmp8(&mut Cursor::new(&gray), None, Permissiveness::Strict).is_ok());
        // Unpadded size (3 * 2) instead of the stored 8 bytes.
        gray[34..38].copy_from_slice(&6u32.to_le_bytes());
        assert!(matches!(
            decode_bmp8(&mut Cursor::new(&gray), None, Permissiveness::Strict),
            Err(BmpError::InvalidHeader(_))
        ));
    }

    #[test]
    fn strict_checks_gray_file_size() {
        let mut gray = bmp8_bytes(4, 2);
        gray.extend_from_slice(&[0; 4]);
        assert!(decode_bmp8(&mut Cursor::new(&gray), None, Permissiveness::Standard).is_ok());
        assert!(matches!(
            decode_bmp8(&mut Cursor::new(&gray), None, Permissiveness::Strict),
            Err(BmpError::InvalidHeader(_))
        ));
    }

    #[test]
    fn gray_negative_height_keeps_disk_order() {
        let mut gray = bmp8_bytes(4, 2);
        gray[22..26].copy_from_slice(&(-2i32).to_le_bytes());
        let img = decode_bmp8(&mut Cursor::new(&gray), None, Permissiveness::Standard).unwrap();
        assert_eq!(img.height(), 2);
        assert_eq!(img.header().height(), -2);
        assert_eq!(img.data(), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(img.sample(0, 1), 4);
    }

    #[test]
    fn truncated_palette_is_zero_filled_when_permissive() {
        let gray = bmp8_bytes(4, 1);
        let cut = &gray[..54 + 100];
        assert!(matches!(
            decode_bmp8(&mut Cursor::new(cut), None, Permissiveness::Standard),
            Err(BmpError::ShortRead { offset: 54, .. })
        ));
        let img = decode_bmp8(&mut Cursor::new(cut), None, Permissiveness::Permissive).unwrap();
        assert_eq!(&img.palette()[96..100], &gray[54 + 96..54 + 100]);
        assert!(img.palette()[100..].iter().all(|&b| b == 0));
        assert!(img.data().iter().all(|&s| s == 0));
    }

    #[test]
    fn depth_read_from_offset_28() {
        let mut bytes = bmp24_bytes();
        assert_eq!(
            sniff_depth(&mut Cursor::new(&bytes)).unwrap(),
            BitDepth::Rgb24
        );
        bytes[28] = 8;
        assert_eq!(
            sniff_depth(&mut Cursor::new(&bytes)).unwrap(),
            BitDepth::Gray8
        );
        bytes[0] = b'X';
        assert!(matches!(
            sniff_depth(&mut Cursor::new(&bytes)),
            Err(BmpError::InvalidFormat(_))
        ));
    }

    #[test]
    fn offset_inside_headers_rejected() {
        let mut bytes = bmp24_bytes();
        bytes[10..14].copy_from_slice(&20u32.to_le_bytes());
        for mode in [Permissiveness::Standard, Permissiveness::Permissive] {
            assert!(matches!(
                decode_bmp24(&mut Cursor::new(&bytes), None, mode),
                Err(BmpError::InvalidHeader(_))
            ));
        }
    }

    #[test]
    fn planes_checked_unless_permissive() {
        let mut bytes = bmp24_bytes();
        bytes[26] = 3;
        assert!(matches!(
            decode_bmp24(&mut Cursor::new(&bytes), None, Permissiveness::Standard),
            Err(BmpError::InvalidHeader(_))
        ));
        assert!(decode_bmp24(&mut Cursor::new(&bytes), None, Permissiveness::Permissive).is_ok());
    }

    #[test]
    fn negative_height_is_top_down() {
        let mut bytes = bmp24_bytes();
        bytes[22..26].copy_from_slice(&(-1i32).to_le_bytes());
        let img = decode_bmp24(&mut Cursor::new(&bytes), None, Permissiveness::Standard).unwrap();
        assert_eq!(img.height(), 1);
        assert!(!img.info_header().is_bottom_up());

        bytes[22..26].copy_from_slice(&i32::MIN.to_le_bytes());
        assert!(decode_bmp24(&mut Cursor::new(&bytes), None, Permissiveness::Standard).is_err());
    }
}
