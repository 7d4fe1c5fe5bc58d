//! BMP encoder: writes stored headers verbatim, then the pixel payload.
//!
//! Nothing is recomputed from the pixels, so an untouched image saves back
//! byte for byte.

use std::io::{Seek, Write};

use super::header::{FILE_HEADER_SIZE, HEADER_SIZE, PALETTE_SIZE};
use crate::error::BmpError;
use crate::image::{Bmp8, Bmp24};
use crate::io::write_all_at;

/// Encode a 24-bit image, mirroring the row mapping used on load.
pub(crate) fn encode_bmp24<W: Write + Seek + ?Sized>(
    img: &Bmp24,
    sink: &mut W,
) -> Result<(), BmpError> {
    write_all_at(sink, 0, &img.file_header.to_bytes())?;
    write_all_at(sink, FILE_HEADER_SIZE as u64, &img.info_header.to_bytes())?;

    let width = img.pixels.width();
    let height = img.pixels.height();
    let row_bytes = width * 3;
    let offset = u64::from(img.file_header.offset);
    let bottom_up = img.info_header.is_bottom_up();
    let mut disk_row_buf = Vec::with_capacity(row_bytes);

    for (y, row) in img.pixels.buf().chunks_exact(width).enumerate() {
        let disk_row = if bottom_up { height - 1 - y } else { y };
        disk_row_buf.clear();
        for px in row {
            disk_row_buf.extend_from_slice(&[px.b, px.g, px.r]);
        }
        write_all_at(sink, offset + (disk_row * row_bytes) as u64, &disk_row_buf)?;
    }

    sink.flush()?;
    Ok(())
}

/// Encode an 8-bit image: raw header, palette, then the padded samples.
pub(crate) fn encode_bmp8<W: Write + Seek + ?Sized>(
    img: &Bmp8,
    sink: &mut W,
) -> Result<(), BmpError> {
    write_all_at(sink, 0, img.header.as_bytes())?;
    write_all_at(sink, HEADER_SIZE as u64, &img.palette[..])?;
    write_all_at(sink, (HEADER_SIZE + PALETTE_SIZE) as u64, img.data.buf())?;
    sink.flush()?;
    Ok(())
}
