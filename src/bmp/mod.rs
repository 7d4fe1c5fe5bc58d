//! Uncompressed BMP codec for 8-bit grayscale and 24-bit RGB files.
//!
//! Use the top-level [`crate::open`], [`crate::load_bmp8`],
//! [`crate::load_bmp24`] or a [`crate::LoadRequest`].

pub(crate) mod decode;
pub(crate) mod encode;
pub mod header;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek};
use std::path::Path;

use crate::error::BmpError;
use crate::image::{Bitmap, Bmp8, Bmp24};
use crate::limits::Limits;
use crate::pixel::BitDepth;

pub use decode::Permissiveness;

fn open_file(path: &Path) -> Result<BufReader<File>, BmpError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| {
            tracing::warn!(path = %path.display(), error = %source, "cannot open BMP file");
            BmpError::FileNotFound {
                path: path.to_path_buf(),
                source,
            }
        })
}

fn create_file(path: &Path) -> Result<BufWriter<File>, BmpError> {
    File::create(path).map(BufWriter::new).map_err(|e| {
        tracing::warn!(path = %path.display(), error = %e, "cannot create BMP file");
        BmpError::Io(e)
    })
}

/// Decode a stream whose depth is not known in advance.
pub(crate) fn read<R: Read + Seek + ?Sized>(
    reader: &mut R,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bitmap, BmpError> {
    let depth = decode::sniff_depth(reader)?;
    tracing::debug!(bits = depth.bits(), "detected BMP depth");
    match depth {
        BitDepth::Gray8 => decode::decode_bmp8(reader, limits, permissiveness).map(Bitmap::Gray8),
        BitDepth::Rgb24 => decode::decode_bmp24(reader, limits, permissiveness).map(Bitmap::Rgb24),
    }
}

/// Load a file whose depth is not known in advance.
pub(crate) fn load(
    path: &Path,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bitmap, BmpError> {
    let mut reader = open_file(path)?;
    let bitmap = read(&mut reader, limits, permissiveness)?;
    tracing::debug!(path = %path.display(), "loaded BMP");
    Ok(bitmap)
}

pub(crate) fn load_bmp8(
    path: &Path,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bmp8, BmpError> {
    let mut reader = open_file(path)?;
    decode::decode_bmp8(&mut reader, limits, permissiveness)
}

pub(crate) fn load_bmp24(
    path: &Path,
    limits: Option<&Limits>,
    permissiveness: Permissiveness,
) -> Result<Bmp24, BmpError> {
    let mut reader = open_file(path)?;
    decode::decode_bmp24(&mut reader, limits, permissiveness)
}

pub(crate) fn save_bmp8(img: &Bmp8, path: &Path) -> Result<(), BmpError> {
    let mut writer = create_file(path)?;
    encode::encode_bmp8(img, &mut writer)?;
    tracing::debug!(path = %path.display(), width = img.width, height = img.height, "saved 8-bit BMP");
    Ok(())
}

pub(crate) fn save_bmp24(img: &Bmp24, path: &Path) -> Result<(), BmpError> {
    let mut writer = create_file(path)?;
    encode::encode_bmp24(img, &mut writer)?;
    tracing::debug!(path = %path.display(), width = img.width, height = img.height, "saved 24-bit BMP");
    Ok(())
}
