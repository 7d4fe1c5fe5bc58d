//! Pixel storage allocation.
//!
//! Every buffer is reserved fallibly so an oversized header turns into
//! `OutOfMemory` instead of an abort. A failed reservation leaves nothing
//! behind: the partially built `Vec` is dropped on the error path.

use imgref::ImgVec;

use crate::error::BmpError;
use crate::limits::Limits;
use crate::pixel::{RGB8, padded_row_width};

/// Allocate a zeroed `len`-element vector, or fail with `OutOfMemory`.
fn try_zeroed<T: Copy + Default>(len: usize) -> Result<Vec<T>, BmpError> {
    let bytes = len.saturating_mul(core::mem::size_of::<T>());
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| BmpError::OutOfMemory { bytes })?;
    buf.resize(len, T::default());
    Ok(buf)
}

fn check_nonempty(width: u32, height: u32) -> Result<(), BmpError> {
    if width == 0 || height == 0 {
        return Err(BmpError::InvalidHeader(format!(
            "image has no pixels ({width}x{height})"
        )));
    }
    Ok(())
}

/// Allocate a `width` x `height` RGB grid, all black.
pub(crate) fn allocate_grid(
    width: u32,
    height: u32,
    limits: Option<&Limits>,
) -> Result<ImgVec<RGB8>, BmpError> {
    check_nonempty(width, height)?;
    let len = (width as usize)
        .checked_mul(height as usize)
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(len.saturating_mul(3))?;
    }
    let buf = try_zeroed(len)?;
    Ok(ImgVec::new(buf, width as usize, height as usize))
}

/// Allocate an 8-bit sample buffer whose stride is the padded row width.
///
/// The backing vector holds `height * padded_row_width(width)` bytes so the
/// final row keeps its padding too.
pub(crate) fn allocate_padded(
    width: u32,
    height: u32,
    limits: Option<&Limits>,
) -> Result<ImgVec<u8>, BmpError> {
    check_nonempty(width, height)?;
    let stride = padded_row_width(width as usize);
    let len = stride
        .checked_mul(height as usize)
        .ok_or(BmpError::DimensionsTooLarge { width, height })?;
    if let Some(limits) = limits {
        limits.check(width, height)?;
        limits.check_memory(len)?;
    }
    let buf = try_zeroed(len)?;
    Ok(ImgVec::new_stride(
        buf,
        width as usize,
        height as usize,
        stride,
    ))
}
