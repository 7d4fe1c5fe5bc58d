//! # bmpfx
//!
//! Load, filter and save uncompressed BMP images.
//!
//! ## Supported Formats
//!
//! - **8-bit** indexed grayscale: 54-byte header, 1024-byte palette, rows
//!   padded to 4 bytes. Header and palette are carried through untouched.
//! - **24-bit** RGB: 14-byte file header, 40-byte info header, BGR payload,
//!   bottom-up or top-down.
//!
//! Loading then saving an image without changes reproduces the file byte
//! for byte.
//!
//! ## Transforms
//!
//! Negative, brightness, threshold (8-bit), grayscale (24-bit), 3x3
//! convolution filters (box blur, gaussian blur, outline, emboss, sharpen)
//! and histogram equalization. See [`Filter`].
//!
//! ## Non-Goals
//!
//! - Compressed BMPs (RLE, bitfields) and other bit depths
//! - Palette remapping
//! - Multithreading
//!
//! ## Usage
//!
//! ```no_run
//! use bmpfx::{Filter, Session};
//!
//! let mut session = Session::new();
//! session.open("input.bmp")?;
//! session.apply(Filter::Brightness(20))?;
//! session.apply(Filter::Sharpen)?;
//! println!("{}", session.info()?);
//! session.save("output.bmp")?;
//! # Ok::<(), bmpfx::BmpError>(())
//! ```
//!
//! Logging goes through `tracing`; install a subscriber to see it.

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod image;
mod limits;
mod pixel;
mod request;
mod session;

pub mod bmp;
pub mod io;
pub mod transform;

use std::path::Path;

// Re-exports
pub use bmp::Permissiveness;
pub use error::BmpError;
pub use image::{Bitmap, Bmp8, Bmp24, ImageInfo};
pub use limits::Limits;
pub use pixel::{BitDepth, RGB8, padded_row_width, row_padding};
pub use request::LoadRequest;
pub use session::Session;
pub use transform::Filter;
pub use transform::convolve::{BOX_BLUR, EMBOSS, GAUSSIAN_BLUR, Kernel, OUTLINE, SHARPEN};

/// Load a BMP of either supported depth with default settings.
pub fn open(path: impl AsRef<Path>) -> Result<Bitmap, BmpError> {
    LoadRequest::new().load(path)
}

/// Load an 8-bit BMP with default settings.
pub fn load_bmp8(path: impl AsRef<Path>) -> Result<Bmp8, BmpError> {
    LoadRequest::new().load_bmp8(path)
}

/// Load a 24-bit BMP with default settings.
pub fn load_bmp24(path: impl AsRef<Path>) -> Result<Bmp24, BmpError> {
    LoadRequest::new().load_bmp24(path)
}
