use std::io::{Read, Seek};
use std::path::Path;

use crate::bmp::{self, Permissiveness};
use crate::error::BmpError;
use crate::image::{Bitmap, Bmp8, Bmp24};
use crate::limits::Limits;

/// Load configuration: resource limits and validation strictness.
///
/// ```no_run
/// use bmpfx::{Limits, LoadRequest, Permissiveness};
///
/// let image = LoadRequest::new()
///     .with_limits(Limits { max_pixels: Some(16_000_000), ..Limits::default() })
///     .with_permissiveness(Permissiveness::Strict)
///     .load("photo.bmp")?;
/// println!("{}", image.info());
/// # Ok::<(), bmpfx::BmpError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LoadRequest {
    limits: Option<Limits>,
    permissiveness: Permissiveness,
}

impl LoadRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn with_permissiveness(mut self, permissiveness: Permissiveness) -> Self {
        self.permissiveness = permissiveness;
        self
    }

    /// Load a file of either depth, detected from its `bits per pixel` field.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Bitmap, BmpError> {
        bmp::load(path.as_ref(), self.limits.as_ref(), self.permissiveness)
    }

    pub fn load_bmp8(&self, path: impl AsRef<Path>) -> Result<Bmp8, BmpError> {
        bmp::load_bmp8(path.as_ref(), self.limits.as_ref(), self.permissiveness)
    }

    pub fn load_bmp24(&self, path: impl AsRef<Path>) -> Result<Bmp24, BmpError> {
        bmp::load_bmp24(path.as_ref(), self.limits.as_ref(), self.permissiveness)
    }

    /// Decode from any seekable source.
    pub fn read<R: Read + Seek>(&self, reader: &mut R) -> Result<Bitmap, BmpError> {
        bmp::read(reader, self.limits.as_ref(), self.permissiveness)
    }

    pub fn read_bmp8<R: Read + Seek>(&self, reader: &mut R) -> Result<Bmp8, BmpError> {
        bmp::decode::decode_bmp8(reader, self.limits.as_ref(), self.permissiveness)
    }

    pub fn read_bmp24<R: Read + Seek>(&self, reader: &mut R) -> Result<Bmp24, BmpError> {
        bmp::decode::decode_bmp24(reader, self.limits.as_ref(), self.permissiveness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::RGB8;
    use std::io::Cursor;

    fn encoded_bmp24(width: u32, height: u32) -> Vec<u8> {
        let pixels = vec![RGB8::new(9, 8, 7); (width * height) as usize];
        let img = Bmp24::from_pixels(width, height, &pixels).unwrap();
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out).unwrap();
        out.into_inner()
    }

    #[test]
    fn read_detects_depth() {
        let mut cursor = Cursor::new(encoded_bmp24(4, 2));
        let bitmap = LoadRequest::new().read(&mut cursor).unwrap();
        assert!(matches!(bitmap, Bitmap::Rgb24(_)));
    }

    #[test]
    fn limits_apply_to_reads() {
        let mut cursor = Cursor::new(encoded_bmp24(8, 8));
        let request = LoadRequest::new().with_limits(Limits {
            max_width: Some(4),
            ..Limits::default()
        });
        assert!(matches!(
            request.read(&mut cursor),
            Err(BmpError::LimitExceeded(_))
        ));
    }

    #[test]
    fn wrong_depth_for_explicit_reader() {
        let mut cursor = Cursor::new(encoded_bmp24(4, 1));
        let err = LoadRequest::new().read_bmp8(&mut cursor).unwrap_err();
        assert!(matches!(
            err,
            BmpError::UnsupportedDepth {
                found: 24,
                expected: "8"
            }
        ));
    }

    #[test]
    fn truncated_payload_depends_on_permissiveness() {
        let mut bytes = encoded_bmp24(4, 2);
        bytes.truncate(bytes.len() - 5);

        let err = LoadRequest::new()
            .read_bmp24(&mut Cursor::new(bytes.clone()))
            .unwrap_err();
        assert!(matches!(err, BmpError::ShortRead { .. }));

        let img = LoadRequest::new()
            .with_permissiveness(Permissiveness::Permissive)
            .read_bmp24(&mut Cursor::new(bytes))
            .unwrap();
        // Row 0 is the last one on disk, so it lost its tail.
        assert_eq!(img.pixel(0, 0), RGB8::new(9, 8, 7));
        assert_eq!(img.pixel(3, 0), RGB8::new(0, 0, 0));
        assert_eq!(img.pixel(3, 1), RGB8::new(9, 8, 7));
    }

    #[test]
    fn strict_rejects_wrong_file_size() {
        let mut bytes = encoded_bmp24(4, 1);
        bytes.extend_from_slice(&[0, 0, 0, 0]);

        assert!(LoadRequest::new().read(&mut Cursor::new(bytes.clone())).is_ok());
        let err = LoadRequest::new()
            .with_permissiveness(Permissiveness::Strict)
            .read(&mut Cursor::new(bytes))
            .unwrap_err();
        assert!(matches!(err, BmpError::InvalidHeader(_)));
    }

    #[test]
    fn compression_is_advisory_only_when_permissive() {
        let mut bytes = encoded_bmp24(4, 1);
        bytes[30] = 1;

        let err = LoadRequest::new()
            .read(&mut Cursor::new(bytes.clone()))
            .unwrap_err();
        assert!(matches!(err, BmpError::InvalidHeader(_)));
        assert!(
            LoadRequest::new()
                .with_permissiveness(Permissiveness::Permissive)
                .read(&mut Cursor::new(bytes))
                .is_ok()
        );
    }
}
