use std::path::Path;

use crate::error::BmpError;
use crate::image::{Bitmap, ImageInfo};
use crate::request::LoadRequest;
use crate::transform::Filter;

/// Holds at most one open image and runs commands against it.
///
/// Opening a new file replaces the current image only once the load has
/// succeeded; a failed open keeps whatever was loaded before.
#[derive(Debug, Default)]
pub struct Session {
    request: LoadRequest,
    image: Option<Bitmap>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `request` for every subsequent [`Session::open`].
    pub fn with_request(request: LoadRequest) -> Self {
        Self {
            request,
            image: None,
        }
    }

    /// Load `path`, picking the decoder from the file's bit depth.
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<&Bitmap, BmpError> {
        let bitmap = self.request.load(path)?;
        Ok(self.image.insert(bitmap))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), BmpError> {
        self.loaded()?.save(path)
    }

    pub fn apply(&mut self, filter: Filter) -> Result<(), BmpError> {
        self.loaded_mut()?.apply(filter)
    }

    /// Apply the 1-based menu entry `index` for the loaded image's depth.
    /// Returns the filter that ran.
    pub fn apply_index(&mut self, index: usize, param: i32) -> Result<Filter, BmpError> {
        let image = self.loaded_mut()?;
        let depth = image.depth();
        let filter = Filter::from_index(depth, index, param).ok_or_else(|| {
            BmpError::InvalidArgument(format!(
                "no filter {index} for {}-bit images",
                depth.bits()
            ))
        })?;
        image.apply(filter)?;
        Ok(filter)
    }

    pub fn info(&self) -> Result<ImageInfo, BmpError> {
        Ok(self.loaded()?.info())
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }

    /// Drop the loaded image, returning it.
    pub fn close(&mut self) -> Option<Bitmap> {
        self.image.take()
    }

    fn loaded(&self) -> Result<&Bitmap, BmpError> {
        self.image.as_ref().ok_or_else(no_image)
    }

    fn loaded_mut(&mut self) -> Result<&mut Bitmap, BmpError> {
        self.image.as_mut().ok_or_else(no_image)
    }
}

fn no_image() -> BmpError {
    tracing::warn!("no image loaded");
    BmpError::NoImageLoaded
}
