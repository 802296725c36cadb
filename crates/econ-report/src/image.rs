//! Image dimension probing.

use econ_core::{EconError, Result};
use std::path::Path;

/// Pixel dimensions of an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ImageSize {
    /// Creates a size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Height divided by width.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

/// Source of image dimensions for layout.
///
/// Layout only needs sizes, so probes should avoid decoding pixel data.
pub trait ImageProbe {
    /// Returns the dimensions of the image at `path`.
    ///
    /// # Errors
    /// Returns [`EconError::MissingImage`] if the file is missing, unreadable or empty.
    fn size(&self, path: &Path) -> Result<ImageSize>;
}

/// Reads dimensions from image file headers on disk.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileProbe;

impl ImageProbe for FileProbe {
    fn size(&self, path: &Path) -> Result<ImageSize> {
        let (width, height) = printpdf::image_crate::image_dimensions(path).map_err(|e| {
            EconError::MissingImage {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        if width == 0 || height == 0 {
            return Err(EconError::MissingImage {
                path: path.to_path_buf(),
                reason: "image has no pixels".to_string(),
            });
        }
        Ok(ImageSize::new(width, height))
    }
}
