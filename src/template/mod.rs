//! Template storage and planning utilities.

use crate::image::{ImageView, OwnedImage};
use crate::util::SpotmarkResult;

mod plan;

pub use plan::TemplatePlan;

/// Owned template image with a caller-assigned identifier.
///
/// The identifier travels with every detection produced from this template,
/// so callers can map results back to the file or asset they loaded.
pub struct Template {
    id: usize,
    img: OwnedImage,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(id: usize, data: Vec<u8>, width: usize, height: usize) -> SpotmarkResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self { id, img })
    }

    /// Creates a template from an already owned image.
    pub fn from_image(id: usize, img: OwnedImage) -> Self {
        Self { id, img }
    }

    /// Returns the caller-assigned template identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }
}
