//! Captured frames.

use std::time::Instant;

use crate::image::{ImageView, OwnedImage};
use crate::util::SpotmarkResult;

/// A single captured grayscale frame with its capture timestamp.
///
/// The timestamp is taken at capture time and drives the disappear-delay
/// logic in the stability tracker, so replayed frames keep the timing of
/// the original capture session.
#[derive(Clone)]
pub struct Frame {
    img: OwnedImage,
    captured_at: Instant,
}

impl Frame {
    /// Creates a frame from a contiguous row-major grayscale buffer.
    pub fn new(
        data: Vec<u8>,
        width: usize,
        height: usize,
        captured_at: Instant,
    ) -> SpotmarkResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self { img, captured_at })
    }

    /// Creates a frame from an already owned image.
    pub fn from_image(img: OwnedImage, captured_at: Instant) -> Self {
        Self { img, captured_at }
    }

    /// Returns the frame width in pixels.
    pub fn width(&self) -> usize {
        self.img.width()
    }

    /// Returns the frame height in pixels.
    pub fn height(&self) -> usize {
        self.img.height()
    }

    /// Returns a borrowed view of the frame pixels.
    pub fn view(&self) -> ImageView<'_> {
        self.img.view()
    }

    /// Returns the capture timestamp.
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }
}
