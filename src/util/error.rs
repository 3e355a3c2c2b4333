//! Error types for spotmark.

use thiserror::Error;

/// Result alias for spotmark operations.
pub type SpotmarkResult<T> = std::result::Result<T, SpotmarkError>;

/// Errors produced by the spotmark detection pipeline.
///
/// Fatal and locally-recoverable conditions share the enum; the detection
/// loop decides which variants halt a run (see `watch`).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpotmarkError {
    /// Image or template dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is too small for the requested dimensions.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Template has no usable contrast.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Template does not fit the frame at any placement.
    #[error("template {tpl_width}x{tpl_height} exceeds frame {img_width}x{img_height}")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// No templates were configured for a detection run.
    #[error("no templates configured")]
    NoTemplates,
    /// Confidence percent outside the accepted range.
    #[error("confidence {percent}% outside 50..=99")]
    InvalidConfidence { percent: u8 },
    /// Overlay box dimensions must be positive.
    #[error("invalid overlay box: {width}x{height}")]
    InvalidOverlayBox { width: u32, height: u32 },
    /// IoU suppression threshold outside the open (0, 1) interval.
    #[error("iou threshold {value} outside (0, 1)")]
    InvalidIouThreshold { value: f32 },
    /// The parallel worker pool could not be created.
    #[error("worker pool init failed: {reason}")]
    PoolInit { reason: String },
    /// The frame source failed to deliver a capture.
    #[error("frame capture failed: {reason}")]
    Capture { reason: String },
    /// Overlap suppression could not be computed for one template's
    /// candidates. Recovered locally by using the unfiltered set.
    #[error("suppression failed for template {template_id}: {reason}")]
    Suppression {
        template_id: usize,
        reason: &'static str,
    },
    /// Image decoding or file access failed.
    #[cfg(feature = "image-io")]
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
