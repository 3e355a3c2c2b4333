//! Candidate types and pruning utilities.
//!
//! A `Peak` is a raw score-map hit for one template; a `RawDetection`
//! carries the template identity and box dimensions alongside it. Overlap
//! pruning lives in [`nms`].

use std::cmp::Ordering;

pub mod nms;

/// Score-map hit above threshold for a single template.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the window top-left.
    pub x: usize,
    /// Y coordinate (row) of the window top-left.
    pub y: usize,
    /// Correlation score in `[0, 1]`.
    pub score: f32,
}

/// One matched window before suppression and stabilization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawDetection {
    /// Identifier of the template that produced this detection.
    pub template_id: usize,
    /// X coordinate (column) of the window top-left.
    pub x: usize,
    /// Y coordinate (row) of the window top-left.
    pub y: usize,
    /// Matched window width in pixels.
    pub width: usize,
    /// Matched window height in pixels.
    pub height: usize,
    /// Correlation score in `[0, 1]`.
    pub score: f32,
}

fn detection_cmp_desc(a: &RawDetection, b: &RawDetection) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
        .then_with(|| a.template_id.cmp(&b.template_id))
}

/// Sorts detections by descending score with deterministic tie-breaking.
pub(crate) fn sort_detections_desc(detections: &mut [RawDetection]) {
    detections.sort_by(detection_cmp_desc);
}
