//! Greedy intersection-over-union non-maximum suppression.

use crate::candidate::{sort_detections_desc, RawDetection};
use crate::util::{SpotmarkError, SpotmarkResult};

/// Computes the intersection-over-union of two detection boxes.
///
/// Returns `None` when the union area is zero, which only happens for
/// zero-area boxes.
pub fn iou(a: &RawDetection, b: &RawDetection) -> Option<f32> {
    let ax2 = a.x.checked_add(a.width)?;
    let ay2 = a.y.checked_add(a.height)?;
    let bx2 = b.x.checked_add(b.width)?;
    let by2 = b.y.checked_add(b.height)?;

    let ix = ax2.min(bx2).saturating_sub(a.x.max(b.x));
    let iy = ay2.min(by2).saturating_sub(a.y.max(b.y));
    let inter = (ix as f64) * (iy as f64);

    let area_a = (a.width as f64) * (a.height as f64);
    let area_b = (b.width as f64) * (b.height as f64);
    let union = area_a + area_b - inter;
    if union <= 0.0 {
        return None;
    }
    Some((inter / union) as f32)
}

/// Applies a score pre-filter followed by greedy overlap suppression.
///
/// Detections below `score_threshold` are dropped first. The remainder are
/// sorted by descending score and kept only if their IoU with every
/// previously kept detection stays below `iou_threshold`. Within one call
/// detections from different templates suppress each other.
pub fn suppress(
    detections: &[RawDetection],
    iou_threshold: f32,
    score_threshold: f32,
) -> SpotmarkResult<Vec<RawDetection>> {
    for det in detections {
        if det.width == 0 || det.height == 0 {
            return Err(SpotmarkError::Suppression {
                template_id: det.template_id,
                reason: "zero-area detection",
            });
        }
    }

    let mut sorted: Vec<RawDetection> = detections
        .iter()
        .filter(|det| det.score >= score_threshold)
        .copied()
        .collect();
    sort_detections_desc(&mut sorted);

    let mut kept: Vec<RawDetection> = Vec::new();
    'outer: for det in sorted {
        for kept_det in kept.iter() {
            let overlap = iou(&det, kept_det).ok_or(SpotmarkError::Suppression {
                template_id: det.template_id,
                reason: "zero-area detection",
            })?;
            if overlap >= iou_threshold {
                continue 'outer;
            }
        }
        kept.push(det);
    }

    Ok(kept)
}
