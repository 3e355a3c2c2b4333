//! Normalized cross-correlation kernel.
//!
//! The scan slides a planned template over every valid placement and keeps
//! all windows whose score reaches the threshold. Suppression of overlapping
//! hits happens later, so the kernel itself stays a pure score evaluator.

use crate::candidate::Peak;
use crate::template::TemplatePlan;
use crate::util::{SpotmarkError, SpotmarkResult};
use crate::ImageView;

/// Windows with variance at or below this value are skipped as featureless.
pub const MIN_WINDOW_VARIANCE: f32 = 1e-8;

/// Scan configuration for kernel evaluations.
#[derive(Clone, Copy, Debug)]
pub struct ScanParams {
    /// Minimum score threshold (discard below this value).
    pub min_score: f32,
    /// Minimum variance threshold for the image window.
    pub min_var_i: f32,
}

impl ScanParams {
    /// Creates parameters with the default window-variance gate.
    pub fn with_min_score(min_score: f32) -> Self {
        Self {
            min_score,
            min_var_i: MIN_WINDOW_VARIANCE,
        }
    }
}

/// Scans the full valid placement range and returns every peak at or above
/// the score threshold, in row-major order.
///
/// Scores are clamped into `[0, 1]` after thresholding. Flat windows and
/// placements with non-finite scores are skipped. Fails with
/// [`SpotmarkError::TemplateTooLarge`] when the template exceeds the image
/// in either dimension.
pub fn scan_zncc_full(
    image: ImageView<'_>,
    plan: &TemplatePlan,
    params: ScanParams,
) -> SpotmarkResult<Vec<Peak>> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = plan.width();
    let tpl_height = plan.height();

    if img_width < tpl_width || img_height < tpl_height {
        return Err(SpotmarkError::TemplateTooLarge {
            tpl_width,
            tpl_height,
            img_width,
            img_height,
        });
    }

    let var_t = plan.var_t();
    if var_t <= MIN_WINDOW_VARIANCE {
        return Ok(Vec::new());
    }
    let t_prime = plan.t_prime();
    let n = (tpl_width * tpl_height) as f32;

    let max_x = img_width - tpl_width;
    let max_y = img_height - tpl_height;

    let mut peaks = Vec::new();
    for y in 0..=max_y {
        for x in 0..=max_x {
            let mut dot = 0.0f32;
            let mut sum_i = 0.0f32;
            let mut sum_i2 = 0.0f32;

            for ty in 0..tpl_height {
                let img_row = image.row(y + ty).expect("row within bounds for scan");
                let base = ty * tpl_width;
                for tx in 0..tpl_width {
                    let idx = base + tx;
                    let value = img_row[x + tx] as f32;
                    dot += t_prime[idx] * value;
                    sum_i += value;
                    sum_i2 += value * value;
                }
            }

            let var_i = sum_i2 - (sum_i * sum_i) / n;
            if var_i <= params.min_var_i {
                continue;
            }

            let denom = (var_t * var_i).sqrt();
            let score = dot / denom;
            if score.is_finite() && score >= params.min_score {
                peaks.push(Peak {
                    x,
                    y,
                    score: score.clamp(0.0, 1.0),
                });
            }
        }
    }

    Ok(peaks)
}
