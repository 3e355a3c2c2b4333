//! Template plan precomputation for normalized cross-correlation.

use crate::image::ImageView;
use crate::util::{SpotmarkError, SpotmarkResult};

/// Precomputed zero-mean buffer and statistics for one template.
///
/// `t_prime` holds the template with its mean subtracted, so the window
/// numerator reduces to a plain dot product. `var_t` is the sum of squared
/// deviations over the template.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    var_t: f32,
    t_prime: Vec<f32>,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Fails with [`SpotmarkError::DegenerateTemplate`] when the template is
    /// flat, since a zero-variance template matches everything equally.
    pub fn from_view(tpl: ImageView<'_>) -> SpotmarkResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(SpotmarkError::InvalidDimensions { width, height })?;

        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or_else(|| row_error(&tpl, y))?;
            for &value in row {
                let v = value as f64;
                sum += v;
                sum_sq += v * v;
            }
        }

        let count_f = count as f64;
        let mean = sum / count_f;
        let variance = sum_sq / count_f - mean * mean;
        if variance <= 1e-8 {
            return Err(SpotmarkError::DegenerateTemplate {
                reason: "zero variance",
            });
        }

        let mut t_prime = Vec::with_capacity(count);
        for y in 0..height {
            let row = tpl.row(y).ok_or_else(|| row_error(&tpl, y))?;
            for &value in row {
                t_prime.push((value as f64 - mean) as f32);
            }
        }

        Ok(Self {
            width,
            height,
            var_t: (variance * count_f) as f32,
            t_prime,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the sum of squared deviations over the template.
    pub fn var_t(&self) -> f32 {
        self.var_t
    }

    /// Returns the zero-mean template buffer in row-major order.
    pub fn t_prime(&self) -> &[f32] {
        &self.t_prime
    }
}

fn row_error(tpl: &ImageView<'_>, y: usize) -> SpotmarkError {
    let needed = (y + 1)
        .checked_mul(tpl.stride())
        .and_then(|v| v.checked_add(tpl.width()))
        .unwrap_or(usize::MAX);
    SpotmarkError::BufferTooSmall {
        needed,
        got: tpl.as_slice().len(),
    }
}
