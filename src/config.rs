//! Detection session configuration.

use std::time::Duration;

use crate::track::TrackerParams;
use crate::util::{SpotmarkError, SpotmarkResult};

/// Tunable parameters for a detection session.
///
/// The defaults mirror a typical interactive setup: 80% confidence, a
/// 50x70 overlay box, and a two second grace period before a vanished
/// region is dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Match confidence threshold in percent. Valid range is 50 to 99.
    pub confidence_percent: u8,
    /// Width of the overlay box drawn around each detection.
    pub overlay_width: u32,
    /// Height of the overlay box drawn around each detection.
    pub overlay_height: u32,
    /// Wall-clock grace period before a vanished region is dropped.
    pub disappear_delay: Duration,
    /// Optional pause between detection cycles. `None` runs back to back.
    pub cycle_interval: Option<Duration>,
    /// Overlap ratio at which a lower-scoring detection is suppressed.
    pub iou_threshold: f32,
    /// Consecutive sightings required before a region is confirmed.
    pub appear_threshold: u32,
    /// Consecutive misses required before a confirmed region is dropped.
    pub disappear_threshold: u32,
    /// Grid cell size in pixels used to merge jittering detections.
    pub grid_cell: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_percent: 80,
            overlay_width: 50,
            overlay_height: 70,
            disappear_delay: Duration::from_secs(2),
            cycle_interval: None,
            iou_threshold: 0.3,
            appear_threshold: 1,
            disappear_threshold: 2,
            grid_cell: 20,
        }
    }
}

impl DetectorConfig {
    /// Checks that all parameters are inside their valid ranges.
    pub fn validate(&self) -> SpotmarkResult<()> {
        if !(50..=99).contains(&self.confidence_percent) {
            return Err(SpotmarkError::InvalidConfidence {
                percent: self.confidence_percent,
            });
        }
        if self.overlay_width == 0 || self.overlay_height == 0 {
            return Err(SpotmarkError::InvalidOverlayBox {
                width: self.overlay_width,
                height: self.overlay_height,
            });
        }
        if !self.iou_threshold.is_finite()
            || self.iou_threshold <= 0.0
            || self.iou_threshold >= 1.0
        {
            return Err(SpotmarkError::InvalidIouThreshold {
                value: self.iou_threshold,
            });
        }
        Ok(())
    }

    /// Returns the confidence threshold as a score in `[0, 1]`.
    pub fn min_score(&self) -> f32 {
        self.confidence_percent as f32 / 100.0
    }

    /// Returns the hysteresis parameters for the stability tracker.
    pub fn tracker_params(&self) -> TrackerParams {
        TrackerParams {
            grid_cell: self.grid_cell,
            appear_threshold: self.appear_threshold,
            disappear_threshold: self.disappear_threshold,
            disappear_delay: self.disappear_delay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DetectorConfig;
    use crate::util::SpotmarkError;

    #[test]
    fn default_config_is_valid() {
        assert!(DetectorConfig::default().validate().is_ok());
    }

    #[test]
    fn config_rejects_out_of_range_confidence() {
        let mut config = DetectorConfig {
            confidence_percent: 49,
            ..DetectorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SpotmarkError::InvalidConfidence { percent: 49 })
        );
        config.confidence_percent = 100;
        assert_eq!(
            config.validate(),
            Err(SpotmarkError::InvalidConfidence { percent: 100 })
        );
    }

    #[test]
    fn config_rejects_zero_overlay_box() {
        let config = DetectorConfig {
            overlay_width: 0,
            ..DetectorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SpotmarkError::InvalidOverlayBox {
                width: 0,
                height: 70,
            })
        );
    }

    #[test]
    fn config_rejects_degenerate_iou_threshold() {
        for value in [0.0f32, 1.0, -0.1, f32::NAN] {
            let config = DetectorConfig {
                iou_threshold: value,
                ..DetectorConfig::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn min_score_scales_percent() {
        let config = DetectorConfig::default();
        assert!((config.min_score() - 0.8).abs() < 1e-6);
    }
}
