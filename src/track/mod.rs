//! Multi-frame stabilization of overlay regions.
//!
//! Raw detections flicker: a region can drop out for a frame or two and
//! come back. The tracker quantizes each overlay rectangle onto a coarse
//! grid, counts consecutive sightings and misses per grid cell, and only
//! reports the confirmed set when it actually changes. Removal requires
//! both a miss count and, when configured, a wall-clock delay since the
//! region was last seen.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::trace::trace_event;

/// Screen-space overlay rectangle.
///
/// Coordinates are signed: an overlay box larger than its detection can
/// extend past the left or top edge of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: i32,
    /// Y coordinate of the top-left corner.
    pub y: i32,
    /// Rectangle width in pixels.
    pub width: u32,
    /// Rectangle height in pixels.
    pub height: u32,
}

/// Grid-quantized identity of a tracked region.
///
/// Two rectangles within the same grid cell and with equal dimensions are
/// treated as the same region, which absorbs small frame-to-frame jitter
/// in the match position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridKey {
    grid_x: i32,
    grid_y: i32,
    width: u32,
    height: u32,
}

impl GridKey {
    /// Quantizes a rectangle onto a grid with the given cell size.
    ///
    /// Quantization floors toward negative infinity, so coordinates just
    /// left of or above the origin land in their own cells instead of
    /// collapsing into cell zero.
    pub fn quantize(rect: Rect, cell: u32) -> Self {
        let cell = cell.max(1) as i32;
        Self {
            grid_x: rect.x.div_euclid(cell),
            grid_y: rect.y.div_euclid(cell),
            width: rect.width,
            height: rect.height,
        }
    }
}

/// Hysteresis configuration for the tracker.
#[derive(Clone, Copy, Debug)]
pub struct TrackerParams {
    /// Grid cell size in pixels used to merge jittering detections.
    pub grid_cell: u32,
    /// Consecutive sightings required before a region is confirmed.
    pub appear_threshold: u32,
    /// Consecutive misses required before a confirmed region is dropped.
    pub disappear_threshold: u32,
    /// Minimum wall-clock time since the last sighting before a region is
    /// dropped. Zero disables the delay and leaves removal purely
    /// count-based.
    pub disappear_delay: Duration,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            grid_cell: 20,
            appear_threshold: 1,
            disappear_threshold: 2,
            disappear_delay: Duration::ZERO,
        }
    }
}

/// Per-region hysteresis state.
#[derive(Clone, Copy, Debug)]
pub struct TrackedRegion {
    /// Most recently observed rectangle for this region.
    pub rect: Rect,
    /// Sightings so far, capped at the appear threshold.
    pub appear_count: u32,
    /// Consecutive misses since the last sighting.
    pub disappear_count: u32,
    /// Whether the region has passed the appear threshold.
    pub confirmed: bool,
    /// Timestamp of the last frame in which the region was seen.
    pub last_seen: Instant,
}

/// Debounces per-frame rectangles into a stable confirmed set.
pub struct StabilityTracker {
    params: TrackerParams,
    regions: HashMap<GridKey, TrackedRegion>,
    emitted: Vec<Rect>,
}

impl StabilityTracker {
    /// Creates a tracker. Cell size and both thresholds are clamped to at
    /// least one.
    pub fn new(params: TrackerParams) -> Self {
        let params = TrackerParams {
            grid_cell: params.grid_cell.max(1),
            appear_threshold: params.appear_threshold.max(1),
            disappear_threshold: params.disappear_threshold.max(1),
            disappear_delay: params.disappear_delay,
        };
        Self {
            params,
            regions: HashMap::new(),
            emitted: Vec::new(),
        }
    }

    /// Feeds one frame of rectangles into the tracker.
    ///
    /// `now` is the capture timestamp of the frame the rectangles came
    /// from. Returns the full confirmed set, sorted, when it differs from
    /// the previously returned set, and `None` otherwise. When several
    /// input rectangles quantize to the same region the last one wins.
    pub fn update(&mut self, rects: &[Rect], now: Instant) -> Option<Vec<Rect>> {
        let mut present: HashMap<GridKey, Rect> = HashMap::with_capacity(rects.len());
        for &rect in rects {
            present.insert(GridKey::quantize(rect, self.params.grid_cell), rect);
        }

        for (&key, &rect) in &present {
            let region = self.regions.entry(key).or_insert(TrackedRegion {
                rect,
                appear_count: 0,
                disappear_count: 0,
                confirmed: false,
                last_seen: now,
            });
            region.rect = rect;
            region.disappear_count = 0;
            region.last_seen = now;
            region.appear_count = (region.appear_count + 1).min(self.params.appear_threshold);
            if region.appear_count >= self.params.appear_threshold {
                region.confirmed = true;
            }
        }

        let params = self.params;
        self.regions.retain(|key, region| {
            if present.contains_key(key) {
                return true;
            }
            region.disappear_count = region.disappear_count.saturating_add(1);
            let counted_out = region.disappear_count >= params.disappear_threshold;
            let delayed_out = params.disappear_delay.is_zero()
                || now.duration_since(region.last_seen) >= params.disappear_delay;
            !(counted_out && delayed_out)
        });

        let mut confirmed: Vec<Rect> = self
            .regions
            .values()
            .filter(|region| region.confirmed)
            .map(|region| region.rect)
            .collect();
        confirmed.sort_unstable();

        if confirmed == self.emitted {
            return None;
        }
        trace_event!(
            "confirmed_set_changed",
            regions = confirmed.len(),
            tracked = self.regions.len()
        );
        self.emitted = confirmed.clone();
        Some(confirmed)
    }

    /// Returns the current confirmed rectangles, sorted.
    pub fn confirmed(&self) -> Vec<Rect> {
        let mut out: Vec<Rect> = self
            .regions
            .values()
            .filter(|region| region.confirmed)
            .map(|region| region.rect)
            .collect();
        out.sort_unstable();
        out
    }

    /// Drops all tracked state and the emission baseline.
    pub fn clear(&mut self) {
        self.regions.clear();
        self.emitted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{GridKey, Rect};

    #[test]
    fn quantize_floors_negative_coordinates() {
        let rect = Rect {
            x: -25,
            y: -1,
            width: 50,
            height: 70,
        };
        let key = GridKey::quantize(rect, 20);
        assert_eq!(
            key,
            GridKey {
                grid_x: -2,
                grid_y: -1,
                width: 50,
                height: 70,
            }
        );
    }

    #[test]
    fn quantize_merges_rects_within_one_cell() {
        let a = Rect {
            x: 100,
            y: 100,
            width: 50,
            height: 70,
        };
        let b = Rect {
            x: 119,
            y: 101,
            width: 50,
            height: 70,
        };
        assert_eq!(GridKey::quantize(a, 20), GridKey::quantize(b, 20));
    }

    #[test]
    fn quantize_distinguishes_dimensions() {
        let a = Rect {
            x: 100,
            y: 100,
            width: 50,
            height: 70,
        };
        let b = Rect {
            x: 100,
            y: 100,
            width: 50,
            height: 71,
        };
        assert_ne!(GridKey::quantize(a, 20), GridKey::quantize(b, 20));
    }
}
