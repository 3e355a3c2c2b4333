//! Appear/disappear hysteresis of the stability tracker.

use spotmark::{Rect, StabilityTracker, TrackerParams};
use std::time::{Duration, Instant};

fn rect(x: i32, y: i32) -> Rect {
    Rect {
        x,
        y,
        width: 50,
        height: 70,
    }
}

fn params(appear: u32, disappear: u32, delay_ms: u64) -> TrackerParams {
    TrackerParams {
        grid_cell: 20,
        appear_threshold: appear,
        disappear_threshold: disappear,
        disappear_delay: Duration::from_millis(delay_ms),
    }
}

#[test]
fn single_sighting_confirms_at_threshold_one() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();

    let emitted = tracker.update(&[rect(100, 100)], t0);
    assert_eq!(emitted, Some(vec![rect(100, 100)]));
}

#[test]
fn confirmation_waits_for_appear_threshold() {
    let mut tracker = StabilityTracker::new(params(2, 2, 0));
    let t0 = Instant::now();

    assert_eq!(tracker.update(&[rect(100, 100)], t0), None);
    assert!(tracker.confirmed().is_empty());

    let emitted = tracker.update(&[rect(100, 100)], t0 + Duration::from_millis(50));
    assert_eq!(emitted, Some(vec![rect(100, 100)]));
}

#[test]
fn confirmed_region_survives_short_dropout() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();
    let step = Duration::from_millis(50);

    assert_eq!(tracker.update(&[rect(100, 100)], t0), Some(vec![rect(100, 100)]));

    // First miss: still confirmed, nothing new to report.
    assert_eq!(tracker.update(&[], t0 + step), None);
    assert_eq!(tracker.confirmed(), vec![rect(100, 100)]);

    // Second consecutive miss crosses the threshold.
    assert_eq!(tracker.update(&[], t0 + 2 * step), Some(vec![]));
    assert!(tracker.confirmed().is_empty());
}

#[test]
fn reappearance_resets_the_miss_count() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();
    let t = |ms: u64| t0 + Duration::from_millis(ms);

    assert!(tracker.update(&[rect(100, 100)], t(0)).is_some());
    assert_eq!(tracker.update(&[], t(50)), None);
    // Seen again: the region stays and the miss count starts over.
    assert_eq!(tracker.update(&[rect(100, 100)], t(100)), None);
    assert_eq!(tracker.update(&[], t(150)), None);
    assert_eq!(tracker.update(&[], t(200)), Some(vec![]));
}

#[test]
fn disappear_delay_keeps_region_despite_miss_count() {
    let mut tracker = StabilityTracker::new(params(1, 2, 10_000));
    let t0 = Instant::now();
    let t = |ms: u64| t0 + Duration::from_millis(ms);

    assert!(tracker.update(&[rect(100, 100)], t(0)).is_some());

    // Miss count crosses its threshold well before the delay elapses.
    assert_eq!(tracker.update(&[], t(50)), None);
    assert_eq!(tracker.update(&[], t(100)), None);
    assert_eq!(tracker.update(&[], t(150)), None);
    assert_eq!(tracker.confirmed(), vec![rect(100, 100)]);

    // Once the delay since the last sighting has elapsed, removal goes
    // through.
    assert_eq!(tracker.update(&[], t(11_000)), Some(vec![]));
}

#[test]
fn jitter_within_a_grid_cell_is_one_region() {
    let mut tracker = StabilityTracker::new(params(2, 2, 0));
    let t0 = Instant::now();

    // Both rects quantize to the same cell, so the second sighting
    // completes the appear threshold instead of starting a new region.
    assert_eq!(tracker.update(&[rect(100, 100)], t0), None);
    let emitted = tracker.update(&[rect(117, 103)], t0 + Duration::from_millis(50));
    assert_eq!(emitted, Some(vec![rect(117, 103)]));
}

#[test]
fn unchanged_set_is_not_re_emitted() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();
    let t = |ms: u64| t0 + Duration::from_millis(ms);

    assert!(tracker.update(&[rect(100, 100)], t(0)).is_some());
    for i in 1..5u64 {
        assert_eq!(tracker.update(&[rect(100, 100)], t(i * 50)), None);
    }
}

#[test]
fn emitted_sets_are_sorted_regardless_of_input_order() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();

    let first = rect(40, 10);
    let second = rect(300, 10);
    let emitted = tracker.update(&[second, first], t0);
    assert_eq!(emitted, Some(vec![first, second]));
}

#[test]
fn clear_resets_emission_baseline() {
    let mut tracker = StabilityTracker::new(params(1, 2, 0));
    let t0 = Instant::now();

    assert!(tracker.update(&[rect(100, 100)], t0).is_some());
    tracker.clear();
    assert!(tracker.confirmed().is_empty());

    // After a reset the same set counts as a change again.
    let emitted = tracker.update(&[rect(100, 100)], t0 + Duration::from_millis(50));
    assert_eq!(emitted, Some(vec![rect(100, 100)]));
}

#[test]
fn regions_in_different_cells_track_independently() {
    let mut tracker = StabilityTracker::new(params(1, 3, 0));
    let t0 = Instant::now();
    let t = |ms: u64| t0 + Duration::from_millis(ms);

    let stable = rect(10, 10);
    let flicker = rect(200, 200);
    assert_eq!(
        tracker.update(&[stable, flicker], t(0)),
        Some(vec![stable, flicker])
    );

    // The flickering region misses three frames and drops out; the stable
    // one is unaffected.
    assert_eq!(tracker.update(&[stable], t(50)), None);
    assert_eq!(tracker.update(&[stable], t(100)), None);
    assert_eq!(tracker.update(&[stable], t(150)), Some(vec![stable]));
}
