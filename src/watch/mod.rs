//! Detection loop and its host-facing seams.
//!
//! The loop owns the whole per-cycle pipeline: capture a frame, fan it out
//! across the worker pool, suppress overlapping hits, stabilize the result,
//! and push overlay updates to the host. The host supplies the capture,
//! overlay, and error surfaces through small traits so the library never
//! touches a real screen or window system.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::candidate::{nms, RawDetection};
use crate::config::DetectorConfig;
use crate::frame::Frame;
use crate::pool::{MatchWorkerPool, PreparedTemplate};
use crate::template::Template;
use crate::track::{Rect, StabilityTracker};
use crate::trace::{trace_event, trace_span};
use crate::util::{SpotmarkError, SpotmarkResult};

/// Boxed error type used at the host boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Produces frames for the detection loop.
pub trait FrameSource {
    /// Captures the next frame.
    ///
    /// `Ok(None)` means the source has no more frames and ends the session
    /// cleanly; live capture sources never return it. An error is fatal
    /// for the session. There is no per-cycle timeout, so a capture that
    /// never returns stalls the loop.
    fn capture(&mut self) -> Result<Option<Frame>, BoxError>;
}

/// Receives confirmed overlay rectangles.
///
/// `update_rects` is only called when the confirmed set changes, and always
/// receives the full set, so the sink can replace its state wholesale.
pub trait OverlaySink {
    /// Replaces the displayed rectangles with the given set.
    fn update_rects(&mut self, rects: &[Rect]);

    /// Removes all displayed rectangles. Called once when the loop halts.
    fn clear(&mut self) {
        self.update_rects(&[]);
    }
}

/// Receives human-readable reports of fatal session errors.
pub trait ErrorSink {
    /// Reports one error message.
    fn report(&mut self, message: &str);
}

/// Capability of an overlay surface to pass pointer input through.
///
/// An overlay drawn above the captured region must not swallow clicks
/// meant for the content underneath it. Hosts whose window supports
/// click-through implement this and call it before starting the loop; the
/// loop itself never requires it.
pub trait InputTransparent {
    /// Makes the overlay surface transparent to pointer input.
    fn set_input_transparent(&mut self) -> Result<(), BoxError>;
}

/// Cloneable handle that requests a cooperative stop.
///
/// The request is observed at the next cycle boundary; a cycle that is
/// already in flight runs to completion.
#[derive(Clone, Debug, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Creates a handle with no stop requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the loop stop after the current cycle.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Returns whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    fn rearm(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }
}

/// Centers an overlay box of the given size on a detection.
///
/// The offset floors toward negative infinity, so for odd size differences
/// the box sits one pixel up and left of true center and the result is
/// stable for boxes both larger and smaller than the detection.
pub fn overlay_rect(det: &RawDetection, overlay_width: u32, overlay_height: u32) -> Rect {
    let dx = (i64::from(overlay_width) - det.width as i64).div_euclid(2);
    let dy = (i64::from(overlay_height) - det.height as i64).div_euclid(2);
    Rect {
        x: (det.x as i64 - dx) as i32,
        y: (det.y as i64 - dy) as i32,
        width: overlay_width,
        height: overlay_height,
    }
}

/// Drives capture, matching, suppression, and stabilization as one session.
pub struct DetectionLoop<S, O, E> {
    config: DetectorConfig,
    templates: Vec<PreparedTemplate>,
    pool: MatchWorkerPool,
    tracker: StabilityTracker,
    stop: StopHandle,
    source: S,
    overlay: O,
    errors: E,
}

impl<S, O, E> DetectionLoop<S, O, E>
where
    S: FrameSource,
    O: OverlaySink,
    E: ErrorSink,
{
    /// Builds a session around the given surfaces.
    ///
    /// Validates the configuration, sizes a worker pool to the machine,
    /// and prepares every template once. Pool construction failures are
    /// reported through the error sink before being returned.
    pub fn new(
        config: DetectorConfig,
        templates: &[Template],
        source: S,
        overlay: O,
        mut errors: E,
    ) -> SpotmarkResult<Self> {
        config.validate()?;
        let pool = match MatchWorkerPool::new() {
            Ok(pool) => pool,
            Err(err) => {
                errors.report(&err.to_string());
                return Err(err);
            }
        };
        let prepared = templates.iter().map(PreparedTemplate::prepare).collect();
        Ok(Self {
            config,
            templates: prepared,
            pool,
            tracker: StabilityTracker::new(config.tracker_params()),
            stop: StopHandle::new(),
            source,
            overlay,
            errors,
        })
    }

    /// Returns a handle that can stop the loop from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Returns the number of threads in the worker pool.
    pub fn workers(&self) -> usize {
        self.pool.workers()
    }

    /// Runs detection cycles until stopped, the source runs dry, or a
    /// fatal error occurs.
    ///
    /// The stop flag is re-armed on entry and tracker state is reset, so a
    /// session can be run again after a stop. Fatal errors are reported
    /// through the error sink and also returned. The overlay is cleared on
    /// every exit path.
    pub fn run(&mut self) -> SpotmarkResult<()> {
        let _span = trace_span!("detection_session", templates = self.templates.len()).entered();
        self.stop.rearm();
        self.tracker.clear();

        if self.templates.is_empty() {
            let err = SpotmarkError::NoTemplates;
            self.errors.report(&err.to_string());
            self.overlay.clear();
            return Err(err);
        }

        let min_score = self.config.min_score();
        let result = loop {
            if self.stop.is_stopped() {
                break Ok(());
            }
            let _cycle = trace_span!("cycle").entered();

            let frame = match self.source.capture() {
                Ok(Some(frame)) => frame,
                Ok(None) => break Ok(()),
                Err(err) => {
                    let err = SpotmarkError::Capture {
                        reason: err.to_string(),
                    };
                    self.errors.report(&err.to_string());
                    break Err(err);
                }
            };

            let results = self.pool.dispatch(&frame, &self.templates, min_score);
            let candidates: usize = results.iter().map(|batch| batch.detections.len()).sum();
            trace_event!("cycle_candidates", candidates = candidates);

            let mut rects: Vec<Rect> = Vec::new();
            for batch in &results {
                let kept = match nms::suppress(
                    &batch.detections,
                    self.config.iou_threshold,
                    min_score,
                ) {
                    Ok(kept) => kept,
                    Err(_) => {
                        trace_event!("suppression_fallback", template_id = batch.template_id);
                        batch.detections.clone()
                    }
                };
                for det in &kept {
                    rects.push(overlay_rect(
                        det,
                        self.config.overlay_width,
                        self.config.overlay_height,
                    ));
                }
            }

            if let Some(confirmed) = self.tracker.update(&rects, frame.captured_at()) {
                self.overlay.update_rects(&confirmed);
            }

            if let Some(interval) = self.config.cycle_interval {
                thread::sleep(interval);
            }
        };

        self.overlay.clear();
        result
    }
}
