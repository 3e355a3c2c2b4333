//! Spotmark watches a screen region for template patterns and maintains a
//! stable set of overlay boxes over the confirmed matches.
//!
//! Each cycle captures one grayscale frame, scans it against every template
//! in parallel with normalized cross-correlation, prunes overlapping hits,
//! and debounces the result across frames so overlay boxes neither flicker
//! in nor linger after their pattern vanishes. Screen capture and overlay
//! drawing stay behind traits; the `image-io` feature adds file loading and
//! the `tracing` feature adds span and event instrumentation.

pub mod candidate;
pub mod config;
pub mod frame;
pub mod image;
pub mod kernel;
pub mod pool;
pub mod template;
pub mod track;
mod trace;
pub mod util;
pub mod watch;

pub use candidate::nms;
pub use candidate::{Peak, RawDetection};
pub use config::DetectorConfig;
pub use frame::Frame;
#[cfg(feature = "image-io")]
pub use image::io;
pub use image::{ImageView, OwnedImage};
pub use kernel::{scan_zncc_full, ScanParams, MIN_WINDOW_VARIANCE};
pub use pool::{match_worker, MatchWorkerPool, PreparedTemplate, TemplateDetections};
pub use template::{Template, TemplatePlan};
pub use track::{GridKey, Rect, StabilityTracker, TrackedRegion, TrackerParams};
pub use util::{SpotmarkError, SpotmarkResult};
pub use watch::{
    overlay_rect, BoxError, DetectionLoop, ErrorSink, FrameSource, InputTransparent, OverlaySink,
    StopHandle,
};
