//! Fixed-size worker pool for per-template matching.
//!
//! One dispatch fans the current frame out across all prepared templates,
//! one worker task per template, and blocks until every worker has
//! finished. Results come back in template order regardless of which
//! thread ran which template.

use rayon::prelude::*;

use crate::frame::Frame;
use crate::trace::trace_span;
use crate::util::{SpotmarkError, SpotmarkResult};

mod worker;

pub use worker::{match_worker, PreparedTemplate, TemplateDetections};

/// Owns the scan threads used for template matching.
pub struct MatchWorkerPool {
    pool: rayon::ThreadPool,
    workers: usize,
}

impl MatchWorkerPool {
    /// Creates a pool sized to the machine: one thread fewer than the
    /// available parallelism, and at least one.
    pub fn new() -> SpotmarkResult<Self> {
        let available = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1);
        Self::with_workers(available.saturating_sub(1))
    }

    /// Creates a pool with an explicit thread count, clamped to at least one.
    pub fn with_workers(workers: usize) -> SpotmarkResult<Self> {
        let workers = workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|idx| format!("spotmark-worker-{idx}"))
            .build()
            .map_err(|err| SpotmarkError::PoolInit {
                reason: err.to_string(),
            })?;
        Ok(Self { pool, workers })
    }

    /// Returns the number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Scans one frame against every prepared template.
    ///
    /// Blocks until all workers finish. The returned vector has one entry
    /// per template in the same order as `templates`.
    pub fn dispatch(
        &self,
        frame: &Frame,
        templates: &[PreparedTemplate],
        min_score: f32,
    ) -> Vec<TemplateDetections> {
        let _span = trace_span!("dispatch", templates = templates.len()).entered();
        let view = frame.view();
        self.pool.install(|| {
            templates
                .par_iter()
                .map(|tpl| match_worker(view, tpl, min_score))
                .collect()
        })
    }
}
