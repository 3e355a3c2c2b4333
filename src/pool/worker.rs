//! Per-template match worker.

use crate::candidate::RawDetection;
use crate::kernel::{scan_zncc_full, ScanParams};
use crate::template::{Template, TemplatePlan};
use crate::trace::trace_event;
use crate::ImageView;

/// A template compiled for repeated scanning.
///
/// Preparation happens once per session. Templates whose plan cannot be
/// built, for example flat images with zero variance, stay in the set but
/// carry no plan and never produce detections.
pub struct PreparedTemplate {
    id: usize,
    width: usize,
    height: usize,
    plan: Option<TemplatePlan>,
}

impl PreparedTemplate {
    /// Prepares a template for scanning. Never fails; a template that
    /// cannot be planned yields empty results instead.
    pub fn prepare(template: &Template) -> Self {
        let plan = match TemplatePlan::from_view(template.view()) {
            Ok(plan) => Some(plan),
            Err(_) => {
                trace_event!("template_plan_failed", template_id = template.id());
                None
            }
        };
        Self {
            id: template.id(),
            width: template.width(),
            height: template.height(),
            plan,
        }
    }

    /// Returns the identifier of the source template.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns whether a scan plan could be built for this template.
    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }
}

/// Detections produced by one worker for one template.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateDetections {
    /// Identifier of the template these detections belong to.
    pub template_id: usize,
    /// Template width in pixels.
    pub width: usize,
    /// Template height in pixels.
    pub height: usize,
    /// All windows at or above the score threshold, unsuppressed.
    pub detections: Vec<RawDetection>,
}

/// Scans one frame with one prepared template.
///
/// A worker never fails the cycle: templates without a plan and scans that
/// cannot run, such as a template larger than the frame, yield an empty
/// result for that template only.
pub fn match_worker(
    frame: ImageView<'_>,
    tpl: &PreparedTemplate,
    min_score: f32,
) -> TemplateDetections {
    let plan = match &tpl.plan {
        Some(plan) => plan,
        None => return empty_result(tpl),
    };

    let params = ScanParams::with_min_score(min_score.max(0.0));
    let peaks = match scan_zncc_full(frame, plan, params) {
        Ok(peaks) => peaks,
        Err(_) => {
            trace_event!("worker_scan_failed", template_id = tpl.id);
            return empty_result(tpl);
        }
    };

    let detections = peaks
        .into_iter()
        .map(|peak| RawDetection {
            template_id: tpl.id,
            x: peak.x,
            y: peak.y,
            width: tpl.width,
            height: tpl.height,
            score: peak.score,
        })
        .collect();

    TemplateDetections {
        template_id: tpl.id,
        width: tpl.width,
        height: tpl.height,
        detections,
    }
}

fn empty_result(tpl: &PreparedTemplate) -> TemplateDetections {
    TemplateDetections {
        template_id: tpl.id,
        width: tpl.width,
        height: tpl.height,
        detections: Vec::new(),
    }
}
