//! Per-call diagnostic trace.
//!
//! A [`PipelineTrace`] is built by one call and handed back to the caller.
//! Every field except the stage log is optional; a failing call stops early.

use serde::{Deserialize, Serialize};

use super::EyeSide;
use crate::geometry::GeometryResult;
use crate::mask::Mask;
use crate::reflection::ReflectionOutcome;
use crate::segmentation::SegmentationMap;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ValidateInput,
    ReflectionRemoval,
    Segmentation,
    Geometry,
    Ratio,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Self::ValidateInput => "validate_input",
            Self::ReflectionRemoval => "reflection_removal",
            Self::Segmentation => "segmentation",
            Self::Geometry => "geometry",
            Self::Ratio => "ratio",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Ok,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
}

/// Intermediate artifacts of one [`Pipeline`](crate::Pipeline) call.
#[derive(Debug, Clone)]
pub struct PipelineTrace {
    pub eye_side: EyeSide,
    /// Input size `[width, height]`.
    pub image_size: [u32; 2],
    /// Reflection removal result; `None` when the stage was skipped or not reached.
    pub reflection: Option<ReflectionOutcome>,
    /// Segmentation of the (cleaned) image.
    pub segmentation: Option<SegmentationMap>,
    pub geometry: Option<GeometryResult>,
    /// Stage log in execution order.
    pub stages: Vec<StageRecord>,
}

impl PipelineTrace {
    pub(crate) fn new(eye_side: EyeSide, image_size: [u32; 2]) -> Self {
        Self {
            eye_side,
            image_size,
            reflection: None,
            segmentation: None,
            geometry: None,
            stages: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, stage: Stage, status: StageStatus) {
        self.stages.push(StageRecord { stage, status });
    }

    /// Status of `stage`, or `None` if it never ran.
    pub fn status(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.status)
    }

    /// Pupil mask used for geometry.
    pub fn pupil_mask(&self) -> Option<Mask> {
        self.segmentation.as_ref().map(|m| m.pupil_mask())
    }

    /// Iris mask used for geometry.
    pub fn iris_mask(&self) -> Option<Mask> {
        self.segmentation.as_ref().map(|m| m.iris_mask())
    }

    /// Image fed to segmentation: cleaned if reflection removal ran.
    pub fn cleaned_image(&self) -> Option<&image::GrayImage> {
        self.reflection.as_ref().map(|r| &r.image)
    }
}
