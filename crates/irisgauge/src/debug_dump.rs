//! Versioned trace summary for offline inspection.
//!
//! The full [`PipelineTrace`] holds images and per-pixel maps; this schema
//! keeps only the scalar facts and fitted shapes, so it stays small enough to
//! write next to every analyzed frame.

use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::geometry::{Circle, IrisBbox};
use crate::pipeline::{EyeSide, PipelineTrace, StageRecord};

pub const TRACE_SCHEMA_V1: &str = "irisgauge.trace.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSummary {
    pub schema_version: String,
    pub image: ImageSummary,
    pub eye_side: EyeSide,
    pub config: PipelineConfig,
    pub stages: Vec<StageRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<ReflectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masks: Option<MaskSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometrySummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionSummary {
    pub bright_pixels: usize,
    pub inpainted_pixels: usize,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskSummary {
    pub pupil_area: usize,
    pub iris_area: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometrySummary {
    pub pupil_contour_points: usize,
    pub iris_contour_points: usize,
    pub pupil_circle: Circle,
    pub iris_circle: Circle,
    pub iris_bbox: IrisBbox,
}

impl TraceSummary {
    pub fn from_trace(trace: &PipelineTrace, config: &PipelineConfig, path: Option<String>) -> Self {
        Self {
            schema_version: TRACE_SCHEMA_V1.to_string(),
            image: ImageSummary {
                path,
                width: trace.image_size[0],
                height: trace.image_size[1],
            },
            eye_side: trace.eye_side,
            config: config.clone(),
            stages: trace.stages.clone(),
            reflection: trace.reflection.as_ref().map(|r| ReflectionSummary {
                bright_pixels: r.bright_pixels,
                inpainted_pixels: r.inpainted_pixels(),
                used_fallback: r.used_fallback,
            }),
            masks: trace.segmentation.as_ref().map(|m| MaskSummary {
                pupil_area: m.pupil_mask().count(),
                iris_area: m.iris_mask().count(),
            }),
            geometry: trace.geometry.as_ref().map(|g| GeometrySummary {
                pupil_contour_points: g.pupil_contour.len(),
                iris_contour_points: g.iris_contour.len(),
                pupil_circle: g.pupil_circle,
                iris_circle: g.iris_circle,
                iris_bbox: g.iris_bbox,
            }),
        }
    }
}
