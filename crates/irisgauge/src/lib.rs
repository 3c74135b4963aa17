//! irisgauge: pupil and iris geometry from near-infrared eye images.
//!
//! Produces the pupil-to-iris radius ratio (PIR), a proxy for pupillary
//! dilation. The pipeline stages are:
//!
//! 1. **Validate**: reject empty images.
//! 2. **Reflection removal**: find saturated highlights inside the pupil,
//!    dilate them with an elliptical kernel and inpaint them from pupil
//!    intensity.
//! 3. **Segmentation**: two ordered intensity thresholds give a soft
//!    background / iris / pupil map (behind the [`Segmenter`] trait).
//! 4. **Geometry**: largest external contour of each mask, then its minimum
//!    enclosing circle.
//! 5. **Ratio**: `pupil_radius / iris_radius`, zero for a degenerate iris.
//!
//! # Public API
//! - [`Pipeline`] as the entry point, configured by [`PipelineConfig`]
//! - [`PirReport`] / [`ErrorReport`] / [`AnalysisOutcome`] as result records
//! - [`PipelineTrace`] for per-call diagnostics
//! - [`decode`] and [`overlay`] at the edges

mod api;
mod config;
pub mod debug_dump;
pub mod decode;
mod error;
pub mod geometry;
pub mod mask;
pub mod overlay;
mod pipeline;
pub mod ratio;
pub mod reflection;
pub mod segmentation;

#[cfg(test)]
pub(crate) mod test_utils;

pub use api::Pipeline;
pub use config::{ConfigError, PipelineConfig};
pub use debug_dump::{TraceSummary, TRACE_SCHEMA_V1};
pub use error::{InputError, PipelineError, SegmentationError};
pub use geometry::{Circle, Contour, EyeStructure, GeometryError, GeometryResult, IrisBbox};
pub use mask::Mask;
pub use pipeline::{
    AnalysisOutcome, ErrorReport, EyeSide, PipelineTrace, PirReport, Stage, StageRecord,
    StageStatus,
};
pub use reflection::{InpaintMethod, ReflectionConfig, ReflectionOutcome};
pub use segmentation::{
    EyeClass, SegmentationConfig, SegmentationMap, Segmenter, ThresholdSegmenter,
};
