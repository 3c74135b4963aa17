//! Stage wiring: validate -> reflection removal -> segmentation -> geometry -> ratio.

use image::GrayImage;

use super::{EyeSide, PipelineTrace, PirReport, Stage, StageStatus};
use crate::config::PipelineConfig;
use crate::error::{InputError, PipelineError, SegmentationError};
use crate::geometry::estimate_geometry;
use crate::ratio::RatioInputs;
use crate::reflection::remove_reflections;
use crate::segmentation::{SegmentationMap, Segmenter};

pub(crate) fn run(
    image: &GrayImage,
    config: &PipelineConfig,
    segmenter: &dyn Segmenter,
    eye_side: EyeSide,
) -> (Result<PirReport, PipelineError>, PipelineTrace) {
    let (w, h) = image.dimensions();
    let mut trace = PipelineTrace::new(eye_side, [w, h]);
    let result = run_stages(image, config, segmenter, &mut trace);
    (result, trace)
}

fn validate_input(image: &GrayImage) -> Result<(), InputError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(InputError::EmptyImage { width, height });
    }
    Ok(())
}

fn segment_checked(
    segmenter: &dyn Segmenter,
    image: &GrayImage,
) -> Result<SegmentationMap, SegmentationError> {
    let map = segmenter.segment(image);
    let expected = [image.width(), image.height()];
    let actual = [map.width(), map.height()];
    if actual != expected {
        return Err(SegmentationError::SizeMismatch { expected, actual });
    }
    Ok(map)
}

fn run_stages(
    image: &GrayImage,
    config: &PipelineConfig,
    segmenter: &dyn Segmenter,
    trace: &mut PipelineTrace,
) -> Result<PirReport, PipelineError> {
    if let Err(e) = validate_input(image) {
        tracing::warn!("{}", e);
        trace.record(Stage::ValidateInput, StageStatus::Failed);
        return Err(e.into());
    }
    trace.record(Stage::ValidateInput, StageStatus::Ok);

    // Highlights are holes in the raw pupil mask.
    let cleaned;
    let working: &GrayImage = if config.reflection.enable {
        let pupil_region = match segment_checked(segmenter, image) {
            Ok(map) => map.pupil_mask().fill_holes(),
            Err(e) => {
                tracing::warn!("{}", e);
                trace.record(Stage::ReflectionRemoval, StageStatus::Failed);
                return Err(e.into());
            }
        };
        let outcome = remove_reflections(image, &pupil_region, &config.reflection);
        tracing::debug!(
            "pupil region {} px, {} px inpainted",
            pupil_region.count(),
            outcome.inpainted_pixels()
        );
        cleaned = outcome.image.clone();
        trace.reflection = Some(outcome);
        trace.record(Stage::ReflectionRemoval, StageStatus::Ok);
        &cleaned
    } else {
        trace.record(Stage::ReflectionRemoval, StageStatus::Skipped);
        image
    };

    let map = match segment_checked(segmenter, working) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("{}", e);
            trace.record(Stage::Segmentation, StageStatus::Failed);
            return Err(e.into());
        }
    };
    let pupil_mask = map.pupil_mask();
    let iris_mask = map.iris_mask();
    tracing::debug!(
        "segmentation: pupil {} px, iris {} px",
        pupil_mask.count(),
        iris_mask.count()
    );
    trace.segmentation = Some(map);
    trace.record(Stage::Segmentation, StageStatus::Ok);

    let geometry = match estimate_geometry(&pupil_mask, &iris_mask) {
        Ok(g) => g,
        Err(e) => {
            tracing::warn!("{} ({} eye)", e, trace.eye_side);
            trace.record(Stage::Geometry, StageStatus::Failed);
            return Err(e.into());
        }
    };
    trace.record(Stage::Geometry, StageStatus::Ok);

    let inputs = RatioInputs::from_geometry(&geometry);
    let report = PirReport::new(&geometry, &inputs);
    trace.geometry = Some(geometry);
    trace.record(Stage::Ratio, StageStatus::Ok);

    tracing::info!(
        "{} eye: pupil r={:.2} at ({:.2},{:.2}), iris r={:.2} at ({:.2},{:.2}), pir={:.4}",
        trace.eye_side,
        report.pupil_radius,
        report.pupil_center[0],
        report.pupil_center[1],
        report.iris_radius,
        report.iris_center[0],
        report.iris_center[1],
        report.pir
    );
    Ok(report)
}
