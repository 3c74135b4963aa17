mod common;

use approx::assert_abs_diff_eq;
use common::synthetic_eye::{eye_image, scenario_a, scenario_b};
use image::{GrayImage, Luma};
use irisgauge::{
    AnalysisOutcome, EyeSide, GeometryError, InpaintMethod, Pipeline, PipelineConfig,
    PipelineError, Stage, StageStatus,
};

/// Lattice points with `x² + y² <= 64`: the pupil disk of scenario A.
const PUPIL_DISK_PIXELS: usize = 197;

fn pipeline_without_reflection_removal() -> Pipeline {
    let mut config = PipelineConfig::default();
    config.reflection.enable = false;
    Pipeline::with_config(config).expect("valid config")
}

#[test]
fn scenario_a_reference_eye() {
    let report = Pipeline::new()
        .analyze(&scenario_a(), EyeSide::Left)
        .expect("geometry found");

    assert_abs_diff_eq!(report.pupil_center[0], 32.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.pupil_center[1], 32.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.iris_center[0], 32.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.iris_center[1], 32.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.pupil_radius, 8.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.iris_radius, 20.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.pir, 0.4, epsilon = 0.1);
    assert_abs_diff_eq!(
        report.iris_bbox.x_max - report.iris_bbox.x_min,
        2.0 * report.iris_radius,
        epsilon = 1e-9
    );
}

#[test]
fn scenario_b_highlight_perforates_pupil_without_removal() {
    let (result, trace) =
        pipeline_without_reflection_removal().analyze_with_trace(&scenario_b(), EyeSide::Left);
    let report = result.expect("geometry found");

    let pupil_area = trace.pupil_mask().expect("segmentation ran").count();
    assert_eq!(pupil_area, PUPIL_DISK_PIXELS - 16);
    assert!(trace.reflection.is_none());
    // The highlight is an interior hole; the external contour is unaffected.
    assert_abs_diff_eq!(report.pupil_radius, 8.0, epsilon = 1.0);
}

#[test]
fn scenario_b_removal_restores_reference_geometry() {
    let reference = Pipeline::new()
        .analyze(&scenario_a(), EyeSide::Left)
        .expect("geometry found");

    for method in [InpaintMethod::Telea, InpaintMethod::Diffusion] {
        let mut config = PipelineConfig::default();
        config.reflection.inpaint_method = method;
        let pipeline = Pipeline::with_config(config).expect("valid config");

        let (result, trace) = pipeline.analyze_with_trace(&scenario_b(), EyeSide::Left);
        let report = result.expect("geometry found");

        let reflection = trace.reflection.as_ref().expect("reflection stage ran");
        assert_eq!(reflection.bright_pixels, 16, "{method:?}");
        assert!(!reflection.used_fallback);
        assert_eq!(
            trace.pupil_mask().expect("segmentation ran").count(),
            PUPIL_DISK_PIXELS,
            "{method:?}"
        );
        assert_eq!(trace.cleaned_image(), Some(&scenario_a()));

        assert_abs_diff_eq!(report.pupil_radius, reference.pupil_radius, epsilon = 1.0);
        assert_abs_diff_eq!(report.iris_radius, reference.iris_radius, epsilon = 1.0);
        assert_abs_diff_eq!(report.pir, reference.pir, epsilon = 0.1);
    }
}

#[test]
fn bright_image_fails_on_both_structures() {
    let img = GrayImage::from_pixel(48, 48, Luma([230]));
    let (result, trace) = Pipeline::new().analyze_with_trace(&img, EyeSide::Right);

    assert_eq!(
        result.clone().unwrap_err(),
        PipelineError::Geometry(GeometryError::Both)
    );
    assert_eq!(trace.status(Stage::Geometry), Some(StageStatus::Failed));
    assert_eq!(trace.status(Stage::Ratio), None);
    assert!(trace.geometry.is_none());

    let outcome = AnalysisOutcome::from(result);
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({ "error": "geometry estimation failed (pupil, iris)" })
    );
}

#[test]
fn iris_without_pupil_names_pupil() {
    let img = eye_image(64, 64, [32.0, 32.0], 20.0, 0.0, 220, 150, 150);
    let err = Pipeline::new().analyze(&img, EyeSide::Left).unwrap_err();
    assert_eq!(err, PipelineError::Geometry(GeometryError::Pupil));
}

#[test]
fn uniform_dark_image_gives_unit_ratio() {
    let img = GrayImage::from_pixel(64, 64, Luma([30]));
    let report = Pipeline::new()
        .analyze(&img, EyeSide::Left)
        .expect("full-frame masks");
    assert_abs_diff_eq!(report.pir, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.pupil_center[0], 31.5, epsilon = 1e-9);
}

#[test]
fn empty_image_is_invalid_input() {
    let img = GrayImage::new(0, 10);
    let (result, trace) = Pipeline::new().analyze_with_trace(&img, EyeSide::Left);

    let err = result.unwrap_err();
    assert!(matches!(err, PipelineError::InvalidInput(_)));
    assert!(err.to_string().starts_with("invalid input image"));
    assert_eq!(trace.stages.len(), 1);
    assert_eq!(trace.status(Stage::ValidateInput), Some(StageStatus::Failed));
}

#[test]
fn off_centre_eye_on_larger_frame() {
    let img = eye_image(160, 120, [70.0, 52.0], 34.0, 12.0, 210, 140, 40);
    let report = Pipeline::new()
        .analyze(&img, EyeSide::Right)
        .expect("geometry found");
    assert_abs_diff_eq!(report.pupil_center[0], 70.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.iris_center[1], 52.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.pupil_radius, 12.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.iris_radius, 34.0, epsilon = 1.0);
    assert_abs_diff_eq!(report.pir, 12.0 / 34.0, epsilon = 0.05);
}

#[test]
fn shared_pipeline_across_threads() {
    let pipeline = &Pipeline::new();
    let a = scenario_a();
    let b = scenario_b();
    let pirs: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = [&a, &b, &a, &b]
            .into_iter()
            .map(|img| s.spawn(move || pipeline.analyze(img, EyeSide::Left).map(|r| r.pir)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("no panic").expect("geometry found"))
            .collect()
    });
    for pir in &pirs {
        assert_abs_diff_eq!(*pir, pirs[0], epsilon = 1e-12);
    }
}
