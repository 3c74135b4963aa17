//! Shared test utilities for image-based unit tests.

use image::{GrayImage, Luma};

/// Parameters of a synthetic concentric eye image.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EyeDrawing {
    pub width: u32,
    pub height: u32,
    pub center: [f32; 2],
    pub iris_radius: f32,
    pub pupil_radius: f32,
    pub background: u8,
    pub iris: u8,
    pub pupil: u8,
}

/// Render a synthetic eye: pupil disk inside an iris disk on a flat surround.
///
/// Pixels at distance `d` from `center` get:
/// - `pupil`       if `d <= pupil_radius`
/// - `iris`        if `pupil_radius < d <= iris_radius`
/// - `background`  otherwise
pub(crate) fn draw_eye_image(eye: &EyeDrawing) -> GrayImage {
    let mut img = GrayImage::new(eye.width, eye.height);
    for y in 0..eye.height {
        for x in 0..eye.width {
            let dx = x as f32 - eye.center[0];
            let dy = y as f32 - eye.center[1];
            let d = (dx * dx + dy * dy).sqrt();
            let pix = if d <= eye.pupil_radius {
                eye.pupil
            } else if d <= eye.iris_radius {
                eye.iris
            } else {
                eye.background
            };
            img.put_pixel(x, y, Luma([pix]));
        }
    }
    img
}

/// Paint a `size`×`size` square with top-left corner `(x0, y0)`.
pub(crate) fn fill_square(img: &mut GrayImage, x0: u32, y0: u32, size: u32, value: u8) {
    for y in y0..(y0 + size).min(img.height()) {
        for x in x0..(x0 + size).min(img.width()) {
            img.put_pixel(x, y, Luma([value]));
        }
    }
}

/// The reference 64×64 eye: iris r=20 and pupil r=8 centred at (32, 32).
pub(crate) fn reference_eye() -> EyeDrawing {
    EyeDrawing {
        width: 64,
        height: 64,
        center: [32.0, 32.0],
        iris_radius: 20.0,
        pupil_radius: 8.0,
        background: 220,
        iris: 150,
        pupil: 50,
    }
}
