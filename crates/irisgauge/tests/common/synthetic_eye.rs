use image::{GrayImage, Luma};

/// Renders a concentric eye: pupil disk inside an iris disk on a flat surround.
///
/// A pixel at distance `d` from `center` is `pupil` for `d <= pupil_r`,
/// `iris` for `d <= iris_r` and `background` otherwise.
#[allow(clippy::too_many_arguments)]
pub fn eye_image(
    width: u32,
    height: u32,
    center: [f32; 2],
    iris_r: f32,
    pupil_r: f32,
    background: u8,
    iris: u8,
    pupil: u8,
) -> GrayImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(pupil_r <= iris_r, "pupil must fit inside the iris");

    GrayImage::from_fn(width, height, |x, y| {
        let dx = x as f32 - center[0];
        let dy = y as f32 - center[1];
        let d = (dx * dx + dy * dy).sqrt();
        Luma([if d <= pupil_r {
            pupil
        } else if d <= iris_r {
            iris
        } else {
            background
        }])
    })
}

/// 64×64, background 220, iris r=20 (150), pupil r=8 (50), centred at (32, 32).
pub fn scenario_a() -> GrayImage {
    eye_image(64, 64, [32.0, 32.0], 20.0, 8.0, 220, 150, 50)
}

/// Scenario A with a saturated 4×4 highlight inside the pupil.
pub fn scenario_b() -> GrayImage {
    let mut img = scenario_a();
    for y in 31..35 {
        for x in 31..35 {
            img.put_pixel(x, y, Luma([255]));
        }
    }
    img
}
