//! Annotated RGB rendering of a geometry result.
//!
//! Rendering only; nothing here feeds back into measurements.

use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::geometry::{Circle, Contour, GeometryResult};
use crate::pipeline::EyeSide;

/// Overlay colours.
pub mod colors {
    use image::Rgb;

    pub const IRIS_CONTOUR: Rgb<u8> = Rgb([50, 100, 255]);
    pub const PUPIL_CONTOUR: Rgb<u8> = Rgb([0, 255, 0]);
    pub const PUPIL_CIRCLE: Rgb<u8> = Rgb([255, 50, 50]);
    pub const IRIS_CIRCLE: Rgb<u8> = Rgb([255, 255, 0]);
    pub const BBOX: Rgb<u8> = Rgb([0, 255, 255]);
    pub const SIDE_TAG: Rgb<u8> = Rgb([255, 0, 255]);
}

const CENTER_DOT_RADIUS: i32 = 2;
const SIDE_TAG_SIZE: u32 = 6;

/// Draw contours, fitted circles, centres and the iris box over `image`.
///
/// The eye side is marked by a small square in the matching top corner.
/// Output has the same size as the input.
pub fn render_overlay(image: &GrayImage, geometry: &GeometryResult, eye_side: EyeSide) -> RgbImage {
    let mut canvas = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let v = image.get_pixel(x, y)[0];
        Rgb([v, v, v])
    });

    draw_contour(&mut canvas, &geometry.iris_contour, colors::IRIS_CONTOUR);
    draw_contour(&mut canvas, &geometry.pupil_contour, colors::PUPIL_CONTOUR);
    draw_circle(&mut canvas, &geometry.iris_circle, colors::IRIS_CIRCLE);
    draw_circle(&mut canvas, &geometry.pupil_circle, colors::PUPIL_CIRCLE);

    let bbox = &geometry.iris_bbox;
    let (w, h) = (bbox.width().round() as u32, bbox.height().round() as u32);
    if w > 0 && h > 0 {
        let rect = Rect::at(bbox.x_min.round() as i32, bbox.y_min.round() as i32).of_size(w, h);
        draw_hollow_rect_mut(&mut canvas, rect, colors::BBOX);
    }

    draw_side_tag(&mut canvas, eye_side);
    canvas
}

fn draw_contour(canvas: &mut RgbImage, contour: &Contour, color: Rgb<u8>) {
    let (w, h) = canvas.dimensions();
    for &[x, y] in &contour.points {
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}

fn draw_circle(canvas: &mut RgbImage, circle: &Circle, color: Rgb<u8>) {
    let center = (
        circle.center[0].round() as i32,
        circle.center[1].round() as i32,
    );
    draw_hollow_circle_mut(canvas, center, circle.radius.round() as i32, color);
    draw_filled_circle_mut(canvas, center, CENTER_DOT_RADIUS, color);
}

fn draw_side_tag(canvas: &mut RgbImage, eye_side: EyeSide) {
    let (w, h) = canvas.dimensions();
    let size = SIDE_TAG_SIZE.min(w).min(h);
    if size == 0 {
        return;
    }
    let x0 = match eye_side {
        EyeSide::Left => 0,
        EyeSide::Right => w - size,
    };
    for y in 0..size {
        for x in x0..x0 + size {
            canvas.put_pixel(x, y, colors::SIDE_TAG);
        }
    }
}
