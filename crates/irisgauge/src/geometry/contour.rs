//! External contour extraction over binary masks.

use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use serde::{Deserialize, Serialize};

use crate::mask::Mask;

/// Closed boundary of one 8-connected foreground region, as integer pixel
/// coordinates `[x, y]` in tracing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<[i32; 2]>,
}

impl Contour {
    pub fn new(points: Vec<[i32; 2]>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Enclosed polygon area (shoelace formula), always `>= 0`.
    ///
    /// Single-pixel and straight-line contours have zero area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let [x0, y0] = self.points[i];
                let [x1, y1] = self.points[(i + 1) % n];
                x0 as i64 * y1 as i64 - x1 as i64 * y0 as i64
            })
            .sum();
        twice.abs() as f64 * 0.5
    }

    /// Points as floating-point coordinates.
    pub fn to_f64(&self) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|&[x, y]| [x as f64, y as f64])
            .collect()
    }
}

/// Outermost boundaries of every foreground region in `mask`.
///
/// Hole borders and regions nested inside holes are skipped. Regions touching
/// the image border are traced along the border pixels.
pub fn external_contours(mask: &Mask) -> Vec<Contour> {
    // The tracer needs a background frame around every region.
    let padded = with_background_border(mask.as_image());
    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| Contour::new(c.points.iter().map(|p| [p.x - 1, p.y - 1]).collect()))
        .collect()
}

fn with_background_border(image: &GrayImage) -> GrayImage {
    let (w, h) = image.dimensions();
    let mut padded = GrayImage::new(w + 2, h + 2);
    image::imageops::replace(&mut padded, image, 1, 1);
    padded
}

/// Contour with the largest enclosed area; the first one wins ties.
pub fn largest_contour(contours: &[Contour]) -> Option<&Contour> {
    let mut best: Option<(&Contour, f64)> = None;
    for c in contours {
        let area = c.area();
        if best.map_or(true, |(_, a)| area > a) {
            best = Some((c, area));
        }
    }
    best.map(|(c, _)| c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(mask: &mut Mask, cx: i32, cy: i32, r: i32) {
        let (w, h) = mask.dimensions();
        for y in 0..h {
            for x in 0..w {
                let (dx, dy) = (x as i32 - cx, y as i32 - cy);
                if dx * dx + dy * dy <= r * r {
                    mask.set(x, y, true);
                }
            }
        }
    }

    #[test]
    fn shoelace_area_of_square() {
        let c = Contour::new(vec![[0, 0], [4, 0], [4, 3], [0, 3]]);
        assert_eq!(c.area(), 12.0);
        let reversed = Contour::new(vec![[0, 3], [4, 3], [4, 0], [0, 0]]);
        assert_eq!(reversed.area(), 12.0);
        assert_eq!(Contour::new(vec![[1, 1]]).area(), 0.0);
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(external_contours(&Mask::empty(16, 16)).is_empty());
    }

    #[test]
    fn ring_yields_single_external_contour() {
        let mut m = Mask::empty(40, 40);
        disk(&mut m, 20, 20, 12);
        for (x, y) in Mask::from_fn(40, 40, |x, y| {
            let (dx, dy) = (x as i32 - 20, y as i32 - 20);
            dx * dx + dy * dy <= 16
        })
        .foreground()
        {
            m.set(x, y, false);
        }
        // Island inside the hole is nested, so it is not external either.
        m.set(20, 20, true);

        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        let xs: Vec<i32> = contours[0].points.iter().map(|p| p[0]).collect();
        assert_eq!(*xs.iter().min().unwrap(), 8);
        assert_eq!(*xs.iter().max().unwrap(), 32);
    }

    #[test]
    fn full_frame_region_traces_image_border() {
        let m = Mask::from_fn(8, 8, |_, _| true);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert!(c.points.iter().all(|&[x, y]| (0..8).contains(&x) && (0..8).contains(&y)));
        assert!(c.points.contains(&[0, 0]) && c.points.contains(&[7, 7]));
        assert_eq!(c.area(), 49.0);
    }

    #[test]
    fn full_width_band_is_kept() {
        let m = Mask::from_fn(32, 32, |_, y| (10..20).contains(&y));
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 1);
        let xs: Vec<i32> = contours[0].points.iter().map(|p| p[0]).collect();
        let ys: Vec<i32> = contours[0].points.iter().map(|p| p[1]).collect();
        assert_eq!((*xs.iter().min().unwrap(), *xs.iter().max().unwrap()), (0, 31));
        assert_eq!((*ys.iter().min().unwrap(), *ys.iter().max().unwrap()), (10, 19));
    }

    #[test]
    fn regions_on_opposite_edges_are_separate() {
        let m = Mask::from_fn(32, 32, |_, y| y < 5 || y >= 16);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 2);
        let best = largest_contour(&contours).unwrap();
        assert!(best.points.iter().all(|p| p[1] >= 16));

        let left = Mask::from_fn(8, 8, |x, _| x < 4);
        assert_eq!(external_contours(&left).len(), 1);
    }

    #[test]
    fn largest_contour_picks_biggest_region() {
        let mut m = Mask::empty(64, 32);
        disk(&mut m, 10, 16, 4);
        disk(&mut m, 40, 16, 9);
        let contours = external_contours(&m);
        assert_eq!(contours.len(), 2);
        let best = largest_contour(&contours).unwrap();
        assert!(best.points.iter().all(|p| p[0] >= 31));
    }

    #[test]
    fn largest_contour_keeps_first_on_ties() {
        let a = Contour::new(vec![[0, 0], [2, 0], [2, 2], [0, 2]]);
        let b = Contour::new(vec![[5, 5], [7, 5], [7, 7], [5, 7]]);
        let contours = vec![a.clone(), b];
        assert_eq!(largest_contour(&contours), Some(&a));
        assert_eq!(largest_contour(&[]), None);
    }
}
