//! Binary masks over the image grid.
//!
//! A [`Mask`] stores foreground as `255` and background as `0` in a
//! `GrayImage`, which is the layout `imageproc` expects for contour tracing
//! and morphology.

use std::collections::VecDeque;

use image::{GrayImage, Luma};

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// H×W binary mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    pixels: GrayImage,
}

impl Mask {
    /// All-background mask of the given size.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            pixels: GrayImage::new(width, height),
        }
    }

    /// Build a mask by evaluating `f(x, y)` at every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let pixels = GrayImage::from_fn(width, height, |x, y| {
            Luma([if f(x, y) { FOREGROUND } else { BACKGROUND }])
        });
        Self { pixels }
    }

    /// Interpret any non-zero pixel of `image` as foreground.
    pub fn from_gray(image: &GrayImage) -> Self {
        Self::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y)[0] != 0
        })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.pixels.get_pixel(x, y)[0] != 0
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        self.pixels
            .put_pixel(x, y, Luma([if value { FOREGROUND } else { BACKGROUND }]));
    }

    /// Number of foreground pixels.
    pub fn count(&self) -> usize {
        self.pixels.as_raw().iter().filter(|&&v| v != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.as_raw().iter().all(|&v| v == 0)
    }

    /// Pointwise AND. Both masks must share dimensions.
    pub fn intersect(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.zip_with(other, |a, b| a && b)
    }

    /// Pointwise OR. Both masks must share dimensions.
    pub fn union(&self, other: &Mask) -> Mask {
        debug_assert_eq!(self.dimensions(), other.dimensions());
        self.zip_with(other, |a, b| a || b)
    }

    /// True when every foreground pixel of `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .pixels
                .as_raw()
                .iter()
                .zip(other.pixels.as_raw())
                .all(|(&a, &b)| a == 0 || b != 0)
    }

    /// Fill background regions that are not connected to the image border.
    ///
    /// Background connectivity is 4-neighbour, which pairs with the
    /// 8-connected foreground used by contour tracing.
    pub fn fill_holes(&self) -> Mask {
        let (w, h) = self.dimensions();
        if w == 0 || h == 0 {
            return self.clone();
        }
        let (wu, hu) = (w as usize, h as usize);
        let raw = self.pixels.as_raw();
        let mut outside = vec![false; wu * hu];
        let mut queue = VecDeque::new();

        let mut seed = |x: usize, y: usize, outside: &mut Vec<bool>| {
            let idx = y * wu + x;
            if raw[idx] == 0 && !outside[idx] {
                outside[idx] = true;
                queue.push_back(idx);
            }
        };
        for x in 0..wu {
            seed(x, 0, &mut outside);
            seed(x, hu - 1, &mut outside);
        }
        for y in 0..hu {
            seed(0, y, &mut outside);
            seed(wu - 1, y, &mut outside);
        }

        while let Some(idx) = queue.pop_front() {
            let (x, y) = (idx % wu, idx / wu);
            let mut visit = |nx: usize, ny: usize| {
                let n = ny * wu + nx;
                if raw[n] == 0 && !outside[n] {
                    outside[n] = true;
                    queue.push_back(n);
                }
            };
            if x > 0 {
                visit(x - 1, y);
            }
            if x + 1 < wu {
                visit(x + 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
            }
            if y + 1 < hu {
                visit(x, y + 1);
            }
        }

        Mask::from_fn(w, h, |x, y| !outside[y as usize * wu + x as usize])
    }

    /// Iterate foreground pixel coordinates in row-major order.
    pub fn foreground(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.pixels
            .enumerate_pixels()
            .filter(|(_, _, p)| p[0] != 0)
            .map(|(x, y, _)| (x, y))
    }

    /// Borrow the underlying 0/255 image.
    pub fn as_image(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn into_image(self) -> GrayImage {
        self.pixels
    }

    fn zip_with(&self, other: &Mask, op: impl Fn(bool, bool) -> bool) -> Mask {
        let (w, h) = self.dimensions();
        Mask::from_fn(w, h, |x, y| op(self.get(x, y), other.get(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring_mask(size: u32, inner: f32, outer: f32) -> Mask {
        let c = (size as f32 - 1.0) / 2.0;
        Mask::from_fn(size, size, |x, y| {
            let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt();
            d >= inner && d <= outer
        })
    }

    #[test]
    fn from_fn_and_count() {
        let m = Mask::from_fn(8, 4, |x, _| x < 3);
        assert_eq!(m.count(), 12);
        assert!(m.get(2, 1));
        assert!(!m.get(3, 1));
        assert_eq!(m.as_image().get_pixel(0, 0)[0], 255);
    }

    #[test]
    fn empty_mask_reports_empty() {
        let m = Mask::empty(5, 5);
        assert!(m.is_empty());
        assert_eq!(m.count(), 0);
        assert_eq!(m.foreground().count(), 0);
    }

    #[test]
    fn intersect_union_subset() {
        let a = Mask::from_fn(6, 6, |x, _| x < 4);
        let b = Mask::from_fn(6, 6, |x, _| x >= 2);
        assert_eq!(a.intersect(&b).count(), 12);
        assert_eq!(a.union(&b).count(), 36);
        assert!(a.intersect(&b).is_subset_of(&a));
        assert!(!a.is_subset_of(&b));
    }

    #[test]
    fn fill_holes_closes_enclosed_background() {
        let ring = ring_mask(21, 3.0, 8.0);
        let filled = ring.fill_holes();
        // Centre was a hole; the frame corners stay background.
        assert!(!ring.get(10, 10));
        assert!(filled.get(10, 10));
        assert!(!filled.get(0, 0));
        assert!(ring.is_subset_of(&filled));
    }

    #[test]
    fn fill_holes_keeps_border_connected_notches() {
        let m = Mask::from_fn(10, 10, |x, y| {
            (2..8).contains(&x) && (2..8).contains(&y) && !(x >= 4 && y == 5)
        });
        let filled = m.fill_holes();
        // The notch at row 5 reaches x = 7 and leaks out through x = 8.
        assert!(!filled.get(5, 5));
        assert_eq!(filled, m);
    }
}
