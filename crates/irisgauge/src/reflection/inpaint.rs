//! Region inpainting for 8-bit grayscale images.
//!
//! Both methods fill the unknown pixels of `region` from *source* pixels. The
//! caller restricts sources with a support mask (e.g. the pupil), so that the
//! fill never pulls in intensity from a neighbouring structure. Pixels that
//! are neither unknown nor source are ignored entirely.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use image::{GrayImage, Luma};

use super::InpaintMethod;
use crate::mask::Mask;

const DIFFUSION_TOLERANCE: f32 = 0.05;
const DIFFUSION_MAX_SWEEPS: usize = 500;

/// Inpainted image plus how sources were chosen.
#[derive(Debug, Clone)]
pub struct InpaintOutput {
    pub image: GrayImage,
    /// Some unknown pixels could not reach the support mask, so every pixel
    /// outside `region` was used as a source.
    pub used_fallback: bool,
}

/// Fill `region` in `image`, drawing values from `support ∖ region`.
///
/// If some part of `region` is not 4-connected to a support pixel, the
/// whole call falls back to using every pixel outside `region` as a source.
/// Pixels outside `region` are never modified.
pub fn inpaint(
    image: &GrayImage,
    region: &Mask,
    support: &Mask,
    radius: f32,
    method: InpaintMethod,
) -> InpaintOutput {
    if region.is_empty() {
        return InpaintOutput {
            image: image.clone(),
            used_fallback: false,
        };
    }

    let restricted = Grid::new(image, region, Some(support));
    let (grid, used_fallback) = if restricted.all_unknown_reachable() {
        (restricted, false)
    } else {
        (Grid::new(image, region, None), true)
    };

    let values = match method {
        InpaintMethod::Telea => telea(grid, radius),
        InpaintMethod::Diffusion => diffusion(grid),
    };

    let (w, h) = image.dimensions();
    let image = GrayImage::from_fn(w, h, |x, y| {
        if region.get(x, y) {
            let v = values[y as usize * w as usize + x as usize];
            Luma([v.round().clamp(0.0, 255.0) as u8])
        } else {
            *image.get_pixel(x, y)
        }
    });
    InpaintOutput {
        image,
        used_fallback,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    /// Source pixel (or an unknown pixel that has already been filled).
    Known,
    /// Filled, on the marching front.
    Band,
    /// Still to be filled.
    Inside,
    /// Outside the support; neither filled nor used.
    Excluded,
}

impl Cell {
    #[inline]
    fn is_source(self) -> bool {
        matches!(self, Cell::Known | Cell::Band)
    }
}

struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    values: Vec<f32>,
}

impl Grid {
    fn new(image: &GrayImage, region: &Mask, support: Option<&Mask>) -> Self {
        let (w, h) = image.dimensions();
        let mut cells = Vec::with_capacity(w as usize * h as usize);
        for y in 0..h {
            for x in 0..w {
                cells.push(if region.get(x, y) {
                    Cell::Inside
                } else if support.map_or(true, |s| s.get(x, y)) {
                    Cell::Known
                } else {
                    Cell::Excluded
                });
            }
        }
        Self {
            width: w as usize,
            height: h as usize,
            cells,
            values: image.as_raw().iter().map(|&v| v as f32).collect(),
        }
    }

    fn neighbors4(&self, idx: usize) -> impl Iterator<Item = usize> {
        let (w, h) = (self.width, self.height);
        let (x, y) = (idx % w, idx / w);
        [
            (x > 0).then(|| idx - 1),
            (x + 1 < w).then(|| idx + 1),
            (y > 0).then(|| idx - w),
            (y + 1 < h).then(|| idx + w),
        ]
        .into_iter()
        .flatten()
    }

    /// Every `Inside` pixel connects to a source through `Inside` pixels.
    fn all_unknown_reachable(&self) -> bool {
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        for (idx, cell) in self.cells.iter().enumerate() {
            if *cell == Cell::Inside
                && self
                    .neighbors4(idx)
                    .any(|n| self.cells[n] == Cell::Known)
            {
                seen[idx] = true;
                queue.push_back(idx);
            }
        }
        while let Some(idx) = queue.pop_front() {
            for n in self.neighbors4(idx) {
                if self.cells[n] == Cell::Inside && !seen[n] {
                    seen[n] = true;
                    queue.push_back(n);
                }
            }
        }
        self.cells
            .iter()
            .zip(&seen)
            .all(|(cell, &s)| *cell != Cell::Inside || s)
    }
}

#[derive(Debug, Clone, Copy)]
struct FrontEntry {
    time: f32,
    idx: usize,
}

impl PartialEq for FrontEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontEntry {}

impl PartialOrd for FrontEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontEntry {
    // Reversed: `BinaryHeap` pops the smallest arrival time first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.idx.cmp(&self.idx))
    }
}

/// Fast-marching inpainting (Telea 2004), zeroth-order variant.
///
/// Unknown pixels are visited in order of their arrival time `T` from the
/// region boundary. Each one becomes the weighted mean of source pixels
/// within `radius`, weighted by alignment with `∇T`, inverse squared
/// distance and similarity of arrival times.
fn telea(mut grid: Grid, radius: f32) -> Vec<f32> {
    let n = grid.cells.len();
    let mut time = vec![f32::INFINITY; n];
    let mut heap = BinaryHeap::new();

    for idx in 0..n {
        if grid.cells[idx] == Cell::Known {
            time[idx] = 0.0;
        }
    }
    for idx in 0..n {
        if grid.cells[idx] == Cell::Known
            && grid.neighbors4(idx).any(|m| grid.cells[m] == Cell::Inside)
        {
            grid.cells[idx] = Cell::Band;
            heap.push(FrontEntry { time: 0.0, idx });
        }
    }

    while let Some(FrontEntry { idx, .. }) = heap.pop() {
        if grid.cells[idx] == Cell::Known {
            continue;
        }
        grid.cells[idx] = Cell::Known;

        let neighbors: Vec<usize> = grid.neighbors4(idx).collect();
        for m in neighbors {
            if grid.cells[m] != Cell::Inside {
                continue;
            }
            let t = arrival_time(&grid, &time, m);
            if !t.is_finite() {
                continue;
            }
            time[m] = t;
            grid.values[m] = paint(&grid, &time, m, idx, radius);
            grid.cells[m] = Cell::Band;
            heap.push(FrontEntry { time: t, idx: m });
        }
    }
    grid.values
}

/// Smallest eikonal solution over the four neighbour quadrants.
fn arrival_time(grid: &Grid, time: &[f32], idx: usize) -> f32 {
    let (w, h) = (grid.width, grid.height);
    let (x, y) = (idx % w, idx / w);
    let sample = |nx: Option<usize>, ny: Option<usize>| -> Option<f32> {
        let (nx, ny) = (nx?, ny?);
        if nx >= w || ny >= h {
            return None;
        }
        let m = ny * w + nx;
        grid.cells[m].is_source().then(|| time[m])
    };
    let up = sample(Some(x), y.checked_sub(1));
    let down = sample(Some(x), Some(y + 1));
    let left = sample(x.checked_sub(1), Some(y));
    let right = sample(Some(x + 1), Some(y));

    [(up, left), (up, right), (down, left), (down, right)]
        .into_iter()
        .map(|(a, b)| solve_quadrant(a, b))
        .fold(f32::INFINITY, f32::min)
}

fn solve_quadrant(a: Option<f32>, b: Option<f32>) -> f32 {
    match (a, b) {
        (Some(a), Some(b)) => {
            let diff = a - b;
            if diff.abs() >= 1.0 {
                1.0 + a.min(b)
            } else {
                0.5 * (a + b + (2.0 - diff * diff).sqrt())
            }
        }
        (Some(a), None) | (None, Some(a)) => 1.0 + a,
        (None, None) => f32::INFINITY,
    }
}

/// Arrival-time gradient at `idx` from central or one-sided differences.
fn time_gradient(grid: &Grid, time: &[f32], idx: usize) -> [f32; 2] {
    let (w, h) = (grid.width, grid.height);
    let (x, y) = (idx % w, idx / w);
    let t0 = time[idx];
    let at = |m: usize| grid.cells[m].is_source().then(|| time[m]);

    let axis = |lo: Option<f32>, hi: Option<f32>| match (lo, hi) {
        (Some(lo), Some(hi)) => 0.5 * (hi - lo),
        (None, Some(hi)) => hi - t0,
        (Some(lo), None) => t0 - lo,
        (None, None) => 0.0,
    };
    let gx = axis(
        (x > 0).then(|| idx - 1).and_then(at),
        (x + 1 < w).then(|| idx + 1).and_then(at),
    );
    let gy = axis(
        (y > 0).then(|| idx - w).and_then(at),
        (y + 1 < h).then(|| idx + w).and_then(at),
    );
    [gx, gy]
}

fn paint(grid: &Grid, time: &[f32], idx: usize, from: usize, radius: f32) -> f32 {
    let (w, h) = (grid.width as i64, grid.height as i64);
    let (x, y) = ((idx % grid.width) as i64, (idx / grid.width) as i64);
    let reach = radius.ceil() as i64;
    let r2 = radius * radius;
    let grad = time_gradient(grid, time, idx);
    let grad_norm = (grad[0] * grad[0] + grad[1] * grad[1]).sqrt();

    let mut acc = 0.0f32;
    let mut weight_sum = 0.0f32;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d2 = (dx * dx + dy * dy) as f32;
            if d2 == 0.0 || d2 > r2 {
                continue;
            }
            let (sx, sy) = (x + dx, y + dy);
            if sx < 0 || sy < 0 || sx >= w || sy >= h {
                continue;
            }
            let m = (sy * w + sx) as usize;
            if !grid.cells[m].is_source() {
                continue;
            }

            // `r` points from the source towards the pixel being filled.
            let (rx, ry) = (-dx as f32, -dy as f32);
            let direction = if grad_norm > 0.0 {
                ((rx * grad[0] + ry * grad[1]).abs() / (d2.sqrt() * grad_norm)).max(1e-6)
            } else {
                1.0
            };
            let level = 1.0 / (1.0 + (time[m] - time[idx]).abs());
            let weight = direction * level / d2;

            acc += weight * grid.values[m];
            weight_sum += weight;
        }
    }

    if weight_sum > 0.0 {
        acc / weight_sum
    } else {
        grid.values[from]
    }
}

/// Harmonic fill: Gauss-Seidel relaxation of the discrete Laplace equation
/// over the unknown pixels, with source pixels as boundary values.
fn diffusion(mut grid: Grid) -> Vec<f32> {
    let unknown: Vec<usize> = (0..grid.cells.len())
        .filter(|&i| grid.cells[i] == Cell::Inside)
        .collect();

    let band: Vec<f32> = (0..grid.cells.len())
        .filter(|&i| {
            grid.cells[i] == Cell::Known
                && grid.neighbors4(i).any(|m| grid.cells[m] == Cell::Inside)
        })
        .map(|i| grid.values[i])
        .collect();
    if band.is_empty() {
        return grid.values;
    }
    let start = band.iter().sum::<f32>() / band.len() as f32;
    for &i in &unknown {
        grid.values[i] = start;
    }

    for _ in 0..DIFFUSION_MAX_SWEEPS {
        let mut max_update = 0.0f32;
        for &i in &unknown {
            let mut sum = 0.0;
            let mut count = 0u32;
            for m in grid.neighbors4(i) {
                if grid.cells[m] != Cell::Excluded {
                    sum += grid.values[m];
                    count += 1;
                }
            }
            if count > 0 {
                let next = sum / count as f32;
                max_update = max_update.max((next - grid.values[i]).abs());
                grid.values[i] = next;
            }
        }
        if max_update < DIFFUSION_TOLERANCE {
            break;
        }
    }
    grid.values
}
