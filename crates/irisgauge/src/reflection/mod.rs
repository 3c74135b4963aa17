//! Specular reflection removal inside the pupil.
//!
//! The illuminator leaves small saturated spots on the cornea. When such a
//! spot falls inside the pupil it punches a hole into the pupil mask, so the
//! spot is detected, grown by morphological dilation and inpainted from the
//! surrounding pupil intensity before segmentation runs.
//!
//! ```text
//! bright    = image > reflection_threshold
//! region    = dilate(bright ∩ pupil_region, ellipse(k×k), iterations) ∩ pupil_region
//! output    = inpaint(image, region)
//! ```

mod inpaint;

pub use inpaint::{inpaint, InpaintOutput};

use image::{GrayImage, Luma};
use imageproc::morphology::{grayscale_dilate, Mask as StructuringElement};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MAX_KERNEL_SIZE};
use crate::mask::Mask;

/// Inpainting strategy used to fill the reflection region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InpaintMethod {
    /// Fast-marching fill ordered by distance from the region boundary.
    #[default]
    Telea,
    /// Harmonic fill by iterated neighbour averaging.
    Diffusion,
}

/// Reflection removal parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflectionConfig {
    /// Run the removal stage at all.
    pub enable: bool,
    /// Pixels strictly above this intensity are highlight candidates.
    pub reflection_threshold: u8,
    /// Side of the elliptical structuring element.
    pub kernel_size: u32,
    /// Number of dilation passes.
    pub dilate_iterations: u32,
    /// Neighbourhood radius (pixels) considered by the inpainting.
    pub inpaint_radius: f32,
    pub inpaint_method: InpaintMethod,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            enable: true,
            reflection_threshold: 200,
            kernel_size: 6,
            dilate_iterations: 2,
            inpaint_radius: 6.0,
            inpaint_method: InpaintMethod::Telea,
        }
    }
}

impl ReflectionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kernel_size == 0 || self.kernel_size > MAX_KERNEL_SIZE {
            return Err(ConfigError::KernelSize {
                size: self.kernel_size,
            });
        }
        if !(self.inpaint_radius.is_finite() && self.inpaint_radius > 0.0) {
            return Err(ConfigError::InpaintRadius {
                radius: self.inpaint_radius,
            });
        }
        Ok(())
    }
}

/// Result of [`remove_reflections`].
#[derive(Debug, Clone)]
pub struct ReflectionOutcome {
    /// Cleaned image, identical to the input outside `region`.
    pub image: GrayImage,
    /// Pixels that were rewritten (dilated highlights clipped to the pupil).
    pub region: Mask,
    /// Highlight pixels found inside the pupil region before dilation.
    pub bright_pixels: usize,
    /// Inpainting had to draw on pixels outside the pupil region.
    pub used_fallback: bool,
}

impl ReflectionOutcome {
    fn unchanged(image: &GrayImage, bright_pixels: usize) -> Self {
        Self {
            image: image.clone(),
            region: Mask::empty(image.width(), image.height()),
            bright_pixels,
            used_fallback: false,
        }
    }

    /// Number of inpainted pixels.
    pub fn inpainted_pixels(&self) -> usize {
        self.region.count()
    }

    /// True when the image was left untouched.
    pub fn is_noop(&self) -> bool {
        self.region.is_empty()
    }
}

/// Detect highlights inside `pupil_region` and inpaint them.
///
/// `pupil_region` must match the image dimensions. Pixels outside the
/// returned region are copied verbatim; an empty highlight set returns an
/// exact copy of the input. The `enable` flag is honoured by the caller.
pub fn remove_reflections(
    image: &GrayImage,
    pupil_region: &Mask,
    cfg: &ReflectionConfig,
) -> ReflectionOutcome {
    debug_assert_eq!(image.dimensions(), pupil_region.dimensions());
    let (w, h) = image.dimensions();

    let bright = Mask::from_fn(w, h, |x, y| {
        image.get_pixel(x, y)[0] > cfg.reflection_threshold
    });
    let seeds = bright.intersect(pupil_region);
    let bright_pixels = seeds.count();
    if bright_pixels == 0 {
        tracing::debug!("no highlights inside the pupil region");
        return ReflectionOutcome::unchanged(image, 0);
    }

    let region = dilate(&seeds, cfg.kernel_size, cfg.dilate_iterations).intersect(pupil_region);
    let out = inpaint(
        image,
        &region,
        pupil_region,
        cfg.inpaint_radius,
        cfg.inpaint_method,
    );
    if out.used_fallback {
        tracing::warn!(
            "pupil region offers no inpainting sources for {} pixels, using full neighbourhood",
            region.count()
        );
    }

    tracing::debug!(
        "reflection removal: {} highlight px, {} inpainted px ({:?})",
        bright_pixels,
        region.count(),
        cfg.inpaint_method
    );

    ReflectionOutcome {
        image: out.image,
        region,
        bright_pixels,
        used_fallback: out.used_fallback,
    }
}

/// Elliptical k×k structuring element, anchored at `(k/2, k/2)`.
///
/// Row `i` spans the columns within `round(c * sqrt(1 - dy²/r²))` of the
/// anchor column, which reproduces the classic OpenCV ellipse kernels
/// (including the asymmetric shape of even sizes).
pub fn ellipse_kernel(size: u32) -> GrayImage {
    let k = size.max(1) as i64;
    let r = k / 2;
    let c = k / 2;
    let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

    let mut kernel = GrayImage::new(k as u32, k as u32);
    for i in 0..k {
        let dy = i - r;
        if dy.abs() > r {
            continue;
        }
        let dx = (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i64;
        let (j1, j2) = ((c - dx).max(0), (c + dx + 1).min(k));
        for j in j1..j2 {
            kernel.put_pixel(j as u32, i as u32, Luma([255]));
        }
    }
    kernel
}

fn dilate(mask: &Mask, kernel_size: u32, iterations: u32) -> Mask {
    let anchor = (kernel_size.max(1) / 2).min(u8::MAX as u32) as u8;
    let element = StructuringElement::from_image(&ellipse_kernel(kernel_size), anchor, anchor);
    let mut pixels = mask.as_image().clone();
    for _ in 0..iterations {
        pixels = grayscale_dilate(&pixels, &element);
    }
    Mask::from_gray(&pixels)
}
