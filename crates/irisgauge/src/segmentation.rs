//! Intensity-threshold segmentation into background / iris / pupil.
//!
//! Near-infrared eye images have a dark pupil, a mid-gray iris and a bright
//! sclera/skin surround. Two ordered thresholds split the intensity range
//! into three classes. The result is a soft three-channel map so that a
//! richer [`Segmenter`] can be dropped in without changing the geometry
//! stages downstream.

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::mask::Mask;

/// Threshold configuration for [`ThresholdSegmenter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Pixels strictly below this intensity are pupil.
    pub pupil_threshold: u8,
    /// Pixels strictly below this intensity are iris (or pupil).
    pub iris_threshold: u8,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            pupil_threshold: 100,
            iris_threshold: 200,
        }
    }
}

impl SegmentationConfig {
    /// Reject threshold pairs that would make the iris channel negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pupil_threshold > self.iris_threshold {
            return Err(ConfigError::ThresholdOrder {
                pupil: self.pupil_threshold,
                iris: self.iris_threshold,
            });
        }
        Ok(())
    }
}

/// Segmentation classes, in channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeClass {
    Background = 0,
    Iris = 1,
    Pupil = 2,
}

/// H×W×3 soft class map. Channel order follows [`EyeClass`].
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationMap {
    width: u32,
    height: u32,
    data: Vec<[f32; 3]>,
}

impl SegmentationMap {
    /// Build from per-pixel class scores in row-major order.
    ///
    /// Returns `None` when `data` does not hold exactly `width * height` entries.
    pub fn from_raw(width: u32, height: u32, data: Vec<[f32; 3]>) -> Option<Self> {
        if data.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Class scores at `(x, y)`.
    #[inline]
    pub fn scores(&self, x: u32, y: u32) -> [f32; 3] {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Score of a single class at `(x, y)`.
    #[inline]
    pub fn score(&self, class: EyeClass, x: u32, y: u32) -> f32 {
        self.scores(x, y)[class as usize]
    }

    /// Binary mask of `class`, cut at 0.5.
    pub fn mask(&self, class: EyeClass) -> Mask {
        Mask::from_fn(self.width, self.height, |x, y| self.score(class, x, y) > 0.5)
    }

    /// Pupil mask used for geometry.
    pub fn pupil_mask(&self) -> Mask {
        self.mask(EyeClass::Pupil)
    }

    /// Iris mask used for geometry: the full iris disk, pupil included.
    ///
    /// This is the complement of the background channel at the same 0.5 cut.
    pub fn iris_mask(&self) -> Mask {
        Mask::from_fn(self.width, self.height, |x, y| {
            self.score(EyeClass::Background, x, y) < 0.5
        })
    }
}

/// Image → segmentation map.
///
/// Implementations must be deterministic and return a map with the same
/// dimensions as the input; the pipeline rejects any other size with
/// [`SegmentationError`](crate::SegmentationError).
pub trait Segmenter: Send + Sync {
    fn segment(&self, image: &GrayImage) -> SegmentationMap;
}

/// Two-threshold intensity segmenter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdSegmenter {
    config: SegmentationConfig,
}

impl ThresholdSegmenter {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }
}

impl Segmenter for ThresholdSegmenter {
    fn segment(&self, image: &GrayImage) -> SegmentationMap {
        let (w, h) = image.dimensions();
        let data = image
            .as_raw()
            .iter()
            .map(|&p| {
                let pupil = indicator(p < self.config.pupil_threshold);
                let iris = indicator(p < self.config.iris_threshold);
                [1.0 - iris, iris - pupil, pupil]
            })
            .collect();

        tracing::debug!(
            "segmented {}x{} image (pupil < {}, iris < {})",
            w,
            h,
            self.config.pupil_threshold,
            self.config.iris_threshold
        );

        SegmentationMap {
            width: w,
            height: h,
            data,
        }
    }
}

#[inline]
fn indicator(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}
