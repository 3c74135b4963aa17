//! High-level analysis API.
//!
//! [`Pipeline`] wraps a validated [`PipelineConfig`] and a [`Segmenter`].
//! Create once, analyze many images; calls take `&self` and share no state.

use image::GrayImage;

use crate::config::{ConfigError, PipelineConfig};
use crate::error::PipelineError;
use crate::pipeline::{self, EyeSide, PipelineTrace, PirReport};
use crate::segmentation::{Segmenter, ThresholdSegmenter};

/// Primary analysis interface.
///
/// # Examples
///
/// ```no_run
/// use irisgauge::{EyeSide, Pipeline};
///
/// let image = irisgauge::decode::open_gray("eye.png".as_ref()).unwrap();
/// let report = Pipeline::new().analyze(&image, EyeSide::Left).unwrap();
/// println!("PIR = {:.3}", report.pir);
/// ```
pub struct Pipeline {
    config: PipelineConfig,
    segmenter: Box<dyn Segmenter>,
}

impl Pipeline {
    /// Pipeline with default thresholds and reflection removal enabled.
    pub fn new() -> Self {
        let config = PipelineConfig::default();
        Self {
            segmenter: Box::new(ThresholdSegmenter::new(config.segmentation)),
            config,
        }
    }

    /// Pipeline with a validated configuration and the threshold segmenter.
    pub fn with_config(config: PipelineConfig) -> Result<Self, ConfigError> {
        let segmenter = ThresholdSegmenter::new(config.segmentation);
        Self::with_segmenter(config, segmenter)
    }

    /// Pipeline with a custom segmentation strategy.
    ///
    /// `config.segmentation` is still validated but only used by the
    /// provided segmenter if it chooses to.
    pub fn with_segmenter(
        config: PipelineConfig,
        segmenter: impl Segmenter + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            segmenter: Box::new(segmenter),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Analyze one image.
    pub fn analyze(&self, image: &GrayImage, eye_side: EyeSide) -> Result<PirReport, PipelineError> {
        self.analyze_with_trace(image, eye_side).0
    }

    /// Analyze one image and return the diagnostic trace alongside the result.
    ///
    /// The trace is populated up to the failing stage on error.
    pub fn analyze_with_trace(
        &self,
        image: &GrayImage,
        eye_side: EyeSide,
    ) -> (Result<PirReport, PipelineError>, PipelineTrace) {
        pipeline::run(image, &self.config, self.segmenter.as_ref(), eye_side)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
