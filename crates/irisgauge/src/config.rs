//! Pipeline configuration.
//!
//! All structs deserialize with `#[serde(default)]`, so a JSON file only needs
//! the fields it overrides:
//!
//! ```json
//! { "segmentation": { "pupil_threshold": 80 }, "reflection": { "enable": false } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::reflection::ReflectionConfig;
use crate::segmentation::SegmentationConfig;

/// Largest structuring element accepted by the morphology backend.
pub(crate) const MAX_KERNEL_SIZE: u32 = 255;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `pupil_threshold` is above `iris_threshold`.
    ThresholdOrder {
        /// Configured pupil threshold.
        pupil: u8,
        /// Configured iris threshold.
        iris: u8,
    },
    /// Structuring element size outside `1..=255`.
    KernelSize {
        /// Configured kernel size.
        size: u32,
    },
    /// Inpainting radius is not a positive finite number.
    InpaintRadius {
        /// Configured radius.
        radius: f32,
    },
    /// Config file could not be read.
    Io {
        /// Path that failed.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
    /// Config JSON is malformed.
    Parse {
        /// Parser error message.
        message: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ThresholdOrder { pupil, iris } => write!(
                f,
                "pupil threshold {} must not exceed iris threshold {}",
                pupil, iris
            ),
            Self::KernelSize { size } => {
                write!(
                    f,
                    "kernel size must be in 1..={}, got {}",
                    MAX_KERNEL_SIZE, size
                )
            }
            Self::InpaintRadius { radius } => {
                write!(f, "inpaint radius must be positive, got {}", radius)
            }
            Self::Io { path, message } => write!(f, "failed to read {}: {}", path, message),
            Self::Parse { message } => write!(f, "invalid config: {}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration of the [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Threshold segmentation parameters.
    pub segmentation: SegmentationConfig,
    /// Specular reflection removal parameters.
    pub reflection: ReflectionConfig,
}

impl PipelineConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.segmentation.validate()?;
        self.reflection.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON config string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }
}
