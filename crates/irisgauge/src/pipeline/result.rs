use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use crate::geometry::{GeometryResult, IrisBbox};
use crate::ratio::RatioInputs;

/// Which eye the image shows. Carried through to the trace and overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeSide {
    #[default]
    Left,
    Right,
}

impl EyeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl std::fmt::Display for EyeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EyeSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(format!("unknown eye side '{}' (expected left or right)", other)),
        }
    }
}

/// Successful analysis of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PirReport {
    /// Pupil circle centre `[x, y]` in pixels.
    pub pupil_center: [f64; 2],
    /// Iris circle centre `[x, y]` in pixels.
    pub iris_center: [f64; 2],
    pub pupil_radius: f64,
    pub iris_radius: f64,
    pub iris_bbox: IrisBbox,
    /// Pupil-to-iris radius ratio.
    pub pir: f64,
}

impl PirReport {
    pub(crate) fn new(geometry: &GeometryResult, inputs: &RatioInputs) -> Self {
        Self {
            pupil_center: geometry.pupil_center(),
            iris_center: geometry.iris_center(),
            pupil_radius: inputs.pupil_radius,
            iris_radius: inputs.iris_radius,
            iris_bbox: geometry.iris_bbox,
            pir: inputs.ratio(),
        }
    }
}

/// Failure record, carrying the error message only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub error: String,
}

impl From<&PipelineError> for ErrorReport {
    fn from(e: &PipelineError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

/// Serializable outcome of one analysis: either record, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Success(PirReport),
    Failure(ErrorReport),
}

impl AnalysisOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl From<Result<PirReport, PipelineError>> for AnalysisOutcome {
    fn from(result: Result<PirReport, PipelineError>) -> Self {
        match result {
            Ok(report) => Self::Success(report),
            Err(e) => Self::Failure(ErrorReport::from(&e)),
        }
    }
}
