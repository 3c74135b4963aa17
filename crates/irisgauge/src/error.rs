//! Pipeline error types.

use crate::geometry::GeometryError;

/// Rejected input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    /// Width or height is zero.
    EmptyImage { width: u32, height: u32 },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyImage { width, height } => {
                write!(f, "invalid input image: empty ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for InputError {}

/// A [`Segmenter`](crate::Segmenter) broke its output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentationError {
    /// Map dimensions differ from the image.
    SizeMismatch {
        expected: [u32; 2],
        actual: [u32; 2],
    },
}

impl std::fmt::Display for SegmentationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => write!(
                f,
                "segmentation map is {}x{}, image is {}x{}",
                actual[0], actual[1], expected[0], expected[1]
            ),
        }
    }
}

impl std::error::Error for SegmentationError {}

/// Failure of [`Pipeline::analyze`](crate::Pipeline::analyze).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineError {
    InvalidInput(InputError),
    Segmentation(SegmentationError),
    Geometry(GeometryError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(e) => std::fmt::Display::fmt(e, f),
            Self::Segmentation(e) => std::fmt::Display::fmt(e, f),
            Self::Geometry(e) => std::fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidInput(e) => Some(e),
            Self::Segmentation(e) => Some(e),
            Self::Geometry(e) => Some(e),
        }
    }
}

impl From<InputError> for PipelineError {
    fn from(e: InputError) -> Self {
        Self::InvalidInput(e)
    }
}

impl From<SegmentationError> for PipelineError {
    fn from(e: SegmentationError) -> Self {
        Self::Segmentation(e)
    }
}

impl From<GeometryError> for PipelineError {
    fn from(e: GeometryError) -> Self {
        Self::Geometry(e)
    }
}
