//! Image decoding at the edge of the pipeline.

use std::path::Path;

use image::GrayImage;

#[derive(Debug)]
pub enum DecodeError {
    /// Bytes or file could not be decoded as an image.
    Decode(image::ImageError),
    /// The decoded image has no pixels.
    Empty { width: u32, height: u32 },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "failed to decode image: {}", e),
            Self::Empty { width, height } => {
                write!(f, "decoded image is empty ({}x{})", width, height)
            }
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode(e) => Some(e),
            Self::Empty { .. } => None,
        }
    }
}

impl From<image::ImageError> for DecodeError {
    fn from(e: image::ImageError) -> Self {
        Self::Decode(e)
    }
}

/// Decode an encoded image (PNG, JPEG, BMP, TIFF) to 8-bit grayscale.
pub fn decode_gray(bytes: &[u8]) -> Result<GrayImage, DecodeError> {
    non_empty(image::load_from_memory(bytes)?.to_luma8())
}

/// Open an image file and convert it to 8-bit grayscale.
pub fn open_gray(path: &Path) -> Result<GrayImage, DecodeError> {
    non_empty(image::open(path)?.to_luma8())
}

fn non_empty(image: GrayImage) -> Result<GrayImage, DecodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::Empty { width, height });
    }
    Ok(image)
}
