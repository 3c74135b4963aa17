//! Pupil and iris geometry from binary masks.
//!
//! Each structure is reduced to its largest external contour, and a minimum
//! enclosing circle is fitted to that contour's points. Both structures must
//! be found; there is no partial result.

mod circle;
mod contour;

pub use circle::{min_enclosing_circle, Circle, ENCLOSING_TOLERANCE};
pub use contour::{external_contours, largest_contour, Contour};

use serde::{Deserialize, Serialize};

use crate::mask::Mask;

/// Anatomical structure measured by the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeStructure {
    Pupil,
    Iris,
}

impl EyeStructure {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pupil => "pupil",
            Self::Iris => "iris",
        }
    }
}

/// Geometry estimation failure, naming what could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// No pupil contour.
    Pupil,
    /// No iris contour.
    Iris,
    /// Neither contour.
    Both,
}

impl GeometryError {
    /// Structures missing from the masks, pupil first.
    pub fn missing(&self) -> &'static [EyeStructure] {
        match self {
            Self::Pupil => &[EyeStructure::Pupil],
            Self::Iris => &[EyeStructure::Iris],
            Self::Both => &[EyeStructure::Pupil, EyeStructure::Iris],
        }
    }
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.missing().iter().map(|s| s.name()).collect();
        write!(f, "geometry estimation failed ({})", names.join(", "))
    }
}

impl std::error::Error for GeometryError {}

/// Axis-aligned iris box in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrisBbox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl IrisBbox {
    /// Square of half-width `circle.radius` centred on the circle.
    pub fn around(circle: &Circle) -> Self {
        let [cx, cy] = circle.center;
        let r = circle.radius;
        Self {
            x_min: cx - r,
            x_max: cx + r,
            y_min: cy - r,
            y_max: cy + r,
        }
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    pub fn half_width(&self) -> f64 {
        0.5 * self.width()
    }
}

/// Fitted pupil and iris.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryResult {
    pub pupil_contour: Contour,
    pub iris_contour: Contour,
    pub pupil_circle: Circle,
    pub iris_circle: Circle,
    pub iris_bbox: IrisBbox,
}

impl GeometryResult {
    pub fn pupil_center(&self) -> [f64; 2] {
        self.pupil_circle.center
    }

    pub fn pupil_radius(&self) -> f64 {
        self.pupil_circle.radius
    }

    pub fn iris_center(&self) -> [f64; 2] {
        self.iris_circle.center
    }

    pub fn iris_radius(&self) -> f64 {
        self.iris_circle.radius
    }
}

/// Fit pupil and iris circles to the largest external contour of each mask.
///
/// Both masks are examined before failing, so the error names every
/// missing structure.
pub fn estimate_geometry(
    pupil_mask: &Mask,
    iris_mask: &Mask,
) -> Result<GeometryResult, GeometryError> {
    let pupil = fit_structure(pupil_mask, EyeStructure::Pupil);
    let iris = fit_structure(iris_mask, EyeStructure::Iris);

    let ((pupil_contour, pupil_circle), (iris_contour, iris_circle)) = match (pupil, iris) {
        (Some(p), Some(i)) => (p, i),
        (None, Some(_)) => return Err(GeometryError::Pupil),
        (Some(_), None) => return Err(GeometryError::Iris),
        (None, None) => return Err(GeometryError::Both),
    };

    Ok(GeometryResult {
        iris_bbox: IrisBbox::around(&iris_circle),
        pupil_contour,
        iris_contour,
        pupil_circle,
        iris_circle,
    })
}

fn fit_structure(mask: &Mask, structure: EyeStructure) -> Option<(Contour, Circle)> {
    let contours = external_contours(mask);
    let Some(best) = largest_contour(&contours) else {
        tracing::debug!("{}: no contour in mask", structure.name());
        return None;
    };
    let circle = min_enclosing_circle(&best.to_f64())?;
    tracing::debug!(
        "{}: {} contours, largest has {} points (area {:.1}), circle c=({:.2},{:.2}) r={:.2}",
        structure.name(),
        contours.len(),
        best.len(),
        best.area(),
        circle.center[0],
        circle.center[1],
        circle.radius
    );
    Some((best.clone(), circle))
}
