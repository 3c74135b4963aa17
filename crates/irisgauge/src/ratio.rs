//! Pupil-to-iris ratio.

use crate::geometry::{min_enclosing_circle, GeometryResult};

/// `radius_pupil / radius_iris`, or `0.0` when the iris radius is not a
/// positive finite number.
pub fn pupil_iris_ratio(radius_pupil: f64, radius_iris: f64) -> f64 {
    if !(radius_iris.is_finite() && radius_iris > 0.0) {
        return 0.0;
    }
    radius_pupil / radius_iris
}

/// Radii used for the reported ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioInputs {
    /// Enclosing-circle radius of the pupil contour.
    pub pupil_radius: f64,
    /// Half-width of the iris bounding box.
    pub iris_radius: f64,
}

impl RatioInputs {
    pub fn from_geometry(geometry: &GeometryResult) -> Self {
        let pupil_radius = min_enclosing_circle(&geometry.pupil_contour.to_f64())
            .map_or(geometry.pupil_radius(), |c| c.radius);
        Self {
            pupil_radius,
            iris_radius: geometry.iris_bbox.half_width(),
        }
    }

    pub fn ratio(&self) -> f64 {
        pupil_iris_ratio(self.pupil_radius, self.iris_radius)
    }
}
