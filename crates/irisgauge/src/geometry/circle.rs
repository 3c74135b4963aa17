//! Minimum enclosing circle (Welzl's incremental algorithm).
//!
//! Points are visited in a seeded pseudo-random order, which gives expected
//! linear time on contour input (contours arrive sorted along the boundary,
//! the worst case for the un-shuffled algorithm) while keeping results
//! reproducible.

use nalgebra::{Matrix2, Point2, Vector2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Documented accuracy bound: every input point lies within
/// `radius * (1.0 + ENCLOSING_TOLERANCE)` of the fitted centre.
pub const ENCLOSING_TOLERANCE: f64 = 0.01;

/// Relative slack used by the containment test inside the solver.
const CONTAIN_REL_EPS: f64 = 1e-7;
const CONTAIN_ABS_EPS: f64 = 1e-9;
const SHUFFLE_SEED: u64 = 0x5EED_1815;

/// Circle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Centre `[x, y]`.
    pub center: [f64; 2],
    /// Radius, always `>= 0`.
    pub radius: f64,
}

impl Circle {
    pub fn new(center: [f64; 2], radius: f64) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }

    /// Distance from the centre to `p`.
    #[inline]
    pub fn distance_to(&self, p: [f64; 2]) -> f64 {
        (Point2::from(p) - Point2::from(self.center)).norm()
    }

    /// Containment with the solver's floating-point slack.
    #[inline]
    pub fn contains(&self, p: [f64; 2]) -> bool {
        self.distance_to(p) <= self.radius * (1.0 + CONTAIN_REL_EPS) + CONTAIN_ABS_EPS
    }

    /// Containment with the documented [`ENCLOSING_TOLERANCE`].
    #[inline]
    pub fn encloses_within_tolerance(&self, p: [f64; 2]) -> bool {
        self.distance_to(p) <= self.radius * (1.0 + ENCLOSING_TOLERANCE) + CONTAIN_ABS_EPS
    }

    fn from_point(p: [f64; 2]) -> Self {
        Self::new(p, 0.0)
    }

    fn from_diameter(a: [f64; 2], b: [f64; 2]) -> Self {
        let center = nalgebra::center(&Point2::from(a), &Point2::from(b));
        Self::new([center.x, center.y], (Point2::from(a) - center).norm())
    }

    /// Circumcircle of three points; `None` when they are (nearly) collinear.
    fn circumscribed(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Option<Self> {
        let pa = Point2::from(a);
        let ab = Point2::from(b) - pa;
        let ac = Point2::from(c) - pa;

        let det = ab.x * ac.y - ab.y * ac.x;
        let scale = ab.norm_squared().max(ac.norm_squared());
        if det.abs() <= 1e-12 * scale.max(1.0) {
            return None;
        }

        let m = Matrix2::new(ab.x, ab.y, ac.x, ac.y) * 2.0;
        let rhs = Vector2::new(ab.norm_squared(), ac.norm_squared());
        let offset = m.try_inverse()? * rhs;
        let center = pa + offset;
        Some(Self::new([center.x, center.y], offset.norm()))
    }

    /// Smallest circle through `a`, `b` and enclosing `c`.
    fn from_three(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        match Self::circumscribed(a, b, c) {
            Some(circle) => circle,
            // Collinear: the two farthest-apart points span the diameter.
            None => [
                Self::from_diameter(a, b),
                Self::from_diameter(a, c),
                Self::from_diameter(b, c),
            ]
            .into_iter()
            .fold(Self::from_point(a), |best, cand| {
                if cand.radius > best.radius {
                    cand
                } else {
                    best
                }
            }),
        }
    }
}

/// Smallest circle containing every point. `None` for an empty set.
pub fn min_enclosing_circle(points: &[[f64; 2]]) -> Option<Circle> {
    if points.is_empty() {
        return None;
    }
    let mut pts = points.to_vec();
    let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
    pts.shuffle(&mut rng);

    let mut circle = Circle::from_point(pts[0]);
    for i in 1..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle::from_point(pts[i]);
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle::from_diameter(pts[i], pts[j]);
            for k in 0..j {
                if circle.contains(pts[k]) {
                    continue;
                }
                circle = Circle::from_three(pts[i], pts[j], pts[k]);
            }
        }
    }
    Some(circle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::Rng;

    /// Exhaustive reference: best circle over all pairs and triples.
    fn brute_force(points: &[[f64; 2]]) -> Circle {
        let mut best: Option<Circle> = None;
        let mut consider = |c: Circle| {
            if points.iter().all(|&p| c.contains(p))
                && best.map_or(true, |b| c.radius < b.radius)
            {
                best = Some(c);
            }
        };
        for i in 0..points.len() {
            consider(Circle::from_point(points[i]));
            for j in (i + 1)..points.len() {
                consider(Circle::from_diameter(points[i], points[j]));
                for k in (j + 1)..points.len() {
                    if let Some(c) = Circle::circumscribed(points[i], points[j], points[k]) {
                        consider(c);
                    }
                }
            }
        }
        best.expect("non-empty point set")
    }

    #[test]
    fn empty_input_has_no_circle() {
        assert!(min_enclosing_circle(&[]).is_none());
    }

    #[test]
    fn single_point_has_zero_radius() {
        let c = min_enclosing_circle(&[[3.0, 4.0]]).unwrap();
        assert_eq!(c.center, [3.0, 4.0]);
        assert_eq!(c.radius, 0.0);
    }

    #[test]
    fn two_points_span_diameter() {
        let c = min_enclosing_circle(&[[0.0, 0.0], [10.0, 0.0]]).unwrap();
        assert_abs_diff_eq!(c.center[0], 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.center[1], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c.radius, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_points_use_extreme_pair() {
        let pts: Vec<[f64; 2]> = (0..20).map(|i| [i as f64, 2.0 * i as f64]).collect();
        let c = min_enclosing_circle(&pts).unwrap();
        let half = (19.0f64.powi(2) + 38.0f64.powi(2)).sqrt() / 2.0;
        assert_abs_diff_eq!(c.radius, half, epsilon = 1e-9);
        assert_abs_diff_eq!(c.center[0], 9.5, epsilon = 1e-9);
        assert_abs_diff_eq!(c.center[1], 19.0, epsilon = 1e-9);
    }

    #[test]
    fn right_triangle_uses_hypotenuse() {
        let c = min_enclosing_circle(&[[0.0, 0.0], [6.0, 0.0], [0.0, 8.0]]).unwrap();
        assert_abs_diff_eq!(c.radius, 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.center[0], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.center[1], 4.0, epsilon = 1e-9);
    }

    #[test]
    fn circle_samples_recover_circle() {
        let pts: Vec<[f64; 2]> = (0..90)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / 90.0;
                [40.0 + 12.5 * t.cos(), -7.0 + 12.5 * t.sin()]
            })
            .collect();
        let c = min_enclosing_circle(&pts).unwrap();
        assert_abs_diff_eq!(c.center[0], 40.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.center[1], -7.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.radius, 12.5, epsilon = 1e-6);
    }

    #[test]
    fn random_sets_are_enclosed_and_minimal() {
        let mut rng = StdRng::seed_from_u64(42);
        for trial in 0..40 {
            let n = rng.gen_range(1..24);
            let pts: Vec<[f64; 2]> = (0..n)
                .map(|_| [rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0)])
                .collect();
            let c = min_enclosing_circle(&pts).unwrap();
            for &p in &pts {
                assert!(
                    c.encloses_within_tolerance(p),
                    "trial {trial}: point {:?} outside {:?}",
                    p,
                    c
                );
            }
            let reference = brute_force(&pts);
            assert!(
                c.radius <= reference.radius * (1.0 + ENCLOSING_TOLERANCE),
                "trial {trial}: radius {} vs reference {}",
                c.radius,
                reference.radius
            );
        }
    }

    #[test]
    fn result_is_deterministic() {
        let mut rng = StdRng::seed_from_u64(7);
        let pts: Vec<[f64; 2]> = (0..200)
            .map(|_| [rng.gen_range(0.0..640.0), rng.gen_range(0.0..480.0)])
            .collect();
        let a = min_enclosing_circle(&pts).unwrap();
        let b = min_enclosing_circle(&pts).unwrap();
        assert_eq!(a, b);
    }
}
