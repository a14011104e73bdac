use super::core::{Point3, Tolerance, Vec3};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3;

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

/// Quadratic Bézier through `p0` and `p2`, pulled toward `p1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadraticBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
}

impl QuadraticBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Self { p0, p1, p2 }
    }
}

impl Curve3 for QuadraticBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let w0 = u * u;
        let w1 = 2.0 * u * t;
        let w2 = t * t;
        Point3::new(
            self.p0.x * w0 + self.p1.x * w1 + self.p2.x * w2,
            self.p0.y * w0 + self.p1.y * w1 + self.p2.y * w2,
            self.p0.z * w0 + self.p1.z * w1 + self.p2.z * w2,
        )
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        a.mul_scalar(2.0 * u).add(b.mul_scalar(2.0 * t))
    }
}

/// Samples `steps + 1` evenly spaced parameters across the curve domain,
/// both ends included.
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (a, b) = curve.domain();
    (0..=steps)
        .map(|i| {
            let t = a + (b - a) * (i as f64 / steps as f64);
            curve.point_at(t)
        })
        .collect()
}

/// Chord-length approximation of the curve length using `steps` segments.
#[must_use]
pub fn curve_length(curve: &impl Curve3, steps: usize) -> f64 {
    let points = tessellate_curve_uniform(curve, steps);
    let length: f64 = points
        .windows(2)
        .map(|pair| pair[0].distance_to(pair[1]))
        .sum();
    if Tolerance::ZERO_LENGTH.is_zero_length(length) {
        0.0
    } else {
        length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> QuadraticBezier3 {
        QuadraticBezier3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 0.0),
        )
    }

    #[test]
    fn bezier_hits_endpoints_and_midpoint() {
        let curve = arch();
        assert_eq!(curve.point_at(0.0), curve.p0);
        assert_eq!(curve.point_at(1.0), curve.p2);

        let mid = curve.point_at(0.5);
        assert!((mid.x - 1.0).abs() < 1e-12);
        assert!((mid.z - 0.5).abs() < 1e-12);
    }

    #[test]
    fn bezier_tangent_starts_toward_control_point() {
        let curve = arch();
        let tangent = curve.tangent_at(0.0).unwrap();
        let expected = curve.p1.sub_point(curve.p0).normalized().unwrap();
        assert!(tangent.sub(expected).length() < 1e-12);
    }

    #[test]
    fn uniform_tessellation_includes_both_ends() {
        let points = tessellate_curve_uniform(&arch(), 8);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(points[8], Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn straight_bezier_length_matches_chord() {
        let line = QuadraticBezier3::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
        );
        assert!((curve_length(&line, 16) - 3.0).abs() < 1e-9);
        assert!(curve_length(&arch(), 64) > 2.0);
    }
}
