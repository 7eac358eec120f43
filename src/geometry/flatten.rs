//! Cubic Bézier arc length by recursive midpoint subdivision.
//!
//! A segment is accepted once its control polygon and chord agree to within
//! the tolerance; the estimate is their mean. Otherwise the curve is split
//! at t = 0.5 (De Casteljau) and both halves are measured one level deeper.
//! The depth bound makes termination independent of the curve's shape.

use glam::DVec2;

/// The four control points of a cubic Bézier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: DVec2,
    pub p1: DVec2,
    pub p2: DVec2,
    pub p3: DVec2,
}

impl CubicSegment {
    pub fn new(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2) -> Self {
        CubicSegment { p0, p1, p2, p3 }
    }

    /// Straight-line distance between the endpoints.
    pub fn chord(&self) -> f64 {
        self.p0.distance(self.p3)
    }

    /// Length of the polyline p0-p1-p2-p3; never shorter than the curve.
    pub fn control_polygon(&self) -> f64 {
        self.p0.distance(self.p1) + self.p1.distance(self.p2) + self.p2.distance(self.p3)
    }

    /// Split at t = 0.5.
    pub fn split_at_midpoint(&self) -> (CubicSegment, CubicSegment) {
        let m01 = midpoint(self.p0, self.p1);
        let m12 = midpoint(self.p1, self.p2);
        let m23 = midpoint(self.p2, self.p3);
        let m012 = midpoint(m01, m12);
        let m123 = midpoint(m12, m23);
        let mid = midpoint(m012, m123);
        (
            CubicSegment::new(self.p0, m01, m012, mid),
            CubicSegment::new(mid, m123, m23, self.p3),
        )
    }

    /// Estimated arc length, starting from depth 0.
    pub fn flattened_length(&self, tolerance: f64, max_depth: u32) -> f64 {
        self.flattened_length_from(tolerance, 0, max_depth)
    }

    /// Estimated arc length of a segment that already sits `depth` levels
    /// down a subdivision.
    pub fn flattened_length_from(&self, tolerance: f64, depth: u32, max_depth: u32) -> f64 {
        let chord = self.chord();
        let polygon = self.control_polygon();
        if depth >= max_depth || (polygon - chord).abs() < tolerance {
            return (polygon + chord) / 2.0;
        }
        let (left, right) = self.split_at_midpoint();
        left.flattened_length_from(tolerance, depth + 1, max_depth)
            + right.flattened_length_from(tolerance, depth + 1, max_depth)
    }
}

#[inline]
fn midpoint(a: DVec2, b: DVec2) -> DVec2 {
    (a + b) * 0.5
}
