use crate::error::{GeometryError, Result};
use crate::math::distance_2d::{
    closest_point_on_segment, closest_points_between_segments, point_on_segment,
};
use crate::math::intersect_2d::segment_crossing;
use crate::math::{Point3, Vector3, TOLERANCE};

/// A bounded straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point3,
    pub end: Point3,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Length of the segment.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit direction from start to end.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroLengthSegment` for a degenerate segment.
    pub fn direction(&self) -> Result<Vector3> {
        let d = self.end - self.start;
        let len = d.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroLengthSegment.into());
        }
        Ok(d / len)
    }

    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        nalgebra::center(&self.start, &self.end)
    }

    /// Closest point on the segment to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Point3) -> Point3 {
        closest_point_on_segment(p, &self.start, &self.end).0
    }

    #[must_use]
    pub fn distance_to(&self, p: &Point3) -> f64 {
        (p - self.closest_point(p)).norm()
    }

    /// Returns `true` if `p` lies on the segment within `tolerance`.
    #[must_use]
    pub fn contains(&self, p: &Point3, tolerance: f64) -> bool {
        point_on_segment(p, &self.start, &self.end, tolerance)
    }

    /// Crossing point of two segments in plan, if any.
    #[must_use]
    pub fn intersect(&self, other: &Segment) -> Option<Point3> {
        segment_crossing(&self.start, &self.end, &other.start, &other.end)
    }

    /// Closest pair of points `(on_self, on_other)` between two segments.
    #[must_use]
    pub fn closest_points(&self, other: &Segment) -> (Point3, Point3) {
        let (a, b, _) =
            closest_points_between_segments(&self.start, &self.end, &other.start, &other.end);
        (a, b)
    }
}
