use crate::math::intersect_2d::line_parameters;
use crate::math::polygon_2d::{left_normal, plan_direction};
use crate::math::{Point3, TOLERANCE};

use super::segment::Segment;

/// A polyline of straight segments.
///
/// For closed polylines, the last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub points: Vec<Point3>,
    pub closed: bool,
}

impl Polyline {
    /// Creates a polyline, dropping consecutive duplicate points.
    #[must_use]
    pub fn from_points(points: &[Point3], closed: bool) -> Self {
        let mut deduped: Vec<Point3> = Vec::with_capacity(points.len());
        for p in points {
            if deduped.last().is_none_or(|q| (p - q).norm() > TOLERANCE) {
                deduped.push(*p);
            }
        }
        if closed {
            while deduped.len() > 1 && (deduped[0] - deduped[deduped.len() - 1]).norm() < TOLERANCE
            {
                deduped.pop();
            }
        }
        Self {
            points: deduped,
            closed,
        }
    }

    /// Returns the number of segments in this polyline.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        let n = self.points.len();
        if n < 2 {
            return 0;
        }
        if self.closed {
            n
        } else {
            n - 1
        }
    }

    /// Returns segment `i`, wrapping for closed polylines.
    #[must_use]
    pub fn segment(&self, i: usize) -> Segment {
        let n = self.points.len();
        Segment::new(self.points[i], self.points[(i + 1) % n])
    }

    /// Iterates the segments in order.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        (0..self.segment_count()).map(|i| self.segment(i))
    }

    /// Total length of all segments.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Offsets an open polyline sideways in the XY plane.
    ///
    /// Positive `distance` moves to the left of the travel direction.
    /// Interior corners are mitred by intersecting adjacent offset lines;
    /// parallel neighbours keep the plain offset point.
    #[must_use]
    pub fn offset_open(&self, distance: f64) -> Self {
        let n = self.points.len();
        if n < 2 || distance.abs() < TOLERANCE {
            return Self::from_points(&self.points, false);
        }

        // Offset lines as (origin, direction) per segment.
        let mut lines = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let (a, b) = (self.points[i], self.points[i + 1]);
            let Ok(dir) = plan_direction(&a, &b) else {
                continue;
            };
            let shift = left_normal(&dir) * distance;
            lines.push((a + shift, b + shift, dir));
        }
        if lines.is_empty() {
            return Self::from_points(&self.points, false);
        }

        let mut out = Vec::with_capacity(lines.len() + 1);
        out.push(lines[0].0);
        for w in lines.windows(2) {
            let (a0, _, da) = w[0];
            let (b0, _, db) = w[1];
            match line_parameters(&a0, &da, &b0, &db) {
                Some((t, _)) => out.push(a0 + da * t),
                None => out.push(b0),
            }
        }
        if let Some(last) = lines.last() {
            out.push(last.1);
        }
        Self::from_points(&out, false)
    }
}
