use super::{Point3, TOLERANCE};

/// Returns the closest point to `p` on the segment from `a` to `b`,
/// together with its parameter `t` in `[0, 1]`.
#[must_use]
pub fn closest_point_on_segment(p: &Point3, a: &Point3, b: &Point3) -> (Point3, f64) {
    let span = b - a;
    let span_sq = span.norm_squared();
    if span_sq < TOLERANCE * TOLERANCE {
        return (*a, 0.0);
    }
    let t = ((p - a).dot(&span) / span_sq).clamp(0.0, 1.0);
    (a + span * t, t)
}

/// Distance from `p` to the nearest point of segment `a`-`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point3, a: &Point3, b: &Point3) -> f64 {
    (p - closest_point_on_segment(p, a, b).0).norm()
}

/// Returns `true` if `p` lies on the segment from `a` to `b` within `tolerance`.
#[must_use]
pub fn point_on_segment(p: &Point3, a: &Point3, b: &Point3, tolerance: f64) -> bool {
    point_to_segment_dist(p, a, b) < tolerance
}

/// Closest pair of points between two non-crossing segments.
///
/// Checks the four endpoint projections in the order `a0`, `a1`, `b0`, `b1`
/// and keeps the first minimum. Returns `(point_on_a, point_on_b, distance)`.
#[must_use]
pub fn closest_points_between_segments(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
) -> (Point3, Point3, f64) {
    let candidates = [
        (*a0, closest_point_on_segment(a0, b0, b1).0),
        (*a1, closest_point_on_segment(a1, b0, b1).0),
        (closest_point_on_segment(b0, a0, a1).0, *b0),
        (closest_point_on_segment(b1, a0, a1).0, *b1),
    ];

    let mut best = (candidates[0].0, candidates[0].1, f64::INFINITY);
    for (pa, pb) in candidates {
        let d = (pb - pa).norm();
        if d < best.2 - TOLERANCE {
            best = (pa, pb, d);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn door_beside_wall_is_offset_distance() {
        let d = point_to_segment_dist(&p(2.5, 0.15), &p(0.0, 0.0), &p(5.0, 0.0));
        assert!((d - 0.15).abs() < TOL, "d={d}");
        assert!(point_on_segment(&p(2.5, 0.15), &p(0.0, 0.0), &p(5.0, 0.0), 0.2));
    }

    #[test]
    fn past_the_end_measures_to_endpoint() {
        let d = point_to_segment_dist(&p(8.0, 4.0), &p(0.0, 0.0), &p(5.0, 0.0));
        assert!((d - 5.0).abs() < TOL, "d={d}");
    }

    #[test]
    fn collapsed_segment_projects_to_start() {
        let (c, t) = closest_point_on_segment(&p(3.0, 4.0), &p(1.0, 1.0), &p(1.0, 1.0));
        assert_eq!(c, p(1.0, 1.0));
        assert!(t.abs() < TOL);
    }

    #[test]
    fn closest_point_parameter() {
        let (c, t) = closest_point_on_segment(&p(3.0, 2.0), &p(0.0, 0.0), &p(4.0, 0.0));
        assert!((c.x - 3.0).abs() < TOL);
        assert!((t - 0.75).abs() < TOL);
    }

    #[test]
    fn t_junction_gap() {
        // Vertical segment ending 1 unit below a horizontal one.
        let (pa, pb, d) = closest_points_between_segments(
            &p(0.0, 0.0),
            &p(10.0, 0.0),
            &p(4.0, -5.0),
            &p(4.0, -1.0),
        );
        assert!((d - 1.0).abs() < TOL, "d={d}");
        assert!((pa - p(4.0, 0.0)).norm() < TOL);
        assert!((pb - p(4.0, -1.0)).norm() < TOL);
    }

    #[test]
    fn parallel_overlap_keeps_first_minimum() {
        let (pa, pb, d) = closest_points_between_segments(
            &p(0.0, 0.0),
            &p(10.0, 0.0),
            &p(0.0, 1.0),
            &p(10.0, 1.0),
        );
        assert!((d - 1.0).abs() < TOL);
        // a0 is scanned first.
        assert!((pa - p(0.0, 0.0)).norm() < TOL);
        assert!((pb - p(0.0, 1.0)).norm() < TOL);
    }
}
