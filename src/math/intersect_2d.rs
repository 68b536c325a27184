use super::{Point3, Vector3, TOLERANCE};

/// Z component of the cross product of two plan vectors.
#[must_use]
pub fn cross_z(a: &Vector3, b: &Vector3) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Where two infinite lines meet in plan.
///
/// The lines are `origin_a + t * dir_a` and `origin_b + u * dir_b`. Returns
/// `(t, u)`, or `None` when the lines run parallel.
#[must_use]
pub fn line_parameters(
    origin_a: &Point3,
    dir_a: &Vector3,
    origin_b: &Point3,
    dir_b: &Vector3,
) -> Option<(f64, f64)> {
    let denom = cross_z(dir_a, dir_b);
    if denom.abs() < TOLERANCE {
        return None;
    }
    let between = origin_b - origin_a;
    Some((cross_z(&between, dir_b) / denom, cross_z(&between, dir_a) / denom))
}

/// Point where segments `a` and `b` cross in plan, endpoints included.
///
/// The point keeps segment `a`'s elevation at the crossing.
#[must_use]
pub fn segment_crossing(a0: &Point3, a1: &Point3, b0: &Point3, b1: &Point3) -> Option<Point3> {
    let dir_a = a1 - a0;
    let (t, u) = line_parameters(a0, &dir_a, b0, &(b1 - b0))?;
    let within = |s: f64| (-TOLERANCE..=1.0 + TOLERANCE).contains(&s);
    (within(t) && within(u)).then(|| a0 + dir_a * t.clamp(0.0, 1.0))
}
