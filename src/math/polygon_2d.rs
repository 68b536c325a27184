use super::{Point3, Vector3, TOLERANCE};
use crate::error::{GeometryError, Result};

/// Removes repeated and collinear vertices from a closed polygon.
///
/// A vertex is dropped when it coincides with its predecessor or lies on
/// the straight line through its neighbours. Repeats until stable so
/// runs of collinear points collapse fully.
#[must_use]
pub fn remove_collinear(points: &[Point3], tolerance: f64) -> Vec<Point3> {
    let mut pts: Vec<Point3> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last().is_none_or(|q| (p - q).norm() >= tolerance) {
            pts.push(*p);
        }
    }
    while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() < tolerance {
        pts.pop();
    }

    loop {
        let n = pts.len();
        if n < 3 {
            return pts;
        }
        let drop = (0..n).find(|&i| {
            let prev = &pts[(i + n - 1) % n];
            let next = &pts[(i + 1) % n];
            let d = next - prev;
            let len = d.norm();
            if len < tolerance {
                return true;
            }
            let v = pts[i] - prev;
            (d.x * v.y - d.y * v.x).abs() / len < tolerance
        });
        match drop {
            Some(i) => {
                pts.remove(i);
            }
            None => return pts,
        }
    }
}

/// Unit plan direction from `a` to `b`, ignoring elevation.
///
/// # Errors
///
/// Returns `GeometryError::ZeroLengthSegment` if `a` and `b` coincide in plan.
pub fn plan_direction(a: &Point3, b: &Point3) -> Result<Vector3> {
    Vector3::new(b.x - a.x, b.y - a.y, 0.0)
        .try_normalize(TOLERANCE)
        .ok_or_else(|| GeometryError::ZeroLengthSegment.into())
}

/// `dir` turned a quarter to the left in plan.
#[must_use]
pub fn left_normal(dir: &Vector3) -> Vector3 {
    Vector3::new(-dir.y, dir.x, 0.0)
}

/// Returns the indices of the `count` points farthest from `target`,
/// farthest first. Equal distances keep input order.
#[must_use]
pub fn farthest_indices(points: &[Point3], target: &Point3, count: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - target).norm()))
        .collect();
    // Stable sort keeps boundary order on ties.
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.into_iter().take(count).map(|(i, _)| i).collect()
}
