pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Returns `true` if `offset` runs parallel or perpendicular to `direction`.
///
/// Both vectors are compared in the XY plane. A zero-length offset is
/// treated as aligned.
#[must_use]
pub fn is_axis_aligned(offset: &Vector3, direction: &Vector3, tolerance: f64) -> bool {
    let offset = Vector3::new(offset.x, offset.y, 0.0);
    let direction = Vector3::new(direction.x, direction.y, 0.0);
    let (ol, dl) = (offset.norm(), direction.norm());
    if ol < TOLERANCE || dl < TOLERANCE {
        return true;
    }
    let dot = offset.dot(&direction) / (ol * dl);
    dot.abs() < tolerance || (dot.abs() - 1.0).abs() < tolerance
}
