use crate::math::Point3;

use super::edge::EdgeId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the adaptive grid.
    pub struct VertexId;
}

/// Data associated with a grid vertex.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The 3D position of the vertex.
    pub point: Point3,
    /// Edges incident to this vertex, in insertion order.
    pub edges: Vec<EdgeId>,
}

impl VertexData {
    /// Creates a new, unconnected vertex at the given point.
    #[must_use]
    pub fn new(point: Point3) -> Self {
        Self {
            point,
            edges: Vec::new(),
        }
    }
}
