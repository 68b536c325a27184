use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the adaptive grid.
    pub struct EdgeId;
}

/// An undirected connection between two grid vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeData {
    pub start: VertexId,
    pub end: VertexId,
}

impl EdgeData {
    #[must_use]
    pub fn new(start: VertexId, end: VertexId) -> Self {
        Self { start, end }
    }

    /// Returns the endpoint opposite `v`, or `None` if `v` is not on this edge.
    #[must_use]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if self.start == v {
            Some(self.end)
        } else if self.end == v {
            Some(self.start)
        } else {
            None
        }
    }

    /// Returns `true` if the edge joins `a` and `b` in either order.
    #[must_use]
    pub fn joins(&self, a: VertexId, b: VertexId) -> bool {
        (self.start == a && self.end == b) || (self.start == b && self.end == a)
    }
}
