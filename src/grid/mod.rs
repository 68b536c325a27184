pub mod edge;
pub mod path_tree;
pub mod vertex;

pub use edge::{EdgeData, EdgeId};
pub use path_tree::{PathTree, PathTreeConfig, TreeNode};
pub use vertex::{VertexData, VertexId};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::GraphError;
use crate::geometry::Segment;
use crate::math::Point3;

/// Default radius within which two points resolve to the same vertex.
pub const DEFAULT_GRID_TOLERANCE: f64 = 1e-5;

/// Spatial graph of walkable connections on one building level.
///
/// Vertices and edges live in generational arenas and reference each other
/// by typed IDs. A spatial hash keyed on the tolerance guarantees that no
/// two vertices sit within tolerance of each other.
#[derive(Debug)]
pub struct AdaptiveGrid {
    vertices: SlotMap<VertexId, VertexData>,
    edges: SlotMap<EdgeId, EdgeData>,
    cells: HashMap<(i64, i64, i64), Vec<VertexId>>,
    tolerance: f64,
}

impl Default for AdaptiveGrid {
    fn default() -> Self {
        Self::with_tolerance(DEFAULT_GRID_TOLERANCE)
    }
}

impl AdaptiveGrid {
    /// Creates a new, empty grid with the default tolerance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty grid that merges points closer than `tolerance`.
    #[must_use]
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self {
            vertices: SlotMap::with_key(),
            edges: SlotMap::with_key(),
            cells: HashMap::new(),
            tolerance,
        }
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Inserts a vertex at `point`, or returns the existing vertex within tolerance.
    pub fn add_vertex(&mut self, point: Point3) -> VertexId {
        if let Some(existing) = self.try_get_vertex_index(&point) {
            return existing;
        }
        let id = self.vertices.insert(VertexData::new(point));
        let key = self.cell_key(&point);
        self.cells.entry(key).or_default().push(id);
        id
    }

    /// Inserts a vertex and connects it to each of `connect_to`.
    ///
    /// With `cut` set, a point lying strictly inside an edge between two of
    /// the connection vertices splits that edge first.
    ///
    /// # Errors
    ///
    /// Returns an error if any connection vertex is not in the grid.
    pub fn add_vertex_connected(
        &mut self,
        point: Point3,
        connect_to: &[VertexId],
        cut: bool,
    ) -> Result<VertexId, GraphError> {
        for &target in connect_to {
            self.vertex(target)?;
        }
        let containing = if cut {
            self.edge_between_containing(connect_to, &point)
        } else {
            None
        };
        let v = match containing {
            Some(edge) => self.cut_edge(edge, point)?,
            None => self.add_vertex(point),
        };
        for &target in connect_to {
            if target != v {
                self.add_edge(v, target)?;
            }
        }
        Ok(v)
    }

    /// Looks up the vertex within tolerance of `point`.
    #[must_use]
    pub fn try_get_vertex_index(&self, point: &Point3) -> Option<VertexId> {
        let (cx, cy, cz) = self.cell_key(point);
        // A match can sit in any of the 27 cells around the point's own.
        (-1..=1)
            .flat_map(|dx| (-1..=1).flat_map(move |dy| (-1..=1).map(move |dz| (dx, dy, dz))))
            .filter_map(|(dx, dy, dz)| self.cells.get(&(cx + dx, cy + dy, cz + dz)))
            .flatten()
            .copied()
            .find(|&id| {
                self.vertices
                    .get(id)
                    .is_some_and(|data| (point - data.point).norm() < self.tolerance)
            })
    }

    /// Data stored for vertex `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the grid.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData, GraphError> {
        self.vertices.get(id).ok_or(GraphError::VertexNotFound)
    }

    /// Returns the position of a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not in the grid.
    pub fn point(&self, id: VertexId) -> Result<Point3, GraphError> {
        self.vertex(id).map(|v| v.point)
    }

    /// Iterates `(edge, neighbor)` pairs around `v`. Empty for unknown vertices.
    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = (EdgeId, VertexId)> + '_ {
        self.vertices.get(v).into_iter().flat_map(move |data| {
            data.edges.iter().filter_map(move |&e| {
                self.edges
                    .get(e)
                    .and_then(|edge| edge.other(v))
                    .map(|other| (e, other))
            })
        })
    }

    /// Connects `a` and `b`, returning the existing edge if they are already joined.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::DegenerateEdge` if `a == b`, or an error if either
    /// vertex is not in the grid.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId) -> Result<EdgeId, GraphError> {
        if a == b {
            return Err(GraphError::DegenerateEdge);
        }
        self.vertex(a)?;
        self.vertex(b)?;
        if let Some(existing) = self.edge_between(a, b) {
            return Ok(existing);
        }
        let id = self.edges.insert(EdgeData::new(a, b));
        for v in [a, b] {
            if let Some(data) = self.vertices.get_mut(v) {
                data.edges.push(id);
            }
        }
        Ok(id)
    }

    /// Data stored for edge `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the grid.
    pub fn edge(&self, id: EdgeId) -> Result<&EdgeData, GraphError> {
        self.edges.get(id).ok_or(GraphError::EdgeNotFound)
    }

    /// Iterates all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &EdgeData)> {
        self.edges.iter()
    }

    /// Returns the edge joining `a` and `b`, if any.
    #[must_use]
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        let data = self.vertices.get(a)?;
        data.edges.iter().copied().find(|&e| {
            self.edges
                .get(e)
                .is_some_and(|edge| edge.joins(a, b))
        })
    }

    /// Returns the straight segment an edge spans.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or one of its vertices is missing.
    pub fn edge_segment(&self, id: EdgeId) -> Result<Segment, GraphError> {
        let edge = self.edge(id)?;
        Ok(Segment::new(self.point(edge.start)?, self.point(edge.end)?))
    }

    /// Removes an edge and detaches it from both endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge is not in the grid.
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeData, GraphError> {
        let data = self.edges.remove(id).ok_or(GraphError::EdgeNotFound)?;
        for v in [data.start, data.end] {
            if let Some(vertex) = self.vertices.get_mut(v) {
                vertex.edges.retain(|&e| e != id);
            }
        }
        Ok(data)
    }

    /// Splits an edge at the projection of `point` onto it.
    ///
    /// If the projection coincides with an endpoint (or any other existing
    /// vertex), that vertex is returned and no new vertex is created.
    ///
    /// # Errors
    ///
    /// Returns an error if the edge or its vertices are missing.
    pub fn cut_edge(&mut self, id: EdgeId, point: Point3) -> Result<VertexId, GraphError> {
        let data = *self.edge(id)?;
        let target = self.edge_segment(id)?.closest_point(&point);

        let v = self.add_vertex(target);
        if v == data.start || v == data.end {
            return Ok(v);
        }
        self.remove_edge(id)?;
        self.add_edge(data.start, v)?;
        self.add_edge(v, data.end)?;
        Ok(v)
    }

    /// Finds the edge closest to `point` and the closest point on it.
    ///
    /// Ties keep the first edge in arena order.
    #[must_use]
    pub fn closest_edge(&self, point: &Point3) -> Option<(EdgeId, Point3)> {
        let mut best: Option<(EdgeId, Point3, f64)> = None;
        for (id, _) in self.edges() {
            let Ok(segment) = self.edge_segment(id) else {
                continue;
            };
            let closest = segment.closest_point(point);
            let d = (point - closest).norm();
            if best.is_none_or(|(_, _, bd)| d < bd) {
                best = Some((id, closest, d));
            }
        }
        best.map(|(id, p, _)| (id, p))
    }

    /// Finds an edge joining two of `vertices` whose interior contains `point`.
    fn edge_between_containing(&self, vertices: &[VertexId], point: &Point3) -> Option<EdgeId> {
        for (i, &a) in vertices.iter().enumerate() {
            for &b in &vertices[i + 1..] {
                let Some(edge) = self.edge_between(a, b) else {
                    continue;
                };
                let Ok(segment) = self.edge_segment(edge) else {
                    continue;
                };
                let inside = segment.contains(point, self.tolerance)
                    && (point - segment.start).norm() >= self.tolerance
                    && (point - segment.end).norm() >= self.tolerance;
                if inside {
                    return Some(edge);
                }
            }
        }
        None
    }

    /// Hash cell of side `tolerance` that holds `p`.
    #[allow(clippy::cast_possible_truncation)]
    fn cell_key(&self, p: &Point3) -> (i64, i64, i64) {
        let cell = |c: f64| (c / self.tolerance).floor() as i64;
        (cell(p.x), cell(p.y), cell(p.z))
    }
}
