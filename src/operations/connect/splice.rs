use std::collections::HashSet;

use crate::error::{GraphError, Result};
use crate::geometry::Segment;
use crate::grid::{AdaptiveGrid, EdgeId, VertexId};
use crate::math::Point3;

/// Outcome of a splice walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpliceResult {
    /// The vertex now standing at the target point.
    Found(VertexId),
    /// No aligned edge between the segment ends contains the point.
    NotFound,
}

impl SpliceResult {
    /// Converts `NotFound` into a structural error naming the segment.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SpliceTargetNotFound` for `NotFound`.
    pub fn require(self, point: Point3, segment: &Segment) -> Result<VertexId> {
        match self {
            Self::Found(v) => Ok(v),
            Self::NotFound => Err(GraphError::SpliceTargetNotFound {
                point,
                start: segment.start,
                end: segment.end,
            }
            .into()),
        }
    }
}

/// Inserts a vertex at `point` on the chain of edges that runs from `start` to `end`.
///
/// Walks from `start`, following only edges that point the same way as the
/// segment, until it reaches the edge whose span contains `point`. That edge
/// is cut in two. A point that already coincides with a vertex on the walk
/// returns that vertex unchanged.
///
/// # Errors
///
/// Returns an error if the walk reaches a vertex missing from the grid.
pub fn splice(
    grid: &mut AdaptiveGrid,
    start: VertexId,
    end: VertexId,
    point: Point3,
    alignment_tolerance: f64,
) -> Result<SpliceResult> {
    let segment = Segment::new(grid.point(start)?, grid.point(end)?);
    let Ok(direction) = segment.direction() else {
        return Ok(SpliceResult::NotFound);
    };
    let tolerance = grid.tolerance();

    let mut current = start;
    let mut visited = HashSet::new();
    while visited.insert(current) {
        let here = grid.point(current)?;
        if (here - point).norm() < tolerance {
            return Ok(SpliceResult::Found(current));
        }
        if current == end {
            break;
        }

        let mut containing: Option<EdgeId> = None;
        let mut advance: Option<VertexId> = None;
        for (edge, next) in grid.neighbors(current) {
            let there = grid.point(next)?;
            let Ok(edge_dir) = Segment::new(here, there).direction() else {
                continue;
            };
            if edge_dir.dot(&direction) < 1.0 - alignment_tolerance {
                continue;
            }
            if Segment::new(here, there).contains(&point, tolerance) {
                containing = Some(edge);
                break;
            }
            if advance.is_none() && segment.contains(&there, tolerance) {
                advance = Some(next);
            }
        }

        if let Some(edge) = containing {
            return Ok(SpliceResult::Found(grid.cut_edge(edge, point)?));
        }
        match advance {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(SpliceResult::NotFound)
}

/// Returns the vertex at `point` on `segment`'s own chain of edges.
///
/// The point is always spliced from the segment's start. A vertex already
/// standing at the point but belonging to another chain, such as the far
/// side of a crossing, is reused and wired into this chain.
///
/// # Errors
///
/// Returns `GraphError::NoVertexAt` if the segment's ends are not in the grid,
/// or `GraphError::SpliceTargetNotFound` if no aligned edge contains the point.
pub fn resolve_on_segment(
    grid: &mut AdaptiveGrid,
    segment: &Segment,
    point: Point3,
    alignment_tolerance: f64,
) -> Result<VertexId> {
    let start = grid
        .try_get_vertex_index(&segment.start)
        .ok_or(GraphError::NoVertexAt(segment.start))?;
    let end = grid
        .try_get_vertex_index(&segment.end)
        .ok_or(GraphError::NoVertexAt(segment.end))?;
    splice(grid, start, end, point, alignment_tolerance)?.require(point, segment)
}
