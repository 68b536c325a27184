use std::collections::HashMap;

use crate::error::{GraphError, OperationError, Result};
use crate::grid::{AdaptiveGrid, EdgeId, PathTree, VertexId};
use crate::math::Point3;

use super::select::SelectedRoute;

/// Distance from a selected room exit to the building exit, plus its corners.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRoute {
    pub room: usize,
    pub exit: VertexId,
    pub exit_point: Point3,
    /// Walk along the path tree from the room exit to the building exit.
    pub corridor_distance: f64,
    /// Straight distance from the room exit to its farthest corner.
    pub farthest_corner_distance: f64,
    pub total_distance: f64,
    /// Set when a travel limit is configured and `total_distance` exceeds it.
    pub exceeds_limit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Straight line across a room, from its exit to a far corner.
    Room,
    /// One edge of the path tree.
    Corridor,
}

/// A line to draw, tagged with the remaining walk to a building exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotatedSegment {
    pub start: Point3,
    pub end: Point3,
    pub distance: f64,
    pub kind: SegmentKind,
}

/// A tree edge from a vertex to its trunk, with the distance from the vertex
/// to the tree root.
#[derive(Debug, Clone, Copy)]
struct CachedEdge {
    start: Point3,
    end: Point3,
    distance: f64,
}

/// Memoized accumulated distances along a [`PathTree`].
///
/// Each tree edge is computed at most once, however many routes share it.
/// Entries keep insertion order.
#[derive(Debug, Default)]
pub struct DistanceCache {
    index: HashMap<EdgeId, usize>,
    entries: Vec<CachedEdge>,
    computations: usize,
}

impl DistanceCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of edge distances computed so far.
    #[must_use]
    pub fn computations(&self) -> usize {
        self.computations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distance from `v` to its tree root. A vertex with no trunk is at zero.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::EdgeNotFound` if the tree names a trunk the grid
    /// has no edge to, or `OperationError::Failed` if the trunk chain loops.
    pub fn accumulated(
        &mut self,
        grid: &AdaptiveGrid,
        tree: &PathTree,
        v: VertexId,
    ) -> Result<f64> {
        // Walk toward the root until a cached edge or the root itself.
        let mut pending: Vec<(EdgeId, VertexId, VertexId)> = Vec::new();
        let mut base = 0.0;
        let mut current = v;
        while let Some(trunk) = tree.trunk(current) {
            let edge = grid
                .edge_between(current, trunk)
                .ok_or(GraphError::EdgeNotFound)?;
            if let Some(&i) = self.index.get(&edge) {
                base = self.entries[i].distance;
                break;
            }
            pending.push((edge, current, trunk));
            if pending.len() > tree.len() {
                return Err(
                    OperationError::Failed("path tree trunk chain forms a cycle".into()).into(),
                );
            }
            current = trunk;
        }

        // Unwind from the root side outward.
        let mut distance = base;
        while let Some((edge, from, trunk)) = pending.pop() {
            let start = grid.point(from)?;
            let end = grid.point(trunk)?;
            distance += (end - start).norm();
            self.computations += 1;
            self.index.insert(edge, self.entries.len());
            self.entries.push(CachedEdge {
                start,
                end,
                distance,
            });
        }
        Ok(distance)
    }

    /// Cached edges as corridor segments, in the order they were computed.
    pub fn segments(&self) -> impl Iterator<Item = AnnotatedSegment> + '_ {
        self.entries.iter().map(|e| AnnotatedSegment {
            start: e.start,
            end: e.end,
            distance: e.distance,
            kind: SegmentKind::Corridor,
        })
    }
}

/// Result of [`DistanceAnnotator::execute`].
#[derive(Debug, Clone, Default)]
pub struct Annotation {
    pub routes: Vec<RoomRoute>,
    /// Room lines first, in route order, then every tree edge once.
    pub segments: Vec<AnnotatedSegment>,
}

/// Computes travel distances for selected routes and the lines to draw for them.
#[derive(Debug)]
pub struct DistanceAnnotator<'a> {
    grid: &'a AdaptiveGrid,
    tree: &'a PathTree,
    corner_tie_tolerance: f64,
    max_travel_distance: Option<f64>,
}

impl<'a> DistanceAnnotator<'a> {
    /// Creates a new distance annotator.
    #[must_use]
    pub fn new(
        grid: &'a AdaptiveGrid,
        tree: &'a PathTree,
        corner_tie_tolerance: f64,
        max_travel_distance: Option<f64>,
    ) -> Self {
        Self {
            grid,
            tree,
            corner_tie_tolerance,
            max_travel_distance,
        }
    }

    /// Annotates every selected route.
    ///
    /// # Errors
    ///
    /// Returns an error if the path tree does not match the grid.
    pub fn execute(&self, selected: &[SelectedRoute]) -> Result<Annotation> {
        let mut cache = DistanceCache::new();
        self.execute_with_cache(selected, &mut cache)
    }

    /// Like [`execute`](Self::execute), reusing and filling `cache`.
    ///
    /// # Errors
    ///
    /// Returns an error if the path tree does not match the grid.
    pub fn execute_with_cache(
        &self,
        selected: &[SelectedRoute],
        cache: &mut DistanceCache,
    ) -> Result<Annotation> {
        let mut annotation = Annotation::default();

        for route in selected {
            let variant = &route.variant;
            let corridor_distance = cache.accumulated(self.grid, self.tree, variant.exit)?;
            let farthest = variant.max_corner_distance();

            for corner in &variant.corners {
                let d = (corner.position - variant.exit_point).norm();
                if farthest > 0.0 && d / farthest > 1.0 - self.corner_tie_tolerance {
                    annotation.segments.push(AnnotatedSegment {
                        start: variant.exit_point,
                        end: corner.position,
                        distance: d + corridor_distance,
                        kind: SegmentKind::Room,
                    });
                }
            }

            let total_distance = corridor_distance + farthest;
            annotation.routes.push(RoomRoute {
                room: route.room,
                exit: variant.exit,
                exit_point: variant.exit_point,
                corridor_distance,
                farthest_corner_distance: farthest,
                total_distance,
                exceeds_limit: self.max_travel_distance.is_some_and(|limit| total_distance > limit),
            });
        }

        annotation.segments.extend(cache.segments());
        Ok(annotation)
    }
}
