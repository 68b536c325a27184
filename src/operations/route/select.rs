use tracing::warn;

use crate::error::Result;
use crate::grid::{AdaptiveGrid, PathTree, VertexId};
use crate::operations::connect::{RoomEvacuationVariant, RoomVariants};

/// The variant chosen for a room.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedRoute {
    pub room: usize,
    pub variant: RoomEvacuationVariant,
}

/// Picks, for every room, the exit variant with the shortest total walk.
///
/// A variant's cost is its exit's distance along the path tree plus its
/// longest corner distance. The first minimum found wins.
#[derive(Debug)]
pub struct RouteSelector<'a> {
    grid: &'a AdaptiveGrid,
    tree: &'a PathTree,
}

impl<'a> RouteSelector<'a> {
    /// Creates a new route selector.
    #[must_use]
    pub fn new(grid: &'a AdaptiveGrid, tree: &'a PathTree) -> Self {
        Self { grid, tree }
    }

    /// Selects one route per room. Rooms with no reachable variant are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if a tree vertex is missing from the grid.
    pub fn execute(&self, rooms: &[RoomVariants]) -> Result<Vec<SelectedRoute>> {
        let mut selected = Vec::with_capacity(rooms.len());
        for room in rooms {
            if let Some(variant) = self.select(room)? {
                selected.push(SelectedRoute {
                    room: room.room,
                    variant: variant.clone(),
                });
            } else if !room.variants.is_empty() {
                warn!(room = room.room, "no variant of the room reaches an exit");
            }
        }
        Ok(selected)
    }

    fn select<'r>(&self, room: &'r RoomVariants) -> Result<Option<&'r RoomEvacuationVariant>> {
        if let [only] = room.variants.as_slice() {
            return Ok(self.tree.contains(only.exit).then_some(only));
        }

        let mut best: Option<(&RoomEvacuationVariant, f64)> = None;
        for variant in &room.variants {
            let Some(walk) = self.tree_distance(variant.exit)? else {
                continue;
            };
            let total = walk + variant.max_corner_distance();
            if best.is_none_or(|(_, d)| total < d) {
                best = Some((variant, total));
            }
        }
        Ok(best.map(|(v, _)| v))
    }

    /// Distance from `v` to its tree root, summed along the trunk chain.
    ///
    /// Returns `None` if `v` is not in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if a vertex on the chain is missing from the grid.
    pub fn tree_distance(&self, v: VertexId) -> Result<Option<f64>> {
        if !self.tree.contains(v) {
            return Ok(None);
        }
        let mut total = 0.0;
        let mut current = v;
        let mut steps = 0;
        while let Some(next) = self.tree.trunk(current) {
            total += (self.grid.point(next)? - self.grid.point(current)?).norm();
            current = next;
            steps += 1;
            if steps > self.tree.len() {
                // A cycle in the trunk chain: treat as unreachable.
                return Ok(None);
            }
        }
        Ok(Some(total))
    }
}
