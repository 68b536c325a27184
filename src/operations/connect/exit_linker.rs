use tracing::debug;

use crate::error::Result;
use crate::grid::{AdaptiveGrid, VertexId};
use crate::math::Point3;

/// Snaps building exit locations onto a level's grid.
#[derive(Debug)]
pub struct ExitLinker<'a> {
    exits: &'a [Point3],
    level_separation: f64,
    snap_distance: f64,
}

impl<'a> ExitLinker<'a> {
    /// Creates a new exit linker.
    ///
    /// Exits farther than `level_separation` from the grid are ignored as
    /// belonging to another level. Exits within `snap_distance` reuse the grid
    /// vertex they land on.
    #[must_use]
    pub fn new(exits: &'a [Point3], level_separation: f64, snap_distance: f64) -> Self {
        Self {
            exits,
            level_separation,
            snap_distance,
        }
    }

    /// Links every exit, returning the distinct exit vertices in first-seen order.
    ///
    /// An empty result means the level has no usable exit.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is modified inconsistently while linking.
    pub fn execute(&self, grid: &mut AdaptiveGrid) -> Result<Vec<VertexId>> {
        let mut linked: Vec<VertexId> = Vec::new();
        for exit in self.exits {
            if let Some(v) = self.link(grid, exit)? {
                if !linked.contains(&v) {
                    linked.push(v);
                }
            }
        }
        debug!(requested = self.exits.len(), linked = linked.len(), "exits linked");
        Ok(linked)
    }

    fn link(&self, grid: &mut AdaptiveGrid, exit: &Point3) -> Result<Option<VertexId>> {
        let Some((edge, closest)) = grid.closest_edge(exit) else {
            return Ok(None);
        };
        if (exit - closest).norm() > self.level_separation {
            return Ok(None);
        }

        // Bring the exit down (or up) onto the edge's elevation.
        let projected = Point3::new(exit.x, exit.y, closest.z);

        let edge_data = *grid.edge(edge)?;
        let anchor = grid.add_vertex_connected(closest, &[edge_data.start, edge_data.end], true)?;
        if (projected - closest).norm() < self.snap_distance {
            return Ok(Some(anchor));
        }
        Ok(Some(grid.add_vertex_connected(projected, &[anchor], false)?))
    }
}
