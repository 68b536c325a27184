use tracing::{debug, warn};

use crate::config::EgressConfig;
use crate::elements::{Centerline, Openings, Room};
use crate::error::Result;
use crate::geometry::{Polyline, Segment};
use crate::grid::{AdaptiveGrid, VertexId};
use crate::math::polygon_2d::{farthest_indices, remove_collinear};
use crate::math::{is_axis_aligned, Point3};

use super::splice::resolve_on_segment;

/// Number of far corners recorded per variant.
const CORNERS_PER_VARIANT: usize = 2;

/// A far corner of a room, seen from one exit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    /// Leaf vertex inset from the corner, connected only to the exit.
    pub vertex: VertexId,
    /// The true corner position on the room boundary.
    pub position: Point3,
}

/// One way out of a room: an exit vertex and the room's farthest corners from it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvacuationVariant {
    pub exit: VertexId,
    pub exit_point: Point3,
    /// Boundary segment the exit was found on.
    pub boundary_segment: usize,
    /// Index of the corridor the exit opens onto.
    pub corridor: usize,
    /// Farthest corner first.
    pub corners: Vec<Corner>,
}

impl RoomEvacuationVariant {
    /// Longest straight distance from the exit to one of the corners.
    #[must_use]
    pub fn max_corner_distance(&self) -> f64 {
        self.corners
            .iter()
            .map(|c| (c.position - self.exit_point).norm())
            .fold(0.0, f64::max)
    }
}

/// All exit variants found for one room.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomVariants {
    /// Index of the room within its level.
    pub room: usize,
    pub variants: Vec<RoomEvacuationVariant>,
}

/// Where a room opening meets a corridor centerline.
struct CorridorHit {
    corridor: usize,
    segment: Segment,
    point: Point3,
    distance: f64,
}

/// Connects room boundaries to the corridor graph.
///
/// Each boundary segment that opens onto a corridor, through a door or
/// directly, yields one [`RoomEvacuationVariant`]. Segments are visited in
/// boundary order, so variant order is deterministic.
#[derive(Debug)]
pub struct RoomConnector<'a> {
    centerlines: &'a [Centerline],
    openings: Option<&'a Openings>,
    config: &'a EgressConfig,
}

impl<'a> RoomConnector<'a> {
    /// Creates a new room connector for one level.
    #[must_use]
    pub fn new(
        centerlines: &'a [Centerline],
        openings: Option<&'a Openings>,
        config: &'a EgressConfig,
    ) -> Self {
        Self {
            centerlines,
            openings,
            config,
        }
    }

    /// Connects every room, returning their variants in room order.
    ///
    /// # Errors
    ///
    /// Returns a structural graph error if an exit cannot be spliced into its
    /// corridor.
    pub fn execute(&self, grid: &mut AdaptiveGrid, rooms: &[Room]) -> Result<Vec<RoomVariants>> {
        rooms
            .iter()
            .enumerate()
            .map(|(i, room)| self.connect_room(grid, i, room))
            .collect()
    }

    /// Connects a single room.
    ///
    /// # Errors
    ///
    /// Returns a structural graph error if an exit cannot be spliced into its
    /// corridor.
    pub fn connect_room(
        &self,
        grid: &mut AdaptiveGrid,
        index: usize,
        room: &Room,
    ) -> Result<RoomVariants> {
        let boundary = remove_collinear(&room.boundary, grid.tolerance());
        let mut variants = Vec::new();
        if boundary.len() < 3 {
            warn!(room = %room.name, "room boundary is degenerate");
            return Ok(RoomVariants {
                room: index,
                variants,
            });
        }

        let polygon = Polyline::from_points(&boundary, true);
        for (s, segment) in polygon.segments().enumerate() {
            let Some(midpoint) = self.opening_point(&segment) else {
                continue;
            };
            let Some(hit) = self.nearest_corridor(&midpoint) else {
                continue;
            };

            let on_corridor =
                resolve_on_segment(grid, &hit.segment, hit.point, self.config.alignment_tolerance)?;
            let exit = if (midpoint - hit.point).norm() < grid.tolerance() {
                on_corridor
            } else {
                grid.add_vertex_connected(midpoint, &[on_corridor], false)?
            };
            let exit_point = grid.point(exit)?;

            let corners = self.add_corners(grid, exit, &exit_point, &boundary)?;
            debug!(
                room = %room.name,
                boundary_segment = s,
                corridor = hit.corridor,
                "room opens onto corridor"
            );
            variants.push(RoomEvacuationVariant {
                exit,
                exit_point,
                boundary_segment: s,
                corridor: hit.corridor,
                corners,
            });
        }

        debug!(room = %room.name, variants = variants.len(), "room connected");
        Ok(RoomVariants {
            room: index,
            variants,
        })
    }

    /// Picks the point on `segment` a room would be left through, if any.
    ///
    /// A door on the segment wins. Without one, a segment covered by a wall
    /// record is closed whenever door data is present; otherwise the
    /// segment's midpoint is used.
    fn opening_point(&self, segment: &Segment) -> Option<Point3> {
        let tolerance = self.config.door_tolerance;
        match self.openings {
            Some(openings) => {
                if let Some(door) = openings.door_on(segment, tolerance) {
                    return Some(door.position);
                }
                if openings.is_walled(segment, tolerance) {
                    return None;
                }
                Some(segment.midpoint())
            }
            None => Some(segment.midpoint()),
        }
    }

    /// Nearest centerline segment that `point` opens squarely onto.
    ///
    /// Ties keep the earliest segment.
    fn nearest_corridor(&self, point: &Point3) -> Option<CorridorHit> {
        let mut best: Option<CorridorHit> = None;
        for line in self.centerlines {
            let reach = line.half_width + self.config.room_connection_margin;
            for i in 0..line.segment_count() {
                let segment = line.segment(i);
                let Ok(direction) = segment.direction() else {
                    continue;
                };
                let closest = segment.closest_point(point);
                let offset = point - closest;
                let distance = offset.norm();
                if distance >= reach
                    || !is_axis_aligned(&offset, &direction, self.config.alignment_tolerance)
                {
                    continue;
                }
                if best.as_ref().is_none_or(|b| distance < b.distance) {
                    best = Some(CorridorHit {
                        corridor: line.corridor,
                        segment,
                        point: closest,
                        distance,
                    });
                }
            }
        }
        best
    }

    /// Adds leaf vertices for the room's farthest corners from the exit.
    fn add_corners(
        &self,
        grid: &mut AdaptiveGrid,
        exit: VertexId,
        exit_point: &Point3,
        boundary: &[Point3],
    ) -> Result<Vec<Corner>> {
        let mut corners = Vec::with_capacity(CORNERS_PER_VARIANT);
        for i in farthest_indices(boundary, exit_point, CORNERS_PER_VARIANT) {
            let position = boundary[i];
            let toward_exit = exit_point - position;
            let distance = toward_exit.norm();
            let leaf_point = if distance > self.config.corner_inset {
                position + toward_exit * (self.config.corner_inset / distance)
            } else {
                position
            };
            let vertex = grid.add_vertex_connected(leaf_point, &[exit], false)?;
            corners.push(Corner { vertex, position });
        }
        Ok(corners)
    }
}
