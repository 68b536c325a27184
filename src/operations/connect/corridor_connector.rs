use tracing::debug;

use crate::error::Result;
use crate::elements::Centerline;
use crate::geometry::Segment;
use crate::grid::{AdaptiveGrid, EdgeId, VertexId};
use crate::math::{is_axis_aligned, Point3};

use super::splice::resolve_on_segment;

/// Segments on the same centerline this close in index never connect.
const SELF_PAIR_SPAN: usize = 2;

/// A connection made between two centerline segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub from: VertexId,
    pub to: VertexId,
    pub edge: EdgeId,
}

/// Connections added by [`CorridorConnector::execute`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionReport {
    pub connections: Vec<Connection>,
    /// Pairs that met at a single shared point, so no edge was needed.
    pub junctions: usize,
}

/// Joins corridor centerlines that pass close enough to be one walkable space.
///
/// Every ordered pair of centerline segments is tested, including a line
/// against itself. A pair connects when its closest points are nearer than
/// the two corridors' half-widths combined, and the offset between them runs
/// parallel or perpendicular to the first segment. Crossing segments
/// connect at their intersection.
#[derive(Debug)]
pub struct CorridorConnector<'a> {
    centerlines: &'a [Centerline],
    alignment_tolerance: f64,
}

impl<'a> CorridorConnector<'a> {
    /// Creates a new connector over the centerlines of one level.
    #[must_use]
    pub fn new(centerlines: &'a [Centerline], alignment_tolerance: f64) -> Self {
        Self {
            centerlines,
            alignment_tolerance,
        }
    }

    /// Adds every centerline to the grid as a chain of vertices and edges.
    ///
    /// # Errors
    ///
    /// Returns an error if an edge cannot be added.
    pub fn insert_centerlines(&self, grid: &mut AdaptiveGrid) -> Result<()> {
        for line in self.centerlines {
            let ids: Vec<VertexId> = line
                .polyline
                .points
                .iter()
                .map(|p| grid.add_vertex(*p))
                .collect();
            for w in ids.windows(2) {
                if w[0] != w[1] {
                    grid.add_edge(w[0], w[1])?;
                }
            }
        }
        Ok(())
    }

    /// Executes the connection pass.
    ///
    /// # Errors
    ///
    /// Returns `GraphError::SpliceTargetNotFound` if a connection point cannot
    /// be placed on its own segment's edges, or `GraphError::NoVertexAt` if a
    /// centerline was never inserted.
    pub fn execute(&self, grid: &mut AdaptiveGrid) -> Result<ConnectionReport> {
        let mut report = ConnectionReport::default();

        for (a, line_a) in self.centerlines.iter().enumerate() {
            for i in 0..line_a.segment_count() {
                let seg_a = line_a.segment(i);
                for (b, line_b) in self.centerlines.iter().enumerate() {
                    for j in 0..line_b.segment_count() {
                        if a == b && i.abs_diff(j) <= SELF_PAIR_SPAN {
                            continue;
                        }
                        let seg_b = line_b.segment(j);
                        let reach = line_a.half_width + line_b.half_width;
                        let Some((pa, pb)) = self.connection_points(&seg_a, &seg_b, reach) else {
                            continue;
                        };

                        let va = resolve_on_segment(grid, &seg_a, pa, self.alignment_tolerance)?;
                        let vb = resolve_on_segment(grid, &seg_b, pb, self.alignment_tolerance)?;
                        if va == vb {
                            report.junctions += 1;
                            continue;
                        }
                        if grid.edge_between(va, vb).is_some() {
                            continue;
                        }
                        let edge = grid.add_edge(va, vb)?;
                        report.connections.push(Connection {
                            from: va,
                            to: vb,
                            edge,
                        });
                    }
                }
            }
        }

        debug!(
            connections = report.connections.len(),
            junctions = report.junctions,
            "corridor centerlines connected"
        );
        Ok(report)
    }

    /// Finds where `seg_a` and `seg_b` would join, if they are close and square enough.
    fn connection_points(
        &self,
        seg_a: &Segment,
        seg_b: &Segment,
        reach: f64,
    ) -> Option<(Point3, Point3)> {
        if let Some(x) = seg_a.intersect(seg_b) {
            return Some((x, x));
        }
        let (pa, pb) = seg_a.closest_points(seg_b);
        let offset = pb - pa;
        if offset.norm() >= reach {
            return None;
        }
        let direction = seg_a.direction().ok()?;
        is_axis_aligned(&offset, &direction, self.alignment_tolerance).then_some((pa, pb))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::elements::Corridor;
    use crate::error::{EgressError, GraphError};

    fn p(x: f64, y: f64) -> Point3 {
        Point3::new(x, y, 0.0)
    }

    fn centerlines(corridors: &[Corridor]) -> Vec<Centerline> {
        Centerline::from_corridors(corridors)
    }

    fn connect(lines: &[Centerline]) -> (AdaptiveGrid, ConnectionReport) {
        let mut grid = AdaptiveGrid::new();
        let connector = CorridorConnector::new(lines, 1e-3);
        connector.insert_centerlines(&mut grid).unwrap();
        let report = connector.execute(&mut grid).unwrap();
        (grid, report)
    }

    #[test]
    fn dead_end_abutting_side_connects() {
        // Corridor B stops 1 unit short of corridor A's centerline.
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(4.0, -8.0), p(4.0, -1.0)], 2.0),
        ]);
        let (grid, report) = connect(&lines);

        assert_eq!(report.connections.len(), 1, "{report:?}");
        let c = report.connections[0];
        let from = grid.point(c.from).unwrap();
        let to = grid.point(c.to).unwrap();
        let mut ends = [from, to];
        ends.sort_by(|x, y| x.y.total_cmp(&y.y));
        assert!((ends[0] - p(4.0, -1.0)).norm() < 1e-9);
        assert!((ends[1] - p(4.0, 0.0)).norm() < 1e-9);

        // Corridor A was split at the connection point.
        let split = grid.try_get_vertex_index(&p(4.0, 0.0)).unwrap();
        assert_eq!(grid.neighbors(split).count(), 3);
    }

    #[test]
    fn connection_is_visible_from_both_ends() {
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(4.0, -8.0), p(4.0, -1.0)], 2.0),
        ]);
        let (grid, report) = connect(&lines);
        let c = report.connections[0];
        assert!(grid.neighbors(c.from).any(|(e, _)| e == c.edge));
        assert!(grid.neighbors(c.to).any(|(e, _)| e == c.edge));
        assert_eq!(grid.edge_between(c.to, c.from), Some(c.edge));
    }

    #[test]
    fn crossing_corridors_share_intersection_vertex() {
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(5.0, -5.0), p(5.0, 5.0)], 2.0),
        ]);
        let (grid, report) = connect(&lines);

        assert!(report.connections.is_empty());
        assert!(report.junctions > 0);
        let x = grid.try_get_vertex_index(&p(5.0, 0.0)).unwrap();
        assert_eq!(grid.neighbors(x).count(), 4);
        assert_eq!(grid.edge_count(), 4);
    }

    #[test]
    fn t_junction_splits_through_corridor() {
        // B ends exactly on A's centerline.
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(20.0, 0.0)], 2.0),
            Corridor::centered(vec![p(10.0, 0.0), p(10.0, 10.0)], 2.0),
        ]);
        let (grid, report) = connect(&lines);

        assert!(report.connections.is_empty());
        assert!(report.junctions > 0);
        let foot = grid.try_get_vertex_index(&p(10.0, 0.0)).unwrap();
        let a0 = grid.try_get_vertex_index(&p(0.0, 0.0)).unwrap();
        let a1 = grid.try_get_vertex_index(&p(20.0, 0.0)).unwrap();
        assert!(grid.edge_between(a0, a1).is_none());
        assert!(grid.edge_between(a0, foot).is_some());
        assert!(grid.edge_between(foot, a1).is_some());
        assert_eq!(grid.neighbors(foot).count(), 3);
        assert_eq!(grid.edge_count(), 3);
    }

    #[test]
    fn sheared_gap_is_rejected() {
        // B runs parallel to A but starts diagonally off A's end: the offset
        // is neither parallel nor perpendicular to either segment.
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(10.5, 0.5), p(20.0, 0.5)], 2.0),
        ]);
        let (grid, report) = connect(&lines);
        assert!(report.connections.is_empty());
        assert_eq!(grid.edge_count(), 2);
    }

    #[test]
    fn distant_corridors_stay_apart() {
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(0.0, 5.0), p(10.0, 5.0)], 2.0),
        ]);
        let (_, report) = connect(&lines);
        assert!(report.connections.is_empty());
    }

    #[test]
    fn collinear_gap_connects_end_to_end() {
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(11.0, 0.0), p(20.0, 0.0)], 2.0),
        ]);
        let (grid, report) = connect(&lines);
        assert_eq!(report.connections.len(), 1);
        let a = grid.try_get_vertex_index(&p(10.0, 0.0)).unwrap();
        let b = grid.try_get_vertex_index(&p(11.0, 0.0)).unwrap();
        assert!(grid.edge_between(a, b).is_some());
    }

    #[test]
    fn adjacent_segments_of_one_line_are_skipped() {
        // A tight zig-zag: its neighbouring segments are close but must not connect.
        let lines = centerlines(&[Corridor::centered(
            vec![p(0.0, 0.0), p(5.0, 0.0), p(5.0, 1.0), p(0.0, 1.0)],
            2.0,
        )]);
        let (grid, report) = connect(&lines);
        assert!(report.connections.is_empty());
        assert_eq!(grid.edge_count(), 3);
    }

    #[test]
    fn missing_centerline_edges_is_structural_error() {
        let lines = centerlines(&[
            Corridor::centered(vec![p(0.0, 0.0), p(10.0, 0.0)], 2.0),
            Corridor::centered(vec![p(4.0, -8.0), p(4.0, -1.0)], 2.0),
        ]);
        let mut grid = AdaptiveGrid::new();
        let connector = CorridorConnector::new(&lines, 1e-3);
        connector.insert_centerlines(&mut grid).unwrap();
        // Corrupt the graph: drop corridor A's only edge.
        let a0 = grid.try_get_vertex_index(&p(0.0, 0.0)).unwrap();
        let a1 = grid.try_get_vertex_index(&p(10.0, 0.0)).unwrap();
        let edge = grid.edge_between(a0, a1).unwrap();
        grid.remove_edge(edge).unwrap();

        let err = connector.execute(&mut grid).unwrap_err();
        assert!(matches!(
            err,
            EgressError::Graph(GraphError::SpliceTargetNotFound { .. })
        ));
    }
}
