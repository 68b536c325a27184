use crate::grid::{PathTreeConfig, DEFAULT_GRID_TOLERANCE};

/// Tunable thresholds for egress analysis.
///
/// Distances are in model units.
#[derive(Debug, Clone, Copy)]
pub struct EgressConfig {
    /// Radius within which two points resolve to the same grid vertex.
    pub grid_tolerance: f64,
    /// Slack on dot products when testing for parallel or perpendicular offsets.
    pub alignment_tolerance: f64,
    /// Added to a corridor's half-width when connecting a room opening to it.
    pub room_connection_margin: f64,
    /// How far a door may sit from a boundary segment and still lie on it.
    /// Also used when matching wall records to boundary segments.
    pub door_tolerance: f64,
    /// Distance a corner leaf is pulled in from the true corner toward the exit.
    pub corner_inset: f64,
    /// Exits farther than this from the level's grid belong to another level.
    pub level_separation: f64,
    /// Exits closer than this to the grid reuse the grid vertex directly.
    pub exit_snap_distance: f64,
    /// Corners within this ratio of the farthest corner are drawn too.
    pub corner_tie_tolerance: f64,
    /// Rooms whose total distance exceeds this are flagged.
    pub max_travel_distance: Option<f64>,
    pub path_tree: PathTreeConfig,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self {
            grid_tolerance: DEFAULT_GRID_TOLERANCE,
            alignment_tolerance: 1e-3,
            room_connection_margin: 0.3,
            door_tolerance: 0.2,
            corner_inset: 0.1,
            level_separation: 2.0,
            exit_snap_distance: 0.1,
            corner_tie_tolerance: 1e-3,
            max_travel_distance: None,
            path_tree: PathTreeConfig::default(),
        }
    }
}

impl EgressConfig {
    #[must_use]
    pub fn with_max_travel_distance(mut self, distance: f64) -> Self {
        self.max_travel_distance = Some(distance);
        self
    }

    #[must_use]
    pub fn with_room_connection_margin(mut self, margin: f64) -> Self {
        self.room_connection_margin = margin;
        self
    }

    #[must_use]
    pub fn with_door_tolerance(mut self, tolerance: f64) -> Self {
        self.door_tolerance = tolerance;
        self
    }

    #[must_use]
    pub fn with_corner_inset(mut self, inset: f64) -> Self {
        self.corner_inset = inset;
        self
    }

    /// Limits the shortest-path search to `distance` from the nearest exit.
    #[must_use]
    pub fn with_search_cutoff(mut self, distance: f64) -> Self {
        self.path_tree.max_distance = Some(distance);
        self
    }
}
