use std::fmt;

use tracing::{debug, info, info_span, warn};

use crate::config::EgressConfig;
use crate::elements::{Building, Centerline, Level};
use crate::error::{EgressError, OperationError, Result};
use crate::grid::{AdaptiveGrid, PathTree, VertexId};
use crate::math::Point3;
use crate::operations::connect::{CorridorConnector, ExitLinker, RoomConnector};
use crate::operations::route::{AnnotatedSegment, DistanceAnnotator, RoomRoute, RouteSelector};

/// Why a level produced no routes without failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No corridor on the level has two distinct points.
    NoCorridors,
    NoRooms,
    /// No building exit lies near the level's corridors.
    NoExits,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCorridors => write!(f, "no corridors"),
            Self::NoRooms => write!(f, "no rooms"),
            Self::NoExits => write!(f, "no exits"),
        }
    }
}

/// Routes and drawable segments for one level.
#[derive(Debug, Clone, Default)]
pub struct LevelEgress {
    pub level: String,
    pub routes: Vec<RoomRoute>,
    pub segments: Vec<AnnotatedSegment>,
    /// Rooms that could not be routed, one message each.
    pub warnings: Vec<String>,
}

/// What happened to one level.
#[derive(Debug)]
pub enum LevelOutcome {
    Routed(LevelEgress),
    Skipped { level: String, reason: SkipReason },
    /// The level's graph was malformed. Other levels are unaffected.
    Failed { level: String, error: EgressError },
}

impl LevelOutcome {
    #[must_use]
    pub fn level(&self) -> &str {
        match self {
            Self::Routed(egress) => &egress.level,
            Self::Skipped { level, .. } | Self::Failed { level, .. } => level,
        }
    }

    /// The routed result, if the level was routed.
    #[must_use]
    pub fn egress(&self) -> Option<&LevelEgress> {
        match self {
            Self::Routed(egress) => Some(egress),
            _ => None,
        }
    }
}

/// Outcomes for every level of a building, in level order.
#[derive(Debug, Default)]
pub struct EgressReport {
    pub outcomes: Vec<LevelOutcome>,
}

impl EgressReport {
    /// All routed rooms across all levels.
    pub fn routes(&self) -> impl Iterator<Item = &RoomRoute> {
        self.outcomes
            .iter()
            .filter_map(LevelOutcome::egress)
            .flat_map(|e| e.routes.iter())
    }

    /// Longest total travel distance of any routed room.
    #[must_use]
    pub fn max_travel_distance(&self) -> Option<f64> {
        self.routes()
            .map(|r| r.total_distance)
            .max_by(f64::total_cmp)
    }

    /// Levels that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &EgressError)> {
        self.outcomes.iter().filter_map(|o| match o {
            LevelOutcome::Failed { level, error } => Some((level.as_str(), error)),
            _ => None,
        })
    }
}

/// Egress analysis over a whole building.
///
/// Each level is processed on its own: corridors are joined into a grid,
/// rooms and building exits are attached to it, a shortest-path tree is
/// grown from the exits, and every room takes its cheapest way out.
#[derive(Debug)]
pub struct EgressAnalysis<'a> {
    building: &'a Building,
    config: EgressConfig,
}

impl<'a> EgressAnalysis<'a> {
    /// Creates a new analysis.
    #[must_use]
    pub fn new(building: &'a Building, config: EgressConfig) -> Self {
        Self { building, config }
    }

    /// Executes the analysis.
    ///
    /// Never fails as a whole: a level whose processing errors is recorded
    /// as [`LevelOutcome::Failed`] and the next level proceeds.
    #[must_use]
    pub fn execute(&self) -> EgressReport {
        let outcomes = self
            .building
            .levels
            .iter()
            .map(|level| {
                let _span =
                    info_span!("egress_level", level = %level.name, elevation = level.elevation)
                        .entered();
                match self.analyze_level(level) {
                    Ok(outcome) => outcome,
                    Err(error) => {
                        warn!(%error, "level failed");
                        LevelOutcome::Failed {
                            level: level.name.clone(),
                            error,
                        }
                    }
                }
            })
            .collect();
        EgressReport { outcomes }
    }

    /// Runs the whole pipeline for one level.
    ///
    /// # Errors
    ///
    /// Returns an error if the level's input is malformed or its graph
    /// cannot be built consistently.
    pub fn analyze_level(&self, level: &Level) -> Result<LevelOutcome> {
        validate(level)?;

        let skip = |reason: SkipReason| -> Result<LevelOutcome> {
            info!(%reason, "level skipped");
            Ok(LevelOutcome::Skipped {
                level: level.name.clone(),
                reason,
            })
        };

        let centerlines = Centerline::from_corridors(&level.corridors);
        if centerlines.is_empty() {
            return skip(SkipReason::NoCorridors);
        }
        if level.rooms.is_empty() {
            return skip(SkipReason::NoRooms);
        }

        let config = &self.config;
        let mut grid = AdaptiveGrid::with_tolerance(config.grid_tolerance);

        let connector = CorridorConnector::new(&centerlines, config.alignment_tolerance);
        connector.insert_centerlines(&mut grid)?;
        connector.execute(&mut grid)?;

        let variants = RoomConnector::new(&centerlines, level.openings.as_ref(), config)
            .execute(&mut grid, &level.rooms)?;
        let mut warnings = Vec::new();
        for room in variants.iter().filter(|r| r.variants.is_empty()) {
            let name = &level.rooms[room.room].name;
            warn!(room = %name, "room has no exit onto a corridor");
            warnings.push(format!("room '{name}' has no exit onto a corridor"));
        }

        let exits = ExitLinker::new(
            &self.building.exits,
            config.level_separation,
            config.exit_snap_distance,
        )
        .execute(&mut grid)?;
        if exits.is_empty() {
            return skip(SkipReason::NoExits);
        }

        let sources: Vec<VertexId> = variants
            .iter()
            .flat_map(|r| r.variants.iter().map(|v| v.exit))
            .collect();
        let tree = PathTree::build(&grid, &sources, &exits, &config.path_tree)?;
        debug!(
            vertices = grid.vertex_count(),
            edges = grid.edge_count(),
            reached = tree.len(),
            "path tree built"
        );

        let selected = RouteSelector::new(&grid, &tree).execute(&variants)?;
        for room in &variants {
            let routed = selected.iter().any(|s| s.room == room.room);
            if !routed && !room.variants.is_empty() {
                let name = &level.rooms[room.room].name;
                let mut corridors: Vec<usize> = room.variants.iter().map(|v| v.corridor).collect();
                corridors.sort_unstable();
                corridors.dedup();
                let corridors = corridors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                warn!(room = %name, %corridors, "room cannot reach a building exit");
                warnings.push(format!(
                    "room '{name}' cannot reach a building exit from corridors {corridors}"
                ));
            }
        }

        let annotation = DistanceAnnotator::new(
            &grid,
            &tree,
            config.corner_tie_tolerance,
            config.max_travel_distance,
        )
        .execute(&selected)?;
        for route in annotation.routes.iter().filter(|r| r.exceeds_limit) {
            warn!(
                room = %level.rooms[route.room].name,
                distance = route.total_distance,
                "travel distance exceeds limit"
            );
        }

        Ok(LevelOutcome::Routed(LevelEgress {
            level: level.name.clone(),
            routes: annotation.routes,
            segments: annotation.segments,
            warnings,
        }))
    }
}

/// Rejects geometry that cannot be placed on a grid.
fn validate(level: &Level) -> Result<()> {
    for (i, corridor) in level.corridors.iter().enumerate() {
        if !corridor.polyline.iter().all(is_finite) {
            return Err(invalid(format!("corridor {i} has a non-finite point")));
        }
        let widths_ok = [corridor.left_width, corridor.right_width]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !widths_ok {
            return Err(invalid(format!("corridor {i} has an invalid width")));
        }
    }
    for room in &level.rooms {
        if !room.boundary.iter().all(is_finite) {
            return Err(invalid(format!("room '{}' has a non-finite point", room.name)));
        }
    }
    Ok(())
}

fn is_finite(p: &Point3) -> bool {
    p.coords.iter().all(|c| c.is_finite())
}

fn invalid(message: String) -> EgressError {
    OperationError::InvalidInput(message).into()
}
