#![allow(clippy::unwrap_used)]

use approx::assert_relative_eq;
use egress::elements::{Building, Corridor, Door, Level, Openings, Room, Wall};
use egress::error::{EgressError, OperationError};
use egress::math::Point3;
use egress::operations::route::SegmentKind;
use egress::operations::SkipReason;
use egress::{EgressAnalysis, EgressConfig, LevelOutcome};

fn init_tracing() {
    // Default: WARN for everything, DEBUG for egress.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("egress=debug".parse().unwrap_or_default());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_test_writer()
        .try_init();
}

fn p(x: f64, y: f64, z: f64) -> Point3 {
    Point3::new(x, y, z)
}

fn square_walls(points: &[Point3]) -> Vec<Wall> {
    (0..points.len())
        .map(|i| Wall::new(points[i], points[(i + 1) % points.len()]))
        .collect()
}

/// A 10 unit corridor of width 2 with a room closing off its west end.
/// The room's door sits on the corridor centerline.
fn single_corridor_level(z: f64) -> Level {
    let boundary = vec![p(-4.0, -1.0, z), p(0.0, -1.0, z), p(0.0, 2.0, z), p(-4.0, 2.0, z)];
    let mut level = Level::new(format!("level {z}"), z);
    level
        .corridors
        .push(Corridor::centered(vec![p(0.0, 0.0, z), p(10.0, 0.0, z)], 2.0));
    level.openings = Some(Openings {
        doors: vec![Door::new(p(0.0, 0.0, z))],
        walls: square_walls(&boundary),
    });
    level.rooms.push(Room::new("store", boundary));
    level
}

/// A 20 unit corridor with two offices on its north side.
fn two_office_level() -> Level {
    let mut level = Level::new("offices", 0.0);
    level
        .corridors
        .push(Corridor::centered(vec![p(0.0, 0.0, 0.0), p(20.0, 0.0, 0.0)], 2.0));
    level.rooms.push(Room::new(
        "west office",
        vec![p(2.0, 1.0, 0.0), p(6.0, 1.0, 0.0), p(6.0, 4.0, 0.0), p(2.0, 4.0, 0.0)],
    ));
    level.rooms.push(Room::new(
        "east office",
        vec![p(8.0, 1.0, 0.0), p(12.0, 1.0, 0.0), p(12.0, 4.0, 0.0), p(8.0, 4.0, 0.0)],
    ));
    level
}

/// A 20 unit main corridor along y = 0 and a side corridor `branch` running
/// north at x = 10. A room opens onto the side corridor only.
fn branch_level(branch: Corridor) -> Level {
    let mut level = Level::new("branch", 0.0);
    level
        .corridors
        .push(Corridor::centered(vec![p(0.0, 0.0, 0.0), p(20.0, 0.0, 0.0)], 2.0));
    level.corridors.push(branch);
    level.rooms.push(Room::new(
        "north-east",
        vec![p(11.0, 4.0, 0.0), p(15.0, 4.0, 0.0), p(15.0, 8.0, 0.0), p(11.0, 8.0, 0.0)],
    ));
    level
}

/// Routes `branch_level(branch)` to an exit at the main corridor's east end
/// and checks the room travels `corridor_distance` to get there.
fn assert_routes_through_branch(branch: Corridor, corridor_distance: f64) {
    let building = Building {
        levels: vec![branch_level(branch)],
        exits: vec![p(20.05, 0.0, 0.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();
    let egress = report.outcomes[0].egress().unwrap();

    assert!(egress.warnings.is_empty(), "{:?}", egress.warnings);
    assert_eq!(egress.routes.len(), 1);
    let route = &egress.routes[0];
    assert_relative_eq!(route.exit_point, p(11.0, 6.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(route.corridor_distance, corridor_distance, epsilon = 1e-9);
    assert_relative_eq!(route.farthest_corner_distance, 20.0_f64.sqrt(), epsilon = 1e-9);

    // Both east corners are tied.
    let room_lines = egress
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Room)
        .count();
    assert_eq!(room_lines, 2);
}

#[test]
fn single_corridor_routes_to_far_end() {
    init_tracing();
    let building = Building {
        levels: vec![single_corridor_level(0.0)],
        exits: vec![p(10.05, 0.0, 0.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();

    let egress = report.outcomes[0].egress().unwrap();
    assert_eq!(egress.routes.len(), 1);
    let route = &egress.routes[0];
    assert_relative_eq!(route.exit_point, p(0.0, 0.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(route.corridor_distance, 10.0, epsilon = 1e-9);
    assert_relative_eq!(route.farthest_corner_distance, 20.0_f64.sqrt(), epsilon = 1e-9);
    assert_relative_eq!(route.total_distance, 10.0 + 20.0_f64.sqrt(), epsilon = 1e-9);

    // Exactly one line across the room, to the corner at (-4, 2).
    let room_lines: Vec<_> = egress
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Room)
        .collect();
    assert_eq!(room_lines.len(), 1);
    assert_relative_eq!(room_lines[0].end, p(-4.0, 2.0, 0.0), epsilon = 1e-9);
    assert_relative_eq!(room_lines[0].distance, 10.0 + 20.0_f64.sqrt(), epsilon = 1e-9);

    let corridor: Vec<_> = egress
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Corridor)
        .collect();
    assert_eq!(corridor.len(), 1);
    assert_relative_eq!(corridor[0].distance, 10.0, epsilon = 1e-9);
    assert!(egress.warnings.is_empty());
}

#[test]
fn level_without_exits_is_skipped() {
    init_tracing();
    let building = Building {
        levels: vec![single_corridor_level(0.0)],
        // Far above the level: belongs to another floor.
        exits: vec![p(10.0, 0.0, 12.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();

    assert!(matches!(
        report.outcomes[0],
        LevelOutcome::Skipped {
            reason: SkipReason::NoExits,
            ..
        }
    ));
    assert_eq!(report.routes().count(), 0);
    assert!(report.failures().next().is_none());
    assert!(report.max_travel_distance().is_none());
}

#[test]
fn failing_level_does_not_stop_the_next() {
    init_tracing();
    let mut broken = single_corridor_level(0.0);
    broken.name = "broken".into();
    broken.corridors[0].polyline[0].y = f64::INFINITY;

    let building = Building {
        levels: vec![broken, single_corridor_level(4.0)],
        exits: vec![p(10.05, 0.0, 0.0), p(10.05, 0.0, 4.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();

    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.outcomes[0].level(), "broken");
    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken");
    assert!(matches!(
        failures[0].1,
        EgressError::Operation(OperationError::InvalidInput(_))
    ));

    let upper = report.outcomes[1].egress().unwrap();
    assert_eq!(upper.level, "level 4");
    assert_eq!(upper.routes.len(), 1);
    assert_relative_eq!(upper.routes[0].corridor_distance, 10.0, epsilon = 1e-9);
}

#[test]
fn levels_only_use_their_own_exits() {
    init_tracing();
    let building = Building {
        levels: vec![single_corridor_level(0.0), single_corridor_level(4.0)],
        exits: vec![p(10.05, 0.0, 0.0), p(10.05, 0.0, 4.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();

    let routes: Vec<_> = report.routes().collect();
    assert_eq!(routes.len(), 2);
    assert_relative_eq!(routes[0].exit_point.z, 0.0);
    assert_relative_eq!(routes[1].exit_point.z, 4.0);
    for route in routes {
        assert_relative_eq!(route.corridor_distance, 10.0, epsilon = 1e-9);
    }
}

#[test]
fn rooms_share_corridor_trunk() {
    init_tracing();
    let building = Building {
        levels: vec![two_office_level()],
        exits: vec![p(20.05, 0.0, 0.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();
    let egress = report.outcomes[0].egress().unwrap();

    assert_eq!(egress.routes.len(), 2);
    // One unit from each office door to the corridor, then along it.
    assert_relative_eq!(egress.routes[0].corridor_distance, 17.0, epsilon = 1e-9);
    assert_relative_eq!(egress.routes[1].corridor_distance, 11.0, epsilon = 1e-9);

    // The stretch from x = 10 to the exit is drawn once for both rooms.
    let corridor: Vec<_> = egress
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Corridor)
        .collect();
    assert_eq!(corridor.len(), 4);

    // Both far corners of each office are tied, so each gets two room lines.
    let room_lines = egress
        .segments
        .iter()
        .filter(|s| s.kind == SegmentKind::Room)
        .count();
    assert_eq!(room_lines, 4);
}

#[test]
fn travel_limit_flags_distant_rooms() {
    init_tracing();
    let building = Building {
        levels: vec![two_office_level()],
        exits: vec![p(20.05, 0.0, 0.0)],
    };
    let config = EgressConfig::default().with_max_travel_distance(20.0);
    let report = EgressAnalysis::new(&building, config).execute();
    let egress = report.outcomes[0].egress().unwrap();

    // 17 + sqrt(13) is over the limit, 11 + sqrt(13) is not.
    assert!(egress.routes[0].exceeds_limit);
    assert!(!egress.routes[1].exceeds_limit);
    assert_relative_eq!(
        report.max_travel_distance().unwrap(),
        17.0 + 13.0_f64.sqrt(),
        epsilon = 1e-9
    );
}

#[test]
fn walled_room_without_door_is_reported() {
    init_tracing();
    let mut level = two_office_level();
    let west = level.rooms[0].boundary.clone();
    level.openings = Some(Openings {
        doors: vec![Door::new(p(10.0, 1.0, 0.0))],
        walls: square_walls(&west),
    });
    let building = Building {
        levels: vec![level],
        exits: vec![p(20.05, 0.0, 0.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();
    let egress = report.outcomes[0].egress().unwrap();

    assert_eq!(egress.routes.len(), 1);
    assert_eq!(egress.routes[0].room, 1);
    assert_eq!(egress.warnings.len(), 1);
    assert!(egress.warnings[0].contains("west office"));
}

#[test]
fn room_routes_through_crossing() {
    init_tracing();
    // One unit to the side corridor, six down it, ten along the main one.
    assert_routes_through_branch(
        Corridor::centered(vec![p(10.0, -10.0, 0.0), p(10.0, 10.0, 0.0)], 2.0),
        17.0,
    );
}

#[test]
fn room_routes_through_t_junction() {
    init_tracing();
    assert_routes_through_branch(
        Corridor::centered(vec![p(10.0, 0.0, 0.0), p(10.0, 10.0, 0.0)], 2.0),
        17.0,
    );
}

#[test]
fn room_routes_across_corridor_gap() {
    init_tracing();
    // The side corridor stops 1.5 short of the main centerline, inside
    // the combined half-widths, so a connecting edge bridges the gap.
    assert_routes_through_branch(
        Corridor::centered(vec![p(10.0, 1.5, 0.0), p(10.0, 10.0, 0.0)], 2.0),
        17.0,
    );
}

#[test]
fn crossing_carries_rooms_from_both_corridors() {
    init_tracing();
    let mut level = branch_level(Corridor::centered(
        vec![p(10.0, -10.0, 0.0), p(10.0, 10.0, 0.0)],
        2.0,
    ));
    // A second room on the main corridor, west of the crossing.
    level.rooms.push(Room::new(
        "south-west",
        vec![p(2.0, -1.0, 0.0), p(6.0, -1.0, 0.0), p(6.0, -4.0, 0.0), p(2.0, -4.0, 0.0)],
    ));
    let building = Building {
        levels: vec![level],
        exits: vec![p(20.05, 0.0, 0.0)],
    };
    let report = EgressAnalysis::new(&building, EgressConfig::default()).execute();
    let egress = report.outcomes[0].egress().unwrap();

    assert!(egress.warnings.is_empty(), "{:?}", egress.warnings);
    assert_eq!(egress.routes.len(), 2);
    assert_relative_eq!(egress.routes[0].corridor_distance, 17.0, epsilon = 1e-9);
    // One unit to the corridor at x = 4, then sixteen east.
    assert_relative_eq!(egress.routes[1].corridor_distance, 17.0, epsilon = 1e-9);
}
