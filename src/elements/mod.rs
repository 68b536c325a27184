pub mod corridor;
pub mod room;

pub use corridor::{Centerline, Corridor};
pub use room::{Door, Openings, Room, Wall};

use crate::math::Point3;

/// Everything on one building level that egress analysis reads.
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub name: String,
    pub elevation: f64,
    pub corridors: Vec<Corridor>,
    pub rooms: Vec<Room>,
    /// Door and wall data. `None` means no door dataset was supplied.
    pub openings: Option<Openings>,
}

impl Level {
    #[must_use]
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
            ..Self::default()
        }
    }
}

/// A building: its levels plus the designated exit locations.
#[derive(Debug, Clone, Default)]
pub struct Building {
    pub levels: Vec<Level>,
    /// Exit points for all levels. Each level keeps the ones near its corridors.
    pub exits: Vec<Point3>,
}
