use crate::geometry::Segment;
use crate::math::Point3;

/// A room footprint on one level.
#[derive(Debug, Clone)]
pub struct Room {
    pub name: String,
    /// Closed boundary polygon. The closing segment is implicit.
    pub boundary: Vec<Point3>,
}

impl Room {
    #[must_use]
    pub fn new(name: impl Into<String>, boundary: Vec<Point3>) -> Self {
        Self {
            name: name.into(),
            boundary,
        }
    }
}

/// A door opening, located by its insertion point.
#[derive(Debug, Clone, Copy)]
pub struct Door {
    pub position: Point3,
}

impl Door {
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self { position }
    }
}

/// A wall, located by its centerline.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub start: Point3,
    pub end: Point3,
}

impl Wall {
    #[must_use]
    pub fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    /// Returns `true` if both ends of `segment` lie on this wall.
    #[must_use]
    pub fn covers(&self, segment: &Segment, tolerance: f64) -> bool {
        let line = Segment::new(self.start, self.end);
        line.contains(&segment.start, tolerance) && line.contains(&segment.end, tolerance)
    }
}

/// Door and wall records for a level.
///
/// When present, room boundary segments that sit on a wall without a door
/// are not treated as exits.
#[derive(Debug, Clone, Default)]
pub struct Openings {
    pub doors: Vec<Door>,
    pub walls: Vec<Wall>,
}

impl Openings {
    /// First door lying on `segment`, in input order.
    #[must_use]
    pub fn door_on(&self, segment: &Segment, tolerance: f64) -> Option<&Door> {
        self.doors
            .iter()
            .find(|d| segment.distance_to(&d.position) < tolerance)
    }

    /// Returns `true` if some wall covers `segment`.
    #[must_use]
    pub fn is_walled(&self, segment: &Segment, tolerance: f64) -> bool {
        self.walls.iter().any(|w| w.covers(segment, tolerance))
    }
}
