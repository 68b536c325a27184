use crate::geometry::{Polyline, Segment};
use crate::math::Point3;

/// A circulation corridor: a walking polyline thickened by a width on each side.
#[derive(Debug, Clone)]
pub struct Corridor {
    /// The corridor's reference polyline.
    pub polyline: Vec<Point3>,
    /// Width to the left of the polyline's travel direction.
    pub left_width: f64,
    /// Width to the right of the polyline's travel direction.
    pub right_width: f64,
}

impl Corridor {
    /// Creates a corridor centred on `polyline` with the given total width.
    #[must_use]
    pub fn centered(polyline: Vec<Point3>, width: f64) -> Self {
        Self {
            polyline,
            left_width: width / 2.0,
            right_width: width / 2.0,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.left_width + self.right_width
    }
}

/// The walking path down the middle of a corridor.
#[derive(Debug, Clone)]
pub struct Centerline {
    /// Index of the source corridor within its level.
    pub corridor: usize,
    pub polyline: Polyline,
    /// Half the corridor's total width.
    pub half_width: f64,
}

impl Centerline {
    /// Derives the centerline of a corridor.
    ///
    /// The reference polyline is shifted left by half the difference between
    /// the left and right widths. Returns `None` when fewer than two distinct
    /// points remain.
    #[must_use]
    pub fn from_corridor(index: usize, corridor: &Corridor) -> Option<Self> {
        let base = Polyline::from_points(&corridor.polyline, false);
        if base.points.len() < 2 {
            return None;
        }
        let shift = (corridor.left_width - corridor.right_width) / 2.0;
        let polyline = base.offset_open(shift);
        if polyline.points.len() < 2 {
            return None;
        }
        Some(Self {
            corridor: index,
            polyline,
            half_width: corridor.width() / 2.0,
        })
    }

    /// Derives centerlines for every usable corridor, keeping input order.
    #[must_use]
    pub fn from_corridors(corridors: &[Corridor]) -> Vec<Self> {
        corridors
            .iter()
            .enumerate()
            .filter_map(|(i, c)| Self::from_corridor(i, c))
            .collect()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.polyline.segment_count()
    }

    #[must_use]
    pub fn segment(&self, i: usize) -> Segment {
        self.polyline.segment(i)
    }
}
