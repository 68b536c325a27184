//! Route choice and distance annotation over a built path tree.

mod annotate;
mod select;

pub use annotate::{
    AnnotatedSegment, Annotation, DistanceAnnotator, DistanceCache, RoomRoute, SegmentKind,
};
pub use select::{RouteSelector, SelectedRoute};
