use thiserror::Error;

use crate::math::Point3;

/// Top-level error type for egress analysis.
#[derive(Debug, Error)]
pub enum EgressError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length segment")]
    ZeroLengthSegment,
}

/// Structural errors in the spatial graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex not found")]
    VertexNotFound,

    #[error("edge not found")]
    EdgeNotFound,

    #[error("edge would connect a vertex to itself")]
    DegenerateEdge,

    #[error("no vertex at ({}, {}, {})", .0.x, .0.y, .0.z)]
    NoVertexAt(Point3),

    #[error(
        "cannot splice ({}, {}, {}): no aligned edge from ({}, {}) to ({}, {}) contains it",
        point.x, point.y, point.z, start.x, start.y, end.x, end.y
    )]
    SpliceTargetNotFound {
        point: Point3,
        start: Point3,
        end: Point3,
    },
}

/// Errors related to egress operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`EgressError`].
pub type Result<T> = std::result::Result<T, EgressError>;
