pub mod config;
pub mod elements;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod math;
pub mod operations;

pub use config::EgressConfig;
pub use error::{EgressError, Result};
pub use operations::{EgressAnalysis, EgressReport, LevelOutcome};
