pub mod analysis;
pub mod connect;
pub mod route;

pub use analysis::{EgressAnalysis, EgressReport, LevelEgress, LevelOutcome, SkipReason};
