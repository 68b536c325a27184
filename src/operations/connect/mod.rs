//! Graph construction for one level: corridors, then rooms, then exits.

mod corridor_connector;
mod exit_linker;
mod room_connector;
pub mod splice;

pub use corridor_connector::{Connection, ConnectionReport, CorridorConnector};
pub use exit_linker::ExitLinker;
pub use room_connector::{Corner, RoomConnector, RoomEvacuationVariant, RoomVariants};
pub use splice::{splice, SpliceResult};
