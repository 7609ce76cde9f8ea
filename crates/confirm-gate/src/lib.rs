pub mod gate;
pub mod ports;
pub mod types;

pub use gate::{should_proceed, GateDeps};
pub use types::GateDecision;
