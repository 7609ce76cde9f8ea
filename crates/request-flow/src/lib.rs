pub mod hooks;
pub mod model;
pub mod ports;
pub mod runner;

pub use hooks::{DispatchHooks, LifecycleHooks};
pub use model::{derive_descriptor, FlowCx, TransportFailure, TransportOutcome};
pub use runner::{execute, RuntimeDeps};
