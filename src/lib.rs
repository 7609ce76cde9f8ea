//! Unobtrusive request binding.
//!
//! A [`Binder`] attaches a declarative, cascading configuration to an
//! element so that a triggering interaction performs an optional
//! confirmation step, issues one network request, and applies a configured
//! DOM action at each of the four lifecycle points around it. The DOM,
//! transport, and event plumbing are supplied by the embedder through the
//! port traits re-exported here.

pub mod binder;
pub mod ports;
pub mod registry;

pub use binder::{Binder, BinderBuilder};
pub use ports::{BindingPort, NavPort, TriggerFuture, TriggerHandler};
pub use registry::{BindingEntry, BindingRegistry, FlightGuard};

pub use action_apply::ports::{
    EventsPort as RetriggerPort, MutatePort, PromptPort as NotifyPort,
};
pub use action_apply::InsertPosition;
pub use confirm_gate::ports::{DomPort, EventsPort as SuppressPort, PromptPort};
pub use confirm_gate::GateDecision;
pub use request_flow::ports::TransportPort;
pub use request_flow::{
    DispatchHooks, FlowCx, LifecycleHooks, TransportFailure, TransportOutcome,
};
pub use settings_cascade::{
    default_settings, CascadeError, DefaultsProvider, Settings, SettingsLayer,
};
pub use wirebind_core_types::{
    ActionKind, BindError, BindingId, ElementRef, HttpMethod, LifecycleStage, RequestBody,
    RequestData, RequestDescriptor, Selector, TransportMode, TriggerEvent,
};
