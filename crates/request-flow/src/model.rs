use std::sync::Arc;

use serde_json::Value;

use settings_cascade::Settings;
use wirebind_core_types::{
    ActionKind, BindingId, RequestBody, RequestDescriptor, TransportMode,
};

/// Context handed to every lifecycle hook of one trigger.
#[derive(Clone, Debug)]
pub struct FlowCx {
    pub binding: BindingId,
    pub settings: Arc<Settings>,
}

impl FlowCx {
    pub fn new(binding: BindingId, settings: Arc<Settings>) -> Self {
        Self { binding, settings }
    }
}

/// Opaque transport failure; the core never classifies it.
#[derive(Clone, Debug, PartialEq)]
pub struct TransportFailure {
    pub status: Option<u16>,
    pub detail: String,
    /// Raw response body, when the environment has one.
    pub body: Option<String>,
}

/// What the transport delivered for one dispatched request.
#[derive(Clone, Debug, PartialEq)]
pub enum TransportOutcome {
    Success { status: u16, body: Value },
    Failure(TransportFailure),
}

impl TransportOutcome {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportOutcome::Success { status, .. } => Some(*status),
            TransportOutcome::Failure(failure) => failure.status,
        }
    }
}

/// Derive the request for one trigger; never cached across triggers.
///
/// The transport runs blocking exactly when the success action is
/// `proceed`, so the environment's default action can immediately follow
/// the call.
pub fn derive_descriptor(settings: &Settings, url: String, body: RequestBody) -> RequestDescriptor {
    let mode = if settings.success_action == ActionKind::Proceed {
        TransportMode::Blocking
    } else {
        TransportMode::Async
    };
    RequestDescriptor {
        method: settings.method,
        url,
        body,
        mode,
    }
}
