use tracing::{instrument, warn};

use wirebind_core_types::{RequestDescriptor, TransportMode, TriggerEvent};

use crate::hooks::LifecycleHooks;
use crate::model::{FlowCx, TransportOutcome};
use crate::ports::TransportPort;

pub struct RuntimeDeps<'a> {
    pub transport: &'a dyn TransportPort,
    pub hooks: &'a dyn LifecycleHooks,
}

/// Issue one request and drive the lifecycle pipeline around it.
///
/// Ordering guarantee: `on_before_send` strictly precedes dispatch, exactly
/// one of `on_success`/`on_error` fires, and `on_complete` always fires
/// last. No two hooks for the same trigger overlap.
#[instrument(skip_all, fields(url = %request.url, method = request.method.as_str(), mode = ?request.mode))]
pub async fn execute(
    cx: &FlowCx,
    event: &TriggerEvent,
    request: RequestDescriptor,
    deps: RuntimeDeps<'_>,
) {
    deps.hooks.on_before_send(cx, event, &request).await;

    let outcome = match request.mode {
        TransportMode::Blocking => deps.transport.dispatch_blocking(&request),
        TransportMode::Async => deps.transport.dispatch(&request).await,
    };

    let status = outcome.status();
    match &outcome {
        TransportOutcome::Success { status, body } => {
            deps.hooks.on_success(cx, event, body, *status).await;
        }
        TransportOutcome::Failure(failure) => {
            warn!(status = ?failure.status, detail = %failure.detail, "transport failure");
            deps.hooks.on_error(cx, event, failure).await;
        }
    }

    deps.hooks.on_complete(cx, event, status).await;
}
