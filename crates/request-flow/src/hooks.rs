use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use action_apply::ports::{EventsPort, MutatePort, PromptPort};
use action_apply::{apply, ApplyDeps};
use wirebind_core_types::{LifecycleStage, RequestDescriptor, TriggerEvent};

use crate::model::{FlowCx, TransportFailure};

/// The four-stage lifecycle pipeline around one request.
///
/// Hooks have no return-value contract; overriding implementations may
/// delegate individual stages to [`DispatchHooks`] to keep its default
/// behavior for the stages they do not replace.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    async fn on_before_send(&self, cx: &FlowCx, event: &TriggerEvent, request: &RequestDescriptor);
    async fn on_success(&self, cx: &FlowCx, event: &TriggerEvent, body: &Value, status: u16);
    async fn on_error(&self, cx: &FlowCx, event: &TriggerEvent, failure: &TransportFailure);
    async fn on_complete(&self, cx: &FlowCx, event: &TriggerEvent, status: Option<u16>);
}

/// Default hook set: each stage performs exactly one dispatcher call with
/// that stage's configured action/item/payload triple.
pub struct DispatchHooks {
    mutate: Arc<dyn MutatePort>,
    prompt: Arc<dyn PromptPort>,
    events: Arc<dyn EventsPort>,
}

impl DispatchHooks {
    pub fn new(
        mutate: Arc<dyn MutatePort>,
        prompt: Arc<dyn PromptPort>,
        events: Arc<dyn EventsPort>,
    ) -> Self {
        Self {
            mutate,
            prompt,
            events,
        }
    }

    async fn dispatch_stage(
        &self,
        cx: &FlowCx,
        event: &TriggerEvent,
        stage: LifecycleStage,
        payload: &str,
    ) {
        let settings = &cx.settings;
        let result = apply(
            settings.stage_action(stage),
            settings.stage_item(stage),
            event,
            payload,
            ApplyDeps {
                mutate: self.mutate.as_ref(),
                prompt: self.prompt.as_ref(),
                events: self.events.as_ref(),
            },
        )
        .await;
        if let Err(err) = result {
            warn!(stage = stage.as_str(), %err, "stage dispatch failed");
        }
    }
}

#[async_trait]
impl LifecycleHooks for DispatchHooks {
    async fn on_before_send(
        &self,
        cx: &FlowCx,
        event: &TriggerEvent,
        _request: &RequestDescriptor,
    ) {
        let payload = cx.settings.before_html.clone();
        self.dispatch_stage(cx, event, LifecycleStage::Before, &payload)
            .await;
    }

    async fn on_success(&self, cx: &FlowCx, event: &TriggerEvent, body: &Value, _status: u16) {
        let payload = payload_string(body);
        self.dispatch_stage(cx, event, LifecycleStage::Success, &payload)
            .await;
    }

    async fn on_error(&self, cx: &FlowCx, event: &TriggerEvent, failure: &TransportFailure) {
        // The raw response body when present, the transport's detail
        // otherwise; surfaced verbatim.
        let payload = failure.body.clone().unwrap_or_else(|| failure.detail.clone());
        self.dispatch_stage(cx, event, LifecycleStage::Error, &payload)
            .await;
    }

    async fn on_complete(&self, cx: &FlowCx, event: &TriggerEvent, _status: Option<u16>) {
        let payload = cx.settings.after_html.clone();
        self.dispatch_stage(cx, event, LifecycleStage::After, &payload)
            .await;
    }
}

/// Render a parsed body for DOM insertion or alerting.
fn payload_string(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
