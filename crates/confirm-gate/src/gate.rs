use tracing::{debug, instrument, warn};

use settings_cascade::Settings;
use wirebind_core_types::{BindError, ElementRef, RequestBody, RequestData, TriggerEvent};

use crate::ports::{DomPort, EventsPort, PromptPort};
use crate::types::GateDecision;

pub struct GateDeps<'a> {
    pub dom: &'a dyn DomPort,
    pub prompt: &'a dyn PromptPort,
    pub events: &'a dyn EventsPort,
}

/// Run the pre-request pipeline for one trigger.
///
/// Order is fixed: default suppression, data resolution, URL resolution,
/// confirmation message resolution, confirmation. Data and URL failures are
/// blocking, user-visible, and abort before any network activity.
#[instrument(skip_all, fields(element = %event.element, event = %event.name))]
pub async fn should_proceed(
    settings: &Settings,
    event: &TriggerEvent,
    deps: GateDeps<'_>,
) -> Result<GateDecision, BindError> {
    // Unconditional, and first: the environment's default behavior never
    // runs unless the dispatcher later re-triggers it via `proceed`.
    deps.events.suppress_default(event).await;

    let body = match resolve_data(settings, deps.dom, deps.prompt).await? {
        Some(body) => body,
        None => return Ok(GateDecision::Abort),
    };

    let url = match resolve_url(settings, &event.element, deps.dom, deps.prompt).await? {
        Some(url) => url,
        None => return Ok(GateDecision::Abort),
    };

    let message = confirm_message(settings, &event.element, deps.dom).await?;
    let confirm_needed = settings.confirm_needed || settings.confirm_only;

    if confirm_needed && !deps.prompt.confirm(&message).await {
        debug!("confirmation declined");
        return Ok(GateDecision::Cancelled);
    }

    if settings.confirm_only {
        return Ok(GateDecision::Navigate { url });
    }

    Ok(GateDecision::Execute { url, body })
}

/// Resolve the configured data into a transmittable body.
///
/// `None` means a blocking error was already surfaced. A selector reference
/// is only resolved when a request will actually be made.
async fn resolve_data(
    settings: &Settings,
    dom: &dyn DomPort,
    prompt: &dyn PromptPort,
) -> Result<Option<RequestBody>, BindError> {
    match &settings.data {
        RequestData::Selector(selector) if !settings.confirm_only => {
            if dom.query_count(selector).await? > 0 {
                let encoded = dom.serialize_form(selector).await?;
                Ok(Some(RequestBody::Encoded(encoded)))
            } else {
                warn!(selector = %selector, "data selector resolved to nothing");
                prompt
                    .notify(&format!("wirebind: data ({selector}) cannot be selected."))
                    .await;
                Ok(None)
            }
        }
        RequestData::Selector(_) => Ok(Some(RequestBody::Empty)),
        RequestData::Structured(value) => Ok(Some(RequestBody::Structured(value.clone()))),
        RequestData::None => Ok(Some(RequestBody::Empty)),
    }
}

/// Resolve the effective URL: configured value, else the element's link
/// target, else the nearest enclosing form's action.
async fn resolve_url(
    settings: &Settings,
    element: &ElementRef,
    dom: &dyn DomPort,
    prompt: &dyn PromptPort,
) -> Result<Option<String>, BindError> {
    if !settings.url.is_empty() {
        return Ok(Some(settings.url.clone()));
    }
    // An empty attribute is as good as a missing one.
    if let Some(href) = dom.link_target(element).await?.filter(|href| !href.is_empty()) {
        return Ok(Some(href));
    }
    if let Some(action) = dom
        .enclosing_form_action(element)
        .await?
        .filter(|action| !action.is_empty())
    {
        return Ok(Some(action));
    }
    warn!("no URL could be resolved");
    prompt.notify("wirebind: no URL given.").await;
    Ok(None)
}

async fn confirm_message(
    settings: &Settings,
    element: &ElementRef,
    dom: &dyn DomPort,
) -> Result<String, BindError> {
    if settings.smart_confirm {
        let text = dom.rendered_text(element).await?;
        if !text.is_empty() {
            return Ok(format!("{text}{}", settings.smart_confirm_message));
        }
    }
    Ok(settings.confirm_message.clone())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::json;

    use settings_cascade::default_settings;
    use wirebind_core_types::{RequestData, Selector};

    use super::*;

    #[derive(Default)]
    struct MockDom {
        counts: HashMap<String, usize>,
        serialized: String,
        link: Option<String>,
        form_action: Option<String>,
        text: String,
    }

    #[async_trait]
    impl DomPort for MockDom {
        async fn query_count(&self, selector: &Selector) -> Result<usize, BindError> {
            Ok(*self.counts.get(selector.as_str()).unwrap_or(&0))
        }

        async fn serialize_form(&self, _selector: &Selector) -> Result<String, BindError> {
            Ok(self.serialized.clone())
        }

        async fn link_target(&self, _element: &ElementRef) -> Result<Option<String>, BindError> {
            Ok(self.link.clone())
        }

        async fn enclosing_form_action(
            &self,
            _element: &ElementRef,
        ) -> Result<Option<String>, BindError> {
            Ok(self.form_action.clone())
        }

        async fn rendered_text(&self, _element: &ElementRef) -> Result<String, BindError> {
            Ok(self.text.clone())
        }
    }

    #[derive(Default)]
    struct MockPrompt {
        confirm_answer: bool,
        notifications: Mutex<Vec<String>>,
        confirmations: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PromptPort for MockPrompt {
        async fn notify(&self, message: &str) {
            self.notifications.lock().unwrap().push(message.to_string());
        }

        async fn confirm(&self, message: &str) -> bool {
            self.confirmations.lock().unwrap().push(message.to_string());
            self.confirm_answer
        }
    }

    #[derive(Default)]
    struct MockEvents {
        suppressed: AtomicUsize,
    }

    #[async_trait]
    impl EventsPort for MockEvents {
        async fn suppress_default(&self, _event: &TriggerEvent) {
            self.suppressed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn event() -> TriggerEvent {
        TriggerEvent::new(ElementRef("el-1".into()), "click")
    }

    async fn run(
        settings: &Settings,
        dom: &MockDom,
        prompt: &MockPrompt,
        events: &MockEvents,
    ) -> GateDecision {
        should_proceed(
            settings,
            &event(),
            GateDeps {
                dom,
                prompt,
                events,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn default_is_suppressed_before_anything_else() {
        let mut settings = default_settings();
        settings.data = RequestData::Selector(Selector::new("#missing"));
        let dom = MockDom::default();
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(decision, GateDecision::Abort);
        assert_eq!(events.suppressed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unresolvable_data_selector_aborts_with_notification() {
        let mut settings = default_settings();
        settings.url = "/items".into();
        settings.data = RequestData::Selector(Selector::new("#form1"));
        let dom = MockDom::default();
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(decision, GateDecision::Abort);
        let notifications = prompt.notifications.lock().unwrap();
        assert_eq!(
            notifications.as_slice(),
            ["wirebind: data (#form1) cannot be selected."]
        );
    }

    #[tokio::test]
    async fn data_selector_hit_serializes_the_node_set() {
        let mut settings = default_settings();
        settings.url = "/items".into();
        settings.data = RequestData::Selector(Selector::new("#form1"));
        let dom = MockDom {
            counts: HashMap::from([("#form1".to_string(), 1)]),
            serialized: "name=x&qty=2".into(),
            ..MockDom::default()
        };
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Execute {
                url: "/items".into(),
                body: RequestBody::Encoded("name=x&qty=2".into()),
            }
        );
    }

    #[tokio::test]
    async fn structured_data_passes_through() {
        let mut settings = default_settings();
        settings.url = "/items".into();
        settings.data = RequestData::Structured(json!({"id": 5}));
        let dom = MockDom::default();
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Execute {
                url: "/items".into(),
                body: RequestBody::Structured(json!({"id": 5})),
            }
        );
    }

    #[tokio::test]
    async fn empty_url_falls_back_to_link_target() {
        let settings = default_settings();
        let dom = MockDom {
            link: Some("/items/5".into()),
            ..MockDom::default()
        };
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Execute {
                url: "/items/5".into(),
                body: RequestBody::Empty,
            }
        );
    }

    #[tokio::test]
    async fn empty_link_target_falls_through_to_form_action() {
        let settings = default_settings();
        let dom = MockDom {
            link: Some(String::new()),
            form_action: Some("/submit".into()),
            ..MockDom::default()
        };
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Execute {
                url: "/submit".into(),
                body: RequestBody::Empty,
            }
        );
    }

    #[tokio::test]
    async fn empty_form_action_aborts_like_a_missing_one() {
        let settings = default_settings();
        let dom = MockDom {
            form_action: Some(String::new()),
            ..MockDom::default()
        };
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(decision, GateDecision::Abort);
        let notifications = prompt.notifications.lock().unwrap();
        assert_eq!(notifications.as_slice(), ["wirebind: no URL given."]);
    }

    #[tokio::test]
    async fn empty_url_falls_back_to_form_action_when_no_link() {
        let settings = default_settings();
        let dom = MockDom {
            form_action: Some("/submit".into()),
            ..MockDom::default()
        };
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Execute {
                url: "/submit".into(),
                body: RequestBody::Empty,
            }
        );
    }

    #[tokio::test]
    async fn missing_url_everywhere_aborts_with_notification() {
        let settings = default_settings();
        let dom = MockDom::default();
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(decision, GateDecision::Abort);
        let notifications = prompt.notifications.lock().unwrap();
        assert_eq!(notifications.as_slice(), ["wirebind: no URL given."]);
    }

    #[tokio::test]
    async fn smart_confirm_uses_element_text() {
        let mut settings = default_settings();
        settings.url = "/items/5".into();
        settings.confirm_needed = true;
        let dom = MockDom {
            text: "Delete".into(),
            ..MockDom::default()
        };
        let prompt = MockPrompt {
            confirm_answer: true,
            ..MockPrompt::default()
        };
        let events = MockEvents::default();

        run(&settings, &dom, &prompt, &events).await;
        let confirmations = prompt.confirmations.lock().unwrap();
        assert_eq!(confirmations.as_slice(), ["Delete: are you sure?"]);
    }

    #[tokio::test]
    async fn static_message_used_when_element_text_is_empty() {
        let mut settings = default_settings();
        settings.url = "/items/5".into();
        settings.confirm_needed = true;
        let dom = MockDom::default();
        let prompt = MockPrompt {
            confirm_answer: true,
            ..MockPrompt::default()
        };
        let events = MockEvents::default();

        run(&settings, &dom, &prompt, &events).await;
        let confirmations = prompt.confirmations.lock().unwrap();
        assert_eq!(confirmations.as_slice(), ["Are you sure?"]);
    }

    #[tokio::test]
    async fn confirm_only_forces_confirmation_and_navigates() {
        let mut settings = default_settings();
        settings.url = "/items/5".into();
        settings.confirm_only = true;
        settings.confirm_needed = false;
        let dom = MockDom::default();
        let prompt = MockPrompt {
            confirm_answer: true,
            ..MockPrompt::default()
        };
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(
            decision,
            GateDecision::Navigate {
                url: "/items/5".into()
            }
        );
        assert_eq!(prompt.confirmations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn declined_confirmation_cancels_silently() {
        let mut settings = default_settings();
        settings.url = "/items/5".into();
        settings.confirm_needed = true;
        let dom = MockDom::default();
        let prompt = MockPrompt::default();
        let events = MockEvents::default();

        let decision = run(&settings, &dom, &prompt, &events).await;
        assert_eq!(decision, GateDecision::Cancelled);
        assert!(prompt.notifications.lock().unwrap().is_empty());
    }
}
