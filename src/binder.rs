use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use action_apply::ports::{EventsPort as RetriggerPort, MutatePort, PromptPort as NotifyPort};
use confirm_gate::ports::{DomPort, EventsPort as SuppressPort, PromptPort};
use confirm_gate::{should_proceed, GateDecision, GateDeps};
use request_flow::ports::TransportPort;
use request_flow::{derive_descriptor, execute, DispatchHooks, FlowCx, LifecycleHooks, RuntimeDeps};
use settings_cascade::{resolve, DefaultsProvider, SettingsLayer};
use wirebind_core_types::{BindError, BindingId, ElementRef, TriggerEvent};

use crate::ports::{BindingPort, NavPort, TriggerHandler};
use crate::registry::BindingRegistry;

/// Facade over the binding crates: resolves the cascade at bind time,
/// registers trigger handlers, and drives gate and request flow per
/// trigger.
pub struct Binder {
    inner: Arc<BinderInner>,
}

struct BinderInner {
    defaults: Arc<DefaultsProvider>,
    registry: BindingRegistry,
    dom: Arc<dyn DomPort>,
    prompt: Arc<dyn PromptPort>,
    suppress: Arc<dyn SuppressPort>,
    transport: Arc<dyn TransportPort>,
    nav: Arc<dyn NavPort>,
    binding: Arc<dyn BindingPort>,
    hooks: Arc<dyn LifecycleHooks>,
}

pub struct BinderBuilder {
    defaults: Option<Arc<DefaultsProvider>>,
    dom: Option<Arc<dyn DomPort>>,
    prompt: Option<Arc<dyn PromptPort>>,
    suppress: Option<Arc<dyn SuppressPort>>,
    mutate: Option<Arc<dyn MutatePort>>,
    notify: Option<Arc<dyn NotifyPort>>,
    retrigger: Option<Arc<dyn RetriggerPort>>,
    transport: Option<Arc<dyn TransportPort>>,
    nav: Option<Arc<dyn NavPort>>,
    binding: Option<Arc<dyn BindingPort>>,
    hooks: Option<Arc<dyn LifecycleHooks>>,
}

impl BinderBuilder {
    pub fn new() -> Self {
        Self {
            defaults: None,
            dom: None,
            prompt: None,
            suppress: None,
            mutate: None,
            notify: None,
            retrigger: None,
            transport: None,
            nav: None,
            binding: None,
            hooks: None,
        }
    }

    pub fn with_defaults(mut self, provider: Arc<DefaultsProvider>) -> Self {
        self.defaults = Some(provider);
        self
    }

    pub fn with_dom(mut self, port: Arc<dyn DomPort>) -> Self {
        self.dom = Some(port);
        self
    }

    pub fn with_prompt(mut self, port: Arc<dyn PromptPort>) -> Self {
        self.prompt = Some(port);
        self
    }

    pub fn with_suppress(mut self, port: Arc<dyn SuppressPort>) -> Self {
        self.suppress = Some(port);
        self
    }

    pub fn with_mutate(mut self, port: Arc<dyn MutatePort>) -> Self {
        self.mutate = Some(port);
        self
    }

    pub fn with_notify(mut self, port: Arc<dyn NotifyPort>) -> Self {
        self.notify = Some(port);
        self
    }

    pub fn with_retrigger(mut self, port: Arc<dyn RetriggerPort>) -> Self {
        self.retrigger = Some(port);
        self
    }

    pub fn with_transport(mut self, port: Arc<dyn TransportPort>) -> Self {
        self.transport = Some(port);
        self
    }

    pub fn with_nav(mut self, port: Arc<dyn NavPort>) -> Self {
        self.nav = Some(port);
        self
    }

    pub fn with_binding(mut self, port: Arc<dyn BindingPort>) -> Self {
        self.binding = Some(port);
        self
    }

    /// Replace the default dispatcher-backed lifecycle hooks.
    pub fn with_hooks(mut self, hooks: Arc<dyn LifecycleHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn build(self) -> Binder {
        let mutate = self.mutate.expect("mutate port is required");
        let notify = self.notify.expect("notify port is required");
        let retrigger = self.retrigger.expect("retrigger port is required");
        let hooks = self
            .hooks
            .unwrap_or_else(|| Arc::new(DispatchHooks::new(mutate, notify, retrigger)));
        Binder {
            inner: Arc::new(BinderInner {
                defaults: self
                    .defaults
                    .unwrap_or_else(|| Arc::new(DefaultsProvider::new())),
                registry: BindingRegistry::new(),
                dom: self.dom.expect("dom port is required"),
                prompt: self.prompt.expect("prompt port is required"),
                suppress: self.suppress.expect("suppress port is required"),
                transport: self.transport.expect("transport port is required"),
                nav: self.nav.expect("nav port is required"),
                binding: self.binding.expect("binding port is required"),
                hooks,
            }),
        }
    }
}

impl Default for BinderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder {
    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    /// The injected defaults provider; `set_defaults` calls through it
    /// affect every subsequent bind.
    pub fn defaults(&self) -> &Arc<DefaultsProvider> {
        &self.inner.defaults
    }

    /// Attach a binding to an element.
    ///
    /// The cascade is resolved once, here. Binding the same element again
    /// is a no-op returning the existing id.
    #[instrument(skip_all, fields(element = %element))]
    pub async fn bind(
        &self,
        element: ElementRef,
        instance: SettingsLayer,
    ) -> Result<BindingId, BindError> {
        let inner = &self.inner;
        if let Some(entry) = inner.registry.lookup(&element) {
            debug!("element already bound");
            return Ok(entry.id.clone());
        }

        let metadata = inner.binding.metadata(&element).await?;
        let metadata_layer = match &metadata {
            Some(value) => SettingsLayer::from_metadata(value)?,
            None => SettingsLayer::default(),
        };

        let (base, overridden) = inner.defaults.layers();
        let settings = Arc::new(resolve(&base, &overridden, &instance, &metadata_layer));

        let (entry, fresh) = inner.registry.attach(element.clone(), settings);
        if !fresh {
            debug!("element already bound");
            return Ok(entry.id.clone());
        }

        let handler = trigger_handler(Arc::clone(&self.inner));
        inner
            .binding
            .on(&element, &entry.settings.event, handler)
            .await?;
        info!(binding = %entry.id.0, event = %entry.settings.event, "binding attached");
        Ok(entry.id.clone())
    }
}

fn trigger_handler(inner: Arc<BinderInner>) -> TriggerHandler {
    Arc::new(move |event: TriggerEvent| {
        let inner = Arc::clone(&inner);
        Box::pin(async move { inner.handle_trigger(event).await })
    })
}

impl BinderInner {
    #[instrument(skip_all, fields(element = %event.element, event = %event.name))]
    async fn handle_trigger(&self, event: TriggerEvent) {
        let Some(entry) = self.registry.lookup(&event.element) else {
            warn!("trigger for unbound element");
            return;
        };

        let Some(_flight) = entry.begin_flight() else {
            // The element stays claimed by the outstanding request; the
            // default action is still swallowed for the dropped trigger.
            self.suppress.suppress_default(&event).await;
            debug!("trigger dropped: request already in flight");
            return;
        };

        let settings = Arc::clone(&entry.settings);
        let decision = match should_proceed(
            &settings,
            &event,
            GateDeps {
                dom: self.dom.as_ref(),
                prompt: self.prompt.as_ref(),
                events: self.suppress.as_ref(),
            },
        )
        .await
        {
            Ok(decision) => decision,
            Err(err) => {
                warn!(%err, "gate resolution failed");
                return;
            }
        };

        match decision {
            GateDecision::Abort | GateDecision::Cancelled => {}
            GateDecision::Navigate { url } => {
                debug!(%url, "confirm-only navigation");
                self.nav.navigate(&url).await;
            }
            GateDecision::Execute { url, body } => {
                let request = derive_descriptor(&settings, url, body);
                let cx = FlowCx::new(entry.id.clone(), settings);
                execute(
                    &cx,
                    &event,
                    request,
                    RuntimeDeps {
                        transport: self.transport.as_ref(),
                        hooks: self.hooks.as_ref(),
                    },
                )
                .await;
            }
        }
    }
}
