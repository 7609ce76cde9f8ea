use serde_json::Value;
use tracing::{debug, warn};

use wirebind_core_types::{ActionKind, HttpMethod, LifecycleStage, RequestData, Selector};

use crate::errors::CascadeError;

/// Fully resolved per-binding configuration.
///
/// Field names match the stable settings-key vocabulary exactly; the same
/// names are accepted in every cascade layer including the per-element
/// metadata record.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub event: String,
    pub url: String,
    pub data: RequestData,
    pub method: HttpMethod,
    pub confirm_needed: bool,
    pub confirm_only: bool,
    pub confirm_message: String,
    pub smart_confirm: bool,
    pub smart_confirm_message: String,
    pub before_item: Selector,
    pub before_html: String,
    pub before_action: ActionKind,
    pub success_item: Selector,
    pub success_action: ActionKind,
    pub error_item: Selector,
    pub error_action: ActionKind,
    pub after_item: Selector,
    pub after_action: ActionKind,
    pub after_html: String,
}

impl Settings {
    pub fn stage_action(&self, stage: LifecycleStage) -> ActionKind {
        match stage {
            LifecycleStage::Before => self.before_action,
            LifecycleStage::Success => self.success_action,
            LifecycleStage::Error => self.error_action,
            LifecycleStage::After => self.after_action,
        }
    }

    pub fn stage_item(&self, stage: LifecycleStage) -> &Selector {
        match stage {
            LifecycleStage::Before => &self.before_item,
            LifecycleStage::Success => &self.success_item,
            LifecycleStage::Error => &self.error_item,
            LifecycleStage::After => &self.after_item,
        }
    }
}

/// One partial cascade layer; every key optional.
///
/// A key left `None` falls through to the earlier layers, a key set here
/// overrides them. Used for globally overridden defaults, per-instance
/// options, and the parsed per-element metadata record alike.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsLayer {
    pub event: Option<String>,
    pub url: Option<String>,
    pub data: Option<RequestData>,
    pub method: Option<HttpMethod>,
    pub confirm_needed: Option<bool>,
    pub confirm_only: Option<bool>,
    pub confirm_message: Option<String>,
    pub smart_confirm: Option<bool>,
    pub smart_confirm_message: Option<String>,
    pub before_item: Option<Selector>,
    pub before_html: Option<String>,
    pub before_action: Option<ActionKind>,
    pub success_item: Option<Selector>,
    pub success_action: Option<ActionKind>,
    pub error_item: Option<Selector>,
    pub error_action: Option<ActionKind>,
    pub after_item: Option<Selector>,
    pub after_action: Option<ActionKind>,
    pub after_html: Option<String>,
}

impl SettingsLayer {
    /// Parse a declarative metadata record into a layer.
    ///
    /// Unknown keys are ignored for forward compatibility; known keys with
    /// values of the wrong shape are configuration errors.
    pub fn from_metadata(metadata: &Value) -> Result<Self, CascadeError> {
        let record = metadata.as_object().ok_or(CascadeError::NotARecord)?;
        let mut layer = SettingsLayer::default();

        for (key, value) in record {
            match key.as_str() {
                "event" => layer.event = Some(as_string(key, value)?),
                "url" => layer.url = Some(as_string(key, value)?),
                "data" => layer.data = Some(as_data(key, value)?),
                "method" => layer.method = Some(as_method(value)?),
                "confirm_needed" => layer.confirm_needed = Some(as_bool(key, value)?),
                "confirm_only" => layer.confirm_only = Some(as_bool(key, value)?),
                "confirm_message" => layer.confirm_message = Some(as_string(key, value)?),
                "smart_confirm" => layer.smart_confirm = Some(as_bool(key, value)?),
                "smart_confirm_message" => {
                    layer.smart_confirm_message = Some(as_string(key, value)?)
                }
                "before_item" => layer.before_item = Some(as_selector(key, value)?),
                "before_html" => layer.before_html = Some(as_string(key, value)?),
                "before_action" => layer.before_action = Some(as_action(key, value)?),
                "success_item" => layer.success_item = Some(as_selector(key, value)?),
                "success_action" => layer.success_action = Some(as_action(key, value)?),
                "error_item" => layer.error_item = Some(as_selector(key, value)?),
                "error_action" => layer.error_action = Some(as_action(key, value)?),
                "after_item" => layer.after_item = Some(as_selector(key, value)?),
                "after_action" => layer.after_action = Some(as_action(key, value)?),
                "after_html" => layer.after_html = Some(as_string(key, value)?),
                other => {
                    debug!(key = other, "ignoring unknown metadata key");
                }
            }
        }

        Ok(layer)
    }

    /// Merge another layer into this one; keys set in `other` win.
    pub fn merge_from(&mut self, other: &SettingsLayer) {
        if other.event.is_some() {
            self.event = other.event.clone();
        }
        if other.url.is_some() {
            self.url = other.url.clone();
        }
        if other.data.is_some() {
            self.data = other.data.clone();
        }
        if other.method.is_some() {
            self.method = other.method;
        }
        if other.confirm_needed.is_some() {
            self.confirm_needed = other.confirm_needed;
        }
        if other.confirm_only.is_some() {
            self.confirm_only = other.confirm_only;
        }
        if other.confirm_message.is_some() {
            self.confirm_message = other.confirm_message.clone();
        }
        if other.smart_confirm.is_some() {
            self.smart_confirm = other.smart_confirm;
        }
        if other.smart_confirm_message.is_some() {
            self.smart_confirm_message = other.smart_confirm_message.clone();
        }
        if other.before_item.is_some() {
            self.before_item = other.before_item.clone();
        }
        if other.before_html.is_some() {
            self.before_html = other.before_html.clone();
        }
        if other.before_action.is_some() {
            self.before_action = other.before_action;
        }
        if other.success_item.is_some() {
            self.success_item = other.success_item.clone();
        }
        if other.success_action.is_some() {
            self.success_action = other.success_action;
        }
        if other.error_item.is_some() {
            self.error_item = other.error_item.clone();
        }
        if other.error_action.is_some() {
            self.error_action = other.error_action;
        }
        if other.after_item.is_some() {
            self.after_item = other.after_item.clone();
        }
        if other.after_action.is_some() {
            self.after_action = other.after_action;
        }
        if other.after_html.is_some() {
            self.after_html = other.after_html.clone();
        }
    }
}

/// Apply one partial layer on top of resolved settings.
fn apply_layer(settings: &mut Settings, layer: &SettingsLayer) {
    if let Some(event) = &layer.event {
        settings.event = event.clone();
    }
    if let Some(url) = &layer.url {
        settings.url = url.clone();
    }
    if let Some(data) = &layer.data {
        settings.data = data.clone();
    }
    if let Some(method) = layer.method {
        settings.method = method;
    }
    if let Some(confirm_needed) = layer.confirm_needed {
        settings.confirm_needed = confirm_needed;
    }
    if let Some(confirm_only) = layer.confirm_only {
        settings.confirm_only = confirm_only;
    }
    if let Some(confirm_message) = &layer.confirm_message {
        settings.confirm_message = confirm_message.clone();
    }
    if let Some(smart_confirm) = layer.smart_confirm {
        settings.smart_confirm = smart_confirm;
    }
    if let Some(smart_confirm_message) = &layer.smart_confirm_message {
        settings.smart_confirm_message = smart_confirm_message.clone();
    }
    if let Some(before_item) = &layer.before_item {
        settings.before_item = before_item.clone();
    }
    if let Some(before_html) = &layer.before_html {
        settings.before_html = before_html.clone();
    }
    if let Some(before_action) = layer.before_action {
        settings.before_action = before_action;
    }
    if let Some(success_item) = &layer.success_item {
        settings.success_item = success_item.clone();
    }
    if let Some(success_action) = layer.success_action {
        settings.success_action = success_action;
    }
    if let Some(error_item) = &layer.error_item {
        settings.error_item = error_item.clone();
    }
    if let Some(error_action) = layer.error_action {
        settings.error_action = error_action;
    }
    if let Some(after_item) = &layer.after_item {
        settings.after_item = after_item.clone();
    }
    if let Some(after_action) = layer.after_action {
        settings.after_action = after_action;
    }
    if let Some(after_html) = &layer.after_html {
        settings.after_html = after_html.clone();
    }
}

/// Pure four-layer merge.
///
/// Fixed, deterministic order: global defaults < globally overridden
/// defaults < per-instance options < per-element metadata. Later layers
/// override only the keys they explicitly set; no layer may be skipped
/// (absent layers are empty partials).
pub fn resolve(
    defaults: &Settings,
    overridden: &SettingsLayer,
    instance: &SettingsLayer,
    metadata: &SettingsLayer,
) -> Settings {
    let mut settings = defaults.clone();
    apply_layer(&mut settings, overridden);
    apply_layer(&mut settings, instance);
    apply_layer(&mut settings, metadata);
    settings
}

fn as_string(key: &str, value: &Value) -> Result<String, CascadeError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| CascadeError::InvalidValue {
            key: key.to_string(),
            detail: format!("expected string, got {value}"),
        })
}

fn as_bool(key: &str, value: &Value) -> Result<bool, CascadeError> {
    value.as_bool().ok_or_else(|| CascadeError::InvalidValue {
        key: key.to_string(),
        detail: format!("expected bool, got {value}"),
    })
}

fn as_selector(key: &str, value: &Value) -> Result<Selector, CascadeError> {
    as_string(key, value).map(Selector)
}

fn as_action(key: &str, value: &Value) -> Result<ActionKind, CascadeError> {
    let tag = as_string(key, value)?;
    match tag.parse() {
        Ok(kind) => Ok(kind),
        // Unknown tags stay attached as no-ops, like unknown keys are
        // ignored: a vocabulary from a newer deployment must not break
        // the binding.
        Err(_) => {
            warn!(key, tag = tag.as_str(), "unknown action tag, treating as no-op");
            Ok(ActionKind::None)
        }
    }
}

fn as_method(value: &Value) -> Result<HttpMethod, CascadeError> {
    let name = value
        .as_str()
        .ok_or_else(|| CascadeError::UnknownMethod(value.to_string()))?;
    name.parse()
        .map_err(|_| CascadeError::UnknownMethod(name.to_string()))
}

fn as_data(key: &str, value: &Value) -> Result<RequestData, CascadeError> {
    match value {
        Value::Null => Ok(RequestData::None),
        // An empty selector string means "no data", not a reference that
        // can never resolve.
        Value::String(selector) if selector.is_empty() => Ok(RequestData::None),
        Value::String(selector) => Ok(RequestData::Selector(Selector::new(selector.clone()))),
        Value::Object(_) | Value::Array(_) => Ok(RequestData::Structured(value.clone())),
        other => Err(CascadeError::InvalidValue {
            key: key.to_string(),
            detail: format!("expected null, string, object or array, got {other}"),
        }),
    }
}
