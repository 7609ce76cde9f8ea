use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

/// Shared error type for the wirebind crates.
///
/// Per-crate error enums convert into this via `From`; the binder surfaces
/// it to the embedder unchanged.
#[derive(Debug, Error, Clone)]
pub enum BindError {
    #[error("{message}")]
    Message { message: String },
}

impl BindError {
    pub fn new(message: impl Into<String>) -> Self {
        Self::Message {
            message: message.into(),
        }
    }
}

/// Identifier for one attached binding.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct BindingId(pub String);

impl BindingId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque handle to an environment-addressable node.
///
/// The embedder decides what the string means (a DOM node key, a test id);
/// the binding crates only compare and log it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ElementRef(pub String);

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Selector string resolved by the environment's query capability.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Selector(pub String);

impl Selector {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The triggering interaction as delivered by the environment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TriggerEvent {
    pub element: ElementRef,
    pub name: String,
}

impl TriggerEvent {
    pub fn new(element: ElementRef, name: impl Into<String>) -> Self {
        Self {
            element,
            name: name.into(),
        }
    }
}

/// Request method vocabulary accepted by the `method` settings key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum HttpMethod {
    Post,
    Get,
}

impl Default for HttpMethod {
    fn default() -> Self {
        HttpMethod::Post
    }
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Get => "GET",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = BindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "POST" => Ok(HttpMethod::Post),
            "GET" => Ok(HttpMethod::Get),
            other => Err(BindError::new(format!("unknown method: {other}"))),
        }
    }
}

/// Configured request data, decided at cascade-resolution time.
///
/// A string value in the `data` key is a selector reference; objects and
/// arrays travel as structured payloads. The gate resolves `Selector` into
/// a serialized form before any request is made.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestData {
    None,
    Structured(Value),
    Selector(Selector),
}

impl Default for RequestData {
    fn default() -> Self {
        RequestData::None
    }
}

/// Payload actually handed to the transport after gate resolution.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Empty,
    Structured(Value),
    Encoded(String),
}

/// Caller-visible transport mode switch.
///
/// `Blocking` is selected when the success action is `proceed`, so the
/// environment's default action can immediately follow the call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransportMode {
    Async,
    Blocking,
}

/// One derived request; computed fresh per trigger, never cached.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub body: RequestBody,
    pub mode: TransportMode,
}

/// The enumerated action-directive vocabulary.
///
/// Exact-string parse; the empty tag is the explicit no-op and unknown tags
/// are configuration errors at layer-parse time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActionKind {
    Remove,
    Hide,
    Prepend,
    Append,
    Before,
    After,
    Replace,
    Alert,
    Proceed,
    None,
}

impl Default for ActionKind {
    fn default() -> Self {
        ActionKind::None
    }
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Remove => "remove",
            ActionKind::Hide => "hide",
            ActionKind::Prepend => "prepend",
            ActionKind::Append => "append",
            ActionKind::Before => "before",
            ActionKind::After => "after",
            ActionKind::Replace => "replace",
            ActionKind::Alert => "alert",
            ActionKind::Proceed => "proceed",
            ActionKind::None => "",
        }
    }
}

impl FromStr for ActionKind {
    type Err = BindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "remove" => Ok(ActionKind::Remove),
            "hide" => Ok(ActionKind::Hide),
            "prepend" => Ok(ActionKind::Prepend),
            "append" => Ok(ActionKind::Append),
            "before" => Ok(ActionKind::Before),
            "after" => Ok(ActionKind::After),
            "replace" => Ok(ActionKind::Replace),
            "alert" => Ok(ActionKind::Alert),
            "proceed" => Ok(ActionKind::Proceed),
            "" => Ok(ActionKind::None),
            other => Err(BindError::new(format!("unknown action tag: {other}"))),
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four lifecycle points around one request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LifecycleStage {
    Before,
    Success,
    Error,
    After,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Before => "before",
            LifecycleStage::Success => "success",
            LifecycleStage::Error => "error",
            LifecycleStage::After => "after",
        }
    }
}
