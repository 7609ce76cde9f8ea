use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use wirebind_core_types::{BindError, ElementRef, TriggerEvent};

pub type TriggerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Handler the binder registers with the environment for each binding.
pub type TriggerHandler = Arc<dyn Fn(TriggerEvent) -> TriggerFuture + Send + Sync>;

/// Attachment-time capabilities of the environment.
#[async_trait]
pub trait BindingPort: Send + Sync {
    /// The element's declarative metadata record, if any. Delivered as an
    /// already parsed structured value; transport-level parse failures are
    /// the environment's concern.
    async fn metadata(&self, element: &ElementRef) -> Result<Option<Value>, BindError>;

    /// Register a handler for the named event on the element.
    async fn on(
        &self,
        element: &ElementRef,
        event_name: &str,
        handler: TriggerHandler,
    ) -> Result<(), BindError>;
}

/// Direct navigation, used by confirm-only bindings.
#[async_trait]
pub trait NavPort: Send + Sync {
    async fn navigate(&self, url: &str);
}
