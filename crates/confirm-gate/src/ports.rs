use async_trait::async_trait;

use wirebind_core_types::{BindError, ElementRef, Selector, TriggerEvent};

/// Read-only element and query capabilities the gate resolves against.
#[async_trait]
pub trait DomPort: Send + Sync {
    /// Number of nodes the selector resolves to.
    async fn query_count(&self, selector: &Selector) -> Result<usize, BindError>;
    /// Serialize the node set at the selector into a transmittable payload.
    async fn serialize_form(&self, selector: &Selector) -> Result<String, BindError>;
    /// The element's own link target attribute, if any.
    async fn link_target(&self, element: &ElementRef) -> Result<Option<String>, BindError>;
    /// The action attribute of the nearest enclosing form-like ancestor.
    async fn enclosing_form_action(
        &self,
        element: &ElementRef,
    ) -> Result<Option<String>, BindError>;
    /// The element's rendered text.
    async fn rendered_text(&self, element: &ElementRef) -> Result<String, BindError>;
}

/// User-facing blocking notification and confirmation.
#[async_trait]
pub trait PromptPort: Send + Sync {
    async fn notify(&self, message: &str);
    /// Yes/no confirmation; `true` means the user confirmed.
    async fn confirm(&self, message: &str) -> bool;
}

/// Event default-behavior suppression.
#[async_trait]
pub trait EventsPort: Send + Sync {
    async fn suppress_default(&self, event: &TriggerEvent);
}
