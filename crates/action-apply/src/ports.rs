use async_trait::async_trait;

use wirebind_core_types::{BindError, Selector, TriggerEvent};

/// Relative insertion position for the four insertion directives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InsertPosition {
    Prepend,
    Append,
    Before,
    After,
}

/// DOM mutation capabilities the dispatcher drives.
#[async_trait]
pub trait MutatePort: Send + Sync {
    /// Number of nodes the selector resolves to.
    async fn query_count(&self, selector: &Selector) -> Result<usize, BindError>;
    async fn remove(&self, selector: &Selector) -> Result<(), BindError>;
    async fn hide(&self, selector: &Selector) -> Result<(), BindError>;
    async fn insert(
        &self,
        selector: &Selector,
        position: InsertPosition,
        content: &str,
    ) -> Result<(), BindError>;
    /// Set the matched nodes' inner content.
    async fn replace_inner(&self, selector: &Selector, content: &str) -> Result<(), BindError>;
    /// Animated viewport scroll to the first matched node.
    async fn scroll_to(&self, selector: &Selector) -> Result<(), BindError>;
}

/// User-facing notification for the `alert` directive and miss reporting.
#[async_trait]
pub trait PromptPort: Send + Sync {
    async fn notify(&self, message: &str);
}

/// Re-trigger of the environment's default action for the `proceed`
/// directive.
#[async_trait]
pub trait EventsPort: Send + Sync {
    async fn resume_default(&self, event: &TriggerEvent);
}
