use async_trait::async_trait;

use wirebind_core_types::RequestDescriptor;

use crate::model::TransportOutcome;

/// Network dispatch capability.
///
/// Failures travel inside the outcome; the coordinator never inspects or
/// classifies them. Completion is implicit in the return.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn dispatch(&self, request: &RequestDescriptor) -> TransportOutcome;
    /// Synchronous dispatch for `TransportMode::Blocking`.
    fn dispatch_blocking(&self, request: &RequestDescriptor) -> TransportOutcome;
}
