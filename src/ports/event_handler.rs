//! EventHandler port - the consumer-side processing callback.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Processing callback invoked for each delivered envelope.
///
/// Contract with the consumer runtime:
/// - `Ok(())` acknowledges the message (including recognized-but-ignored
///   routing keys: unknown keys are a handled no-op, not an error)
/// - `Err(_)` negatively acknowledges it for redelivery, until the
///   redelivery threshold routes it to the dead-letter stream
/// - Handlers must tolerate duplicate deliveries: the same envelope may be
///   fully processed more than once under at-least-once delivery
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process one delivered envelope.
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logs.
    fn name(&self) -> &'static str;
}
