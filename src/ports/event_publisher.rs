//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how the mutation path emits events without knowing
//! about the underlying transport (NATS JetStream in production, in-memory
//! for tests).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing task lifecycle events.
///
/// Implementations must ensure:
/// - `Ok(())` means the broker durably accepted the message (publisher
///   confirm); delivery from there is at-least-once
/// - Transient connection loss is retried internally up to the configured
///   budget before an error is returned
/// - Errors are propagated to the caller, who decides whether the
///   surrounding mutation proceeds (it does, by policy)
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event and wait for durable broker acknowledgement.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
