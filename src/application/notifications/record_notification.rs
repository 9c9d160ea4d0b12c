//! RecordNotificationHandler - turn delivered task events into stored
//! notifications.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::foundation::{
    DomainError, EventEnvelope, TaskEventFields, TaskEventKind,
};
use crate::domain::notification::{NewNotification, NotificationKind};
use crate::ports::{EventHandler, NotificationRepository};

/// Consumer-side handler for the `task.*` subscription.
///
/// - Unknown routing keys are acknowledged as no-ops so additive taxonomy
///   growth on the producer side never poisons the queue.
/// - A payload missing its required fields is an error and goes through
///   the redelivery/dead-letter policy.
/// - Inserts are append-only; a redelivered event stores a duplicate
///   notification, which is the accepted trade-off of at-least-once
///   delivery here.
pub struct RecordNotificationHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl RecordNotificationHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl EventHandler for RecordNotificationHandler {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let Some(kind) = TaskEventKind::from_routing_key(&envelope.routing_key) else {
            warn!(
                routing_key = %envelope.routing_key,
                message_id = %envelope.message_id,
                "unrecognized routing key; acknowledging as no-op"
            );
            return Ok(());
        };

        let fields: TaskEventFields = envelope.payload_as().map_err(|error| {
            DomainError::validation(
                "payload",
                format!("Event payload missing required fields: {error}"),
            )
        })?;

        let notification_kind = NotificationKind::from_event(kind);
        let message = notification_kind.message(&fields);
        let stored = self
            .repository
            .insert(NewNotification::new(
                fields.owner_id,
                notification_kind,
                message,
            ))
            .await?;

        info!(
            routing_key = %envelope.routing_key,
            message_id = %envelope.message_id,
            notification_id = %stored.id,
            "notification recorded"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "record-notification"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationRepository;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    fn handler(repository: &Arc<InMemoryNotificationRepository>) -> RecordNotificationHandler {
        RecordNotificationHandler::new(repository.clone())
    }

    fn created_event() -> EventEnvelope {
        EventEnvelope::new(
            "task.created",
            json!({"id": "t1", "ownerId": "u1", "title": "Buy milk"}),
        )
    }

    #[tokio::test]
    async fn created_event_stores_rendered_notification() {
        let repository = Arc::new(InMemoryNotificationRepository::new());

        handler(&repository).handle(created_event()).await.unwrap();

        let stored = repository.all();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].message, "Task created: Buy milk");
        assert_eq!(stored[0].kind, NotificationKind::TaskCreated);
        assert_eq!(stored[0].owner_id.as_str(), "u1");
    }

    #[tokio::test]
    async fn unknown_routing_key_is_acked_without_storing() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let envelope = EventEnvelope::new("task.starred", json!({"id": "t1", "ownerId": "u1"}));

        let result = handler(&repository).handle(envelope).await;

        assert!(result.is_ok());
        assert!(repository.all().is_empty());
        assert_eq!(repository.insert_attempts(), 0);
    }

    #[tokio::test]
    async fn missing_owner_is_a_processing_failure() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let envelope = EventEnvelope::new("task.created", json!({"id": "t1"}));

        let err = handler(&repository).handle(envelope).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(repository.all().is_empty());
    }

    #[tokio::test]
    async fn deleted_event_without_title_falls_back_to_id() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let envelope = EventEnvelope::new("task.deleted", json!({"id": "t1", "ownerId": "u1"}));

        handler(&repository).handle(envelope).await.unwrap();

        assert_eq!(repository.all()[0].message, "Task deleted: t1");
    }

    #[tokio::test]
    async fn store_failure_propagates_for_redelivery() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        repository.fail_inserts(true);

        let err = handler(&repository).handle(created_event()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[tokio::test]
    async fn duplicate_delivery_stores_twice() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let h = handler(&repository);
        let envelope = created_event();

        h.handle(envelope.clone()).await.unwrap();
        h.handle(envelope).await.unwrap();

        assert_eq!(repository.all().len(), 2);
    }
}
