//! NotificationRepository port - owner-scoped notification persistence.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OwnerId};
use crate::domain::notification::{NewNotification, Notification};

/// Port for the notification store.
///
/// Inserts are append-only; duplicate inserts from redelivered events are
/// an accepted outcome of at-least-once processing.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Inserts a notification and returns the stored row.
    async fn insert(&self, notification: NewNotification) -> Result<Notification, DomainError>;

    /// Lists the most recent notifications for an owner, newest first.
    async fn list_recent_for_owner(
        &self,
        owner: &OwnerId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Deletes all notifications for an owner, returning the count removed.
    async fn delete_all_for_owner(&self, owner: &OwnerId) -> Result<u64, DomainError>;
}
