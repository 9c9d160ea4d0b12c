//! ClearNotificationsHandler - delete an owner's notifications.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, OwnerId};
use crate::ports::NotificationRepository;

pub struct ClearNotificationsHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl ClearNotificationsHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Removes every notification for the owner, returning the count.
    /// Clearing an empty inbox is a successful no-op.
    pub async fn handle(&self, owner: &OwnerId) -> Result<u64, DomainError> {
        let removed = self.repository.delete_all_for_owner(owner).await?;
        info!(%owner, removed, "notifications cleared");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationRepository;
    use crate::domain::notification::{NewNotification, NotificationKind};

    fn owner() -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    #[tokio::test]
    async fn clears_only_that_owner_and_reports_count() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        for _ in 0..3 {
            repository
                .insert(NewNotification::new(
                    owner(),
                    NotificationKind::TaskCompleted,
                    "Task completed: x",
                ))
                .await
                .unwrap();
        }
        repository
            .insert(NewNotification::new(
                OwnerId::new("u2").unwrap(),
                NotificationKind::TaskCompleted,
                "Task completed: y",
            ))
            .await
            .unwrap();
        let handler = ClearNotificationsHandler::new(repository.clone());

        assert_eq!(handler.handle(&owner()).await.unwrap(), 3);
        assert_eq!(repository.all().len(), 1);
    }

    #[tokio::test]
    async fn clearing_nothing_returns_zero() {
        let repository = Arc::new(InMemoryNotificationRepository::new());
        let handler = ClearNotificationsHandler::new(repository);

        assert_eq!(handler.handle(&owner()).await.unwrap(), 0);
    }
}
