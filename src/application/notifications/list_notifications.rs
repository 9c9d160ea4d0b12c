//! ListNotificationsHandler - recent notifications for an owner.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId};
use crate::domain::notification::Notification;
use crate::ports::NotificationRepository;

/// How many notifications a listing returns at most.
pub const RECENT_LIMIT: u32 = 50;

pub struct ListNotificationsHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl ListNotificationsHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    /// Newest first, capped at [`RECENT_LIMIT`].
    pub async fn handle(&self, owner: &OwnerId) -> Result<Vec<Notification>, DomainError> {
        self.repository
            .list_recent_for_owner(owner, RECENT_LIMIT)
            .await
    }
}
