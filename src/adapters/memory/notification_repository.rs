//! In-memory notification repository for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, Timestamp};
use crate::domain::notification::{NewNotification, Notification};
use crate::ports::NotificationRepository;

/// Append-only store. `fail_inserts` makes inserts error so consumer-side
/// retry behavior can be exercised; `insert_attempts` counts every insert
/// call including failed ones.
#[derive(Default)]
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
    fail_inserts: AtomicBool,
    insert_attempts: AtomicUsize,
}

impl InMemoryNotificationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts.load(Ordering::SeqCst)
    }

    /// Snapshot of everything stored, insertion order.
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Notification store is unavailable",
            ));
        }
        let stored = Notification {
            id: notification.id,
            owner_id: notification.owner_id,
            kind: notification.kind,
            message: notification.message,
            created_at: Timestamp::now(),
        };
        self.notifications.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_recent_for_owner(
        &self,
        owner: &OwnerId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let mut rows: Vec<Notification> = self
            .notifications
            .lock()
            .unwrap()
            .iter()
            .filter(|notification| &notification.owner_id == owner)
            .cloned()
            .collect();
        // Insertion order breaks creation-time ties, newest last; reverse
        // for newest-first.
        rows.reverse();
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn delete_all_for_owner(&self, owner: &OwnerId) -> Result<u64, DomainError> {
        let mut notifications = self.notifications.lock().unwrap();
        let before = notifications.len();
        notifications.retain(|notification| &notification.owner_id != owner);
        Ok((before - notifications.len()) as u64)
    }
}
