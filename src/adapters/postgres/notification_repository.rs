//! PostgreSQL notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, NotificationId, OwnerId, Timestamp};
use crate::domain::notification::{NewNotification, Notification, NotificationKind};
use crate::ports::NotificationRepository;

use super::db_error;

type NotificationRow = (Uuid, String, String, String, DateTime<Utc>);

fn notification_from_row(row: NotificationRow) -> Result<Notification, DomainError> {
    let (id, owner_id, kind, message, created_at) = row;
    Ok(Notification {
        id: NotificationId::from_uuid(id),
        owner_id: OwnerId::new(owner_id)?,
        kind: NotificationKind::parse(&kind)?,
        message,
        created_at: Timestamp::from_datetime(created_at),
    })
}

pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn insert(&self, notification: NewNotification) -> Result<Notification, DomainError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO notifications (id, owner_id, kind, message)
             VALUES ($1, $2, $3, $4)
             RETURNING id, owner_id, kind, message, created_at",
        )
        .bind(notification.id.as_uuid())
        .bind(notification.owner_id.as_str())
        .bind(notification.kind.as_str())
        .bind(&notification.message)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        notification_from_row(row)
    }

    async fn list_recent_for_owner(
        &self,
        owner: &OwnerId,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT id, owner_id, kind, message, created_at
             FROM notifications
             WHERE owner_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(owner.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(notification_from_row).collect()
    }

    async fn delete_all_for_owner(&self, owner: &OwnerId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM notifications WHERE owner_id = $1")
            .bind(owner.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
