//! PostgreSQL task repository.
//!
//! All mutations are single statements with `RETURNING`, so the existence
//! check, the write, and the read-back of server-assigned timestamps are
//! one atomic round trip. Owner scoping lives in the `WHERE` clause of
//! every statement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, OwnerId, TaskId, Timestamp};
use crate::domain::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::ports::TaskRepository;

use super::db_error;

type TaskRow = (
    Uuid,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

const TASK_COLUMNS: &str = "id, owner_id, title, description, status, created_at, updated_at";

fn task_from_row(row: TaskRow) -> Result<Task, DomainError> {
    let (id, owner_id, title, description, status, created_at, updated_at) = row;
    Ok(Task {
        id: TaskId::from_uuid(id),
        owner_id: OwnerId::new(owner_id)?,
        title,
        description,
        status: TaskStatus::parse(&status)?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(&self, task: NewTask) -> Result<Task, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (id, owner_id, title, description)
             VALUES ($1, $2, $3, $4)
             RETURNING id, owner_id, title, description, status, created_at, updated_at",
        )
        .bind(task.id.as_uuid())
        .bind(task.owner_id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        task_from_row(row)
    }

    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, owner_id, title, description, status, created_at, updated_at
             FROM tasks
             WHERE owner_id = $1
             ORDER BY created_at DESC",
        )
        .bind(owner.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(task_from_row).collect()
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, DomainError> {
        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE tasks SET updated_at = NOW()");
        if let Some(title) = &patch.title {
            builder.push(", title = ").push_bind(title);
        }
        if let Some(description) = &patch.description {
            builder.push(", description = ").push_bind(description);
        }
        if let Some(status) = patch.status {
            builder.push(", status = ").push_bind(status.as_str());
        }
        builder.push(" WHERE id = ").push_bind(*id.as_uuid());
        builder.push(" AND owner_id = ").push_bind(owner.as_str());
        builder.push(" RETURNING ");
        builder.push(TASK_COLUMNS);

        let row = builder
            .build_query_as::<TaskRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(task_from_row).transpose()
    }

    async fn set_status(
        &self,
        owner: &OwnerId,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET status = $3, updated_at = NOW()
             WHERE id = $1 AND owner_id = $2
             RETURNING id, owner_id, title, description, status, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(task_from_row).transpose()
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> Result<Option<Task>, DomainError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "DELETE FROM tasks
             WHERE id = $1 AND owner_id = $2
             RETURNING id, owner_id, title, description, status, created_at, updated_at",
        )
        .bind(id.as_uuid())
        .bind(owner.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        row.map(task_from_row).transpose()
    }
}
