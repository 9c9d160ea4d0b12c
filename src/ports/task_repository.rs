//! TaskRepository port - owner-scoped task persistence.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OwnerId, TaskId};
use crate::domain::task::{NewTask, Task, TaskPatch, TaskStatus};

/// Port for the task store.
///
/// Every operation is scoped by owner; targeting another owner's task
/// behaves exactly like targeting a nonexistent one (`Ok(None)`), so the
/// repository never leaks existence across owners. Timestamps are assigned
/// by the store, and update/delete return the post-write (or pre-delete)
/// row atomically.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a new task and returns the stored row.
    async fn insert(&self, task: NewTask) -> Result<Task, DomainError>;

    /// Lists all tasks for an owner, newest first.
    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, DomainError>;

    /// Applies a partial update and returns the new row, or `None` if the
    /// task does not exist for this owner.
    async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, DomainError>;

    /// Sets the status and returns the new row, or `None` if the task does
    /// not exist for this owner.
    async fn set_status(
        &self,
        owner: &OwnerId,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, DomainError>;

    /// Deletes and returns the old row, or `None` if the task does not
    /// exist for this owner.
    async fn delete(&self, owner: &OwnerId, id: TaskId) -> Result<Option<Task>, DomainError>;
}
