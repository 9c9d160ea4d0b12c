//! DeleteTaskHandler - delete a task and announce it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId, TaskEventKind, TaskId};
use crate::domain::task::Task;
use crate::ports::{EventPublisher, ListCache, TaskRepository};

use super::{invalidate_task_list, publish_task_event};

/// Command to delete an owned task.
#[derive(Debug, Clone)]
pub struct DeleteTaskCommand {
    pub owner_id: OwnerId,
    pub id: TaskId,
}

pub struct DeleteTaskHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
    publisher: Arc<dyn EventPublisher>,
}

impl DeleteTaskHandler {
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        cache: Arc<dyn ListCache>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            cache,
            publisher,
        }
    }

    /// Returns the deleted row, so callers (and the event payload) still
    /// have the title after the row is gone.
    pub async fn handle(&self, cmd: DeleteTaskCommand) -> Result<Task, DomainError> {
        let task = self
            .repository
            .delete(&cmd.owner_id, cmd.id)
            .await?
            .ok_or_else(DomainError::task_not_found)?;

        invalidate_task_list(&self.cache, &task).await;
        publish_task_event(&self.publisher, TaskEventKind::Deleted, &task).await;

        Ok(task)
    }
}
