//! ReopenTaskHandler - reopen a task and announce it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId, TaskEventKind, TaskId};
use crate::domain::task::{Task, TaskStatus};
use crate::ports::{EventPublisher, ListCache, TaskRepository};

use super::{invalidate_task_list, publish_task_event};

/// Command to reopen an owned task.
#[derive(Debug, Clone)]
pub struct ReopenTaskCommand {
    pub owner_id: OwnerId,
    pub id: TaskId,
}

pub struct ReopenTaskHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
    publisher: Arc<dyn EventPublisher>,
}

impl ReopenTaskHandler {
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

    pub async fn handle(&self, cmd: ReopenTaskCommand) -> Result<Task, DomainError> {
        let task = self
            .repository
            .set_status(&cmd.owner_id, cmd.id, TaskStatus::Open)
            .await?
            .ok_or_else(DomainError::task_not_found)?;

        invalidate_task_list(&self.cache, &task).await;
        publish_task_event(&self.publisher, TaskEventKind::Opened, &task).await;

        Ok(task)
    }
}
