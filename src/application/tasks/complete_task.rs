//! CompleteTaskHandler - mark a task done and announce it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId, TaskEventKind, TaskId};
use crate::domain::task::{Task, TaskStatus};
use crate::ports::{EventPublisher, ListCache, TaskRepository};

use super::{invalidate_task_list, publish_task_event};

/// Command to mark an owned task as done.
///
/// Completing an already-done task is idempotent and still publishes; the
/// consumer side tolerates the duplicate notification.
#[derive(Debug, Clone)]
pub struct CompleteTaskCommand {
    pub owner_id: OwnerId,
    pub id: TaskId,
}

pub struct CompleteTaskHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
    publisher: Arc<dyn EventPublisher>,
}

impl CompleteTaskHandler {
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

    pub async fn handle(&self, cmd: CompleteTaskCommand) -> Result<Task, DomainError> {
        let task = self
            .repository
            .set_status(&cmd.owner_id, cmd.id, TaskStatus::Done)
            .await?
            .ok_or_else(DomainError::task_not_found)?;

        invalidate_task_list(&self.cache, &task).await;
        publish_task_event(&self.publisher, TaskEventKind::Completed, &task).await;

        Ok(task)
    }
}
