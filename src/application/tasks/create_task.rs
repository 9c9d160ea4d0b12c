//! CreateTaskHandler - create a task and announce it.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId, TaskEventKind};
use crate::domain::task::{NewTask, Task};
use crate::ports::{EventPublisher, ListCache, TaskRepository};

use super::{invalidate_task_list, publish_task_event};

/// Command to create a task for the authenticated owner.
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
}

pub struct CreateTaskHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
    publisher: Arc<dyn EventPublisher>,
}

impl CreateTaskHandler {
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

    pub async fn handle(&self, cmd: CreateTaskCommand) -> Result<Task, DomainError> {
        let new_task = NewTask::validated(cmd.owner_id, cmd.title, cmd.description)?;
        let task = self.repository.insert(new_task).await?;

        invalidate_task_list(&self.cache, &task).await;
        publish_task_event(&self.publisher, TaskEventKind::Created, &task).await;

        Ok(task)
    }
}
