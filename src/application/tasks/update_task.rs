//! UpdateTaskHandler - partial task update.
//!
//! Updates are the one mutation with no lifecycle event: the routing-key
//! taxonomy is closed and edits do not produce notifications.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, OwnerId, TaskId};
use crate::domain::task::{Task, TaskPatch, TaskStatus};
use crate::ports::{ListCache, TaskRepository};

use super::invalidate_task_list;

/// Command to partially update an owned task. Absent fields keep their
/// current value; an empty patch only bumps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

pub struct UpdateTaskHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
}

impl UpdateTaskHandler {
    pub fn new(repository: Arc<dyn TaskRepository>, cache: Arc<dyn ListCache>) -> Self {
        Self { repository, cache }
    }

    pub async fn handle(
        &self,
        owner: &OwnerId,
        id: TaskId,
        cmd: UpdateTaskCommand,
    ) -> Result<Task, DomainError> {
        let patch = TaskPatch::validated(cmd.title, cmd.description, cmd.status)?;

        let task = self
            .repository
            .update(owner, id, patch)
            .await?
            .ok_or_else(DomainError::task_not_found)?;

        invalidate_task_list(&self.cache, &task).await;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryListCache;
    use crate::adapters::memory::InMemoryTaskRepository;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::task::NewTask;
    use crate::ports::{task_list_key, TaskRepository as _};
    use std::time::Duration;

    fn owner() -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    async fn seeded() -> (Arc<InMemoryTaskRepository>, Arc<InMemoryListCache>, Task) {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let cache = Arc::new(InMemoryListCache::new());
        let task = repository
            .insert(NewTask::validated(owner(), "Buy milk", "").unwrap())
            .await
            .unwrap();
        (repository, cache, task)
    }

    #[tokio::test]
    async fn updates_only_present_fields() {
        let (repository, cache, task) = seeded().await;
        let handler = UpdateTaskHandler::new(repository.clone(), cache);

        let updated = handler
            .handle(
                &owner(),
                task.id,
                UpdateTaskCommand {
                    title: Some("Buy oat milk".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Buy oat milk");
        assert_eq!(updated.status, TaskStatus::Open);
    }

    #[tokio::test]
    async fn missing_task_is_not_found() {
        let (repository, cache, _) = seeded().await;
        let handler = UpdateTaskHandler::new(repository, cache);

        let err = handler
            .handle(&owner(), TaskId::new(), UpdateTaskCommand::default())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[tokio::test]
    async fn cross_owner_update_is_not_found() {
        let (repository, cache, task) = seeded().await;
        let handler = UpdateTaskHandler::new(repository, cache);

        let err = handler
            .handle(
                &OwnerId::new("u2").unwrap(),
                task.id,
                UpdateTaskCommand {
                    title: Some("Hijacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::TaskNotFound);
    }

    #[tokio::test]
    async fn update_invalidates_cached_list() {
        let (repository, cache, task) = seeded().await;
        let key = task_list_key(&owner());
        cache
            .set(&key, b"stale".to_vec(), Duration::from_secs(30))
            .await;
        let handler = UpdateTaskHandler::new(repository, cache.clone());

        handler
            .handle(&owner(), task.id, UpdateTaskCommand::default())
            .await
            .unwrap();

        assert_eq!(cache.get(&key).await, None);
    }
}
