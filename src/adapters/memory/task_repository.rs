//! In-memory task repository for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode, OwnerId, TaskId, Timestamp};
use crate::domain::task::{NewTask, Task, TaskPatch, TaskStatus};
use crate::ports::TaskRepository;

/// HashMap-backed store with the same owner-scoping and timestamp rules as
/// the real one. `fail_writes` makes every operation error, simulating a
/// database outage.
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: Mutex<HashMap<TaskId, Task>>,
    fail: AtomicBool,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Task store is unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: NewTask) -> Result<Task, DomainError> {
        self.check_available()?;
        let now = Timestamp::now();
        let stored = Task {
            id: task.id,
            owner_id: task.owner_id,
            title: task.title,
            description: task.description,
            status: TaskStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.tasks.lock().unwrap().insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn list_for_owner(&self, owner: &OwnerId) -> Result<Vec<Task>, DomainError> {
        self.check_available()?;
        let mut tasks: Vec<Task> = self
            .tasks
            .lock()
            .unwrap()
            .values()
            .filter(|task| &task.owner_id == owner)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>, DomainError> {
        self.check_available()?;
        let mut tasks = self.tasks.lock().unwrap();
        let Some(task) = tasks.get_mut(&id).filter(|task| &task.owner_id == owner) else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some(status) = patch.status {
            task.status = status;
        }
        task.updated_at = Timestamp::now();
        Ok(Some(task.clone()))
    }

    async fn set_status(
        &self,
        owner: &OwnerId,
        id: TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>, DomainError> {
        self.update(
            owner,
            id,
            TaskPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> Result<Option<Task>, DomainError> {
        self.check_available()?;
        let mut tasks = self.tasks.lock().unwrap();
        let owned = tasks
            .get(&id)
            .map(|task| &task.owner_id == owner)
            .unwrap_or(false);
        if !owned {
            return Ok(None);
        }
        Ok(tasks.remove(&id))
    }
}
