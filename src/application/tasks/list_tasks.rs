//! ListTasksHandler - read-through cached task listing.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, OwnerId};
use crate::domain::task::Task;
use crate::ports::{task_list_key, ListCache, TaskRepository};

/// Read path for an owner's task list.
///
/// Cache hit short-circuits the database; a miss (including any cache
/// failure) reads the database and repopulates the entry under the
/// configured TTL. An undecodable cached value is dropped and treated as a
/// miss rather than surfaced.
pub struct ListTasksHandler {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn ListCache>,
    cache_ttl: Duration,
}

impl ListTasksHandler {
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        cache: Arc<dyn ListCache>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            repository,
            cache,
            cache_ttl,
        }
    }

    pub async fn handle(&self, owner: &OwnerId) -> Result<Vec<Task>, DomainError> {
        let key = task_list_key(owner);

        if let Some(bytes) = self.cache.get(&key).await {
            match serde_json::from_slice::<Vec<Task>>(&bytes) {
                Ok(tasks) => {
                    debug!(%owner, count = tasks.len(), "task list served from cache");
                    return Ok(tasks);
                }
                Err(error) => {
                    warn!(%owner, %error, "cached task list undecodable; dropping entry");
                    self.cache.invalidate(&key).await;
                }
            }
        }

        let tasks = self.repository.list_for_owner(owner).await?;

        match serde_json::to_vec(&tasks) {
            Ok(bytes) => self.cache.set(&key, bytes, self.cache_ttl).await,
            Err(error) => warn!(%owner, %error, "task list not cacheable"),
        }

        Ok(tasks)
    }
}
