//! Composition root for the owner-facing application surface.

use std::sync::Arc;
use std::time::Duration;

use crate::ports::{
    EventPublisher, IdentityVerifier, ListCache, NotificationRepository, TaskRepository,
};

use super::notifications::{ClearNotificationsHandler, ListNotificationsHandler};
use super::tasks::{
    CompleteTaskHandler, CreateTaskHandler, DeleteTaskHandler, ListTasksHandler,
    ReopenTaskHandler, UpdateTaskHandler,
};

/// Fully wired handler set an embedding transport layer serves from.
///
/// Constructed once at startup against real adapters, or in tests against
/// the in-memory ones; every handler shares the same repositories, cache,
/// and publisher.
pub struct AppContext {
    pub create_task: CreateTaskHandler,
    pub list_tasks: ListTasksHandler,
    pub update_task: UpdateTaskHandler,
    pub complete_task: CompleteTaskHandler,
    pub reopen_task: ReopenTaskHandler,
    pub delete_task: DeleteTaskHandler,
    pub list_notifications: ListNotificationsHandler,
    pub clear_notifications: ClearNotificationsHandler,
    pub identity_verifier: Arc<dyn IdentityVerifier>,
}

impl AppContext {
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        notifications: Arc<dyn NotificationRepository>,
        cache: Arc<dyn ListCache>,
        publisher: Arc<dyn EventPublisher>,
        identity_verifier: Arc<dyn IdentityVerifier>,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            create_task: CreateTaskHandler::new(tasks.clone(), cache.clone(), publisher.clone()),
            list_tasks: ListTasksHandler::new(tasks.clone(), cache.clone(), cache_ttl),
            update_task: UpdateTaskHandler::new(tasks.clone(), cache.clone()),
            complete_task: CompleteTaskHandler::new(
                tasks.clone(),
                cache.clone(),
                publisher.clone(),
            ),
            reopen_task: ReopenTaskHandler::new(tasks.clone(), cache.clone(), publisher.clone()),
            delete_task: DeleteTaskHandler::new(tasks, cache, publisher),
            list_notifications: ListNotificationsHandler::new(notifications.clone()),
            clear_notifications: ClearNotificationsHandler::new(notifications),
            identity_verifier,
        }
    }
}
