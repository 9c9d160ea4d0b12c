//! Task command and query handlers.
//!
//! Every mutation runs the same coordination sequence: durable write,
//! synchronous cache invalidation, then a best-effort event publish. The
//! publish comes last and its failure is logged but never surfaced; the
//! durable write is the source of truth and stays committed either way.

mod complete_task;
mod create_task;
mod delete_task;
mod list_tasks;
mod reopen_task;
mod update_task;

pub use complete_task::{CompleteTaskCommand, CompleteTaskHandler};
pub use create_task::{CreateTaskCommand, CreateTaskHandler};
pub use delete_task::{DeleteTaskCommand, DeleteTaskHandler};
pub use list_tasks::ListTasksHandler;
pub use reopen_task::{ReopenTaskCommand, ReopenTaskHandler};
pub use update_task::{UpdateTaskCommand, UpdateTaskHandler};

use std::sync::Arc;

use tracing::warn;

use crate::domain::foundation::{EventEnvelope, TaskEventKind};
use crate::domain::task::Task;
use crate::ports::{task_list_key, EventPublisher, ListCache};

/// Publish a lifecycle event for an already-committed mutation.
///
/// Failures are logged and swallowed: consumers miss one notification, but
/// the task data itself is never rolled back over a broker problem.
pub(crate) async fn publish_task_event(
    publisher: &Arc<dyn EventPublisher>,
    kind: TaskEventKind,
    task: &Task,
) {
    let envelope = EventEnvelope::for_task(kind, task);
    if let Err(error) = publisher.publish(envelope).await {
        warn!(
            routing_key = kind.routing_key(),
            task_id = %task.id,
            %error,
            "event publish failed; mutation already committed"
        );
    }
}

/// Drop the owner's cached list after a committed mutation.
pub(crate) async fn invalidate_task_list(cache: &Arc<dyn ListCache>, task: &Task) {
    cache.invalidate(&task_list_key(&task.owner_id)).await;
}
