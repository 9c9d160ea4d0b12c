//! In-memory adapters used by tests.

mod notification_repository;
mod task_repository;

pub use notification_repository::InMemoryNotificationRepository;
pub use task_repository::InMemoryTaskRepository;
