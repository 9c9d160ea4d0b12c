//! Notification entity and message templates.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::foundation::{DomainError, NotificationId, OwnerId, TaskEventFields, TaskEventKind, Timestamp};

/// Kind of notification, mirroring the task lifecycle taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    TaskCreated,
    TaskOpened,
    TaskCompleted,
    TaskDeleted,
}

impl NotificationKind {
    /// Returns the storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::TaskCreated => "TASK_CREATED",
            NotificationKind::TaskOpened => "TASK_OPENED",
            NotificationKind::TaskCompleted => "TASK_COMPLETED",
            NotificationKind::TaskDeleted => "TASK_DELETED",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "TASK_CREATED" => Ok(NotificationKind::TaskCreated),
            "TASK_OPENED" => Ok(NotificationKind::TaskOpened),
            "TASK_COMPLETED" => Ok(NotificationKind::TaskCompleted),
            "TASK_DELETED" => Ok(NotificationKind::TaskDeleted),
            other => Err(DomainError::validation(
                "kind",
                format!("Unknown notification kind '{}'", other),
            )),
        }
    }

    /// Maps an event kind to its notification kind.
    pub const fn from_event(kind: TaskEventKind) -> Self {
        match kind {
            TaskEventKind::Created => NotificationKind::TaskCreated,
            TaskEventKind::Opened => NotificationKind::TaskOpened,
            TaskEventKind::Completed => NotificationKind::TaskCompleted,
            TaskEventKind::Deleted => NotificationKind::TaskDeleted,
        }
    }

    /// Renders the user-facing message for this kind from event payload
    /// fields. The deleted template falls back to the task id when the
    /// producer omitted the title.
    pub fn message(&self, fields: &TaskEventFields) -> String {
        let title = fields.title.as_deref();
        match self {
            NotificationKind::TaskCreated => {
                format!("Task created: {}", title.unwrap_or(&fields.id))
            }
            NotificationKind::TaskOpened => {
                format!("Task reopened: {}", title.unwrap_or(&fields.id))
            }
            NotificationKind::TaskCompleted => {
                format!("Task completed: {}", title.unwrap_or(&fields.id))
            }
            NotificationKind::TaskDeleted => {
                format!("Task deleted: {}", title.unwrap_or(&fields.id))
            }
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification record owned by a single identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub owner_id: OwnerId,
    pub kind: NotificationKind,
    pub message: String,
    pub created_at: Timestamp,
}

/// Input for inserting a notification.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub id: NotificationId,
    pub owner_id: OwnerId,
    pub kind: NotificationKind,
    pub message: String,
}

impl NewNotification {
    /// Creates a notification insert with a fresh id.
    pub fn new(owner_id: OwnerId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: NotificationId::new(),
            owner_id,
            kind,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::OwnerId;

    fn fields(title: Option<&str>) -> TaskEventFields {
        TaskEventFields {
            id: "t1".to_string(),
            owner_id: OwnerId::new("u1").unwrap(),
            title: title.map(String::from),
        }
    }

    #[test]
    fn templates_render_title() {
        let f = fields(Some("Buy milk"));
        assert_eq!(
            NotificationKind::TaskCreated.message(&f),
            "Task created: Buy milk"
        );
        assert_eq!(
            NotificationKind::TaskOpened.message(&f),
            "Task reopened: Buy milk"
        );
        assert_eq!(
            NotificationKind::TaskCompleted.message(&f),
            "Task completed: Buy milk"
        );
        assert_eq!(
            NotificationKind::TaskDeleted.message(&f),
            "Task deleted: Buy milk"
        );
    }

    #[test]
    fn deleted_template_falls_back_to_id() {
        let f = fields(None);
        assert_eq!(NotificationKind::TaskDeleted.message(&f), "Task deleted: t1");
    }

    #[test]
    fn kind_maps_from_every_event_kind() {
        assert_eq!(
            NotificationKind::from_event(TaskEventKind::Created),
            NotificationKind::TaskCreated
        );
        assert_eq!(
            NotificationKind::from_event(TaskEventKind::Deleted),
            NotificationKind::TaskDeleted
        );
    }

    #[test]
    fn kind_round_trips_through_storage_form() {
        for kind in [
            NotificationKind::TaskCreated,
            NotificationKind::TaskOpened,
            NotificationKind::TaskCompleted,
            NotificationKind::TaskDeleted,
        ] {
            assert_eq!(NotificationKind::parse(kind.as_str()).unwrap(), kind);
        }
        assert!(NotificationKind::parse("TASK_STARRED").is_err());
    }
}
