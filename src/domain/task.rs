//! Task entity and input validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::foundation::{DomainError, OwnerId, TaskId, Timestamp};

/// Maximum length of a task title.
pub const TITLE_MAX_LEN: usize = 200;

/// Maximum length of a task description.
pub const DESCRIPTION_MAX_LEN: usize = 2000;

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    Open,
    Done,
}

impl TaskStatus {
    /// Returns the storage representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::Done => "DONE",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "OPEN" => Ok(TaskStatus::Open),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(DomainError::validation(
                "status",
                format!("Status must be OPEN or DONE, got '{}'", other),
            )),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A task owned by a single identity.
///
/// Timestamps are server-assigned by the store, so two instances of this
/// service never disagree about creation order for the same owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated input for creating a task.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub id: TaskId,
    pub owner_id: OwnerId,
    pub title: String,
    pub description: String,
}

impl NewTask {
    /// Validates creation input. New tasks always start `Open`.
    pub fn validated(
        owner_id: OwnerId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let description = description.into();

        validate_title(&title)?;
        validate_description(&description)?;

        Ok(Self {
            id: TaskId::new(),
            owner_id,
            title,
            description,
        })
    }
}

/// Validated partial update. Any subset of fields may be present; an empty
/// patch is legal and only bumps `updated_at`.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    /// Validates whichever fields are present.
    pub fn validated(
        title: Option<String>,
        description: Option<String>,
        status: Option<TaskStatus>,
    ) -> Result<Self, DomainError> {
        if let Some(title) = &title {
            validate_title(title)?;
        }
        if let Some(description) = &description {
            validate_description(description)?;
        }
        Ok(Self {
            title,
            description,
            status,
        })
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.trim().is_empty() {
        return Err(DomainError::validation("title", "Title cannot be empty"));
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(DomainError::validation(
            "title",
            format!("Title cannot exceed {} characters", TITLE_MAX_LEN),
        ));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), DomainError> {
    if description.chars().count() > DESCRIPTION_MAX_LEN {
        return Err(DomainError::validation(
            "description",
            format!("Description cannot exceed {} characters", DESCRIPTION_MAX_LEN),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn owner() -> OwnerId {
        OwnerId::new("u1").unwrap()
    }

    #[test]
    fn new_task_accepts_valid_input() {
        let task = NewTask::validated(owner(), "Buy milk", "2 liters").unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "2 liters");
    }

    #[test]
    fn new_task_allows_empty_description() {
        assert!(NewTask::validated(owner(), "Buy milk", "").is_ok());
    }

    #[test]
    fn new_task_rejects_empty_title() {
        let err = NewTask::validated(owner(), "", "").unwrap_err();
        assert_eq!(err.details.get("field"), Some(&"title".to_string()));
    }

    #[test]
    fn new_task_rejects_overlong_title() {
        let title = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(NewTask::validated(owner(), title, "").is_err());
    }

    #[test]
    fn new_task_rejects_overlong_description() {
        let description = "x".repeat(DESCRIPTION_MAX_LEN + 1);
        let err = NewTask::validated(owner(), "ok", description).unwrap_err();
        assert_eq!(err.details.get("field"), Some(&"description".to_string()));
    }

    #[test]
    fn patch_validates_present_fields_only() {
        assert!(TaskPatch::validated(None, None, None).is_ok());
        assert!(TaskPatch::validated(Some(String::new()), None, None).is_err());
        assert!(TaskPatch::validated(None, None, Some(TaskStatus::Done)).is_ok());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        assert_eq!(TaskStatus::parse("OPEN").unwrap(), TaskStatus::Open);
        assert_eq!(TaskStatus::parse("DONE").unwrap(), TaskStatus::Done);
        assert!(TaskStatus::parse("done").is_err());
    }

    proptest! {
        #[test]
        fn titles_within_bounds_always_validate(title in "[a-zA-Z0-9 ]{1,200}") {
            prop_assume!(!title.trim().is_empty());
            prop_assert!(NewTask::validated(owner(), title, "").is_ok());
        }

        #[test]
        fn titles_over_bounds_never_validate(extra in 1usize..50) {
            let title = "x".repeat(TITLE_MAX_LEN + extra);
            prop_assert!(NewTask::validated(owner(), title, "").is_err());
        }
    }
}
