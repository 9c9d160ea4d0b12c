//! Event infrastructure shared by the publish and consume paths.
//!
//! - `TaskEventKind` - the closed routing-key taxonomy for task lifecycle events
//! - `MessageId` - unique per-publish token (dedup/debug aid, not enforced)
//! - `EventEnvelope` - transport wrapper placed on the broker
//! - `TaskEventFields` - lenient consumer-side view of a lifecycle payload
//!
//! The payload shape is versionless by contract: consumers must ignore
//! unknown fields and tolerate missing optional ones, which is exactly what
//! the serde defaults on `TaskEventFields` give us.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use std::fmt;
use uuid::Uuid;

use super::{OwnerId, Timestamp};
use crate::domain::task::Task;

/// Task lifecycle events and their dot-delimited routing keys.
///
/// The taxonomy is `<entity>.<verb>` with a single entity prefix, so one
/// wildcard binding (`task.*`) covers every subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskEventKind {
    Created,
    Opened,
    Completed,
    Deleted,
}

impl TaskEventKind {
    /// Returns the routing key for this event kind.
    pub const fn routing_key(&self) -> &'static str {
        match self {
            TaskEventKind::Created => "task.created",
            TaskEventKind::Opened => "task.opened",
            TaskEventKind::Completed => "task.completed",
            TaskEventKind::Deleted => "task.deleted",
        }
    }

    /// Resolves a routing key back to an event kind.
    ///
    /// Returns `None` for keys outside the taxonomy; per the consumer
    /// contract those are acknowledged as no-ops, not failures.
    pub fn from_routing_key(key: &str) -> Option<Self> {
        match key {
            "task.created" => Some(TaskEventKind::Created),
            "task.opened" => Some(TaskEventKind::Opened),
            "task.completed" => Some(TaskEventKind::Completed),
            "task.deleted" => Some(TaskEventKind::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for TaskEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.routing_key())
    }
}

/// Unique per-publish message token.
///
/// Generated at publish time and carried as broker metadata. It is a
/// deduplication and debugging aid only; the broker does not enforce it as
/// an idempotency key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a new random MessageId using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Creates a MessageId from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transport envelope for task events.
///
/// The routed unit of data placed on the broker: routing key, payload, and
/// metadata. Envelopes are ephemeral; they exist from publish until ack (or
/// until the retry policy dead-letters them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Dot-delimited routing key, chosen at publish time and immutable.
    pub routing_key: String,

    /// Unique ID for this published message.
    pub message_id: MessageId,

    /// When the event was published.
    pub occurred_at: Timestamp,

    /// Event payload as JSON. Consumers must ignore unknown fields.
    pub payload: JsonValue,
}

impl EventEnvelope {
    /// Creates a new envelope with a fresh message id.
    pub fn new(routing_key: impl Into<String>, payload: JsonValue) -> Self {
        Self {
            routing_key: routing_key.into(),
            message_id: MessageId::new(),
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    /// Builds the lifecycle envelope for a task, carrying the minimal
    /// display fields the notification side needs.
    pub fn for_task(kind: TaskEventKind, task: &Task) -> Self {
        Self::new(
            kind.routing_key(),
            json!({
                "id": task.id.to_string(),
                "ownerId": task.owner_id,
                "title": task.title,
            }),
        )
    }

    /// Deserialize the payload to a specific shape.
    pub fn payload_as<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }

    /// Serializes the envelope for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Parses an envelope off the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

/// Lenient consumer-side view of a task lifecycle payload.
///
/// `id` and `owner_id` are required; `title` is optional so that consumers
/// keep working when a producer omits it (the deleted template falls back
/// to the id). Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEventFields {
    pub id: String,
    pub owner_id: OwnerId,
    #[serde(default)]
    pub title: Option<String>,
}
