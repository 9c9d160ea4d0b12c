//! Foundation value objects shared across the domain.

mod errors;
mod events;
mod identity;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use events::{EventEnvelope, MessageId, TaskEventFields, TaskEventKind};
pub use identity::VerifiedIdentity;
pub use ids::{NotificationId, OwnerId, TaskId};
pub use timestamp::Timestamp;
