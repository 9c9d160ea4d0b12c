//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - confirmed emission of task lifecycle events
//! - `EventHandler` - consumer-side processing callback (ack/nack contract)
//!
//! ## Storage Ports
//!
//! - `TaskRepository` / `NotificationRepository` - owner-scoped persistence
//! - `ListCache` - short-TTL read cache, invalidated by every mutation
//!
//! ## Identity Port
//!
//! - `IdentityVerifier` - opaque credential in, `VerifiedIdentity` out

mod event_handler;
mod event_publisher;
mod identity_verifier;
mod list_cache;
mod notification_repository;
mod task_repository;

pub use event_handler::EventHandler;
pub use event_publisher::EventPublisher;
pub use identity_verifier::IdentityVerifier;
pub use list_cache::{task_list_key, ListCache};
pub use notification_repository::NotificationRepository;
pub use task_repository::TaskRepository;
