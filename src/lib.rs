//! Taskline - durable propagation of task lifecycle events.
//!
//! Tasks are created, edited, completed, reopened, and deleted by their
//! owner; each lifecycle mutation is committed to PostgreSQL, invalidates
//! the owner's cached task list, and publishes an event to a durable
//! broker stream. A bounded consumer turns those events into stored
//! notifications with at-least-once delivery, explicit acknowledgement,
//! and a dead-letter stream for messages that exhaust their redelivery
//! budget.
//!
//! The crate is structured hexagonally:
//!
//! - [`domain`] - entities, validation, the event envelope and taxonomy
//! - [`ports`] - trait boundaries the application layer depends on
//! - [`adapters`] - PostgreSQL, Redis, NATS JetStream, and JWT
//!   implementations, plus in-memory counterparts for tests
//! - [`application`] - command/query handlers and the event-driven
//!   notification recorder
//! - [`config`] - environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
