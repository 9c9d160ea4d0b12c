//! Adapter implementations of the ports.
//!
//! Broker, cache, database, and auth adapters talk to real infrastructure;
//! the `events` and `memory` adapters are in-memory counterparts used by
//! tests.

pub mod auth;
pub mod broker;
pub mod cache;
pub mod events;
pub mod memory;
pub mod postgres;
