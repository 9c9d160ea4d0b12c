//! Application layer - command/query handlers wiring domain logic to ports.

mod context;
pub mod notifications;
pub mod tasks;

pub use context::AppContext;
