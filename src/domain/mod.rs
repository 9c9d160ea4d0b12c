//! Domain layer: entities, value objects, and event contracts.

pub mod foundation;
pub mod notification;
pub mod task;
