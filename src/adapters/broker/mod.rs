//! Broker adapters: supervised connection, topology assertion, confirmed
//! publisher, and the bounded pull consumer.

mod connection;
mod consumer;
mod publisher;
pub mod topology;

pub use connection::{BrokerConnection, BrokerHandle, BrokerState};
pub use consumer::BoundedConsumer;
pub use publisher::NatsEventPublisher;
