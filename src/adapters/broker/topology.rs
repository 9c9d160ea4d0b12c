//! Broker topology: durable streams and their subject bindings.
//!
//! Declarations are declarative and convergent: `get_or_create` leaves an
//! existing stream with identical parameters untouched, and a parameter
//! mismatch errors out through the reconnect protocol's `Connecting` state,
//! where it is treated as a connect failure and retried.

use async_nats::jetstream;
use async_nats::jetstream::stream::{Config as StreamConfig, StorageType};

use crate::config::BrokerConfig;

/// Stream carrying task lifecycle events, bound to the `task.*` wildcard.
///
/// File storage makes accepted messages survive a broker restart; together
/// with the publisher waiting on the broker ack this is what "persistent"
/// means on this wire.
pub fn event_stream_config(config: &BrokerConfig) -> StreamConfig {
    StreamConfig {
        name: config.stream_name.clone(),
        subjects: vec![config.subject_filter.clone()],
        storage: StorageType::File,
        ..Default::default()
    }
}

/// Stream receiving events that exhausted their redelivery budget.
pub fn dead_letter_stream_config(config: &BrokerConfig) -> StreamConfig {
    StreamConfig {
        name: config.dead_letter_stream.clone(),
        subjects: vec![config.dead_letter_filter()],
        storage: StorageType::File,
        ..Default::default()
    }
}

/// Asserts the full topology. Safe to repeat on every (re)connect.
pub async fn assert_topology(
    jetstream: &jetstream::Context,
    config: &BrokerConfig,
) -> Result<(), async_nats::Error> {
    jetstream
        .get_or_create_stream(event_stream_config(config))
        .await?;
    jetstream
        .get_or_create_stream(dead_letter_stream_config(config))
        .await?;
    Ok(())
}

/// Does `subject` match a dot-delimited wildcard `pattern`?
///
/// `*` matches exactly one segment and `>` matches one or more trailing
/// segments. This is the broker's own matching language, mirrored here so
/// the in-memory bus routes the same way the real one does.
pub fn subject_matches(pattern: &str, subject: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let subject: Vec<&str> = subject.split('.').collect();

    for (idx, token) in pattern.iter().enumerate() {
        match *token {
            ">" => return subject.len() > idx,
            "*" => {
                if idx >= subject.len() {
                    return false;
                }
            }
            literal => {
                if idx >= subject.len() || subject[idx] != literal {
                    return false;
                }
            }
        }
    }
    pattern.len() == subject.len()
}
