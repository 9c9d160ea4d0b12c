//! Message broker (NATS JetStream) configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Broker configuration
///
/// Topology names default to the event stream `task-events` carrying
/// subjects `task.*`, a `notifications` durable consumer, and a dead-letter
/// stream under the `dlq.` prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// NATS connection URL
    pub url: String,

    /// Durable stream holding task lifecycle events
    #[serde(default = "default_stream_name")]
    pub stream_name: String,

    /// Subject wildcard bound to the event stream
    #[serde(default = "default_subject_filter")]
    pub subject_filter: String,

    /// Durable consumer name for the notification consumer group
    #[serde(default = "default_consumer_name")]
    pub consumer_name: String,

    /// Durable stream holding dead-lettered events
    #[serde(default = "default_dead_letter_stream")]
    pub dead_letter_stream: String,

    /// Subject prefix for dead-lettered events
    #[serde(default = "default_dead_letter_prefix")]
    pub dead_letter_prefix: String,

    /// Connection attempts before startup gives up (mid-life reconnects
    /// retry indefinitely)
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Delay between connection attempts, in milliseconds
    #[serde(default = "default_connect_delay_ms")]
    pub connect_delay_ms: u64,

    /// Maximum unacknowledged messages held by the consumer (prefetch)
    #[serde(default = "default_prefetch")]
    pub prefetch: u16,

    /// Deliveries after which a failing message is dead-lettered instead
    /// of requeued
    #[serde(default = "default_max_redeliveries")]
    pub max_redeliveries: u32,

    /// Send attempts per publish call (each preceded by a wait for an
    /// active connection)
    #[serde(default = "default_publish_attempts")]
    pub publish_attempts: u32,
}

impl BrokerConfig {
    /// Delay between connection attempts
    pub fn connect_delay(&self) -> Duration {
        Duration::from_millis(self.connect_delay_ms)
    }

    /// Upper bound a caller waits for the connection to become active
    /// before failing fast: the full reconnect budget.
    pub fn active_wait_budget(&self) -> Duration {
        self.connect_delay() * self.connect_attempts.max(1)
    }

    /// Subject a dead-lettered event is republished to, preserving the
    /// original routing key under the dead-letter prefix.
    pub fn dead_letter_subject(&self, routing_key: &str) -> String {
        format!("{}.{}", self.dead_letter_prefix, routing_key)
    }

    /// Subject wildcard bound to the dead-letter stream.
    pub fn dead_letter_filter(&self) -> String {
        format!("{}.>", self.dead_letter_prefix)
    }

    /// Validate broker configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("BROKER_URL"));
        }
        if !self.url.starts_with("nats://") {
            return Err(ValidationError::InvalidBrokerUrl);
        }
        if self.connect_attempts == 0 {
            return Err(ValidationError::OutOfRange("broker.connect_attempts"));
        }
        if self.prefetch == 0 {
            return Err(ValidationError::OutOfRange("broker.prefetch"));
        }
        if self.max_redeliveries == 0 {
            return Err(ValidationError::OutOfRange("broker.max_redeliveries"));
        }
        if self.publish_attempts == 0 {
            return Err(ValidationError::OutOfRange("broker.publish_attempts"));
        }
        Ok(())
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            stream_name: default_stream_name(),
            subject_filter: default_subject_filter(),
            consumer_name: default_consumer_name(),
            dead_letter_stream: default_dead_letter_stream(),
            dead_letter_prefix: default_dead_letter_prefix(),
            connect_attempts: default_connect_attempts(),
            connect_delay_ms: default_connect_delay_ms(),
            prefetch: default_prefetch(),
            max_redeliveries: default_max_redeliveries(),
            publish_attempts: default_publish_attempts(),
        }
    }
}

fn default_stream_name() -> String {
    "task-events".to_string()
}

fn default_subject_filter() -> String {
    "task.*".to_string()
}

fn default_consumer_name() -> String {
    "notifications".to_string()
}

fn default_dead_letter_stream() -> String {
    "task-events-dlq".to_string()
}

fn default_dead_letter_prefix() -> String {
    "dlq".to_string()
}

fn default_connect_attempts() -> u32 {
    20
}

fn default_connect_delay_ms() -> u64 {
    1500
}

fn default_prefetch() -> u16 {
    10
}

fn default_max_redeliveries() -> u32 {
    5
}

fn default_publish_attempts() -> u32 {
    2
}
