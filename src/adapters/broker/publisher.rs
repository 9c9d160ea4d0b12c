//! Broker-backed event publisher with per-message delivery confirmation.

use std::sync::Arc;

use async_nats::jetstream::context::Publish;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

use super::connection::BrokerConnection;

/// Publishes envelopes to the event stream and waits for the broker's
/// durable-receipt acknowledgement before reporting success.
///
/// A failed attempt reports the transport failure to the connection
/// supervisor and retries once more against a fresh handle; callers decide
/// what a final failure means (mutation paths log and proceed).
pub struct NatsEventPublisher {
    connection: Arc<BrokerConnection>,
    attempts: u32,
}

impl NatsEventPublisher {
    pub fn new(connection: Arc<BrokerConnection>, attempts: u32) -> Self {
        Self {
            connection,
            attempts: attempts.max(1),
        }
    }
}

#[async_trait]
impl EventPublisher for NatsEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload = event.to_bytes().map_err(|error| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to encode event envelope: {error}"),
            )
        })?;

        let mut last_error = None;
        for attempt in 1..=self.attempts {
            let handle = match self.connection.active_handle().await {
                Ok(handle) => handle,
                Err(error) => {
                    last_error = Some(error);
                    continue;
                }
            };

            let publish = Publish::build()
                .payload(Bytes::from(payload.clone()))
                .message_id(event.message_id.as_str());

            // The returned future resolves once the broker has accepted
            // the message into durable storage.
            let confirmation = handle
                .jetstream
                .send_publish(event.routing_key.clone(), publish)
                .await;
            match confirmation {
                Ok(ack) => match ack.await {
                    Ok(_) => {
                        debug!(
                            routing_key = %event.routing_key,
                            message_id = %event.message_id,
                            attempt,
                            "event published"
                        );
                        return Ok(());
                    }
                    Err(error) => {
                        warn!(
                            routing_key = %event.routing_key,
                            message_id = %event.message_id,
                            attempt,
                            %error,
                            "broker did not confirm publish"
                        );
                        self.connection.report_failure();
                        last_error = Some(DomainError::new(
                            ErrorCode::PublishFailed,
                            format!("Broker did not confirm publish: {error}"),
                        ));
                    }
                },
                Err(error) => {
                    warn!(
                        routing_key = %event.routing_key,
                        message_id = %event.message_id,
                        attempt,
                        %error,
                        "publish send failed"
                    );
                    self.connection.report_failure();
                    last_error = Some(DomainError::new(
                        ErrorCode::PublishFailed,
                        format!("Publish failed: {error}"),
                    ));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DomainError::new(ErrorCode::BrokerUnavailable, "Message broker is unavailable")
        }))
    }
}
