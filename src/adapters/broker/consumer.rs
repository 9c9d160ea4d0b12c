//! Bounded event consumer.
//!
//! Pulls from the durable `notifications` consumer with explicit acks and a
//! bounded in-flight window. Handler failures are negatively acknowledged
//! for redelivery until the redelivery threshold, after which the message
//! is republished to the dead-letter stream and acknowledged so it stops
//! poisoning the queue.

use std::sync::Arc;

use async_nats::jetstream::consumer::{pull, AckPolicy};
use async_nats::jetstream::{self, AckKind};
use futures::StreamExt;
use tokio::sync::watch;
use tokio::time;
use tracing::{error, info, warn};

use crate::config::BrokerConfig;
use crate::domain::foundation::EventEnvelope;
use crate::ports::EventHandler;

use super::connection::{BrokerConnection, BrokerHandle};
use super::topology;

/// What to do with a delivery whose processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RetryDecision {
    Requeue,
    DeadLetter,
}

/// `delivered` is the 1-based count of deliveries including this one.
fn retry_decision(delivered: i64, max_redeliveries: u32) -> RetryDecision {
    if delivered >= i64::from(max_redeliveries) {
        RetryDecision::DeadLetter
    } else {
        RetryDecision::Requeue
    }
}

/// Long-running consumer loop bound to a single handler.
pub struct BoundedConsumer {
    connection: Arc<BrokerConnection>,
    config: BrokerConfig,
    handler: Arc<dyn EventHandler>,
}

impl BoundedConsumer {
    pub fn new(
        connection: Arc<BrokerConnection>,
        config: BrokerConfig,
        handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            connection,
            config,
            handler,
        }
    }

    /// Run until `shutdown` flips to true.
    ///
    /// Rebinding after a transport failure goes through the connection
    /// supervisor, so topology is re-asserted before deliveries resume.
    /// In-flight messages that were not acked before shutdown are
    /// redelivered by the broker.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                return;
            }

            let handle = match self.connection.active_handle().await {
                Ok(handle) => handle,
                Err(_) => {
                    // Deliveries simply pause while the broker is away.
                    tokio::select! {
                        _ = shutdown.changed() => {}
                        _ = time::sleep(self.config.connect_delay()) => {}
                    }
                    continue;
                }
            };

            let mut messages = match self.bind(&handle).await {
                Ok(messages) => messages,
                Err(bind_error) => {
                    warn!(error = %bind_error, "consumer bind failed; reconnecting");
                    self.connection.report_failure();
                    continue;
                }
            };

            info!(
                consumer = %self.config.consumer_name,
                filter = %self.config.subject_filter,
                prefetch = self.config.prefetch,
                "consumer active"
            );

            loop {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            info!("consumer stopping; unacked messages will be redelivered");
                            return;
                        }
                    }
                    next = messages.next() => match next {
                        Some(Ok(message)) => self.dispatch(&handle, message).await,
                        Some(Err(stream_error)) => {
                            warn!(error = %stream_error, "message stream failed; reconnecting");
                            self.connection.report_failure();
                            break;
                        }
                        None => {
                            warn!("message stream ended; reconnecting");
                            self.connection.report_failure();
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn bind(&self, handle: &BrokerHandle) -> Result<pull::Stream, async_nats::Error> {
        let stream = handle
            .jetstream
            .get_or_create_stream(topology::event_stream_config(&self.config))
            .await?;
        let consumer = stream
            .get_or_create_consumer(
                &self.config.consumer_name,
                pull::Config {
                    durable_name: Some(self.config.consumer_name.clone()),
                    filter_subject: self.config.subject_filter.clone(),
                    ack_policy: AckPolicy::Explicit,
                    max_ack_pending: i64::from(self.config.prefetch),
                    ..Default::default()
                },
            )
            .await?;
        Ok(consumer.messages().await?)
    }

    async fn dispatch(&self, handle: &BrokerHandle, message: jetstream::Message) {
        let delivered = message.info().map(|info| info.delivered).unwrap_or(1);

        let envelope = match EventEnvelope::from_bytes(&message.payload) {
            Ok(envelope) => envelope,
            Err(decode_error) => {
                // An undecodable payload can never succeed; it still gets
                // the normal redelivery budget before dead-lettering in
                // case the failure is transient on our side.
                let subject = message.subject.to_string();
                warn!(%subject, delivered, error = %decode_error, "undecodable event payload");
                self.settle_failure(handle, &message, delivered, &subject)
                    .await;
                return;
            }
        };

        match self.handler.handle(envelope.clone()).await {
            Ok(()) => {
                if let Err(ack_error) = message.ack().await {
                    warn!(
                        routing_key = %envelope.routing_key,
                        error = %ack_error,
                        "ack failed; message will be redelivered"
                    );
                }
            }
            Err(handler_error) => {
                warn!(
                    handler = self.handler.name(),
                    routing_key = %envelope.routing_key,
                    message_id = %envelope.message_id,
                    delivered,
                    error = %handler_error,
                    "event processing failed"
                );
                self.settle_failure(handle, &message, delivered, &envelope.routing_key)
                    .await;
            }
        }
    }

    /// Requeue or dead-letter a failed delivery.
    ///
    /// Dead-lettering publishes the original payload to the prefixed
    /// subject and acks only after the broker confirms it; if that publish
    /// fails the message is requeued so it is never dropped.
    async fn settle_failure(
        &self,
        handle: &BrokerHandle,
        message: &jetstream::Message,
        delivered: i64,
        routing_key: &str,
    ) {
        match retry_decision(delivered, self.config.max_redeliveries) {
            RetryDecision::Requeue => {
                if let Err(nak_error) = message.ack_with(AckKind::Nak(None)).await {
                    warn!(error = %nak_error, "nak failed; redelivery falls back to ack timeout");
                }
            }
            RetryDecision::DeadLetter => {
                let subject = self.config.dead_letter_subject(routing_key);
                let published = match handle
                    .jetstream
                    .publish(subject.clone(), message.payload.clone())
                    .await
                {
                    Ok(ack) => ack.await.map(|_| ()),
                    Err(publish_error) => Err(publish_error.into()),
                };

                match published {
                    Ok(()) => {
                        error!(
                            %subject,
                            delivered,
                            "message dead-lettered after exhausting redeliveries"
                        );
                        if let Err(ack_error) = message.ack().await {
                            warn!(error = %ack_error, "ack after dead-letter failed");
                        }
                    }
                    Err(publish_error) => {
                        warn!(
                            %subject,
                            error = %publish_error,
                            "dead-letter publish failed; requeueing"
                        );
                        let _ = message.ack_with(AckKind::Nak(None)).await;
                    }
                }
            }
        }
    }
}
