//! In-memory event bus for tests.
//!
//! Routes published envelopes to subscribed handlers using the same
//! wildcard matching the broker uses, so publish-to-notification flows can
//! be exercised without a running broker.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::broker::topology::subject_matches;
use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher};

#[derive(Default)]
pub struct InMemoryEventBus {
    published: Mutex<Vec<EventEnvelope>>,
    subscriptions: Mutex<Vec<(String, Arc<dyn EventHandler>)>>,
    fail_publishes: AtomicBool,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a handler to a subject pattern (`task.*`, `task.created`).
    pub fn subscribe(&self, pattern: impl Into<String>, handler: Arc<dyn EventHandler>) {
        self.subscriptions
            .lock()
            .unwrap()
            .push((pattern.into(), handler));
    }

    /// Make every subsequent publish fail, simulating a broker outage.
    pub fn fail_publishes(&self, fail: bool) {
        self.fail_publishes.store(fail, Ordering::SeqCst);
    }

    /// Everything published so far, in order.
    pub fn published(&self) -> Vec<EventEnvelope> {
        self.published.lock().unwrap().clone()
    }

    /// Routing keys published so far, in order.
    pub fn published_keys(&self) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .map(|envelope| envelope.routing_key.clone())
            .collect()
    }

    /// Redeliver an envelope to subscribers without recording a new
    /// publish. Lets tests exercise duplicate delivery.
    pub async fn redeliver(&self, envelope: &EventEnvelope) -> Result<(), DomainError> {
        self.route(envelope).await
    }

    async fn route(&self, envelope: &EventEnvelope) -> Result<(), DomainError> {
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|(pattern, _)| subject_matches(pattern, &envelope.routing_key))
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler.handle(envelope.clone()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        if self.fail_publishes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::BrokerUnavailable,
                "Message broker is unavailable",
            ));
        }
        self.published.lock().unwrap().push(event.clone());
        self.route(&event).await
    }
}
