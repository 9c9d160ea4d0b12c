//! Supervised broker connection.
//!
//! The transport library's own reconnect loop is disabled; this module owns
//! the lifecycle explicitly so that topology is re-asserted on every
//! reconnect and callers can observe (and bound their wait on) the current
//! state. The protocol is `Disconnected -> Connecting -> TopologyReady ->
//! Active`; any transport failure reported by a caller drops the state back
//! to `Disconnected` and wakes the supervisor.

use std::sync::Arc;

use async_nats::jetstream;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{error, info, warn};

use crate::config::BrokerConfig;
use crate::domain::foundation::{DomainError, ErrorCode};

use super::topology;

/// Observable connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerState {
    Disconnected,
    Connecting,
    TopologyReady,
    Active,
}

/// Live connection handed to publishers and consumers while `Active`.
#[derive(Clone)]
pub struct BrokerHandle {
    pub client: async_nats::Client,
    pub jetstream: jetstream::Context,
}

#[derive(Clone)]
enum BrokerStatus {
    Disconnected,
    Connecting,
    TopologyReady,
    Active(BrokerHandle),
}

impl BrokerStatus {
    fn state(&self) -> BrokerState {
        match self {
            BrokerStatus::Disconnected => BrokerState::Disconnected,
            BrokerStatus::Connecting => BrokerState::Connecting,
            BrokerStatus::TopologyReady => BrokerState::TopologyReady,
            BrokerStatus::Active(_) => BrokerState::Active,
        }
    }
}

/// Shared connection supervisor.
///
/// Startup runs one bounded connect cycle; if the budget is exhausted the
/// process continues degraded (operations fail fast until the broker
/// returns) rather than crashing. Mid-life reconnect cycles retry
/// indefinitely.
pub struct BrokerConnection {
    config: BrokerConfig,
    status_tx: watch::Sender<BrokerStatus>,
    reconnect_tx: mpsc::Sender<()>,
}

impl BrokerConnection {
    /// Connect with the bounded startup budget and spawn the supervisor.
    pub async fn connect(config: BrokerConfig) -> Arc<Self> {
        let (status_tx, _) = watch::channel(BrokerStatus::Disconnected);
        let (reconnect_tx, reconnect_rx) = mpsc::channel(1);
        let connection = Arc::new(Self {
            config,
            status_tx,
            reconnect_tx,
        });

        if connection
            .cycle(Some(connection.config.connect_attempts))
            .await
            .is_err()
        {
            error!(
                attempts = connection.config.connect_attempts,
                "broker unreachable at startup; continuing degraded until it returns"
            );
        }

        tokio::spawn(Self::supervise(Arc::clone(&connection), reconnect_rx));
        connection
    }

    /// Current state, for logs and health reporting.
    pub fn state(&self) -> BrokerState {
        self.status_tx.borrow().state()
    }

    /// Wait until the connection is `Active` and return a handle.
    ///
    /// The wait is bounded by the full reconnect budget so callers fail
    /// fast with `BROKER_UNAVAILABLE` instead of hanging while the broker
    /// is down.
    pub async fn active_handle(&self) -> Result<BrokerHandle, DomainError> {
        let mut status_rx = self.status_tx.subscribe();
        if !matches!(&*status_rx.borrow(), BrokerStatus::Active(_)) {
            // Wake the supervisor in case it is parked disconnected.
            let _ = self.reconnect_tx.try_send(());
        }

        let deadline = time::Instant::now() + self.config.active_wait_budget();
        loop {
            if let BrokerStatus::Active(handle) = &*status_rx.borrow() {
                return Ok(handle.clone());
            }
            match time::timeout_at(deadline, status_rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) | Err(_) => {
                    return Err(DomainError::new(
                        ErrorCode::BrokerUnavailable,
                        "Message broker is unavailable",
                    ));
                }
            }
        }
    }

    /// Report a transport failure observed while holding a handle.
    ///
    /// Drops the state to `Disconnected` and schedules a reconnect cycle.
    pub fn report_failure(&self) {
        let was_active = matches!(&*self.status_tx.borrow(), BrokerStatus::Active(_));
        if was_active {
            self.status_tx.send_replace(BrokerStatus::Disconnected);
            warn!("broker connection lost; reconnect scheduled");
        }
        let _ = self.reconnect_tx.try_send(());
    }

    async fn supervise(connection: Arc<Self>, mut reconnect_rx: mpsc::Receiver<()>) {
        while reconnect_rx.recv().await.is_some() {
            if matches!(&*connection.status_tx.borrow(), BrokerStatus::Active(_)) {
                continue;
            }
            // Mid-life reconnects are unbounded: the service must outlive
            // broker restarts.
            let _ = connection.cycle(None).await;
        }
    }

    /// One pass of the reconnect protocol.
    async fn cycle(&self, max_attempts: Option<u32>) -> Result<(), ()> {
        self.status_tx.send_replace(BrokerStatus::Connecting);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.try_establish().await {
                Ok(handle) => {
                    self.status_tx.send_replace(BrokerStatus::Active(handle));
                    info!(attempt, url = %self.config.url, "broker connection active");
                    return Ok(());
                }
                Err(error) => {
                    warn!(attempt, %error, "broker connect attempt failed");
                    if let Some(max) = max_attempts {
                        if attempt >= max {
                            self.status_tx.send_replace(BrokerStatus::Disconnected);
                            return Err(());
                        }
                    }
                    time::sleep(self.config.connect_delay()).await;
                }
            }
        }
    }

    /// Transport connect plus idempotent topology assertion. A topology
    /// mismatch is treated the same as a connect failure and retried.
    async fn try_establish(&self) -> Result<BrokerHandle, async_nats::Error> {
        let client = async_nats::ConnectOptions::new()
            // Reconnection is owned by this state machine.
            .max_reconnects(0)
            .connect(self.config.url.as_str())
            .await?;

        self.status_tx.send_replace(BrokerStatus::TopologyReady);
        let jetstream = jetstream::new(client.clone());
        topology::assert_topology(&jetstream, &self.config).await?;

        Ok(BrokerHandle { client, jetstream })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> BrokerConfig {
        BrokerConfig {
            // Port 9 is discard; nothing is listening there in CI.
            url: "nats://127.0.0.1:9".to_string(),
            connect_attempts: 2,
            connect_delay_ms: 10,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn startup_exhaustion_leaves_connection_degraded() {
        let connection = BrokerConnection::connect(unreachable_config()).await;
        assert_eq!(connection.state(), BrokerState::Disconnected);
    }

    #[tokio::test]
    async fn active_handle_fails_fast_when_degraded() {
        let connection = BrokerConnection::connect(unreachable_config()).await;
        let result = connection.active_handle().await;
        let error = result.err().unwrap();
        assert_eq!(error.code, ErrorCode::BrokerUnavailable);
    }

    #[test]
    fn status_maps_to_observable_state() {
        assert_eq!(BrokerStatus::Disconnected.state(), BrokerState::Disconnected);
        assert_eq!(BrokerStatus::Connecting.state(), BrokerState::Connecting);
        assert_eq!(
            BrokerStatus::TopologyReady.state(),
            BrokerState::TopologyReady
        );
    }
}
