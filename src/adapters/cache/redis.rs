//! Redis-backed list cache.
//!
//! Every failure degrades to a cache miss: the cache is an availability
//! optimization and must never take the read path down with it. Connection
//! setup is lazy, and a failed command drops the pooled connection so the
//! next call reconnects.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::ports::ListCache;

pub struct RedisListCache {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
}

impl RedisListCache {
    /// Builds the cache from a Redis URL. The URL is parsed eagerly so a
    /// malformed one fails at startup, but no connection is made yet.
    pub fn new(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        Ok(Self {
            client,
            connection: Mutex::new(None),
        })
    }

    async fn acquire(&self) -> Option<MultiplexedConnection> {
        let mut guard = self.connection.lock().await;
        if let Some(connection) = guard.as_ref() {
            return Some(connection.clone());
        }
        match self.client.get_multiplexed_async_connection().await {
            Ok(connection) => {
                *guard = Some(connection.clone());
                Some(connection)
            }
            Err(error) => {
                warn!(%error, "redis connection failed; cache degraded to miss");
                None
            }
        }
    }

    async fn discard(&self) {
        *self.connection.lock().await = None;
    }
}

#[async_trait]
impl ListCache for RedisListCache {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut connection = self.acquire().await?;
        match connection.get::<_, Option<Vec<u8>>>(key).await {
            Ok(value) => {
                debug!(key, hit = value.is_some(), "cache read");
                value
            }
            Err(error) => {
                warn!(key, %error, "cache read failed");
                self.discard().await;
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let Some(mut connection) = self.acquire().await else {
            return;
        };
        let result: Result<(), redis::RedisError> = connection
            .set_ex(key, value, ttl.as_secs())
            .await;
        if let Err(error) = result {
            warn!(key, %error, "cache write failed");
            self.discard().await;
        }
    }

    async fn invalidate(&self, key: &str) {
        let Some(mut connection) = self.acquire().await else {
            return;
        };
        let result: Result<(), redis::RedisError> = connection.del(key).await;
        if let Err(error) = result {
            // A missed invalidation self-heals when the TTL expires.
            warn!(key, %error, "cache invalidation failed");
            self.discard().await;
        }
    }
}
