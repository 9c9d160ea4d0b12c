//! ListCache port - short-TTL read cache keyed by owner.

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::foundation::OwnerId;

/// Cache key for an owner's task list.
pub fn task_list_key(owner: &OwnerId) -> String {
    format!("tasks:{}", owner)
}

/// Port for the owner-scoped list cache.
///
/// The cache is an optimization, never a source of truth, and that policy
/// is baked into the signatures: no method can fail the caller. Adapters
/// degrade every backend failure to a miss (`get`) or a logged warning
/// (`set`/`invalidate`).
///
/// Invalidation must be called synchronously inside the mutation that
/// changed the underlying data; event-driven invalidation has no delivery
/// bound and would allow stale reads of arbitrary duration.
#[async_trait]
pub trait ListCache: Send + Sync {
    /// Returns the cached value, or `None` on miss, expiry, or backend
    /// failure.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores a value with a TTL. Failures are logged, not surfaced.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Unconditionally deletes the entry. Failures are logged, not
    /// surfaced.
    async fn invalidate(&self, key: &str);
}
