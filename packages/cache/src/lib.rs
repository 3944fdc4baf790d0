#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Expiring in-memory cache for expensive upstream fetches.
//!
//! Each key has its own slot guarded by an async mutex. A caller that
//! finds the slot empty or expired runs the fetch while holding the slot,
//! so concurrent callers for the same key wait for that single fetch and
//! then read its result. Different keys never block each other.
//!
//! A failed fetch leaves the slot as it was and the error goes back to
//! the caller. Stale values are never served in place of a failed fetch.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

/// A cached value and the time it was fetched.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

type Slot<V> = Arc<tokio::sync::Mutex<Option<CacheEntry<V>>>>;

/// Per-key expiring cache.
///
/// Values are cloned out on every hit, so `V` is usually an `Arc`.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    slots: Mutex<BTreeMap<K, Slot<V>>>,
}

impl<K, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Ord + Clone + std::fmt::Debug,
    V: Clone,
{
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Returns the cached value for `key` if it is younger than `ttl`,
    /// otherwise runs `fetch`, stores its result, and returns it.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `fetch`. The cached entry, if any, is
    /// left untouched.
    pub async fn get<F, Fut, E>(&self, key: &K, ttl: Duration, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref().filter(|e| e.is_fresh(ttl)) {
            log::debug!("Cache hit for {key:?}");
            return Ok(cached.value.clone());
        }

        log::debug!(
            "Cache {} for {key:?}, fetching",
            if entry.is_some() { "expired" } else { "miss" }
        );

        let value = fetch().await?;
        *entry = Some(CacheEntry {
            value: value.clone(),
            fetched_at: Instant::now(),
        });

        Ok(value)
    }

    /// Number of keys that have ever been requested.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns `true` if no key has been requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
