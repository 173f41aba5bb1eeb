// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TTL + LRU cache for keyed generation and embedding results.
//!
//! TTL alone would keep serving a stale entry evicted by time even when it
//! is still hot; LRU alone would let one burst of distinct requests evict
//! everything with no time-based safety net. Combining them bounds
//! staleness and cardinality independently.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use cortex_config::CacheConfig;
use cortex_core::error::CortexError;
use cortex_core::traits::BlobStore;

use crate::key::CacheKey;

/// The cached result of one expensive inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachePayload {
    /// Generated text.
    Text(String),
    /// An embedding vector.
    Vector(Vec<f32>),
}

impl CachePayload {
    /// Informational size: byte length for text, 8 bytes per element for
    /// vectors. Never used for eviction decisions.
    pub fn size_bytes(&self) -> usize {
        match self {
            CachePayload::Text(s) => s.len(),
            CachePayload::Vector(v) => 8 * v.len(),
        }
    }
}

/// A single cache entry with access bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Content-addressed key for this entry.
    pub key: CacheKey,
    /// The cached result.
    pub payload: CachePayload,
    /// When the entry was inserted; drives TTL expiry.
    pub inserted_at: DateTime<Utc>,
    /// When the entry was last returned by `get`.
    pub last_access_at: DateTime<Utc>,
    /// Number of times this entry was returned by `get`.
    pub hit_count: u64,
    /// Informational payload size.
    pub size_bytes: usize,
}

/// A bounded TTL + strict-LRU cache for one request namespace.
///
/// Thread-safety: this struct is NOT internally synchronized; `get` mutates
/// hit counts and recency order. An owner that shares it across threads must
/// wrap it in a `Mutex`.
pub struct ResultCache {
    /// Label used in logs and metrics ("generation" or "embedding").
    name: &'static str,
    config: CacheConfig,
    entries: HashMap<CacheKey, CacheEntry>,
    /// LRU order; front is the eviction victim, back is most recent.
    order: VecDeque<CacheKey>,
}

impl ResultCache {
    /// Creates an empty cache for the given namespace.
    pub fn new(name: &'static str, config: CacheConfig) -> Self {
        Self {
            name,
            config,
            entries: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// Time-to-live as a chrono duration.
    fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl_secs as i64)
    }

    /// Look up a cached result.
    ///
    /// Expired entries are evicted and reported as a miss. On a hit the
    /// entry moves to the most-recently-used position and its hit count
    /// increments; a copy of the entry is returned.
    pub fn get(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        let now = Utc::now();

        let expired = self
            .entries
            .get(key)
            .is_some_and(|e| now - e.inserted_at > self.ttl());
        if expired {
            self.remove(key);
            metrics::counter!("cortex_cache_expired_total", "cache" => self.name).increment(1);
            metrics::counter!("cortex_cache_misses_total", "cache" => self.name).increment(1);
            return None;
        }

        let Some(entry) = self.entries.get_mut(key) else {
            metrics::counter!("cortex_cache_misses_total", "cache" => self.name).increment(1);
            return None;
        };
        entry.hit_count += 1;
        entry.last_access_at = now;
        let snapshot = entry.clone();

        // Refresh LRU position.
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());

        metrics::counter!("cortex_cache_hits_total", "cache" => self.name).increment(1);
        Some(snapshot)
    }

    /// Insert a result, evicting the single least-recently-used entry first
    /// when the cache is at capacity.
    pub fn put(&mut self, key: CacheKey, payload: CachePayload) {
        let now = Utc::now();

        if self.entries.contains_key(&key) {
            // Re-insert: drop the stale position, keep one slot.
            if let Some(pos) = self.order.iter().position(|k| *k == key) {
                self.order.remove(pos);
            }
        } else if self.entries.len() >= self.config.capacity {
            if let Some(victim) = self.order.pop_front() {
                debug!(cache = self.name, key = %victim, "evicting LRU entry");
                self.entries.remove(&victim);
                metrics::counter!("cortex_cache_evictions_total", "cache" => self.name)
                    .increment(1);
            }
        }

        let size_bytes = payload.size_bytes();
        self.entries.insert(
            key.clone(),
            CacheEntry {
                key: key.clone(),
                payload,
                inserted_at: now,
                last_access_at: now,
                hit_count: 0,
                size_bytes,
            },
        );
        self.order.push_back(key);
    }

    /// Remove all entries past TTL, regardless of capacity pressure.
    /// Idempotent, safe to call on any schedule.
    pub fn prune(&mut self) {
        let now = Utc::now();
        let ttl = self.ttl();
        let expired: Vec<CacheKey> = self
            .entries
            .values()
            .filter(|e| now - e.inserted_at > ttl)
            .map(|e| e.key.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }

    /// Number of live entries (including any not yet swept past TTL).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no entries are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, key: &CacheKey) {
        self.entries.remove(key);
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    /// Serialize the non-expired entries, sorted by insertion time
    /// ascending and capped to capacity.
    ///
    /// This ordering is the contract the persistence collaborator depends
    /// on: hydrating the payload reproduces the same LRU order.
    pub fn serialize(&self) -> Result<Vec<u8>, CortexError> {
        let now = Utc::now();
        let ttl = self.ttl();
        let mut live: Vec<&CacheEntry> = self
            .entries
            .values()
            .filter(|e| now - e.inserted_at <= ttl)
            .collect();
        live.sort_by_key(|e| e.inserted_at);
        live.truncate(self.config.capacity);
        serde_json::to_vec(&live).map_err(CortexError::serialization)
    }

    /// Replace the cache contents from a serialized payload.
    ///
    /// Expired entries in the payload are dropped; the rest are installed
    /// in insertion-time order, capped to capacity.
    pub fn hydrate(&mut self, bytes: &[u8]) -> Result<(), CortexError> {
        let parsed: Vec<CacheEntry> =
            serde_json::from_slice(bytes).map_err(CortexError::serialization)?;

        let now = Utc::now();
        let ttl = self.ttl();
        let mut live: Vec<CacheEntry> = parsed
            .into_iter()
            .filter(|e| now - e.inserted_at <= ttl)
            .collect();
        live.sort_by_key(|e| e.inserted_at);
        live.truncate(self.config.capacity);

        self.entries.clear();
        self.order.clear();
        for entry in live {
            self.order.push_back(entry.key.clone());
            self.entries.insert(entry.key.clone(), entry);
        }
        Ok(())
    }

    /// Persist the cache state to the blob store under `blob_key`.
    pub async fn flush(&self, store: &dyn BlobStore, blob_key: &str) -> Result<(), CortexError> {
        let bytes = self.serialize()?;
        store.save(blob_key, &bytes).await
    }

    /// Restore cache state from the blob store.
    ///
    /// A missing blob is an empty cache. A corrupt blob is discarded and a
    /// fresh empty blob is force-saved in its place; corruption never
    /// surfaces as an error.
    pub async fn restore(
        &mut self,
        store: &dyn BlobStore,
        blob_key: &str,
    ) -> Result<(), CortexError> {
        let Some(bytes) = store.load(blob_key).await? else {
            return Ok(());
        };
        if let Err(e) = self.hydrate(&bytes) {
            warn!(cache = self.name, error = %e, "corrupt cache blob, resetting");
            self.entries.clear();
            self.order.clear();
            self.flush(store, blob_key).await?;
        }
        Ok(())
    }
}
