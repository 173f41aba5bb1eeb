// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-tier memory store: short-term ring buffer plus long-term ranked store.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use cortex_config::MemoryConfig;
use cortex_core::traits::blobstore::BlobStore;
use cortex_core::traits::engine::InferenceEngine;
use cortex_core::types::Role;
use cortex_core::CortexError;

use crate::similarity::{cosine_similarity, pseudo_embedding};
use crate::types::{LongTermEntry, MemoryStats, ShortTermItem};

/// Weight of semantic similarity in the composite retrieval score.
const SEMANTIC_WEIGHT: f64 = 0.5;
/// Weight of recency in the composite retrieval score.
const RECENCY_WEIGHT: f64 = 0.2;
/// Weight of importance in the composite retrieval score.
const IMPORTANCE_WEIGHT: f64 = 0.2;
/// Weight of access frequency in the composite retrieval score.
const ACCESS_WEIGHT: f64 = 0.1;
/// Access count at which the frequency term saturates at 1.0.
const ACCESS_SATURATION: f64 = 10.0;

/// In-memory two-tier conversational memory.
///
/// Short-term turns live in a bounded buffer; overflow is consolidated into
/// the long-term store under an importance filter rather than discarded.
/// Retrieval ranks long-term entries by a blend of semantic similarity,
/// recency, importance, and access frequency, with a hard similarity floor.
///
/// NOT internally synchronized. Mutating calls (including `search`, which
/// bumps access counters) take `&mut self`; a concurrent caller must wrap
/// the store in its own lock.
pub struct MemoryStore {
    config: MemoryConfig,
    engine: Arc<dyn InferenceEngine>,
    short_term: VecDeque<ShortTermItem>,
    long_term: Vec<LongTermEntry>,
}

impl MemoryStore {
    /// Create an empty store backed by the given embedding engine.
    pub fn new(config: MemoryConfig, engine: Arc<dyn InferenceEngine>) -> Self {
        let short_term = VecDeque::with_capacity(config.short_term_capacity);
        Self {
            config,
            engine,
            short_term,
            long_term: Vec::new(),
        }
    }

    /// Append a turn to the short-term buffer.
    ///
    /// Overflow beyond the short-term capacity is drained oldest-first into
    /// [`MemoryStore::consolidate`]. High-confidence assistant turns
    /// (confidence above the promotion threshold) are additionally promoted
    /// straight to long-term storage, skipping the importance filter.
    pub async fn store(&mut self, item: ShortTermItem) {
        let promote = item.role == Role::Assistant
            && item
                .confidence
                .is_some_and(|c| c > self.config.promotion_confidence);
        let promoted = promote.then(|| item.clone());

        self.short_term.push_back(item);
        let mut overflow = Vec::new();
        while self.short_term.len() > self.config.short_term_capacity {
            if let Some(oldest) = self.short_term.pop_front() {
                overflow.push(oldest);
            }
        }
        if !overflow.is_empty() {
            self.consolidate(overflow).await;
        }

        if let Some(item) = promoted {
            self.promote(item).await;
        }
        self.record_gauges();
    }

    /// Promote a single item directly into long-term storage.
    ///
    /// Duplicate-safe: an entry with the same id already present is kept
    /// as-is and the promotion is a no-op.
    async fn promote(&mut self, item: ShortTermItem) {
        if self.long_term.iter().any(|e| e.id == item.id) {
            debug!(id = %item.id, "skipping promotion, entry already in long-term store");
            return;
        }
        let embedding = self.embedding_for(&item.content, item.embedding.clone()).await;
        let entry = self.make_entry(&item, embedding);
        debug!(id = %entry.id, importance = entry.importance, "promoted high-confidence turn");
        self.long_term.push(entry);
        metrics::counter!("cortex_memory_promotions_total").increment(1);
        self.enforce_long_term_bounds();
    }

    /// Consolidate overflowed short-term items into the long-term store.
    ///
    /// Keeps assistant-authored items whose importance meets the
    /// consolidation threshold, computes embeddings for items lacking one,
    /// then re-applies the TTL filter and truncates to capacity.
    /// Duplicate-safe like promotion: an id already in the long-term store
    /// (a turn promoted at store time that later overflows) is skipped.
    pub async fn consolidate(&mut self, items: Vec<ShortTermItem>) {
        let mut kept = 0u64;
        for item in items {
            if item.role != Role::Assistant
                || item.importance() < self.config.consolidation_threshold
            {
                continue;
            }
            if self.long_term.iter().any(|e| e.id == item.id) {
                debug!(id = %item.id, "skipping consolidation, entry already in long-term store");
                continue;
            }
            let embedding = self.embedding_for(&item.content, item.embedding.clone()).await;
            let entry = self.make_entry(&item, embedding);
            self.long_term.push(entry);
            kept += 1;
        }
        if kept > 0 {
            debug!(consolidated = kept, "consolidated overflow into long-term store");
            metrics::counter!("cortex_memory_consolidated_total").increment(kept);
        }
        self.enforce_long_term_bounds();
    }

    /// Ranked semantic retrieval over non-expired long-term entries.
    ///
    /// Each surviving entry is scored as
    /// `0.5*semantic + 0.2*recency + 0.2*importance + 0.1*min(1, access/10)`.
    /// Entries below the semantic similarity floor are excluded outright
    /// regardless of their composite score. Every returned entry has its
    /// `access_count` incremented; this is the only place retrieval
    /// frequency is tracked.
    pub async fn search(&mut self, query: &str, top_k: usize) -> Vec<LongTermEntry> {
        if top_k == 0 || self.long_term.is_empty() {
            return Vec::new();
        }
        let query_embedding = self.embedding_for(query, None).await;
        let now = Utc::now();
        let ttl = self.config.ttl_secs as f64;

        let mut scored: Vec<(usize, f64)> = Vec::new();
        for (idx, entry) in self.long_term.iter().enumerate() {
            if entry.is_expired(now) {
                continue;
            }
            let semantic = f64::from(cosine_similarity(&query_embedding, &entry.embedding));
            if semantic < f64::from(self.config.semantic_floor) {
                continue;
            }
            let age_secs = (now - entry.timestamp).num_seconds() as f64;
            let recency = (1.0 - age_secs / ttl).clamp(0.0, 1.0);
            let access = (entry.access_count as f64 / ACCESS_SATURATION).min(1.0);
            let score = SEMANTIC_WEIGHT * semantic
                + RECENCY_WEIGHT * recency
                + IMPORTANCE_WEIGHT * entry.importance
                + ACCESS_WEIGHT * access;
            scored.push((idx, score));
        }

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(top_k);

        let mut results = Vec::with_capacity(scored.len());
        for (idx, _) in scored {
            let entry = &mut self.long_term[idx];
            entry.access_count += 1;
            results.push(entry.clone());
        }
        metrics::counter!("cortex_memory_search_hits_total").increment(results.len() as u64);
        results
    }

    /// Drop all long-term entries past their expiry. Idempotent.
    pub fn prune(&mut self) -> usize {
        let now = Utc::now();
        let before = self.long_term.len();
        self.long_term.retain(|e| !e.is_expired(now));
        let removed = before - self.long_term.len();
        if removed > 0 {
            info!(removed, "pruned expired long-term entries");
            metrics::counter!("cortex_memory_pruned_total").increment(removed as u64);
        }
        self.record_gauges();
        removed
    }

    /// Read-only occupancy snapshot.
    pub fn stats(&self) -> MemoryStats {
        let oldest_short = self.short_term.iter().map(|i| i.timestamp).min();
        let oldest_long = self.long_term.iter().map(|e| e.timestamp).min();
        let oldest_timestamp = match (oldest_short, oldest_long) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        MemoryStats {
            short_term_count: self.short_term.len(),
            long_term_count: self.long_term.len(),
            total_count: self.short_term.len() + self.long_term.len(),
            oldest_timestamp,
        }
    }

    /// Serialize persistent state (long-term entries only).
    ///
    /// Expired entries are dropped, survivors are sorted by timestamp
    /// ascending and capped to capacity. The short-term buffer is
    /// deliberately ephemeral and never persisted.
    pub fn serialize(&self) -> Result<Vec<u8>, CortexError> {
        let now = Utc::now();
        let mut entries: Vec<&LongTermEntry> = self
            .long_term
            .iter()
            .filter(|e| !e.is_expired(now))
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        entries.truncate(self.config.long_term_capacity);
        serde_json::to_vec(&entries).map_err(CortexError::serialization)
    }

    /// Replace long-term state from a serialized blob.
    ///
    /// Entries that expired since serialization are dropped on the way in.
    pub fn hydrate(&mut self, bytes: &[u8]) -> Result<(), CortexError> {
        let entries: Vec<LongTermEntry> =
            serde_json::from_slice(bytes).map_err(CortexError::serialization)?;
        self.long_term = entries;
        self.enforce_long_term_bounds();
        Ok(())
    }

    /// Persist long-term state to the blob store under `blob_key`.
    pub async fn flush(&self, store: &dyn BlobStore, blob_key: &str) -> Result<(), CortexError> {
        let bytes = self.serialize()?;
        store.save(blob_key, &bytes).await
    }

    /// Restore long-term state from the blob store.
    ///
    /// A missing blob is an empty store. A corrupt blob is discarded and a
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
            warn!(error = %e, "corrupt memory blob, resetting");
            self.long_term.clear();
            self.flush(store, blob_key).await?;
        }
        self.record_gauges();
        Ok(())
    }

    /// Embed a text, falling back to the deterministic pseudo-embedding when
    /// the engine fails. The fallback is a silent degrade: the memory is
    /// never lost and no error reaches the caller.
    async fn embedding_for(&self, text: &str, existing: Option<Vec<f32>>) -> Vec<f32> {
        if let Some(embedding) = existing {
            return embedding;
        }
        match self.engine.embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                debug!(error = %e, "embedding failed, using hash fallback");
                metrics::counter!("cortex_memory_embed_fallbacks_total").increment(1);
                pseudo_embedding(text, self.config.embedding_dim)
            }
        }
    }

    fn make_entry(&self, item: &ShortTermItem, embedding: Vec<f32>) -> LongTermEntry {
        LongTermEntry {
            id: item.id.clone(),
            content: item.content.clone(),
            embedding,
            timestamp: item.timestamp,
            expires_at: Utc::now() + Duration::seconds(self.config.ttl_secs as i64),
            importance: item.importance(),
            access_count: 0,
        }
    }

    /// Re-apply the TTL filter, then truncate to capacity dropping
    /// oldest-by-insertion first.
    fn enforce_long_term_bounds(&mut self) {
        let now = Utc::now();
        self.long_term.retain(|e| !e.is_expired(now));
        let capacity = self.config.long_term_capacity;
        if self.long_term.len() > capacity {
            let excess = self.long_term.len() - capacity;
            self.long_term.drain(0..excess);
            metrics::counter!("cortex_memory_evictions_total").increment(excess as u64);
        }
        self.record_gauges();
    }

    fn record_gauges(&self) {
        metrics::gauge!("cortex_memory_short_term_items").set(self.short_term.len() as f64);
        metrics::gauge!("cortex_memory_long_term_items").set(self.long_term.len() as f64);
    }

    #[cfg(test)]
    pub(crate) fn long_term_mut(&mut self) -> &mut Vec<LongTermEntry> {
        &mut self.long_term
    }
}
