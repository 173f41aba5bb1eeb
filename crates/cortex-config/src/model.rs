// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Cortex cognitive core.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages. The policy
//! constants baked into the defaults (retrieval weights, temperature blend,
//! thresholds) were carried over from the original deployment unchanged to
//! preserve behavioral parity.

use serde::{Deserialize, Serialize};

/// Top-level Cortex configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CortexConfig {
    /// Two-tier memory store settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Result cache for text generation calls.
    #[serde(default)]
    pub generation_cache: CacheConfig,

    /// Result cache for embedding calls.
    #[serde(default)]
    pub embedding_cache: CacheConfig,

    /// Compute slot manager settings.
    #[serde(default)]
    pub slots: SlotConfig,

    /// Circuit breaker settings for inference calls.
    #[serde(default)]
    pub breaker: BreakerConfig,
}

/// Two-tier memory store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Capacity of the short-term ring buffer. Overflow items are
    /// consolidated, never dropped.
    #[serde(default = "default_short_term_capacity")]
    pub short_term_capacity: usize,

    /// Capacity of the long-term store. Oldest entries beyond this bound
    /// are truncated after the TTL filter.
    #[serde(default = "default_long_term_capacity")]
    pub long_term_capacity: usize,

    /// Time-to-live for long-term entries, in seconds.
    #[serde(default = "default_memory_ttl_secs")]
    pub ttl_secs: u64,

    /// Minimum importance for an overflowed item to survive consolidation.
    #[serde(default = "default_consolidation_threshold")]
    pub consolidation_threshold: f64,

    /// Assistant items above this confidence are promoted straight to
    /// long-term storage, independent of overflow.
    #[serde(default = "default_promotion_confidence")]
    pub promotion_confidence: f64,

    /// Hard cosine-similarity floor for retrieval. Candidates below this
    /// are excluded regardless of recency, importance, or access frequency.
    #[serde(default = "default_semantic_floor")]
    pub semantic_floor: f32,

    /// Dimensionality of embedding vectors (and of the deterministic
    /// fallback vectors produced when the engine fails).
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            short_term_capacity: default_short_term_capacity(),
            long_term_capacity: default_long_term_capacity(),
            ttl_secs: default_memory_ttl_secs(),
            consolidation_threshold: default_consolidation_threshold(),
            promotion_confidence: default_promotion_confidence(),
            semantic_floor: default_semantic_floor(),
            embedding_dim: default_embedding_dim(),
        }
    }
}

fn default_short_term_capacity() -> usize {
    100
}

fn default_long_term_capacity() -> usize {
    500
}

fn default_memory_ttl_secs() -> u64 {
    7 * 24 * 60 * 60 // 7 days
}

fn default_consolidation_threshold() -> f64 {
    0.6
}

fn default_promotion_confidence() -> f64 {
    0.85
}

fn default_semantic_floor() -> f32 {
    0.3
}

fn default_embedding_dim() -> usize {
    384
}

/// TTL + LRU result cache configuration.
///
/// Two independent instances exist in practice (generation and embedding),
/// each with its own section so their capacity and TTL can diverge.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum number of entries before strict LRU eviction kicks in.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Time-to-live for cached results, in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_cache_capacity() -> usize {
    20
}

fn default_cache_ttl_secs() -> u64 {
    300 // 5 minutes
}

/// Compute slot manager configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SlotConfig {
    /// Total resource budget available for loaded models, in abstract
    /// units (the deployment uses megabytes of accelerator memory).
    #[serde(default = "default_slot_capacity_units")]
    pub capacity_units: u64,

    /// Fraction of the budget that loaded slots may occupy before
    /// acquisition starts evicting and release stops keeping slots warm.
    #[serde(default = "default_offload_threshold")]
    pub offload_threshold: f64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            capacity_units: default_slot_capacity_units(),
            offload_threshold: default_offload_threshold(),
        }
    }
}

fn default_slot_capacity_units() -> u64 {
    8192
}

fn default_offload_threshold() -> f64 {
    0.8
}

/// Circuit breaker configuration for inference calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BreakerConfig {
    /// Consecutive failures before the circuit opens.
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,

    /// Consecutive half-open successes before the circuit closes again.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: u32,

    /// Seconds the circuit stays open before admitting a probe call.
    #[serde(default = "default_reset_timeout_secs")]
    pub reset_timeout_secs: u64,

    /// Per-call deadline enforced on guarded operations, in seconds.
    /// Fixed at breaker construction; not overridable per invocation.
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: default_failure_threshold(),
            success_threshold: default_success_threshold(),
            reset_timeout_secs: default_reset_timeout_secs(),
            call_timeout_secs: default_call_timeout_secs(),
        }
    }
}

fn default_failure_threshold() -> u32 {
    5
}

fn default_success_threshold() -> u32 {
    2
}

fn default_reset_timeout_secs() -> u64 {
    60
}

fn default_call_timeout_secs() -> u64 {
    30
}
