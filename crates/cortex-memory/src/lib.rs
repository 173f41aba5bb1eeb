// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-tier conversational memory for the Cortex resource manager.
//!
//! Short-term turns live in a bounded ring buffer; overflow is consolidated
//! into a long-term store under an importance filter. Retrieval ranks
//! long-term entries by a blend of semantic similarity, recency, importance,
//! and access frequency, with a hard similarity floor so that an unrelated
//! memory is excluded outright rather than merely down-weighted.
//!
//! ## Architecture
//!
//! - **MemoryStore**: short-term buffer, consolidation, ranked retrieval,
//!   TTL pruning, and blob-store persistence
//! - **Similarity**: cosine similarity and the deterministic hash-fallback
//!   embedding used when the engine is unavailable
//! - **Types**: ShortTermItem, LongTermEntry, MemoryStats

pub mod similarity;
pub mod store;
pub mod types;

pub use similarity::{cosine_similarity, l2_normalize, pseudo_embedding};
pub use store::MemoryStore;
pub use types::{LongTermEntry, MemoryStats, ShortTermItem};
