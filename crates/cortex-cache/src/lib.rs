// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Result cache for the Cortex cognitive core.
//!
//! Caches expensive generation and embedding results under content-addressed
//! keys, bounded independently by TTL (staleness) and strict LRU
//! (cardinality). Two instances exist in practice, one per request
//! namespace; their keys cannot collide by construction.
//!
//! ## Architecture
//!
//! - [`CacheKey`]: SHA-256 content hash over (model identity, parameters)
//! - [`ResultCache`]: TTL + LRU store with serialize/hydrate persistence
//! - [`CachePayload`]: text or vector results

pub mod cache;
pub mod key;

pub use cache::{CacheEntry, CachePayload, ResultCache};
pub use key::CacheKey;
