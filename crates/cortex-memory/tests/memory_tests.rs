// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the two-tier memory store.
//!
//! Each test builds an isolated store with a mock engine. Tests are
//! independent and order-insensitive.

use std::sync::Arc;

use proptest::prelude::*;

use cortex_config::MemoryConfig;
use cortex_core::types::Role;
use cortex_memory::{MemoryStore, ShortTermItem};
use cortex_test_utils::{MockBlobStore, MockEngine};

fn config(short: usize, long: usize) -> MemoryConfig {
    MemoryConfig {
        short_term_capacity: short,
        long_term_capacity: long,
        ..MemoryConfig::default()
    }
}

fn new_store(short: usize, long: usize) -> MemoryStore {
    MemoryStore::new(config(short, long), Arc::new(MockEngine::new(8)))
}

// ---- Overflow scenario ----

#[tokio::test]
async fn storing_101_items_overflows_exactly_one() {
    let mut store = new_store(100, 500);
    for i in 0..101 {
        let item = ShortTermItem::new(Role::Assistant, format!("turn {i}")).with_confidence(0.7);
        store.store(item).await;
    }
    let stats = store.stats();
    assert_eq!(stats.short_term_count, 100);
    // The single overflowed item was important enough to consolidate.
    assert_eq!(stats.long_term_count, 1);
}

#[tokio::test]
async fn overflowed_unimportant_items_are_dropped_not_consolidated() {
    let mut store = new_store(100, 500);
    for i in 0..101 {
        store
            .store(ShortTermItem::new(Role::User, format!("turn {i}")))
            .await;
    }
    let stats = store.stats();
    assert_eq!(stats.short_term_count, 100);
    assert_eq!(stats.long_term_count, 0);
}

// ---- Persistence across process restarts ----

#[tokio::test]
async fn memory_survives_restart_via_blob_store() {
    let blobs = MockBlobStore::new();
    let engine = Arc::new(MockEngine::new(8));

    let mut first = MemoryStore::new(config(10, 50), engine.clone());
    for i in 0..3 {
        first
            .store(
                ShortTermItem::new(Role::Assistant, format!("lasting fact {i}"))
                    .with_confidence(0.9),
            )
            .await;
    }
    first.flush(&blobs, "cortex.memory").await.unwrap();

    let mut second = MemoryStore::new(config(10, 50), engine);
    second.restore(&blobs, "cortex.memory").await.unwrap();
    let stats = second.stats();
    assert_eq!(stats.long_term_count, 3);
    assert_eq!(stats.short_term_count, 0);

    let hits = second.search("lasting fact 1", 1).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "lasting fact 1");
}

#[tokio::test]
async fn corrupt_persisted_state_resets_cleanly() {
    let blobs = MockBlobStore::new();
    blobs
        .insert_raw("cortex.memory", b"\x00garbage".to_vec())
        .await;
    let mut store = new_store(10, 50);
    store.restore(&blobs, "cortex.memory").await.unwrap();
    assert_eq!(store.stats().total_count, 0);
    // A healthy store can still flush over the healed blob.
    store
        .store(ShortTermItem::new(Role::Assistant, "fresh").with_confidence(0.9))
        .await;
    store.flush(&blobs, "cortex.memory").await.unwrap();
}

// ---- Bounded buffers, property-based ----

#[derive(Debug, Clone)]
enum Turn {
    User(String),
    Assistant(String, f64),
}

fn turn_strategy() -> impl Strategy<Value = Turn> {
    prop_oneof![
        "[a-z]{1,12}".prop_map(Turn::User),
        ("[a-z]{1,12}", 0.0f64..1.0).prop_map(|(s, c)| Turn::Assistant(s, c)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn buffers_stay_bounded_for_any_sequence(turns in prop::collection::vec(turn_strategy(), 0..200)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        runtime.block_on(async {
            let mut store = new_store(8, 5);
            for turn in turns {
                let item = match turn {
                    Turn::User(content) => ShortTermItem::new(Role::User, content),
                    Turn::Assistant(content, confidence) => {
                        ShortTermItem::new(Role::Assistant, content).with_confidence(confidence)
                    }
                };
                store.store(item).await;
                let stats = store.stats();
                prop_assert!(stats.short_term_count <= 8);
                prop_assert!(stats.long_term_count <= 5);
            }
            Ok(())
        })?;
    }
}
