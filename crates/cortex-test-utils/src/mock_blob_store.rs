// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory blob store for persistence tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use cortex_core::traits::blobstore::BlobStore;
use cortex_core::CortexError;

/// A `BlobStore` backed by an in-memory map.
///
/// Blobs can be injected directly with [`MockBlobStore::insert_raw`] to
/// simulate pre-existing or corrupt on-disk state.
#[derive(Default)]
pub struct MockBlobStore {
    blobs: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_saves: Mutex<usize>,
}

impl MockBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a blob directly, bypassing the `BlobStore` trait.
    pub async fn insert_raw(&self, key: &str, bytes: Vec<u8>) {
        self.blobs.lock().await.insert(key.to_string(), bytes);
    }

    /// Read a blob directly, bypassing the `BlobStore` trait.
    pub async fn get_raw(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.lock().await.get(key).cloned()
    }

    /// Make the next `count` `save` calls fail.
    pub async fn fail_next_saves(&self, count: usize) {
        *self.fail_saves.lock().await = count;
    }

    /// Number of blobs currently stored.
    pub async fn len(&self) -> usize {
        self.blobs.lock().await.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.lock().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MockBlobStore {
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CortexError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }

    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), CortexError> {
        {
            let mut remaining = self.fail_saves.lock().await;
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CortexError::Storage {
                    source: "mock save failure".into(),
                });
            }
        }
        self.blobs.lock().await.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = MockBlobStore::new();
        store.save("memory", b"payload").await.unwrap();
        assert_eq!(store.load("memory").await.unwrap(), Some(b"payload".to_vec()));
        assert_eq!(store.load("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn scheduled_save_failures() {
        let store = MockBlobStore::new();
        store.fail_next_saves(1).await;
        assert!(store.save("k", b"v").await.is_err());
        assert!(store.save("k", b"v").await.is_ok());
        assert_eq!(store.get_raw("k").await, Some(b"v".to_vec()));
    }
}
