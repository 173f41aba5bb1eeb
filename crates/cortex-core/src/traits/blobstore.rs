// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blob store trait for opaque key/value persistence.

use async_trait::async_trait;

use crate::error::CortexError;

/// Opaque key/value persistence used to carry memory and cache state
/// across process restarts.
///
/// Payloads are opaque byte blobs; the core owns their format. A key that
/// was never saved loads as `None`. Corrupt payloads are the *caller's*
/// problem to recover from (the core treats them as empty state and
/// force-saves a fresh blob).
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Loads the blob stored under `key`, or `None` if absent.
    async fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CortexError>;

    /// Saves `bytes` under `key`, replacing any previous blob.
    async fn save(&self, key: &str, bytes: &[u8]) -> Result<(), CortexError>;
}
