// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Content-addressed cache keys.
//!
//! Keys are SHA-256 digests over (model identity, request parameters), with
//! a domain prefix per request kind. The generation and embedding caches can
//! therefore never collide by construction, not by convention.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A content hash identifying one cached result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for a text generation request.
    pub fn generation(model: &str, prompt: &str, max_tokens: u32) -> Self {
        Self(digest(
            "generation",
            &[model.as_bytes(), prompt.as_bytes(), &max_tokens.to_le_bytes()],
        ))
    }

    /// Key for an embedding request.
    pub fn embedding(model: &str, text: &str, normalize: bool) -> Self {
        Self(digest(
            "embedding",
            &[model.as_bytes(), text.as_bytes(), &[u8::from(normalize)]],
        ))
    }

    /// The hex digest backing this key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// SHA-256 over a domain tag plus length-prefixed fields.
///
/// Length prefixes keep `("ab", "c")` and `("a", "bc")` distinct.
fn digest(domain: &str, fields: &[&[u8]]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(domain.as_bytes());
    for field in fields {
        hasher.update((field.len() as u64).to_le_bytes());
        hasher.update(field);
    }
    let out = hasher.finalize();
    out.iter().map(|b| format!("{b:02x}")).collect()
}
