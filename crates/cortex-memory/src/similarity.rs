// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure vector math for semantic retrieval.

use sha2::{Digest, Sha256};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths or zero-magnitude inputs rather than
/// panicking, since stored embeddings may come from different engine
/// generations or the hash fallback.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Scale a vector to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Deterministic hash-derived unit vector for a text.
///
/// Used as a degraded stand-in when the embedding engine is unavailable:
/// equal texts always map to the same vector, so self-similarity still
/// works, while unrelated texts land far apart with high probability.
pub fn pseudo_embedding(text: &str, dim: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(dim);
    let mut block: u32 = 0;
    while out.len() < dim {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(block.to_le_bytes());
        let digest = hasher.finalize();
        for byte in digest.iter() {
            if out.len() == dim {
                break;
            }
            out.push(f32::from(*byte) / 127.5 - 1.0);
        }
        block += 1;
    }
    l2_normalize(&mut out);
    out
}
