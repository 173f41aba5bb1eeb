// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock inference engine for deterministic testing.
//!
//! `MockEngine` implements `InferenceEngine` with pre-configured responses
//! and embeddings, enabling fast, CI-runnable tests without a real model.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use cortex_core::traits::engine::InferenceEngine;
use cortex_core::types::{EngineStatus, GenerateRequest, HealthStatus};
use cortex_core::CortexError;

/// A mock inference engine that returns pre-configured output.
///
/// Generation responses are popped from a FIFO queue; when the queue is
/// empty, a default "mock response" text is returned. Embeddings come from
/// a per-text override map, falling back to a deterministic hash-derived
/// unit vector so that equal texts always embed identically.
pub struct MockEngine {
    responses: Arc<Mutex<VecDeque<String>>>,
    embeddings: Arc<Mutex<HashMap<String, Vec<f32>>>>,
    embedding_dim: usize,
    failing_embeds: AtomicUsize,
    failing_generates: AtomicUsize,
    generate_calls: AtomicUsize,
    embed_calls: AtomicUsize,
}

impl MockEngine {
    /// Create a new mock engine producing embeddings of the given dimension.
    pub fn new(embedding_dim: usize) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            embeddings: Arc::new(Mutex::new(HashMap::new())),
            embedding_dim,
            failing_embeds: AtomicUsize::new(0),
            failing_generates: AtomicUsize::new(0),
            generate_calls: AtomicUsize::new(0),
            embed_calls: AtomicUsize::new(0),
        }
    }

    /// Create a mock engine pre-loaded with the given generation responses.
    pub fn with_responses(embedding_dim: usize, responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            ..Self::new(embedding_dim)
        }
    }

    /// Add a response to the end of the generation queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Override the embedding returned for a specific text.
    pub async fn set_embedding(&self, text: &str, embedding: Vec<f32>) {
        self.embeddings
            .lock()
            .await
            .insert(text.to_string(), embedding);
    }

    /// Make the next `count` `embed` calls fail.
    pub fn fail_next_embeds(&self, count: usize) {
        self.failing_embeds.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` `generate` calls fail.
    pub fn fail_next_generates(&self, count: usize) {
        self.failing_generates.store(count, Ordering::SeqCst);
    }

    /// Number of `generate` calls observed so far.
    pub fn generate_calls(&self) -> usize {
        self.generate_calls.load(Ordering::SeqCst)
    }

    /// Number of `embed` calls observed so far.
    pub fn embed_calls(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }

    /// Consume one scheduled failure, if any remain.
    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    /// Deterministic unit vector derived from the SHA-256 digest of the text.
    fn hash_embedding(&self, text: &str) -> Vec<f32> {
        let digest = Sha256::digest(text.as_bytes());
        let mut out = Vec::with_capacity(self.embedding_dim);
        for i in 0..self.embedding_dim {
            let byte = digest[i % digest.len()];
            // Spread digest bytes over [-1, 1], perturbed by position so the
            // vector is not periodic in the digest length.
            let value = (f32::from(byte) / 127.5 - 1.0) * (1.0 + (i as f32) * 0.001);
            out.push(value);
        }
        let norm = out.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        out
    }
}

#[async_trait]
impl InferenceEngine for MockEngine {
    async fn generate(&self, _request: GenerateRequest) -> Result<String, CortexError> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.failing_generates) {
            return Err(CortexError::engine("mock generate failure"));
        }
        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, CortexError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.failing_embeds) {
            return Err(CortexError::engine("mock embed failure"));
        }
        if let Some(preset) = self.embeddings.lock().await.get(text) {
            return Ok(preset.clone());
        }
        Ok(self.hash_embedding(text))
    }

    async fn status(&self) -> Result<EngineStatus, CortexError> {
        Ok(EngineStatus {
            loaded: true,
            engine: "mock".to_string(),
            version: "0.1.0".to_string(),
        })
    }

    async fn health_check(&self) -> Result<HealthStatus, CortexError> {
        Ok(HealthStatus::Healthy)
    }
}
