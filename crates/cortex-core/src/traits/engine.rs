// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inference engine trait for local text generation and embedding.

use async_trait::async_trait;

use crate::error::CortexError;
use crate::types::{EngineStatus, GenerateRequest, HealthStatus};

/// The opaque model runtime the core delegates generation and embedding to.
///
/// Implementations wrap a native backend (llama.cpp or similar) or a remote
/// fallback. The orchestrator may swap one engine for another on failure;
/// the circuit breaker wraps exactly this boundary.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generates text for the given request.
    async fn generate(&self, request: GenerateRequest) -> Result<String, CortexError>;

    /// Produces a fixed-length embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, CortexError>;

    /// Reports whether a model is loaded and which backend serves it.
    async fn status(&self) -> Result<EngineStatus, CortexError>;

    /// Performs a health check against the backend.
    async fn health_check(&self) -> Result<HealthStatus, CortexError>;
}
