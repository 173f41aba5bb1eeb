// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the Cortex components and collaborator traits.

use serde::{Deserialize, Serialize};

/// Who authored a conversational item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Authored by the human user.
    User,
    /// Authored by the assistant.
    Assistant,
}

impl Role {
    /// Stable string form used in persisted payloads and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Parse from the persisted string form. Unknown values map to `User`.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "assistant" => Role::Assistant,
            _ => Role::User,
        }
    }
}

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Fully operational.
    Healthy,
    /// Operational but experiencing issues.
    Degraded(String),
    /// Not operational.
    Unhealthy(String),
}

/// A request for text generation handed to the inference engine.
///
/// The sampling parameters mirror what the native backend accepts; the
/// defaults match its built-in values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The full prompt to generate from.
    pub prompt: String,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Top-k sampling cutoff.
    pub top_k: u32,
    /// Sampling seed; 0 lets the backend pick one.
    pub seed: u32,
}

impl GenerateRequest {
    /// Build a request with the backend's default sampling parameters.
    pub fn new(prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature: 0.8,
            top_k: 40,
            seed: 0,
        }
    }
}

/// Snapshot of the inference engine's load state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether a model is currently loaded.
    pub loaded: bool,
    /// Backend identifier (e.g. "llama.cpp").
    pub engine: String,
    /// Backend version string.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
        assert_eq!(Role::from_str_value("user"), Role::User);
        assert_eq!(Role::from_str_value("assistant"), Role::Assistant);
        // Unknown values fall back to User rather than failing.
        assert_eq!(Role::from_str_value("system"), Role::User);
    }

    #[test]
    fn generate_request_defaults() {
        let req = GenerateRequest::new("hello", 128);
        assert_eq!(req.prompt, "hello");
        assert_eq!(req.max_tokens, 128);
        assert!((req.temperature - 0.8).abs() < f32::EPSILON);
        assert_eq!(req.top_k, 40);
        assert_eq!(req.seed, 0);
    }

    #[test]
    fn generate_request_serde_round_trip() {
        let req = GenerateRequest::new("prompt text", 64);
        let json = serde_json::to_string(&req).unwrap();
        let parsed: GenerateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(req, parsed);
    }
}
