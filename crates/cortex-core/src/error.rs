// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cortex cognitive core.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the Cortex collaborator traits and
/// core components.
#[derive(Debug, Error)]
pub enum CortexError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Blob store errors (load/save failure against the persistence backend).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Inference engine errors (generation failure, embedding failure,
    /// native backend fault).
    #[error("engine error: {message}")]
    Engine {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The circuit breaker refused the call because the circuit is open.
    #[error("circuit open: retry in {retry_after:?}")]
    CircuitOpen { retry_after: Duration },

    /// A breaker-enforced deadline elapsed before the guarded call finished.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// Slot acquisition failed: the resource budget cannot fit the model
    /// even after evicting every colder slot.
    #[error("cannot load {model}: needs {required_units} units, budget is {capacity_units}")]
    InsufficientBudget {
        model: String,
        required_units: u64,
        capacity_units: u64,
    },

    /// A persisted blob could not be deserialized.
    #[error("serialization error: {source}")]
    Serialization {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CortexError {
    /// Wrap a serde_json error as a serialization failure.
    pub fn serialization(e: serde_json::Error) -> Self {
        CortexError::Serialization {
            source: Box::new(e),
        }
    }

    /// Build an engine error from a plain message.
    pub fn engine(message: impl Into<String>) -> Self {
        CortexError::Engine {
            message: message.into(),
            source: None,
        }
    }
}
