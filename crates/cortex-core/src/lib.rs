// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Cortex cognitive resource and memory manager.
//!
//! This crate provides the collaborator trait definitions, error types, and
//! common types used throughout the Cortex workspace. The memory store,
//! result cache, slot manager, and circuit breaker crates all build on the
//! definitions here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::CortexError;
pub use traits::{BlobStore, InferenceEngine};
pub use types::{EngineStatus, GenerateRequest, HealthStatus, Role};
