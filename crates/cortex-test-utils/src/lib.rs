// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Cortex integration tests.
//!
//! Provides mock collaborators for fast, deterministic, CI-runnable tests
//! without a real model runtime or filesystem.
//!
//! # Components
//!
//! - [`MockEngine`] - Mock inference engine with scripted responses,
//!   deterministic embeddings, and call counters
//! - [`MockBlobStore`] - In-memory blob store with raw injection for
//!   corrupt-state scenarios

pub mod mock_blob_store;
pub mod mock_engine;

pub use mock_blob_store::MockBlobStore;
pub use mock_engine::MockEngine;
