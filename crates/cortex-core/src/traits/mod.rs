// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the Cortex cognitive core.
//!
//! The core never talks to a real model runtime or a real storage backend
//! directly; it consumes these traits, implemented by the host application.
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod blobstore;
pub mod engine;

pub use blobstore::BlobStore;
pub use engine::InferenceEngine;
