// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Compute-slot manager for the Cortex cognitive core.
//!
//! Tracks which models occupy a bounded resource budget (accelerator
//! memory) and evicts by a blended recency + frequency temperature score
//! rather than strict LRU.

pub mod manager;

pub use manager::{EvictionReason, EvictionSnapshot, ModelSlot, SlotManager, SlotStats};
