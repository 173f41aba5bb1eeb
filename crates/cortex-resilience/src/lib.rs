// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience primitives for the Cortex cognitive core.
//!
//! The circuit breaker wraps the inference engine boundary: it fails fast
//! during cooldowns, enforces a per-call deadline, and probes the backend
//! before fully closing again.

pub mod breaker;

pub use breaker::{BreakerMetrics, CircuitBreaker, CircuitState};
