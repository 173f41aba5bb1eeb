// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Circuit breaker protecting inference calls from cascading failure.
//!
//! States: `Closed` -> (failures >= threshold) -> `Open` -> (after the reset
//! timeout) -> `HalfOpen` -> (successes >= threshold) -> `Closed`.
//! `HalfOpen` reverts to `Open` on any single failure.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{info, warn};

use cortex_config::BreakerConfig;
use cortex_core::error::CortexError;

/// Control state of one guarded call-site. Pure in-memory, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CircuitState {
    /// Normal operation; calls pass through.
    Closed,
    /// Failing fast; calls are rejected until the reset timeout elapses.
    Open,
    /// Cooldown elapsed; probe calls are admitted until the success
    /// threshold is met.
    HalfOpen,
}

/// Read-only snapshot of breaker bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerMetrics {
    /// Current control state.
    pub state: CircuitState,
    /// Consecutive failures since the last success.
    pub failures: u32,
    /// Total successful calls since construction or reset.
    pub successes: u64,
    /// Total invocations, including fast-failed ones.
    pub total_requests: u64,
    /// Wall-clock time of the most recent failure.
    pub last_failure_time: Option<DateTime<Utc>>,
    /// Wall-clock time of the most recent success.
    pub last_success_time: Option<DateTime<Utc>>,
}

/// Guards calls to a failing dependency with fail-fast cooldowns and a
/// per-call deadline.
///
/// The timeout is fixed at construction and raced against every guarded
/// operation; there is no per-invocation override and no external cancel
/// signal. Not internally synchronized; a multi-threaded owner wraps it in
/// a `Mutex`.
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: CircuitState,
    consecutive_failures: u32,
    half_open_successes: u32,
    total_successes: u64,
    total_requests: u64,
    /// Earliest moment an `Open` circuit admits a probe.
    next_attempt: Option<Instant>,
    last_failure_time: Option<DateTime<Utc>>,
    last_success_time: Option<DateTime<Utc>>,
}

impl CircuitBreaker {
    /// Creates a closed breaker with the given thresholds and timeouts.
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            state: CircuitState::Closed,
            consecutive_failures: 0,
            half_open_successes: 0,
            total_successes: 0,
            total_requests: 0,
            next_attempt: None,
            last_failure_time: None,
            last_success_time: None,
        }
    }

    /// Current control state.
    pub fn state(&self) -> CircuitState {
        self.state
    }

    /// Run `operation` under the breaker's policy.
    ///
    /// In `Open` state before the reset timeout, fails immediately with
    /// [`CortexError::CircuitOpen`] without invoking the operation; after
    /// the timeout the circuit moves to `HalfOpen` and the call proceeds as
    /// a probe. The operation is raced against the configured call timeout;
    /// expiry counts as a failure and surfaces as [`CortexError::Timeout`].
    pub async fn execute<T, F, Fut>(&mut self, operation: F) -> Result<T, CortexError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, CortexError>>,
    {
        self.total_requests += 1;

        if self.state == CircuitState::Open {
            let now = Instant::now();
            match self.next_attempt {
                Some(at) if now < at => {
                    metrics::counter!("cortex_breaker_rejected_total").increment(1);
                    return Err(CortexError::CircuitOpen {
                        retry_after: at - now,
                    });
                }
                _ => {
                    info!("circuit half-open, admitting probe call");
                    self.state = CircuitState::HalfOpen;
                    self.half_open_successes = 0;
                }
            }
        }

        let deadline = Duration::from_secs(self.config.call_timeout_secs);
        let result = match tokio::time::timeout(deadline, operation()).await {
            Ok(inner) => inner,
            Err(_) => Err(CortexError::Timeout { duration: deadline }),
        };

        match result {
            Ok(value) => {
                self.on_success();
                Ok(value)
            }
            Err(e) => {
                self.on_failure();
                Err(e)
            }
        }
    }

    /// Read-only snapshot of the breaker's bookkeeping.
    pub fn metrics(&self) -> BreakerMetrics {
        BreakerMetrics {
            state: self.state,
            failures: self.consecutive_failures,
            successes: self.total_successes,
            total_requests: self.total_requests,
            last_failure_time: self.last_failure_time,
            last_success_time: self.last_success_time,
        }
    }

    /// Composite health in [0, 1]: the mean of the success rate and a
    /// state score (1.0 closed, 0.5 half-open, 0.0 open).
    pub fn health_score(&self) -> f64 {
        let success_rate = if self.total_requests == 0 {
            1.0
        } else {
            self.total_successes as f64 / self.total_requests as f64
        };
        let state_score = match self.state {
            CircuitState::Closed => 1.0,
            CircuitState::HalfOpen => 0.5,
            CircuitState::Open => 0.0,
        };
        (success_rate + state_score) / 2.0
    }

    /// Manual override back to `Closed`, clearing failure bookkeeping.
    /// Request totals are kept for the metrics history.
    pub fn reset(&mut self) {
        info!("circuit breaker manually reset to closed");
        self.state = CircuitState::Closed;
        self.consecutive_failures = 0;
        self.half_open_successes = 0;
        self.next_attempt = None;
    }

    fn on_success(&mut self) {
        self.consecutive_failures = 0;
        self.total_successes += 1;
        self.last_success_time = Some(Utc::now());

        if self.state == CircuitState::HalfOpen {
            self.half_open_successes += 1;
            if self.half_open_successes >= self.config.success_threshold {
                info!(
                    successes = self.half_open_successes,
                    "circuit closed after successful probes"
                );
                self.state = CircuitState::Closed;
                self.half_open_successes = 0;
            }
        }
    }

    fn on_failure(&mut self) {
        self.consecutive_failures += 1;
        self.last_failure_time = Some(Utc::now());

        let should_trip = match self.state {
            // A single half-open failure reopens the circuit.
            CircuitState::HalfOpen => true,
            CircuitState::Closed => self.consecutive_failures >= self.config.failure_threshold,
            CircuitState::Open => false,
        };
        if should_trip {
            self.trip();
        }
    }

    fn trip(&mut self) {
        warn!(
            failures = self.consecutive_failures,
            cooldown_secs = self.config.reset_timeout_secs,
            "circuit tripped open"
        );
        self.state = CircuitState::Open;
        self.next_attempt =
            Some(Instant::now() + Duration::from_secs(self.config.reset_timeout_secs));
        metrics::counter!("cortex_breaker_trips_total").increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BreakerConfig {
        BreakerConfig {
            failure_threshold: 3,
            success_threshold: 2,
            reset_timeout_secs: 60,
            call_timeout_secs: 5,
        }
    }

    async fn fail(breaker: &mut CircuitBreaker) {
        let _ = breaker
            .execute(|| async { Err::<(), _>(CortexError::engine("backend fault")) })
            .await;
    }

    async fn succeed(breaker: &mut CircuitBreaker) {
        breaker
            .execute(|| async { Ok::<_, CortexError>("ok") })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn stays_closed_below_threshold() {
        let mut breaker = CircuitBreaker::new(test_config());
        fail(&mut breaker).await;
        fail(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn threshold_failures_open_the_circuit() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test(start_paused = true)]
    async fn open_circuit_fails_fast_without_invoking_operation() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }

        let mut invoked = false;
        let result = breaker
            .execute(|| {
                invoked = true;
                async { Ok::<_, CortexError>(()) }
            })
            .await;

        assert!(matches!(result, Err(CortexError::CircuitOpen { .. })));
        assert!(!invoked, "operation must not run while circuit is open");
        // Fast-failed calls still count toward the request total.
        assert_eq!(breaker.metrics().total_requests, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_admitted_after_reset_timeout() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }

        tokio::time::advance(Duration::from_secs(61)).await;

        succeed(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
    }

    #[tokio::test(start_paused = true)]
    async fn success_threshold_closes_half_open_circuit() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }
        tokio::time::advance(Duration::from_secs(61)).await;

        succeed(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        succeed(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn single_half_open_failure_reopens() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }
        tokio::time::advance(Duration::from_secs(61)).await;

        succeed(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        fail(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::Open);
    }

    #[tokio::test]
    async fn success_resets_consecutive_failures() {
        let mut breaker = CircuitBreaker::new(test_config());
        fail(&mut breaker).await;
        fail(&mut breaker).await;
        succeed(&mut breaker).await;
        fail(&mut breaker).await;
        fail(&mut breaker).await;
        // Only 2 consecutive since the success, so still closed.
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out_and_counts_as_failure() {
        let mut breaker = CircuitBreaker::new(test_config());
        let result = breaker
            .execute(|| async {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Ok::<_, CortexError>(())
            })
            .await;
        assert!(matches!(result, Err(CortexError::Timeout { .. })));
        assert_eq!(breaker.metrics().failures, 1);
    }

    #[tokio::test]
    async fn metrics_snapshot_tracks_calls() {
        let mut breaker = CircuitBreaker::new(test_config());
        succeed(&mut breaker).await;
        fail(&mut breaker).await;

        let metrics = breaker.metrics();
        assert_eq!(metrics.total_requests, 2);
        assert_eq!(metrics.successes, 1);
        assert_eq!(metrics.failures, 1);
        assert!(metrics.last_success_time.is_some());
        assert!(metrics.last_failure_time.is_some());
    }

    #[tokio::test]
    async fn health_score_reflects_state_and_success_rate() {
        let mut breaker = CircuitBreaker::new(test_config());
        // Untouched breaker is perfectly healthy.
        assert!((breaker.health_score() - 1.0).abs() < f64::EPSILON);

        for _ in 0..3 {
            fail(&mut breaker).await;
        }
        // Open state: (0/3 success rate + 0.0) / 2 = 0.0
        assert!(breaker.health_score() < f64::EPSILON);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_overrides_open_state() {
        let mut breaker = CircuitBreaker::new(test_config());
        for _ in 0..3 {
            fail(&mut breaker).await;
        }
        assert_eq!(breaker.state(), CircuitState::Open);

        breaker.reset();
        assert_eq!(breaker.state(), CircuitState::Closed);

        // Calls pass through again immediately.
        succeed(&mut breaker).await;
        assert_eq!(breaker.state(), CircuitState::Closed);
    }
}
