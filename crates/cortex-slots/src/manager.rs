// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot manager for bounded accelerator-memory occupancy.
//!
//! Eviction is scored by temperature rather than strict LRU: a model used
//! fifty times two minutes ago should survive over a model used once ten
//! seconds ago. The blended recency + frequency score protects hot
//! high-frequency models from a single recent low-value access.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use cortex_config::SlotConfig;
use cortex_core::error::CortexError;

/// Weight of the recency term in the temperature blend.
const TEMPERATURE_RECENCY_WEIGHT: f64 = 0.7;
/// Weight of the frequency term in the temperature blend.
const TEMPERATURE_FREQUENCY_WEIGHT: f64 = 0.3;
/// Recency half-life scale in minutes.
const TEMPERATURE_DECAY_MINUTES: f64 = 30.0;
/// Access count at which the frequency term saturates.
const TEMPERATURE_FREQUENCY_SATURATION: f64 = 100.0;

/// One unit of bounded compute resource, occupied by at most one loaded
/// model at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSlot {
    /// Stable identifier for this slot, handed back to callers.
    pub id: String,
    /// The model occupying (or last occupying) this slot.
    pub model_name: String,
    /// Whether the model currently occupies resource budget.
    pub loaded: bool,
    /// Resource units the loaded model occupies.
    pub resource_units: u64,
    /// Last acquisition time; drives the temperature recency term.
    pub last_used: DateTime<Utc>,
    /// Total acquisitions; drives the temperature frequency term.
    pub access_count: u64,
}

impl ModelSlot {
    /// Temperature at `now`: recency-dominant exponential decay blended
    /// with a saturating frequency term. Recomputed on demand, never
    /// cached, so it always reflects current wall-clock distance from
    /// `last_used`.
    pub fn temperature_at(&self, now: DateTime<Utc>) -> f64 {
        let age_minutes = (now - self.last_used).num_milliseconds().max(0) as f64 / 60_000.0;
        let recency = (-age_minutes / TEMPERATURE_DECAY_MINUTES).exp();
        let frequency = (self.access_count as f64 / TEMPERATURE_FREQUENCY_SATURATION).min(1.0);
        TEMPERATURE_RECENCY_WEIGHT * recency + TEMPERATURE_FREQUENCY_WEIGHT * frequency
    }

    /// Temperature against the current wall clock.
    pub fn temperature(&self) -> f64 {
        self.temperature_at(Utc::now())
    }
}

/// Why a slot was evicted, recorded in the diagnostic snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionReason {
    /// Evicted to make headroom for a new acquisition.
    MakeRoom,
    /// Caller released with `force = true`.
    ForcedRelease,
    /// Released while usage was already past the offload threshold.
    PressureRelease,
}

/// Diagnostic record of one eviction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvictionSnapshot {
    /// Model that was unloaded.
    pub model_name: String,
    /// Units returned to the pool.
    pub resource_units: u64,
    /// Seconds since the slot was last used.
    pub idle_secs: i64,
    /// Temperature at the moment of eviction.
    pub temperature: f64,
    /// Why the eviction happened.
    pub reason: EvictionReason,
    /// When the eviction happened.
    pub evicted_at: DateTime<Utc>,
}

/// Read-only usage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotStats {
    /// Units currently occupied by loaded slots.
    pub current_usage: u64,
    /// Total budget in units.
    pub capacity_units: u64,
    /// Number of loaded slots.
    pub loaded_count: usize,
    /// Total evictions since construction.
    pub eviction_count: usize,
}

/// Tracks which models occupy the bounded resource budget.
///
/// Invariants held after every operation: at most one loaded slot per model
/// name, and current usage equals the sum of resource units over loaded
/// slots. Not internally synchronized; a multi-threaded owner wraps it in a
/// `Mutex`.
pub struct SlotManager {
    config: SlotConfig,
    /// Keyed by model name, which enforces slot exclusivity structurally.
    slots: HashMap<String, ModelSlot>,
    evictions: Vec<EvictionSnapshot>,
}

impl SlotManager {
    /// Creates an empty manager with the given budget configuration.
    pub fn new(config: SlotConfig) -> Self {
        Self {
            config,
            slots: HashMap::new(),
            evictions: Vec::new(),
        }
    }

    /// Units currently occupied by loaded slots.
    pub fn current_usage(&self) -> u64 {
        self.slots
            .values()
            .filter(|s| s.loaded)
            .map(|s| s.resource_units)
            .sum()
    }

    /// The usable budget: capacity scaled by the offload threshold.
    fn effective_limit(&self) -> f64 {
        self.config.capacity_units as f64 * self.config.offload_threshold
    }

    /// Acquire a slot for `model_name`.
    ///
    /// A model that is already loaded is refreshed and returned without any
    /// allocation (the hot path). Otherwise colder slots are evicted in
    /// ascending temperature order until enough headroom exists; if the
    /// model cannot fit even into an empty budget, the acquisition fails
    /// with [`CortexError::InsufficientBudget`].
    pub fn acquire(
        &mut self,
        model_name: &str,
        required_units: u64,
    ) -> Result<ModelSlot, CortexError> {
        let now = Utc::now();

        if let Some(slot) = self.slots.get_mut(model_name) {
            if slot.loaded {
                slot.last_used = now;
                slot.access_count += 1;
                debug!(model = model_name, "slot already loaded, refreshed");
                return Ok(slot.clone());
            }
        }

        if required_units as f64 > self.effective_limit() {
            return Err(CortexError::InsufficientBudget {
                model: model_name.to_string(),
                required_units,
                capacity_units: self.config.capacity_units,
            });
        }

        while (self.current_usage() + required_units) as f64 > self.effective_limit() {
            if !self.evict_coldest(now) {
                // No loaded slots left and still no headroom.
                return Err(CortexError::InsufficientBudget {
                    model: model_name.to_string(),
                    required_units,
                    capacity_units: self.config.capacity_units,
                });
            }
        }

        self.slots
            .entry(model_name.to_string())
            .and_modify(|s| {
                // Reload of a previously evicted model.
                s.loaded = true;
                s.resource_units = required_units;
                s.last_used = now;
                s.access_count += 1;
            })
            .or_insert_with(|| ModelSlot {
                id: uuid::Uuid::new_v4().to_string(),
                model_name: model_name.to_string(),
                loaded: true,
                resource_units: required_units,
                last_used: now,
                access_count: 1,
            });

        info!(
            model = model_name,
            units = required_units,
            usage = self.current_usage(),
            "slot loaded"
        );
        metrics::gauge!("cortex_slots_usage_units").set(self.current_usage() as f64);
        Ok(self.slots[model_name].clone())
    }

    /// Release a slot by id.
    ///
    /// Releasing is not synonymous with unloading: unless forced, or unless
    /// usage is already at or past the offload threshold, the slot is kept
    /// warm so the next acquisition hits the hot path.
    pub fn release(&mut self, slot_id: &str, force: bool) -> Result<(), CortexError> {
        let now = Utc::now();
        let Some(model_name) = self
            .slots
            .values()
            .find(|s| s.id == slot_id)
            .map(|s| s.model_name.clone())
        else {
            return Err(CortexError::Internal(format!("unknown slot id: {slot_id}")));
        };

        let under_pressure = self.current_usage() as f64
            >= self.config.capacity_units as f64 * self.config.offload_threshold;

        if force || under_pressure {
            let reason = if force {
                EvictionReason::ForcedRelease
            } else {
                EvictionReason::PressureRelease
            };
            self.evict(&model_name, reason, now);
        } else {
            debug!(model = %model_name, "release kept slot warm");
        }
        Ok(())
    }

    /// Read-only usage summary.
    pub fn stats(&self) -> SlotStats {
        SlotStats {
            current_usage: self.current_usage(),
            capacity_units: self.config.capacity_units,
            loaded_count: self.slots.values().filter(|s| s.loaded).count(),
            eviction_count: self.evictions.len(),
        }
    }

    /// Diagnostic snapshots of every eviction since construction.
    pub fn evictions(&self) -> &[EvictionSnapshot] {
        &self.evictions
    }

    /// Look up a slot by model name.
    pub fn slot(&self, model_name: &str) -> Option<&ModelSlot> {
        self.slots.get(model_name)
    }

    /// Evict the loaded slot with the lowest temperature.
    /// Returns false when nothing is loaded.
    fn evict_coldest(&mut self, now: DateTime<Utc>) -> bool {
        let coldest = self
            .slots
            .values()
            .filter(|s| s.loaded)
            .min_by(|a, b| {
                a.temperature_at(now)
                    .partial_cmp(&b.temperature_at(now))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|s| s.model_name.clone());

        match coldest {
            Some(model_name) => {
                self.evict(&model_name, EvictionReason::MakeRoom, now);
                true
            }
            None => false,
        }
    }

    fn evict(&mut self, model_name: &str, reason: EvictionReason, now: DateTime<Utc>) {
        let Some(slot) = self.slots.get_mut(model_name) else {
            return;
        };
        if !slot.loaded {
            return;
        }
        slot.loaded = false;
        let snapshot = EvictionSnapshot {
            model_name: slot.model_name.clone(),
            resource_units: slot.resource_units,
            idle_secs: (now - slot.last_used).num_seconds(),
            temperature: slot.temperature_at(now),
            reason,
            evicted_at: now,
        };
        info!(
            model = model_name,
            units = snapshot.resource_units,
            temperature = snapshot.temperature,
            ?reason,
            "slot evicted"
        );
        metrics::counter!("cortex_slots_evictions_total").increment(1);
        metrics::gauge!("cortex_slots_usage_units").set(self.current_usage() as f64);
        self.evictions.push(snapshot);
    }
}
