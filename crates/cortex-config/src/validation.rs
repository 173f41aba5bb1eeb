// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as fractional thresholds staying in [0, 1] and
//! capacities staying non-zero.

use crate::diagnostic::ConfigError;
use crate::model::CortexConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &CortexConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.memory.short_term_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.short_term_capacity must be at least 1".to_string(),
        });
    }

    if config.memory.long_term_capacity == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.long_term_capacity must be at least 1".to_string(),
        });
    }

    if config.memory.embedding_dim == 0 {
        errors.push(ConfigError::Validation {
            message: "memory.embedding_dim must be at least 1".to_string(),
        });
    }

    for (name, value) in [
        (
            "memory.consolidation_threshold",
            config.memory.consolidation_threshold,
        ),
        (
            "memory.promotion_confidence",
            config.memory.promotion_confidence,
        ),
        (
            "memory.semantic_floor",
            f64::from(config.memory.semantic_floor),
        ),
        ("slots.offload_threshold", config.slots.offload_threshold),
    ] {
        if !(0.0..=1.0).contains(&value) {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be within [0.0, 1.0], got {value}"),
            });
        }
    }

    for (name, capacity) in [
        ("generation_cache.capacity", config.generation_cache.capacity),
        ("embedding_cache.capacity", config.embedding_cache.capacity),
    ] {
        if capacity == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be at least 1"),
            });
        }
    }

    // A zero TTL would divide recency scoring by zero and expire every
    // entry at insertion time.
    for (name, ttl_secs) in [
        ("memory.ttl_secs", config.memory.ttl_secs),
        ("generation_cache.ttl_secs", config.generation_cache.ttl_secs),
        ("embedding_cache.ttl_secs", config.embedding_cache.ttl_secs),
    ] {
        if ttl_secs == 0 {
            errors.push(ConfigError::Validation {
                message: format!("{name} must be at least 1"),
            });
        }
    }

    if config.slots.capacity_units == 0 {
        errors.push(ConfigError::Validation {
            message: "slots.capacity_units must be at least 1".to_string(),
        });
    }

    if config.breaker.failure_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "breaker.failure_threshold must be at least 1".to_string(),
        });
    }

    if config.breaker.success_threshold == 0 {
        errors.push(ConfigError::Validation {
            message: "breaker.success_threshold must be at least 1".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = CortexConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_capacity_fails_validation() {
        let mut config = CortexConfig::default();
        config.memory.short_term_capacity = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("short_term_capacity"))
        ));
    }

    #[test]
    fn out_of_range_threshold_fails_validation() {
        let mut config = CortexConfig::default();
        config.slots.offload_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("offload_threshold"))
        ));
    }

    #[test]
    fn zero_ttl_fails_validation() {
        let mut config = CortexConfig::default();
        config.memory.ttl_secs = 0;
        config.embedding_cache.ttl_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("memory.ttl_secs"))
        ));
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("embedding_cache.ttl_secs"))
        ));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = CortexConfig::default();
        config.memory.short_term_capacity = 0;
        config.breaker.failure_threshold = 0;
        config.generation_cache.capacity = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
