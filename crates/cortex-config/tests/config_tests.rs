// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Cortex configuration system.

use std::fs;
use std::io::Write;

use cortex_config::{load_and_validate_str, load_config_from_path, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_cortex_config() {
    let toml = r#"
[memory]
short_term_capacity = 50
long_term_capacity = 200
ttl_secs = 86400
consolidation_threshold = 0.7
promotion_confidence = 0.9
semantic_floor = 0.25
embedding_dim = 512

[generation_cache]
capacity = 10
ttl_secs = 120

[embedding_cache]
capacity = 40
ttl_secs = 600

[slots]
capacity_units = 4096
offload_threshold = 0.75

[breaker]
failure_threshold = 3
success_threshold = 1
reset_timeout_secs = 30
call_timeout_secs = 10
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.memory.short_term_capacity, 50);
    assert_eq!(config.memory.long_term_capacity, 200);
    assert_eq!(config.memory.ttl_secs, 86400);
    assert_eq!(config.memory.consolidation_threshold, 0.7);
    assert_eq!(config.memory.promotion_confidence, 0.9);
    assert_eq!(config.memory.semantic_floor, 0.25);
    assert_eq!(config.memory.embedding_dim, 512);
    assert_eq!(config.generation_cache.capacity, 10);
    assert_eq!(config.generation_cache.ttl_secs, 120);
    assert_eq!(config.embedding_cache.capacity, 40);
    assert_eq!(config.embedding_cache.ttl_secs, 600);
    assert_eq!(config.slots.capacity_units, 4096);
    assert_eq!(config.slots.offload_threshold, 0.75);
    assert_eq!(config.breaker.failure_threshold, 3);
    assert_eq!(config.breaker.success_threshold, 1);
    assert_eq!(config.breaker.reset_timeout_secs, 30);
    assert_eq!(config.breaker.call_timeout_secs, 10);
}

/// Empty TOML yields all documented defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config should use defaults");
    assert_eq!(config.memory.short_term_capacity, 100);
    assert_eq!(config.memory.long_term_capacity, 500);
    assert_eq!(config.memory.ttl_secs, 604_800);
    assert_eq!(config.memory.semantic_floor, 0.3);
    assert_eq!(config.generation_cache.capacity, 20);
    assert_eq!(config.generation_cache.ttl_secs, 300);
    assert_eq!(config.embedding_cache.capacity, 20);
    assert_eq!(config.slots.offload_threshold, 0.8);
    assert_eq!(config.breaker.failure_threshold, 5);
    assert_eq!(config.breaker.success_threshold, 2);
}

/// Unknown field in [memory] section is rejected.
#[test]
fn unknown_field_in_memory_produces_error() {
    let toml = r#"
[memory]
shrot_term_capacity = 10
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("shrot_term_capacity"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown top-level section is rejected.
#[test]
fn unknown_section_produces_error() {
    let toml = r#"
[telemetry]
enabled = true
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// A wrong-typed value is rejected with a parse error.
#[test]
fn wrong_type_produces_error() {
    let toml = r#"
[slots]
capacity_units = "lots"
"#;

    assert!(load_config_from_str(toml).is_err());
}

/// Out-of-range thresholds fail validation with one error per problem.
#[test]
fn validation_collects_all_range_errors() {
    let toml = r#"
[memory]
consolidation_threshold = 1.5
semantic_floor = -0.2

[slots]
offload_threshold = 2.0
"#;

    let errors = load_and_validate_str(toml).expect_err("out-of-range values must fail");
    assert_eq!(errors.len(), 3, "one error per out-of-range field: {errors:?}");
}

/// Zero capacities fail validation.
#[test]
fn zero_capacity_fails_validation() {
    let toml = r#"
[memory]
short_term_capacity = 0
"#;

    assert!(load_and_validate_str(toml).is_err());
}

/// Loading from an explicit file path works end to end.
#[test]
fn load_from_file_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cortex.toml");
    let mut file = fs::File::create(&path).expect("create config file");
    writeln!(file, "[breaker]\nfailure_threshold = 7").expect("write config");

    let config = load_config_from_path(&path).expect("file config should load");
    assert_eq!(config.breaker.failure_threshold, 7);
    // Untouched sections keep their defaults.
    assert_eq!(config.memory.short_term_capacity, 100);
}
