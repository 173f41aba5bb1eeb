// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./cortex.toml` > `~/.config/cortex/cortex.toml` > `/etc/cortex/cortex.toml`
//! with environment variable overrides via `CORTEX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CortexConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/cortex/cortex.toml` (system-wide)
/// 3. `~/.config/cortex/cortex.toml` (user XDG config)
/// 4. `./cortex.toml` (local directory)
/// 5. `CORTEX_*` environment variables
pub fn load_config() -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::file("/etc/cortex/cortex.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("cortex/cortex.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("cortex.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CortexConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CortexConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CORTEX_MEMORY_TTL_SECS`
/// must map to `memory.ttl_secs`, not `memory.ttl.secs`.
fn env_provider() -> Env {
    Env::prefixed("CORTEX_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: CORTEX_MEMORY_TTL_SECS -> "memory_ttl_secs"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("memory_", "memory.", 1)
            .replacen("generation_cache_", "generation_cache.", 1)
            .replacen("embedding_cache_", "embedding_cache.", 1)
            .replacen("slots_", "slots.", 1)
            .replacen("breaker_", "breaker.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.memory.short_term_capacity, 100);
        assert_eq!(config.breaker.failure_threshold, 5);
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = load_config_from_str(
            r#"
[memory]
short_term_capacity = 10
ttl_secs = 3600

[breaker]
failure_threshold = 3
"#,
        )
        .unwrap();
        assert_eq!(config.memory.short_term_capacity, 10);
        assert_eq!(config.memory.ttl_secs, 3600);
        assert_eq!(config.breaker.failure_threshold, 3);
        // Untouched sections keep their defaults.
        assert_eq!(config.slots.capacity_units, 8192);
    }

    #[test]
    fn invalid_toml_reports_error() {
        let result = load_config_from_str("[memory\nshort_term_capacity = 10");
        assert!(result.is_err());
    }
}
