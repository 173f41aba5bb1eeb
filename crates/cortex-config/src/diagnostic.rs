// SPDX-FileCopyrightText: 2026 Cortex Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-to-miette error bridge.
//!
//! Converts Figment deserialization errors into miette diagnostics so the
//! host application can render readable startup failures.

use miette::Diagnostic;
use thiserror::Error;

/// A configuration error with diagnostic information.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// The configuration failed to parse or deserialize.
    #[error("failed to load configuration: {message}")]
    #[diagnostic(
        code(cortex::config::parse),
        help("check cortex.toml against the documented sections: memory, generation_cache, embedding_cache, slots, breaker")
    )]
    Parse {
        /// The underlying Figment error message.
        message: String,
    },

    /// A semantic validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(cortex::config::validation))]
    Validation {
        /// Human-readable description of the violated constraint.
        message: String,
    },
}

/// Convert a Figment error into one `ConfigError` per underlying failure.
pub fn figment_to_config_errors(err: figment::Error) -> Vec<ConfigError> {
    err.into_iter()
        .map(|e| ConfigError::Parse {
            message: e.to_string(),
        })
        .collect()
}

/// Render a list of config errors into a single human-readable report.
pub fn render_errors(errors: &[ConfigError]) -> String {
    let mut out = String::new();
    for (i, err) in errors.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("error: {err}"));
    }
    out
}
