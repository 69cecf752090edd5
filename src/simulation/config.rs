/*!
 * Simulation Configuration
 * Run options loaded from JSON and the environment
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    #[diagnostic(code(config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    #[diagnostic(
        code(config::parse),
        help("Expected a JSON object with optional fields verbose and verify_invariants.")
    )]
    Parse(#[from] serde_json::Error),
}

/// Run options
///
/// Environment variables:
/// - MEMSIM_VERBOSE: per-step engine output at INFO instead of DEBUG
/// - MEMSIM_VERIFY: check memory invariants after every event step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub verbose: bool,
    pub verify_invariants: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            verify_invariants: cfg!(debug_assertions),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Apply MEMSIM_* environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(verbose) = env_flag("MEMSIM_VERBOSE") {
            self.verbose = verbose;
        }
        if let Some(verify) = env_flag("MEMSIM_VERIFY") {
            self.verify_invariants = verify;
        }
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_verify_invariants(mut self, verify: bool) -> Self {
        self.verify_invariants = verify;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
