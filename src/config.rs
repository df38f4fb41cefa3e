use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;

/// Engine-wide settings. Every field has a working default so embedders can
/// start with `EngineConfig::default()` and override from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Host directory where submissions are staged before transfer.
    pub staging_root: PathBuf,
    /// Applied when a submission carries no time limit of its own.
    pub default_time_limit_ms: u64,
    /// Upper bound on in-flight executions per language. All submissions for
    /// a language share one warm environment and its resource ceiling; this
    /// cap is what keeps them from starving each other.
    pub max_concurrent_per_language: usize,
    /// Extra wall-clock granted to the outer watchdog beyond the
    /// in-environment timeout.
    pub watchdog_grace_ms: u64,
    /// Wall-clock bound on a language-level compile step.
    pub compile_timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            staging_root: std::env::temp_dir().join("judge-staging"),
            default_time_limit_ms: 2_000,
            max_concurrent_per_language: 4,
            watchdog_grace_ms: 2_000,
            compile_timeout_ms: 30_000,
        }
    }
}

impl EngineConfig {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::Config(e.to_string()))
    }
}
