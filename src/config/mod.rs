//! Configuration management for unlockr
//!
//! Settings are layered with figment (see [`loader`]) and extracted into the
//! typed sections below, which then produce a validated [`SearchConfig`].

pub mod loader;

use crate::search::{Alphabet, ConfigError, SearchConfig, default_workers};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure for unlockr
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockrConfig {
    pub search: SearchSection,
    pub progress: ProgressSection,
    pub validator: ValidatorSection,
}

/// Candidate space and pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    /// Preset name or literal characters
    pub charset: String,

    pub min_length: usize,

    pub max_length: usize,

    pub queue_capacity: usize,

    /// Worker threads (absent = half the CPU cores)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,

    #[serde(default = "default_push_poll_ms")]
    pub push_poll_ms: u64,
}

fn default_push_poll_ms() -> u64 {
    50
}

/// Progress reporting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    pub interval_ms: u64,
}

fn default_enabled() -> bool {
    true
}

/// Which validator the `crack` command binds to the target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorSection {
    pub kind: ValidatorKind,

    /// Program template for the `command` validator
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ValidatorKind {
    /// Target file holds a hex SHA-256 digest of the password
    Digest,
    /// External program decides; exit status 0 means unlocked
    Command,
}

impl UnlockrConfig {
    /// Build and validate the engine configuration.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        let search = &self.search;
        let config = SearchConfig {
            alphabet: Alphabet::from_spec(&search.charset)?,
            min_length: search.min_length,
            max_length: search.max_length,
            queue_capacity: search.queue_capacity,
            workers: search.workers.unwrap_or_else(default_workers),
            progress_interval: Duration::from_millis(self.progress.interval_ms),
            push_poll: Duration::from_millis(search.push_poll_ms),
        };
        config.validate()?;
        Ok(config)
    }
}
