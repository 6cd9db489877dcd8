//! Core configuration types and loading.

use chanstat_proto::CaseMapping;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use super::ingest::IngestConfig;
use super::snapshot::SnapshotConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Daemon configuration. Every section has defaults, so an empty file is
/// a valid configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Snapshot persistence.
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    /// Event ingestion.
    #[serde(default)]
    pub ingest: IngestConfig,
    /// Aggregation behaviour.
    #[serde(default)]
    pub stats: StatsConfig,
    /// Prometheus endpoint.
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Aggregation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Case mapping for new graphs. A loaded snapshot keeps its own.
    #[serde(default)]
    pub casemapping: CaseMapping,
    /// How many entries the shutdown leaderboard shows (default: 10).
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            casemapping: CaseMapping::default(),
            top_n: default_top_n(),
        }
    }
}

fn default_top_n() -> usize {
    10
}

/// Prometheus metrics configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsConfig {
    /// Port for the `/metrics` endpoint; disabled when unset.
    pub port: Option<u16>,
}
