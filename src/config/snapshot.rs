//! Snapshot persistence configuration.

use flate2::Compression;
use serde::Deserialize;
use std::time::Duration;

/// Snapshot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotConfig {
    /// Snapshot file path (default: "stats.db").
    #[serde(default = "default_snapshot_path")]
    pub path: String,
    /// Seconds between periodic saves (default: 300).
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// gzip level, 0-9 (default: 6).
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: default_snapshot_path(),
            interval_secs: default_interval_secs(),
            compression_level: default_compression_level(),
        }
    }
}

impl SnapshotConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn compression(&self) -> Compression {
        Compression::new(self.compression_level.min(9))
    }
}

fn default_snapshot_path() -> String {
    "stats.db".to_string()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_compression_level() -> u32 {
    6
}
