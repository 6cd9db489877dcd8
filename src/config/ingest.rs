//! Event ingestion configuration.

use serde::Deserialize;

/// Ingestion configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    /// Network name assigned to every line read from stdin (default: "default").
    #[serde(default = "default_network")]
    pub network: String,
    /// Maximum lines ingested under one write lock (default: 64).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            batch_size: default_batch_size(),
        }
    }
}

fn default_network() -> String {
    "default".to_string()
}

fn default_batch_size() -> usize {
    64
}
