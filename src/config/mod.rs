//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: The root [`Config`] plus stats and metrics sections
//! - [`snapshot`]: Snapshot persistence configuration (SnapshotConfig)
//! - [`ingest`]: Event ingestion configuration (IngestConfig)
//! - [`validation`]: Startup validation

mod ingest;
mod snapshot;
mod types;
mod validation;

pub use ingest::IngestConfig;
pub use snapshot::SnapshotConfig;
pub use types::{Config, ConfigError, MetricsConfig, StatsConfig};
pub use validation::{ValidationError, validate};
