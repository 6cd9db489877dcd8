//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("snapshot.path is required")]
    MissingSnapshotPath,
    #[error("snapshot.path parent directory does not exist: {0}")]
    SnapshotPathInvalid(String),
    #[error("snapshot.interval_secs must be at least 1")]
    ZeroInterval,
    #[error("snapshot.compression_level must be 0-9, got {0}")]
    InvalidCompressionLevel(u32),
    #[error("ingest.network is required")]
    MissingNetworkName,
    #[error("ingest.batch_size must be at least 1")]
    ZeroBatchSize,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let snapshot = &config.snapshot;
    if snapshot.path.is_empty() {
        errors.push(ValidationError::MissingSnapshotPath);
    } else if let Some(parent) = Path::new(&snapshot.path).parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        errors.push(ValidationError::SnapshotPathInvalid(snapshot.path.clone()));
    }
    if snapshot.interval_secs == 0 {
        errors.push(ValidationError::ZeroInterval);
    }
    if snapshot.compression_level > 9 {
        errors.push(ValidationError::InvalidCompressionLevel(
            snapshot.compression_level,
        ));
    }

    if config.ingest.network.trim().is_empty() {
        errors.push(ValidationError::MissingNetworkName);
    }
    if config.ingest.batch_size == 0 {
        errors.push(ValidationError::ZeroBatchSize);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
