//! Snapshot scheduling for the daemon.
//!
//! Saving takes a read guard on the shared graph, which is enough to keep
//! writers out for the duration of the write. The file I/O runs on the
//! blocking pool.

use flate2::Compression;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{error, info};

use crate::error::SnapshotError;
use crate::metrics;
use crate::stats::SharedStats;

/// Writes snapshots of a shared graph to one path.
#[derive(Clone)]
pub struct SnapshotWriter {
    stats: SharedStats,
    path: PathBuf,
    level: Compression,
}

impl SnapshotWriter {
    pub fn new(stats: SharedStats, path: impl Into<PathBuf>, level: Compression) -> Self {
        Self {
            stats,
            path: path.into(),
            level,
        }
    }

    /// Save synchronously, recording metrics for the attempt.
    pub fn save_now(&self) -> Result<(), SnapshotError> {
        let start = Instant::now();
        let result = {
            let stats = self.stats.read();
            stats.save_with(&self.path, self.level)
        };
        let elapsed = start.elapsed().as_secs_f64();

        match &result {
            Ok(()) => metrics::record_save("ok", elapsed),
            Err(e) => {
                metrics::record_save(e.error_code(), elapsed);
                error!(path = %self.path.display(), error = %e, "Snapshot save failed");
            }
        }
        result
    }

    /// Save on the blocking pool.
    pub async fn save(&self) -> Result<(), SnapshotError> {
        let writer = self.clone();
        tokio::task::spawn_blocking(move || writer.save_now())
            .await
            .map_err(|e| SnapshotError::Io(std::io::Error::other(e)))?
    }

    /// Save every `interval` until `shutdown` flips to `true`.
    ///
    /// Failed saves are logged and retried at the next tick.
    pub async fn run_periodic(self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.save().await.is_ok() {
                        info!(path = %self.path.display(), "Periodic snapshot saved");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}
