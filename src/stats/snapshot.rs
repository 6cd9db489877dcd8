//! Snapshot persistence: the whole graph as gzip-compressed MessagePack.
//!
//! Writes go to a temp file that is renamed over the snapshot, so a crash
//! mid-save leaves the previous snapshot intact. Name indexes are never
//! written; they are rebuilt after decoding.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::Stats;
use crate::error::SnapshotError;

impl Stats {
    /// Load a snapshot, or start empty if none exists.
    ///
    /// A missing file is a cold start, not an error. A file that exists but
    /// cannot be decoded, or decodes into an inconsistent graph, is an error
    /// the caller must not ignore.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SnapshotError> {
        let path = path.as_ref();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "No snapshot found, starting empty");
                return Ok(Self::new());
            }
            Err(e) => return Err(e.into()),
        };

        let reader = GzDecoder::new(BufReader::new(file));
        let mut stats: Stats = rmp_serde::from_read(reader)?;
        stats.rebuild_indexes()?;

        info!(
            path = %path.display(),
            networks = stats.network_count(),
            channels = stats.channel_count(),
            users = stats.user_count(),
            messages = stats.message_count(),
            "Snapshot loaded"
        );
        Ok(stats)
    }

    /// Save a snapshot with the default compression level.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SnapshotError> {
        self.save_with(path, Compression::default())
    }

    /// Save a snapshot, replacing any previous one atomically.
    ///
    /// On failure the previous snapshot (if any) is left in place and the
    /// in-memory graph is unaffected.
    pub fn save_with<P: AsRef<Path>>(
        &self,
        path: P,
        level: Compression,
    ) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        let temp_path = temp_path_for(path);

        let result = write_snapshot(self, &temp_path, level)
            .and_then(|()| fs::rename(&temp_path, path).map_err(SnapshotError::from));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        debug!(path = %path.display(), messages = self.message_count(), "Snapshot saved");
        Ok(())
    }
}

/// `<path>.tmp`, keeping the full file name so distinct snapshots never
/// share a temp file.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_snapshot(stats: &Stats, path: &Path, level: Compression) -> Result<(), SnapshotError> {
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), level);
    rmp_serde::encode::write_named(&mut encoder, stats)?;
    let mut writer = encoder.finish()?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}
