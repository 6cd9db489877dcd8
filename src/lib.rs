//! chanstat - IRC channel statistics aggregator.
//!
//! Observed IRC events fold into a graph of networks, channels, users and
//! per-channel user aggregates. Every node carries text counters and, where
//! it makes sense, URL and word frequency trackers. The graph persists as a
//! compressed snapshot and is restored with its lookup indexes rebuilt.

pub mod config;
pub mod error;
pub mod http;
pub mod ingest;
pub mod metrics;
pub mod persist;
pub mod stats;

pub use chanstat_proto as proto;
pub use error::SnapshotError;
pub use ingest::{IngestReport, Ingester};
pub use persist::SnapshotWriter;
pub use stats::{SharedStats, Stats};
