//! Prometheus metrics for chanstat.
//!
//! - `chanstat_messages_total{kind}` - Events ingested by kind
//! - `chanstat_parse_errors_total` - Lines that did not parse into an event
//! - `chanstat_snapshot_saves_total{result}` - Snapshot saves by outcome
//! - `chanstat_snapshot_save_seconds` - Snapshot save latency
//! - `chanstat_networks` / `chanstat_channels` / `chanstat_users` - Graph size

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

use crate::stats::Stats;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Events ingested, by kind.
pub static MESSAGES_INGESTED: OnceLock<IntCounterVec> = OnceLock::new();

/// Lines rejected by the event parser.
pub static PARSE_ERRORS: OnceLock<IntCounter> = OnceLock::new();

/// Snapshot saves, by result (`ok` or an error code).
pub static SNAPSHOT_SAVES: OnceLock<IntCounterVec> = OnceLock::new();

/// Snapshot save latency.
pub static SNAPSHOT_SAVE_LATENCY: OnceLock<Histogram> = OnceLock::new();

pub static NETWORKS: OnceLock<IntGauge> = OnceLock::new();
pub static CHANNELS: OnceLock<IntGauge> = OnceLock::new();
pub static USERS: OnceLock<IntGauge> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Must be called once at startup before any metrics are recorded. Calling
/// it again is harmless.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(
                        metric = stringify!($metric),
                        error = %e,
                        "Failed to register metric"
                    );
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(
        MESSAGES_INGESTED,
        IntCounterVec::new(
            Opts::new("chanstat_messages_total", "Events ingested by kind"),
            &["kind"]
        )
    );
    register!(
        PARSE_ERRORS,
        IntCounter::new("chanstat_parse_errors_total", "Lines that failed to parse")
    );
    register!(
        SNAPSHOT_SAVES,
        IntCounterVec::new(
            Opts::new("chanstat_snapshot_saves_total", "Snapshot saves by result"),
            &["result"]
        )
    );
    register!(
        SNAPSHOT_SAVE_LATENCY,
        Histogram::with_opts(
            HistogramOpts::new("chanstat_snapshot_save_seconds", "Snapshot save latency")
                .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0])
        )
    );
    register!(NETWORKS, IntGauge::new("chanstat_networks", "Networks tracked"));
    register!(CHANNELS, IntGauge::new("chanstat_channels", "Channels tracked"));
    register!(USERS, IntGauge::new("chanstat_users", "Users tracked"));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Record one ingested event.
#[inline]
pub fn record_message(kind: &str) {
    if let Some(c) = MESSAGES_INGESTED.get() {
        c.with_label_values(&[kind]).inc();
    }
}

#[inline]
pub fn record_parse_error() {
    if let Some(c) = PARSE_ERRORS.get() {
        c.inc();
    }
}

/// Record a snapshot save attempt and how long it took.
pub fn record_save(result: &str, duration_secs: f64) {
    if let Some(c) = SNAPSHOT_SAVES.get() {
        c.with_label_values(&[result]).inc();
    }
    if let Some(h) = SNAPSHOT_SAVE_LATENCY.get() {
        h.observe(duration_secs);
    }
}

/// Refresh the graph-size gauges.
pub fn set_graph_size(stats: &Stats) {
    let gauges = [
        (&NETWORKS, stats.network_count()),
        (&CHANNELS, stats.channel_count()),
        (&USERS, stats.user_count()),
    ];
    for (gauge, count) in gauges {
        if let Some(g) = gauge.get() {
            g.set(count as i64);
        }
    }
}
