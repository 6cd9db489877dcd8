//! chanstatd - reads raw IRC lines from stdin and keeps running statistics.

use anyhow::Context;
use chanstat::config::{self, Config};
use chanstat::stats::Stats;
use chanstat::{Ingester, SnapshotWriter, http, metrics};
use std::path::Path;
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "chanstat.toml".to_string());

    let config = if Path::new(&config_path).exists() {
        Config::load(&config_path).map_err(|e| {
            error!(path = %config_path, error = %e, "Failed to load config");
            e
        })?
    } else {
        warn!(path = %config_path, "Config file not found, using defaults");
        Config::default()
    };

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        network = %config.ingest.network,
        snapshot = %config.snapshot.path,
        casemapping = %config.stats.casemapping,
        "Starting chanstatd"
    );

    metrics::init();

    let mut stats = Stats::load(&config.snapshot.path).map_err(|e| {
        error!(
            path = %config.snapshot.path,
            code = e.error_code(),
            error = %e,
            "Failed to load snapshot"
        );
        e
    })?;
    if stats.network_count() == 0 && stats.casemapping() != config.stats.casemapping {
        stats = Stats::with_casemapping(config.stats.casemapping);
    }
    let stats = stats.into_shared();

    // Convention: port 0 disables the endpoint.
    match config.metrics.port {
        Some(0) | None => info!("Prometheus HTTP server disabled"),
        Some(port) => {
            let stats = stats.clone();
            tokio::spawn(async move {
                http::run_http_server(port, stats).await;
            });
            info!(port, "Prometheus HTTP server started");
        }
    }

    let writer = SnapshotWriter::new(
        stats.clone(),
        config.snapshot.path.clone(),
        config.snapshot.compression(),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let saver = tokio::spawn(
        writer
            .clone()
            .run_periodic(config.snapshot.interval(), shutdown_rx),
    );

    let ingester = Ingester::new(stats.clone(), config.ingest.network.clone());
    let ingest_result = tokio::select! {
        result = ingester.run(tokio::io::stdin(), config.ingest.batch_size) => {
            result.map(|report| {
                info!(
                    ingested = report.ingested,
                    rejected = report.rejected,
                    "Input exhausted"
                );
            })
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            Ok(())
        }
    };
    if let Err(e) = &ingest_result {
        error!(error = %e, "Reading stdin failed, saving what was ingested");
    }

    let _ = shutdown_tx.send(true);
    if let Err(e) = saver.await {
        warn!(error = %e, "Periodic saver task failed");
    }

    writer.save().await.context("final snapshot save")?;
    info!(path = %config.snapshot.path, "Final snapshot saved");
    ingest_result.context("reading stdin")?;

    let stats = stats.read();
    for network in stats.networks() {
        let urls: Vec<String> = network
            .top_urls(config.stats.top_n)
            .into_iter()
            .map(|t| format!("{} ({})", t.token, t.count))
            .collect();
        let words: Vec<String> = network
            .top_words(config.stats.top_n)
            .into_iter()
            .map(|t| format!("{} ({})", t.token, t.count))
            .collect();
        info!(
            network = %network.name,
            messages = network.message_count(),
            top_urls = %urls.join(", "),
            top_words = %words.join(", "),
            "Network summary"
        );
    }

    Ok(())
}
