//! HTTP server for the Prometheus metrics endpoint.
//!
//! Runs on a separate tokio task and serves `/metrics` for Prometheus scraping.

use axum::{Router, extract::State, routing::get};
use std::net::SocketAddr;

use crate::stats::SharedStats;

/// GET /metrics: refresh the graph-size gauges, then render everything.
async fn metrics_handler(State(stats): State<SharedStats>) -> String {
    crate::metrics::set_graph_size(&stats.read());
    crate::metrics::gather_metrics()
}

/// Build the metrics router.
pub fn router(stats: SharedStats) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(stats)
}

/// Run the HTTP server for Prometheus metrics.
///
/// Binds to `0.0.0.0:port`. This is a long-running task that should be
/// spawned in the background; bind failures are logged, not fatal.
pub async fn run_http_server(port: u16, stats: SharedStats) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind metrics endpoint");
            return;
        }
    };
    tracing::info!(%addr, "Prometheus HTTP server listening");

    if let Err(e) = axum::serve(listener, router(stats)).await {
        tracing::error!(error = %e, "HTTP server error");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Stats;
    use chanstat_proto::MessageKind;
    use chrono::Utc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn metrics_endpoint_reports_graph_size() {
        crate::metrics::init();
        let stats = Stats::new().into_shared();
        stats
            .write()
            .add_message(MessageKind::Join, "net", "#c", "n!u@h", Utc::now(), "");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router(stats)).await;
        });

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /metrics HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("chanstat_channels"));
    }
}
