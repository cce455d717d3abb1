//! Metrics scrape endpoint.
//!
//! The listener runs as a detached task decoupled from the request path.
//! An unreachable metrics endpoint is a deployment misconfiguration, so
//! bind and serve failures are fatal to the process - but the task does not
//! exit the process itself; it reports over the fatal channel and the
//! binary decides.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Router};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::metrics::MetricsRegistry;
use crate::error::DriverError;

/// Start serving `GET /metrics` on `bind_addr`.
///
/// A `None` or empty address means no listener; that is not an error. Any
/// failure to bind or serve is delivered as [`DriverError::MetricsBind`]
/// on `fatal_tx`.
pub fn spawn_metrics_listener(
    registry: Arc<MetricsRegistry>,
    bind_addr: Option<String>,
    fatal_tx: mpsc::Sender<DriverError>,
) {
    let Some(addr) = bind_addr.filter(|a| !a.is_empty()) else {
        tracing::info!("no metrics endpoint configured, scrape listener not started");
        return;
    };

    tokio::spawn(async move {
        if let Err(err) = serve(registry, &addr).await {
            tracing::error!(addr = %addr, error = %err, "metrics listener failed");
            let _ = fatal_tx.send(err).await;
        }
    });
}

async fn serve(registry: Arc<MetricsRegistry>, addr: &str) -> Result<(), DriverError> {
    let router = Router::new()
        .route("/metrics", get(scrape))
        .with_state(registry);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| DriverError::metrics_bind(addr, e))?;

    tracing::info!(addr = %addr, "metrics available at /metrics");

    axum::serve(listener, router)
        .await
        .map_err(|e| DriverError::metrics_bind(addr, e))
}

async fn scrape(State(registry): State<Arc<MetricsRegistry>>) -> impl IntoResponse {
    match registry.encode_text() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbindable_address_reports_on_fatal_channel() {
        let registry = Arc::new(MetricsRegistry::new("test_ns").unwrap());
        let (fatal_tx, mut fatal_rx) = mpsc::channel(1);

        spawn_metrics_listener(registry, Some("999.999.999.999:1".to_string()), fatal_tx);

        let err = fatal_rx.recv().await.expect("fatal error delivered");
        assert!(matches!(err, DriverError::MetricsBind { .. }));
    }

    #[tokio::test]
    async fn test_empty_address_starts_nothing() {
        let registry = Arc::new(MetricsRegistry::new("test_ns").unwrap());
        let (fatal_tx, mut fatal_rx) = mpsc::channel(1);

        spawn_metrics_listener(registry, Some(String::new()), fatal_tx);

        // The sender is dropped without spawning, so the channel closes
        // instead of carrying an error.
        assert!(fatal_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_no_address_starts_nothing() {
        let registry = Arc::new(MetricsRegistry::new("test_ns").unwrap());
        let (fatal_tx, mut fatal_rx) = mpsc::channel(1);

        spawn_metrics_listener(registry, None, fatal_tx);
        assert!(fatal_rx.recv().await.is_none());
    }
}
