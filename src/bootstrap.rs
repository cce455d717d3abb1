//! Process bootstrap: configuration sources and the provider singleton.
//!
//! [`ProviderContext`] is the explicit context object the rest of the driver
//! is handed at startup. It owns the ordered configuration-file list and a
//! once-only cell holding the provider outcome; there are no ambient
//! globals. The expensive merge-and-connect path runs at most once no
//! matter how many request handlers ask for the provider concurrently, and
//! its outcome - success or failure - is the permanent answer for this
//! context's lifetime.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, OnceCell};

use crate::config::Config;
use crate::error::{DriverError, Result};
use crate::provider::Provider;
use crate::telemetry::{spawn_metrics_listener, MetricsRegistry};

/// Owner of the configuration-source list and the lazily built provider.
pub struct ProviderContext {
    config_files: Vec<PathBuf>,
    metrics: Option<Arc<MetricsRegistry>>,
    provider: OnceCell<Result<Arc<Provider>>>,
}

impl ProviderContext {
    /// Create a context over an ordered list of configuration files.
    pub fn new(config_files: Vec<PathBuf>) -> Self {
        Self {
            config_files,
            metrics: None,
            provider: OnceCell::new(),
        }
    }

    /// Create the context and bring up telemetry, as done once at process
    /// start: registers the namespaced bootstrap metrics and, when
    /// `http_endpoint` is set, starts the scrape listener. Listener
    /// failures arrive on `fatal_tx`.
    pub fn init(
        config_files: Vec<PathBuf>,
        metrics_namespace: &str,
        http_endpoint: Option<String>,
        fatal_tx: mpsc::Sender<DriverError>,
    ) -> Result<(Self, Arc<MetricsRegistry>)> {
        let registry = Arc::new(MetricsRegistry::new(metrics_namespace)?);
        spawn_metrics_listener(Arc::clone(&registry), http_endpoint, fatal_tx);

        let mut context = Self::new(config_files);
        context.metrics = Some(Arc::clone(&registry));

        tracing::info!(
            config_files = ?context.config_files,
            "provider bootstrap initialized"
        );
        Ok((context, registry))
    }

    /// Ordered configuration sources this context merges.
    pub fn config_files(&self) -> &[PathBuf] {
        &self.config_files
    }

    /// Get the shared provider, building it on first call.
    ///
    /// All concurrent callers await the same initialization; every caller
    /// receives a clone of the stored outcome - the identical `Arc` on
    /// success, an equal error value on failure. The first outcome is never
    /// recomputed, so a failed initialization stays failed for this
    /// context's lifetime.
    pub async fn get_provider(&self) -> Result<Arc<Provider>> {
        self.provider
            .get_or_init(|| async { self.create_provider() })
            .await
            .clone()
    }

    fn create_provider(&self) -> Result<Arc<Provider>> {
        tracing::info!(sources = self.config_files.len(), "creating backend provider");
        let started = Instant::now();

        let outcome = Config::from_files(&self.config_files)
            .and_then(|cfg| Provider::build(&cfg).map(Arc::new));

        if let Some(metrics) = &self.metrics {
            metrics.bootstrap().set_config_sources(self.config_files.len());
            metrics
                .bootstrap()
                .record_init(outcome.is_ok(), started.elapsed().as_secs_f64());
        }

        match &outcome {
            Ok(_) => tracing::info!("backend provider ready"),
            Err(err) => tracing::error!(error = %err, "backend provider creation failed"),
        }
        outcome
    }
}
