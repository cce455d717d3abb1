//! Prometheus metrics for the provider bootstrap.
//!
//! The registered series:
//! - `<ns>_provider_init_total` (counter) - initialization attempts by result
//! - `<ns>_provider_init_duration_seconds` (histogram) - initialization duration
//! - `<ns>_config_sources` (gauge) - number of configuration sources merged
//!
//! The CSI operation metrics themselves belong to the RPC layer, not here;
//! this set only makes the bootstrap path observable.

use prometheus::{CounterVec, Gauge, Histogram, HistogramOpts, Opts, Registry};
use std::sync::Arc;

use crate::error::{DriverError, Result};

/// Metrics covering the one-time provider initialization.
pub struct BootstrapMetrics {
    /// Initialization attempts (by result: success/error)
    init_total: CounterVec,

    /// Initialization duration in seconds
    init_duration_seconds: Histogram,

    /// Number of configuration sources merged on the last attempt
    config_sources: Gauge,
}

impl BootstrapMetrics {
    /// Create the metric set under `namespace` and register it.
    pub fn new(namespace: &str, registry: &Registry) -> Result<Self> {
        let init_total = CounterVec::new(
            Opts::new(
                "provider_init_total",
                "Provider initialization attempts by result",
            )
            .namespace(namespace.to_string()),
            &["result"],
        )?;

        let init_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "provider_init_duration_seconds",
                "Provider initialization duration in seconds",
            )
            .namespace(namespace.to_string())
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]),
        )?;

        let config_sources = Gauge::with_opts(
            Opts::new(
                "config_sources",
                "Number of configuration sources merged into the driver config",
            )
            .namespace(namespace.to_string()),
        )?;

        registry.register(Box::new(init_total.clone()))?;
        registry.register(Box::new(init_duration_seconds.clone()))?;
        registry.register(Box::new(config_sources.clone()))?;

        Ok(Self {
            init_total,
            init_duration_seconds,
            config_sources,
        })
    }

    /// Record one initialization attempt and its duration.
    pub fn record_init(&self, success: bool, duration_secs: f64) {
        let result = if success { "success" } else { "error" };
        self.init_total.with_label_values(&[result]).inc();
        self.init_duration_seconds.observe(duration_secs);
    }

    /// Record how many configuration sources fed the merge.
    pub fn set_config_sources(&self, count: usize) {
        self.config_sources.set(count as f64);
    }
}

/// Registry wrapper owning the bootstrap metric set.
pub struct MetricsRegistry {
    registry: Arc<Registry>,
    bootstrap: BootstrapMetrics,
}

impl MetricsRegistry {
    /// Create a registry and register the bootstrap metrics under
    /// `namespace`. Dashes in the namespace are mapped to underscores so
    /// deployment names stay valid metric prefixes.
    pub fn new(namespace: &str) -> Result<Self> {
        let namespace = namespace.replace('-', "_");
        let registry = Arc::new(Registry::new());
        let bootstrap = BootstrapMetrics::new(&namespace, &registry)?;

        #[cfg(target_os = "linux")]
        registry.register(Box::new(
            prometheus::process_collector::ProcessCollector::for_self(),
        ))?;

        Ok(Self {
            registry,
            bootstrap,
        })
    }

    /// The underlying prometheus registry.
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Bootstrap metric set.
    pub fn bootstrap(&self) -> &BootstrapMetrics {
        &self.bootstrap
    }

    /// Gather all metrics in prometheus wire format.
    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Encode metrics as text for scraping.
    pub fn encode_text(&self) -> Result<String> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| DriverError::Metrics(e.to_string()))
    }
}
