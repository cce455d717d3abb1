//! Bootstrap telemetry.
//!
//! - `metrics` - prometheus registry and the bootstrap metric set
//! - `server` - detached `/metrics` scrape listener with a fatal-error channel

pub mod metrics;
pub mod server;

pub use metrics::{BootstrapMetrics, MetricsRegistry};
pub use server::spawn_metrics_listener;
