//! Error types for the bootstrap layer.
//!
//! Every failure that can escape this crate is a [`DriverError`]. The
//! variants map onto the failure domains of the bootstrap: configuration
//! sources, backend connectivity, and the metrics listener. The enum is
//! `Clone` and `PartialEq` because the provider singleton caches its first
//! outcome and re-surfaces the identical error to every later caller.

use thiserror::Error;

/// Main error type for bootstrap operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// A configuration source could not be opened or parsed
    #[error("config source {path}: {reason}")]
    ConfigSource { path: String, reason: String },

    /// The backend session or a required sub-client could not be constructed
    #[error("backend connection failed: {0}")]
    Connection(String),

    /// The metrics listener could not bind or serve
    #[error("metrics listener on {addr}: {reason}")]
    MetricsBind { addr: String, reason: String },

    /// A metric could not be registered or encoded
    #[error("metrics error: {0}")]
    Metrics(String),
}

impl DriverError {
    /// Create a config source error for the given path
    pub fn config_source(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DriverError::ConfigSource {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        DriverError::Connection(msg.into())
    }

    /// Create a metrics bind error for the given address
    pub fn metrics_bind(addr: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        DriverError::MetricsBind {
            addr: addr.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error should terminate the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, DriverError::MetricsBind { .. })
    }
}

impl From<prometheus::Error> for DriverError {
    fn from(err: prometheus::Error) -> Self {
        DriverError::Metrics(err.to_string())
    }
}

/// Result type alias for bootstrap operations
pub type Result<T> = std::result::Result<T, DriverError>;
