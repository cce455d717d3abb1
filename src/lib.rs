//! Block-storage CSI plugin bootstrap.
//!
//! This crate is the layer underneath the CSI RPC services: it merges the
//! driver's configuration sources, builds the backend provider exactly once
//! per process no matter how many request handlers race for it, and exposes
//! the bootstrap over a prometheus scrape endpoint.
//!
//! ## Features
//!
//! - **Ordered config merge**: later TOML sources override earlier ones
//!   field by field; any unreadable source aborts the merge
//! - **One-time provider construction**: all concurrent callers await a
//!   single initialization and share the resulting handle (or its error)
//! - **Sub-clients**: compute, block-storage and portal clients sharing one
//!   authenticated session
//! - **Metrics**: namespaced prometheus series served on an optional
//!   `/metrics` endpoint; a listener that cannot bind is fatal
//! - **Paging normalization**: raw client `(limit, starting_token)` pairs
//!   become safe `(page, size)` parameters
//!
//! ## Architecture
//!
//! 1. **Config** (`config`): data model and ordered field-level merge.
//! 2. **Client** (`client`): authenticated session and per-service clients.
//! 3. **Provider** (`provider`): read-only capability handle and factory.
//! 4. **Bootstrap** (`bootstrap`): the process-owned context holding the
//!    source list and the once-only provider cell.
//! 5. **Telemetry** (`telemetry`): bootstrap metrics and scrape listener.
//! 6. **Paging** (`paging`): pure pagination normalization.
//!
//! ## Example
//!
//! ```rust,no_run
//! use blockstorage_csi::ProviderContext;
//! use tokio::sync::mpsc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let (fatal_tx, _fatal_rx) = mpsc::channel(1);
//! let (context, _metrics) = ProviderContext::init(
//!     vec!["/etc/csi/driver.toml".into()],
//!     "blockstorage_csi",
//!     Some("0.0.0.0:9808".to_string()),
//!     fatal_tx,
//! )?;
//!
//! let provider = context.get_provider().await?;
//! let _volumes = provider.block_storage();
//! # Ok(())
//! # }
//! ```

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod paging;
pub mod provider;
pub mod telemetry;

pub use bootstrap::ProviderContext;
pub use config::{AuthOpts, BlockStorageOpts, Config, MetadataOpts};
pub use error::{DriverError, Result};
pub use paging::{normalize_paging, DEFAULT_FIRST_PAGE, DEFAULT_PAGE_SIZE};
pub use provider::Provider;
