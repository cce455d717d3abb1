//! Backend provider handle and factory.
//!
//! The provider wraps the three service sub-clients plus the resolved
//! block-storage and metadata options. It is constructed once per process
//! and read-only afterwards; callers share it behind an `Arc` handed out by
//! [`crate::bootstrap::ProviderContext`].

use crate::client::{BackendSession, ServiceClient};
use crate::config::{BlockStorageOpts, Config, MetadataOpts};
use crate::error::{DriverError, Result};

/// Capability handle over the storage backend.
#[derive(Debug)]
pub struct Provider {
    compute: ServiceClient,
    block_storage: ServiceClient,
    portal: ServiceClient,
    bs_opts: BlockStorageOpts,
    metadata_opts: MetadataOpts,
}

impl Provider {
    /// Construct the provider from a merged configuration.
    ///
    /// The authenticated session is a precondition for everything else and
    /// gates the whole factory. The three sub-clients are each attempted
    /// regardless of the others' outcome, so a single error reports every
    /// bad endpoint at once.
    pub fn build(cfg: &Config) -> Result<Self> {
        let session = BackendSession::connect(&cfg.global)?;

        let compute = ServiceClient::new(session.clone(), &cfg.global.compute_url);
        let block_storage = ServiceClient::new(session.clone(), &cfg.global.blockstorage_url);
        let portal = ServiceClient::new(session, &cfg.global.portal_url);

        let mut failures = Vec::new();
        for (service, result) in [
            ("compute", &compute),
            ("blockstorage", &block_storage),
            ("portal", &portal),
        ] {
            if let Err(err) = result {
                tracing::warn!(service, error = %err, "service client construction failed");
                failures.push(format!("{service}: {err}"));
            }
        }
        if !failures.is_empty() {
            return Err(DriverError::connection(failures.join("; ")));
        }

        tracing::info!(
            search_order = %cfg.metadata.search_order,
            "backend provider constructed"
        );

        Ok(Self {
            compute: compute?,
            block_storage: block_storage?,
            portal: portal?,
            bs_opts: cfg.block_storage.clone(),
            metadata_opts: cfg.metadata.clone(),
        })
    }

    /// Compute service client.
    pub fn compute(&self) -> &ServiceClient {
        &self.compute
    }

    /// Block-storage service client.
    pub fn block_storage(&self) -> &ServiceClient {
        &self.block_storage
    }

    /// Portal service client.
    pub fn portal(&self) -> &ServiceClient {
        &self.portal
    }

    /// Resolved block-storage options.
    pub fn bs_opts(&self) -> &BlockStorageOpts {
        &self.bs_opts
    }

    /// Resolved metadata-lookup options.
    pub fn metadata_opts(&self) -> &MetadataOpts {
        &self.metadata_opts
    }

    /// Per-node volume attach limit; `None` means unlimited.
    pub fn volume_attach_limit(&self) -> Option<i64> {
        if self.bs_opts.node_volume_attach_limit > 0 {
            Some(self.bs_opts.node_volume_attach_limit)
        } else {
            None
        }
    }
}
