//! Driver configuration: data model and ordered-source merge.
//!
//! Configuration arrives as an ordered list of TOML files with three tables:
//! `[Global]` (credentials and service endpoint URLs), `[Metadata]`
//! (metadata lookup strategy) and `[BlockStorage]` (volume behavior).
//! Files are merged in the order given: a field present in a later file
//! overwrites the same field from an earlier one, fields absent from every
//! file keep their zero value. A source that cannot be opened or parsed
//! aborts the whole merge; no partial result escapes.

use serde::Deserialize;
use std::path::Path;

use crate::error::{DriverError, Result};

/// Metadata source served from the instance's config drive.
pub const CONFIG_DRIVE_ID: &str = "configDrive";

/// Metadata source served from the metadata service endpoint.
pub const METADATA_ID: &str = "metadataService";

/// Authentication and endpoint options from the `[Global]` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthOpts {
    pub client_id: String,
    pub client_secret: String,
    pub identity_url: String,
    pub compute_url: String,
    pub blockstorage_url: String,
    pub portal_url: String,
}

/// Metadata-lookup options from the `[Metadata]` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataOpts {
    /// Ordered, comma-separated list of metadata sources to consult.
    /// Defaults to config drive first, then the metadata service.
    pub search_order: String,
}

/// Block-storage behavior from the `[BlockStorage]` table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockStorageOpts {
    /// Maximum volumes attachable to one node; unset or <= 0 means unlimited.
    pub node_volume_attach_limit: i64,
    pub rescan_on_resize: bool,
    /// Ignore the volume's availability zone when attaching to a node.
    pub ignore_volume_az: bool,
    pub ignore_volume_microversion: bool,
}

/// Fully merged driver configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub global: AuthOpts,
    pub metadata: MetadataOpts,
    pub block_storage: BlockStorageOpts,
}

// Overlay mirrors of the config model. Every field is an Option so that a
// key's presence in a file is distinguishable from its zero value, which is
// what makes the field-level merge work.

#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    #[serde(rename = "Global", default)]
    global: Option<AuthOverlay>,
    #[serde(rename = "Metadata", default)]
    metadata: Option<MetadataOverlay>,
    #[serde(rename = "BlockStorage", default)]
    block_storage: Option<BlockStorageOverlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct AuthOverlay {
    client_id: Option<String>,
    client_secret: Option<String>,
    identity_url: Option<String>,
    compute_url: Option<String>,
    blockstorage_url: Option<String>,
    portal_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct MetadataOverlay {
    search_order: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BlockStorageOverlay {
    node_volume_attach_limit: Option<i64>,
    rescan_on_resize: Option<bool>,
    ignore_volume_az: Option<bool>,
    ignore_volume_microversion: Option<bool>,
}

impl Config {
    /// Read and merge all configuration sources in order.
    ///
    /// Later files override earlier ones field by field. After the merge an
    /// empty metadata search order is defaulted to
    /// `configDrive,metadataService`. Emits a redacted summary of the
    /// resolved configuration.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut cfg = Config::default();

        for path in paths {
            let path = path.as_ref();
            let raw = std::fs::read_to_string(path).map_err(|e| {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "failed to open configuration source"
                );
                DriverError::config_source(path.display().to_string(), e)
            })?;

            let overlay: ConfigOverlay = toml::from_str(&raw).map_err(|e| {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse configuration source"
                );
                DriverError::config_source(path.display().to_string(), e)
            })?;

            cfg.apply(overlay);
        }

        if cfg.metadata.search_order.is_empty() {
            cfg.metadata.search_order = format!("{},{}", CONFIG_DRIVE_ID, METADATA_ID);
        }

        cfg.log_summary();
        Ok(cfg)
    }

    /// Overlay one parsed source onto the accumulated configuration.
    fn apply(&mut self, overlay: ConfigOverlay) {
        if let Some(global) = overlay.global {
            if let Some(v) = global.client_id {
                self.global.client_id = v;
            }
            if let Some(v) = global.client_secret {
                self.global.client_secret = v;
            }
            if let Some(v) = global.identity_url {
                self.global.identity_url = v;
            }
            if let Some(v) = global.compute_url {
                self.global.compute_url = v;
            }
            if let Some(v) = global.blockstorage_url {
                self.global.blockstorage_url = v;
            }
            if let Some(v) = global.portal_url {
                self.global.portal_url = v;
            }
        }

        if let Some(metadata) = overlay.metadata {
            if let Some(v) = metadata.search_order {
                self.metadata.search_order = v;
            }
        }

        if let Some(bs) = overlay.block_storage {
            if let Some(v) = bs.node_volume_attach_limit {
                self.block_storage.node_volume_attach_limit = v;
            }
            if let Some(v) = bs.rescan_on_resize {
                self.block_storage.rescan_on_resize = v;
            }
            if let Some(v) = bs.ignore_volume_az {
                self.block_storage.ignore_volume_az = v;
            }
            if let Some(v) = bs.ignore_volume_microversion {
                self.block_storage.ignore_volume_microversion = v;
            }
        }
    }

    /// Log the resolved configuration with credentials redacted.
    fn log_summary(&self) {
        tracing::info!(
            client_id = %self.global.client_id,
            client_secret = "<redacted>",
            identity_url = %self.global.identity_url,
            compute_url = %self.global.compute_url,
            blockstorage_url = %self.global.blockstorage_url,
            portal_url = %self.global.portal_url,
            search_order = %self.metadata.search_order,
            node_volume_attach_limit = self.block_storage.node_volume_attach_limit,
            rescan_on_resize = self.block_storage.rescan_on_resize,
            ignore_volume_az = self.block_storage.ignore_volume_az,
            ignore_volume_microversion = self.block_storage.ignore_volume_microversion,
            "resolved driver configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlay(raw: &str) -> ConfigOverlay {
        toml::from_str(raw).expect("valid overlay toml")
    }

    #[test]
    fn test_apply_overwrites_present_fields_only() {
        let mut cfg = Config::default();
        cfg.apply(overlay(
            r#"
            [Global]
            client-id = "svc-account"
            client-secret = "first"
            compute-url = "https://compute.example.com/v2"

            [BlockStorage]
            node-volume-attach-limit = 26
            rescan-on-resize = true
            "#,
        ));
        cfg.apply(overlay(
            r#"
            [Global]
            client-secret = "rotated"

            [BlockStorage]
            node-volume-attach-limit = 10
            "#,
        ));

        // Later source wins per field.
        assert_eq!(cfg.global.client_secret, "rotated");
        assert_eq!(cfg.block_storage.node_volume_attach_limit, 10);
        // Fields absent from the later source are untouched.
        assert_eq!(cfg.global.client_id, "svc-account");
        assert_eq!(cfg.global.compute_url, "https://compute.example.com/v2");
        assert!(cfg.block_storage.rescan_on_resize);
    }

    #[test]
    fn test_apply_empty_overlay_is_noop() {
        let mut cfg = Config::default();
        cfg.global.client_id = "svc-account".to_string();
        cfg.apply(overlay(""));
        assert_eq!(cfg.global.client_id, "svc-account");
    }

    #[test]
    fn test_kebab_case_keys() {
        let mut cfg = Config::default();
        cfg.apply(overlay(
            r#"
            [Metadata]
            search-order = "metadataService"

            [BlockStorage]
            ignore-volume-az = true
            ignore-volume-microversion = true
            "#,
        ));
        assert_eq!(cfg.metadata.search_order, "metadataService");
        assert!(cfg.block_storage.ignore_volume_az);
        assert!(cfg.block_storage.ignore_volume_microversion);
    }

    #[test]
    fn test_from_files_missing_source() {
        let err = Config::from_files(&["/nonexistent/driver.toml"]).unwrap_err();
        match err {
            DriverError::ConfigSource { path, .. } => {
                assert_eq!(path, "/nonexistent/driver.toml");
            }
            other => panic!("expected ConfigSource, got {other:?}"),
        }
    }

    #[test]
    fn test_from_files_empty_list_defaults_search_order() {
        let cfg = Config::from_files::<&str>(&[]).unwrap();
        assert_eq!(cfg.metadata.search_order, "configDrive,metadataService");
        assert_eq!(cfg.block_storage.node_volume_attach_limit, 0);
    }
}
