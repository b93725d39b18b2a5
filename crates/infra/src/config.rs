//! Environment-driven run configuration.
//!
//! Everything is read through a key lookup so tests can feed a map instead of
//! mutating the process environment.

use std::path::PathBuf;

use thiserror::Error;

use skusync_inventory::{OrphanDisposition, WarehouseSet};

use crate::orchestrator::DEFAULT_MAX_CONCURRENT_WRITES;

const DEV_API_BASE_URL: &str = "http://localhost:8080/v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Where writes go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkConfig {
    Http { base_url: String, token: Option<String> },
    Postgres { database_url: String },
    /// Render statements only (dry run).
    SqlScript,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub warehouses: WarehouseSet,
    pub sink: SinkConfig,
    pub application_snapshot: PathBuf,
    pub inventory_snapshot: PathBuf,
    pub wms_snapshot: PathBuf,
    pub max_concurrent_writes: usize,
    pub orphan_policy: OrphanDisposition,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let warehouses = WarehouseSet::parse_list(&required("SKUSYNC_WAREHOUSES")?)
            .map_err(|e| ConfigError::invalid("SKUSYNC_WAREHOUSES", e.to_string()))?;

        let sink = match get("SKUSYNC_SINK").as_deref() {
            None | Some("sql-script") => SinkConfig::SqlScript,
            Some("http") => {
                let base_url = get("SKUSYNC_API_BASE_URL").unwrap_or_else(|| {
                    tracing::warn!("SKUSYNC_API_BASE_URL not set; using local dev default");
                    DEV_API_BASE_URL.to_string()
                });
                SinkConfig::Http {
                    base_url,
                    token: get("SKUSYNC_API_TOKEN"),
                }
            }
            Some("postgres") => SinkConfig::Postgres {
                database_url: required("SKUSYNC_DATABASE_URL")?,
            },
            Some(other) => {
                return Err(ConfigError::invalid(
                    "SKUSYNC_SINK",
                    format!("unknown sink '{other}' (expected http, postgres or sql-script)"),
                ));
            }
        };

        let max_concurrent_writes = match get("SKUSYNC_MAX_CONCURRENT_WRITES") {
            None => DEFAULT_MAX_CONCURRENT_WRITES,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::invalid(
                        "SKUSYNC_MAX_CONCURRENT_WRITES",
                        format!("expected a positive integer, got '{raw}'"),
                    ));
                }
            },
        };

        let orphan_policy = match get("SKUSYNC_ORPHAN_POLICY").as_deref() {
            None | Some("ignore") => OrphanDisposition::Ignore,
            Some("archive") => OrphanDisposition::Archived,
            Some("delete") => OrphanDisposition::Deleted,
            Some(other) => {
                return Err(ConfigError::invalid(
                    "SKUSYNC_ORPHAN_POLICY",
                    format!("unknown policy '{other}' (expected ignore, archive or delete)"),
                ));
            }
        };

        Ok(Self {
            warehouses,
            sink,
            application_snapshot: required("SKUSYNC_APPLICATION_SNAPSHOT")?.into(),
            inventory_snapshot: required("SKUSYNC_INVENTORY_SNAPSHOT")?.into(),
            wms_snapshot: required("SKUSYNC_WMS_SNAPSHOT")?.into(),
            max_concurrent_writes,
            orphan_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    const BASE: [(&str, &str); 4] = [
        ("SKUSYNC_WAREHOUSES", "warehouse-1, warehouse-2"),
        ("SKUSYNC_APPLICATION_SNAPSHOT", "app.json"),
        ("SKUSYNC_INVENTORY_SNAPSHOT", "inventory.json"),
        ("SKUSYNC_WMS_SNAPSHOT", "wms.json"),
    ];

    fn with(extra: &[(&'static str, &'static str)]) -> Vec<(&'static str, &'static str)> {
        BASE.iter().copied().chain(extra.iter().copied()).collect()
    }

    #[test]
    fn defaults_to_sql_script_and_ignore() {
        let config = SyncConfig::from_lookup(lookup(&BASE)).unwrap();

        assert_eq!(config.warehouses.len(), 2);
        assert_eq!(config.sink, SinkConfig::SqlScript);
        assert_eq!(config.max_concurrent_writes, DEFAULT_MAX_CONCURRENT_WRITES);
        assert_eq!(config.orphan_policy, OrphanDisposition::Ignore);
        assert_eq!(config.wms_snapshot, PathBuf::from("wms.json"));
    }

    #[test]
    fn http_sink_reads_url_and_token() {
        let config = SyncConfig::from_lookup(lookup(&with(&[
            ("SKUSYNC_SINK", "http"),
            ("SKUSYNC_API_BASE_URL", "https://inventory.example/v1"),
            ("SKUSYNC_API_TOKEN", "secret"),
            ("SKUSYNC_ORPHAN_POLICY", "archive"),
            ("SKUSYNC_MAX_CONCURRENT_WRITES", "4"),
        ])))
        .unwrap();

        assert_eq!(
            config.sink,
            SinkConfig::Http {
                base_url: "https://inventory.example/v1".to_string(),
                token: Some("secret".to_string()),
            }
        );
        assert_eq!(config.orphan_policy, OrphanDisposition::Archived);
        assert_eq!(config.max_concurrent_writes, 4);
    }

    #[test]
    fn http_sink_falls_back_to_dev_url() {
        let config = SyncConfig::from_lookup(lookup(&with(&[("SKUSYNC_SINK", "http")]))).unwrap();
        assert_eq!(
            config.sink,
            SinkConfig::Http {
                base_url: DEV_API_BASE_URL.to_string(),
                token: None,
            }
        );
    }

    #[test]
    fn postgres_sink_requires_database_url() {
        let err = SyncConfig::from_lookup(lookup(&with(&[("SKUSYNC_SINK", "postgres")]))).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SKUSYNC_DATABASE_URL"));
    }

    #[test]
    fn missing_warehouses_is_reported() {
        let err = SyncConfig::from_lookup(lookup(&BASE[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("SKUSYNC_WAREHOUSES"));
    }

    #[test]
    fn invalid_values_name_their_key() {
        let cases = [
            ("SKUSYNC_WAREHOUSES", "warehouse-1,warehouse-1"),
            ("SKUSYNC_SINK", "kafka"),
            ("SKUSYNC_MAX_CONCURRENT_WRITES", "0"),
            ("SKUSYNC_ORPHAN_POLICY", "purge"),
        ];

        for (key, value) in cases {
            let mut pairs = with(&[]);
            pairs.retain(|(k, _)| *k != key);
            pairs.push((key, value));

            match SyncConfig::from_lookup(lookup(&pairs)) {
                Err(ConfigError::Invalid { key: got, .. }) => assert_eq!(got, key),
                other => panic!("{key}={value}: expected invalid, got {other:?}"),
            }
        }
    }
}
