//! Dashboard configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use agora_governance::mapping::{DEFAULT_FALLBACK_ID, DEFAULT_KNOWN_IDS, DEFAULT_MAPPINGS};
use agora_governance::IdentifierMapper;
use agora_store::DEFAULT_SNAPSHOT_KEY;
use agora_sync::SyncPolicy;
use agora_utils::LogFormat;

use crate::DashboardError;

/// Configuration for the dashboard core.
///
/// Can be loaded from a TOML file via [`DashboardConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). The signing key is never part of
/// the file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Proposal backend base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Whole-request timeout for backend calls, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Ethereum JSON-RPC endpoint.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Governor contract address.
    #[serde(default = "default_governor_address")]
    pub governor_address: String,

    /// Directory for the persisted proposal snapshot.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// How long loaded data is served without re-resolving, in seconds.
    #[serde(default = "default_freshness_window_secs")]
    pub freshness_window_secs: u64,

    /// Age below which a persisted snapshot is adopted before contacting
    /// the backend, in seconds.
    #[serde(default = "default_recent_window_secs")]
    pub recent_window_secs: u64,

    /// Proposal shown as active when the backend lists it.
    #[serde(default = "default_anchor_proposal_id")]
    pub anchor_proposal_id: String,

    /// Ledger id used for proposals with no known ledger counterpart.
    #[serde(default = "default_fallback_proposal_id")]
    pub fallback_proposal_id: String,

    /// Ledger ids that map to themselves.
    #[serde(default = "default_known_valid_ids")]
    pub known_valid_ids: Vec<String>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dashboard id → ledger id overrides.
    #[serde(default = "default_proposal_mappings")]
    pub proposal_mappings: BTreeMap<String, String>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_url() -> String {
    agora_gateway::http::DEFAULT_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_governor_address() -> String {
    agora_ledger_evm::DEFAULT_GOVERNOR_ADDRESS.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./agora_data")
}

fn default_freshness_window_secs() -> u64 {
    SyncPolicy::DEFAULT_FRESHNESS.as_secs()
}

fn default_recent_window_secs() -> u64 {
    SyncPolicy::DEFAULT_RECENT.as_secs()
}

fn default_anchor_proposal_id() -> String {
    SyncPolicy::DEFAULT_ANCHOR.to_string()
}

fn default_fallback_proposal_id() -> String {
    DEFAULT_FALLBACK_ID.to_string()
}

fn default_known_valid_ids() -> Vec<String> {
    DEFAULT_KNOWN_IDS.iter().map(|id| id.to_string()).collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_proposal_mappings() -> BTreeMap<String, String> {
    DEFAULT_MAPPINGS
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, DashboardError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| DashboardError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DashboardError> {
        let config: Self = toml::from_str(s).map_err(|e| DashboardError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DashboardError> {
        toml::to_string_pretty(self).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Reject values no component can work with.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.api_url.trim().is_empty() {
            return Err(DashboardError::Config("api_url must not be empty".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        if self.recent_window_secs > self.freshness_window_secs {
            return Err(DashboardError::Config(format!(
                "recent_window_secs ({}) exceeds freshness_window_secs ({})",
                self.recent_window_secs, self.freshness_window_secs
            )));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn sync_policy(&self) -> SyncPolicy {
        SyncPolicy {
            freshness_window: Duration::from_secs(self.freshness_window_secs),
            recent_window: Duration::from_secs(self.recent_window_secs),
            anchor_proposal_id: self.anchor_proposal_id.clone(),
            storage_key: DEFAULT_SNAPSHOT_KEY.to_string(),
        }
    }

    pub fn mapper(&self) -> IdentifierMapper {
        IdentifierMapper::new(self.known_valid_ids.iter().cloned(), self.fallback_proposal_id.clone())
            .with_mappings(self.proposal_mappings.clone())
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            rpc_url: default_rpc_url(),
            governor_address: default_governor_address(),
            data_dir: default_data_dir(),
            freshness_window_secs: default_freshness_window_secs(),
            recent_window_secs: default_recent_window_secs(),
            anchor_proposal_id: default_anchor_proposal_id(),
            fallback_proposal_id: default_fallback_proposal_id(),
            known_valid_ids: default_known_valid_ids(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            proposal_mappings: default_proposal_mappings(),
        }
    }
}
