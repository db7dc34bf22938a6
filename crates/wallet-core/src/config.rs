//! Ledger connection settings.
//!
//! Passed explicitly to the transport and reader; nothing here is global.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::WalletError;
use crate::types::Cluster;

const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_REQUEST_ID: u64 = 1;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_request_id() -> u64 {
    DEFAULT_REQUEST_ID
}

/// Where and how to query the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub rpc_url: String,
    /// Per-request timeout enforced by the HTTP transport.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// JSON-RPC `id` attached to every request and expected back in replies.
    #[serde(default = "default_request_id")]
    pub request_id: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self::for_cluster(Cluster::default())
    }
}

impl LedgerConfig {
    pub fn for_cluster(cluster: Cluster) -> Self {
        Self::custom(cluster.rpc_url())
    }

    pub fn mainnet() -> Self {
        Self::for_cluster(Cluster::Mainnet)
    }

    pub fn devnet() -> Self {
        Self::for_cluster(Cluster::Devnet)
    }

    pub fn localnet() -> Self {
        Self::for_cluster(Cluster::Localnet)
    }

    pub fn custom(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            request_id: DEFAULT_REQUEST_ID,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_request_id(mut self, request_id: u64) -> Self {
        self.request_id = request_id;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject settings no request could succeed with.
    pub fn validate(&self) -> Result<(), WalletError> {
        let url = self.rpc_url.trim();
        if url.is_empty() {
            return Err(WalletError::Config("rpc_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(WalletError::Config(format!(
                "rpc_url must be http(s), got {url}"
            )));
        }
        if self.timeout_ms == 0 {
            return Err(WalletError::Config("timeout_ms must be > 0".into()));
        }
        Ok(())
    }
}
