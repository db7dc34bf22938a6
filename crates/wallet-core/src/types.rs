use serde::{Deserialize, Serialize};

/// Solana clusters the wallet can talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cluster {
    #[default]
    Mainnet,
    Devnet,
    Testnet,
    Localnet,
}

impl Cluster {
    /// Public JSON-RPC endpoint
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "https://api.mainnet-beta.solana.com",
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Cluster::Mainnet => "Solana",
            Cluster::Devnet => "Solana Devnet",
            Cluster::Testnet => "Solana Testnet",
            Cluster::Localnet => "Solana Localnet",
        }
    }

    pub fn is_testnet(&self) -> bool {
        !matches!(self, Cluster::Mainnet)
    }
}
