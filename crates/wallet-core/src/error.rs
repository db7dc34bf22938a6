use chain_sol::SolError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    /// Transport failure, timeout, or a response that is not a usable
    /// JSON-RPC reply. The only retryable kind.
    #[error("Ledger unreachable: {0}")]
    LedgerUnreachable(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("SOL: {0}")]
    Chain(#[from] SolError),
}

impl WalletError {
    /// Whether a caller's retry policy may re-issue the failed operation
    /// unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::LedgerUnreachable(_))
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(e: reqwest::Error) -> Self {
        WalletError::LedgerUnreachable(e.to_string())
    }
}
