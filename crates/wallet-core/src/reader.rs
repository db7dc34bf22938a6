//! Ledger state reads.
//!
//! Every method issues a single `getAccountInfo` call and interprets the
//! reply. These are the only suspension points in the wallet core; nothing
//! is cached and nothing is retried.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use chain_sol::{
    Address, LedgerAmount, SolError, TokenAccount, TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};

use crate::config::LedgerConfig;
use crate::error::WalletError;
use crate::rpc::{parse_account_reply, AccountInfo, HttpTransport, RpcRequest, RpcTransport};

#[derive(Clone)]
pub struct LedgerAccountReader {
    transport: Arc<dyn RpcTransport>,
    request_id: u64,
}

impl LedgerAccountReader {
    pub fn new(transport: Arc<dyn RpcTransport>, config: &LedgerConfig) -> Self {
        Self {
            transport,
            request_id: config.request_id,
        }
    }

    /// Reader over HTTP using `config`'s endpoint and timeout.
    pub fn connect(config: &LedgerConfig) -> Result<Self, WalletError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(Arc::new(transport), config))
    }

    async fn fetch(&self, address: &Address) -> Result<Option<Value>, WalletError> {
        let body = RpcRequest::get_account_info(address, self.request_id).to_body()?;
        let reply = self.transport.send(body).await?;
        parse_account_reply(&reply, self.request_id)
    }

    /// Whether the ledger holds an account at `address`.
    ///
    /// Absence is `Ok(false)`; only a failed query is an error.
    pub async fn exists(&self, address: &Address) -> Result<bool, WalletError> {
        let exists = self.fetch(address).await?.is_some();
        debug!(address = %address, exists, "account existence checked");
        Ok(exists)
    }

    /// Fetch and decode the account at `address`.
    pub async fn read_account(&self, address: &Address) -> Result<AccountInfo, WalletError> {
        let value = self
            .fetch(address)
            .await?
            .ok_or_else(|| WalletError::AccountNotFound(address.to_string()))?;
        Ok(AccountInfo::from_json(&value)?)
    }

    /// Fetch and parse the token account record at `address`.
    pub async fn read_token_account(&self, address: &Address) -> Result<TokenAccount, WalletError> {
        let info = self.read_account(address).await?;
        if info.owner != TOKEN_PROGRAM_ID && info.owner != TOKEN_2022_PROGRAM_ID {
            return Err(SolError::MalformedAccountData(format!(
                "{address} is owned by {}, not a token program",
                info.owner
            ))
            .into());
        }
        Ok(TokenAccount::unpack(&info.data)?)
    }

    /// Raw token balance of the token account at `address`.
    pub async fn read_token_balance(&self, address: &Address) -> Result<LedgerAmount, WalletError> {
        let account = self.read_token_account(address).await?;
        debug!(address = %address, amount = account.amount.units(), "token balance read");
        Ok(account.amount)
    }

    /// Lamports held at `address`. An account the ledger does not know
    /// holds zero lamports.
    pub async fn read_native_balance(&self, address: &Address) -> Result<LedgerAmount, WalletError> {
        match self.fetch(address).await? {
            Some(value) => Ok(LedgerAmount::new(AccountInfo::from_json(&value)?.lamports)),
            None => {
                debug!(address = %address, "native balance of absent account is zero");
                Ok(LedgerAmount::ZERO)
            }
        }
    }
}
