//! Ledger-facing side of the wallet's SPL token support.
//!
//! `chain-sol` knows the byte layouts; this crate asks a ledger node which
//! accounts exist, plans transfers from the answers and reports balances.

pub mod balance;
pub mod config;
pub mod error;
pub mod planner;
pub mod reader;
pub mod rpc;
pub mod types;

#[cfg(test)]
mod testing;

pub use balance::{native_balance, token_balance, TokenBalance};
pub use config::LedgerConfig;
pub use error::WalletError;
pub use planner::{assemble_plan, TransferPlan, TransferPlanner, TransferRequest};
pub use reader::LedgerAccountReader;
pub use rpc::{parse_account_reply, AccountInfo, HttpTransport, RpcRequest, RpcTransport};
pub use types::Cluster;
