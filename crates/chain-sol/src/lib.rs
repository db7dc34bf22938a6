//! Solana SPL token support for the wallet.
//!
//! This crate handles Solana address encoding, associated token account
//! derivation, SPL token instruction encoding, token account parsing and
//! base-unit/display amount conversion. It performs no I/O; everything that
//! talks to a ledger node lives in `wallet-core`.
//!
//! No `solana-sdk` or `spl-token` dependency: the wire layouts are small and
//! fixed, so they are implemented by hand on top of `sha2`,
//! `curve25519-dalek` and `bs58`.

pub mod address;
pub mod amount;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod spl_token;
pub mod token_account;

// Re-export key public types for ergonomic imports.
pub use address::{decode_address, encode_address, Address, ADDRESS_LEN};
pub use amount::{to_display, to_raw, DecimalAmount, LedgerAmount, MAX_DECIMALS, NATIVE_DECIMALS};
pub use error::SolError;
pub use instruction::{
    AccountMeta, Instruction, ProgramId, ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_2022_PROGRAM_ID, TOKEN_PROGRAM_ID,
};
pub use pda::{derive_associated_token_address, find_program_address, is_on_curve};
pub use spl_token::{build_create_associated_account, build_transfer, TokenInstruction};
pub use token_account::{AccountState, TokenAccount, TOKEN_ACCOUNT_LEN};
