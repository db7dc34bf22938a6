//! Balance reporting in raw ledger units and display form.

use serde::Serialize;
use tracing::debug;

use chain_sol::{
    derive_associated_token_address, to_display, Address, DecimalAmount, LedgerAmount,
    NATIVE_DECIMALS,
};

use crate::error::WalletError;
use crate::reader::LedgerAccountReader;

/// A wallet's holding of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenBalance {
    pub owner: Address,
    pub mint: Address,
    /// Associated token account the balance was read from.
    pub account: Address,
    pub raw: LedgerAmount,
    pub display: DecimalAmount,
}

/// Balance of `mint` held by `owner`, scaled by the mint's `decimals`.
///
/// A wallet that never received the token has no associated account yet;
/// that reads as zero rather than `AccountNotFound`.
pub async fn token_balance(
    reader: &LedgerAccountReader,
    owner: &Address,
    mint: &Address,
    decimals: u8,
) -> Result<TokenBalance, WalletError> {
    let account = derive_associated_token_address(owner, mint)?;
    let raw = match reader.read_token_balance(&account).await {
        Ok(amount) => amount,
        Err(WalletError::AccountNotFound(_)) => {
            debug!(owner = %owner, mint = %mint, account = %account, "no associated token account, balance is zero");
            LedgerAmount::ZERO
        }
        Err(e) => return Err(e),
    };

    Ok(TokenBalance {
        owner: *owner,
        mint: *mint,
        account,
        raw,
        display: to_display(raw, decimals)?,
    })
}

/// Native balance of `owner` in lamports, displayed with 9 decimals.
pub async fn native_balance(
    reader: &LedgerAccountReader,
    owner: &Address,
) -> Result<(LedgerAmount, DecimalAmount), WalletError> {
    let raw = reader.read_native_balance(owner).await?;
    Ok((raw, to_display(raw, NATIVE_DECIMALS)?))
}
