use thiserror::Error;

/// Solana token protocol errors.
///
/// Everything here is raised by pure code: address decoding, PDA
/// derivation, amount scaling, instruction and token-account parsing.
/// Ledger transport failures live in the wallet layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("malformed address: {0}")]
    MalformedAddress(String),

    #[error("no valid bump seed found for program derived address")]
    NoValidBumpFound,

    #[error("malformed account data: {0}")]
    MalformedAccountData(String),

    #[error("amount overflow: {0}")]
    AmountOverflow(String),

    #[error("invalid precision: {0}")]
    InvalidPrecision(String),

    #[error("precision loss: {0}")]
    PrecisionLoss(String),

    #[error("malformed amount: {0}")]
    MalformedAmount(String),

    #[error("malformed instruction: {0}")]
    MalformedInstruction(String),
}
