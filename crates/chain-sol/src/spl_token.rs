//! SPL Token instructions for Solana.
//!
//! Builds the two instructions a wallet needs to move SPL tokens: creating
//! the recipient's associated token account (ATA) and transferring base
//! units between two token accounts. Hand-rolled instead of pulling in the
//! `spl-token` and `spl-associated-token-account` crates.

use crate::address::Address;
use crate::amount::LedgerAmount;
use crate::error::SolError;
use crate::instruction::{
    AccountMeta, Instruction, ProgramId, ASSOCIATED_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID,
    TOKEN_PROGRAM_ID,
};
use crate::pda::derive_associated_token_address;

/// SPL Token `Transfer` instruction index.
pub const TRANSFER_OPCODE: u8 = 3;

/// Opcode byte + u64 LE amount.
pub const TRANSFER_DATA_LEN: usize = 9;

/// The instructions this crate knows how to encode. Each variant is one
/// fixed wire layout of an on-chain program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenInstruction {
    /// Associated Token Account program `Create`. Legacy form: empty payload.
    CreateAssociatedAccount,
    /// Token program `Transfer`: `[3] ++ amount.to_le_bytes()`.
    Transfer { amount: LedgerAmount },
}

impl TokenInstruction {
    /// The program that executes this instruction.
    pub const fn program(&self) -> ProgramId {
        match self {
            TokenInstruction::CreateAssociatedAccount => ProgramId::AssociatedToken,
            TokenInstruction::Transfer { .. } => ProgramId::Token,
        }
    }

    pub fn pack(&self) -> Vec<u8> {
        match self {
            TokenInstruction::CreateAssociatedAccount => Vec::new(),
            TokenInstruction::Transfer { amount } => {
                let mut data = Vec::with_capacity(TRANSFER_DATA_LEN);
                data.push(TRANSFER_OPCODE);
                data.extend_from_slice(&amount.units().to_le_bytes());
                data
            }
        }
    }

    /// Decode the payload of an instruction addressed to `program`.
    pub fn unpack(program: ProgramId, data: &[u8]) -> Result<Self, SolError> {
        match program {
            ProgramId::AssociatedToken if data.is_empty() => {
                Ok(TokenInstruction::CreateAssociatedAccount)
            }
            ProgramId::AssociatedToken => Err(SolError::MalformedInstruction(format!(
                "associated account create carries no data, got {} bytes",
                data.len()
            ))),
            ProgramId::Token => {
                let (&opcode, rest) = data.split_first().ok_or_else(|| {
                    SolError::MalformedInstruction("empty token instruction".into())
                })?;
                if opcode != TRANSFER_OPCODE {
                    return Err(SolError::MalformedInstruction(format!(
                        "unsupported token opcode {opcode}"
                    )));
                }
                let amount: [u8; 8] = rest.try_into().map_err(|_| {
                    SolError::MalformedInstruction(format!(
                        "transfer expects {TRANSFER_DATA_LEN} bytes, got {}",
                        data.len()
                    ))
                })?;
                Ok(TokenInstruction::Transfer {
                    amount: LedgerAmount::new(u64::from_le_bytes(amount)),
                })
            }
            ProgramId::System => Err(SolError::MalformedInstruction(
                "system program instructions are not token instructions".into(),
            )),
        }
    }

    /// Decode a full instruction.
    pub fn decode(ix: &Instruction) -> Result<Self, SolError> {
        let program = ProgramId::from_address(&ix.program_id).ok_or_else(|| {
            SolError::MalformedInstruction(format!("unknown program {}", ix.program_id))
        })?;
        Self::unpack(program, &ix.data)
    }
}

// ---------------------------------------------------------------------------
// Associated token account creation
// ---------------------------------------------------------------------------

/// Build the Associated Token Account program `Create` instruction.
///
/// The executing program reads accounts positionally:
///
/// | # | account            | signer | writable |
/// |---|--------------------|--------|----------|
/// | 0 | payer              | yes    | yes      |
/// | 1 | associated account | no     | yes      |
/// | 2 | owner              | no     | no       |
/// | 3 | mint               | no     | no       |
/// | 4 | system program     | no     | no       |
/// | 5 | token program      | no     | no       |
pub fn build_create_associated_account(
    payer: &Address,
    owner: &Address,
    mint: &Address,
) -> Result<Instruction, SolError> {
    let associated = derive_associated_token_address(owner, mint)?;

    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*payer, true),
            AccountMeta::writable(associated, false),
            AccountMeta::readonly(*owner, false),
            AccountMeta::readonly(*mint, false),
            AccountMeta::readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::readonly(TOKEN_PROGRAM_ID, false),
        ],
        data: TokenInstruction::CreateAssociatedAccount.pack(),
    })
}

// ---------------------------------------------------------------------------
// SPL Token Transfer
// ---------------------------------------------------------------------------

/// Build an SPL Token `Transfer` instruction.
///
/// Moves `amount` base units (for a 6-decimal token, `1_000_000` is one
/// whole token) from `from` to `to`. Both are token accounts, not wallets;
/// `owner` is the wallet that owns `from` and must sign.
pub fn build_transfer(
    from: &Address,
    to: &Address,
    owner: &Address,
    amount: LedgerAmount,
) -> Instruction {
    Instruction {
        program_id: TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::writable(*from, false),
            AccountMeta::writable(*to, false),
            AccountMeta::readonly(*owner, true),
        ],
        data: TokenInstruction::Transfer { amount }.pack(),
    }
}
