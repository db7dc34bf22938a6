//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seeds || bump || program_id || "ProgramDerivedAddress")`
//! for the highest bump seed whose digest is NOT a valid Ed25519 point, so
//! no private key can ever sign for it. Associated token accounts are PDAs
//! of the Associated Token Account program.

use sha2::{Digest, Sha256};

use crate::address::Address;
use crate::error::SolError;
use crate::instruction::{ASSOCIATED_TOKEN_PROGRAM_ID, TOKEN_PROGRAM_ID};

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// Derive the associated token account address for a wallet + mint pair.
///
/// The ATA is a PDA with seeds `[wallet, token_program_id, mint]` derived
/// from the Associated Token Account program. Pure: no ledger lookup.
pub fn derive_associated_token_address(
    owner: &Address,
    mint: &Address,
) -> Result<Address, SolError> {
    find_program_address(
        &[owner.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

/// Find a valid PDA for the given seeds and program.
///
/// Iterates bump seeds from 255 down to 0 and returns the first candidate
/// that is off the Ed25519 curve, together with its bump.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Address,
) -> Result<(Address, u8), SolError> {
    find_program_address_with(seeds, program_id, is_on_curve)
}

fn find_program_address_with(
    seeds: &[&[u8]],
    program_id: &Address,
    on_curve: impl Fn(&[u8; 32]) -> bool,
) -> Result<(Address, u8), SolError> {
    for bump in (0u8..=255).rev() {
        let candidate = hash_candidate(seeds, bump, program_id);
        if !on_curve(&candidate) {
            return Ok((Address::new(candidate), bump));
        }
    }

    Err(SolError::NoValidBumpFound)
}

fn hash_candidate(seeds: &[&[u8]], bump: u8, program_id: &Address) -> [u8; 32] {
    let mut hasher = Sha256::new();

    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update([bump]);
    hasher.update(program_id.as_bytes());
    hasher.update(PDA_MARKER);

    hasher.finalize().into()
}

/// Check if 32 bytes represent a valid Ed25519 curve point.
///
/// Uses `curve25519-dalek` to attempt decompression. If it succeeds, the
/// point is on the curve.
pub fn is_on_curve(bytes: &[u8; 32]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}
