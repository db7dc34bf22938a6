//! SPL token account record layout.
//!
//! ```text
//! offset  len  field
//!      0   32  mint
//!     32   32  owner
//!     64    8  amount             u64 LE
//!     72   36  delegate           COption<Pubkey>  (u32 LE tag + 32)
//!    108    1  state              0 = uninitialized, 1 = initialized, 2 = frozen
//!    109   12  is_native          COption<u64>     (u32 LE tag + 8)
//!    121    8  delegated_amount   u64 LE
//!    129   36  close_authority    COption<Pubkey>
//!    165       end of base record
//! ```
//!
//! Token-2022 accounts carry extensions after byte 165; those start with an
//! account-type byte that must be `2` (account).

use crate::address::Address;
use crate::amount::LedgerAmount;
use crate::error::SolError;

/// Size of a base token account record.
pub const TOKEN_ACCOUNT_LEN: usize = 165;

/// Token-2022 `AccountType::Account` tag stored at offset 165.
const ACCOUNT_TYPE_TAG: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountState {
    Initialized,
    Frozen,
}

/// A decoded token account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenAccount {
    pub mint: Address,
    pub owner: Address,
    pub amount: LedgerAmount,
    pub delegate: Option<Address>,
    pub state: AccountState,
    /// Rent-exempt reserve for wrapped SOL accounts.
    pub is_native: Option<u64>,
    pub delegated_amount: LedgerAmount,
    pub close_authority: Option<Address>,
}

impl TokenAccount {
    /// Parse a token account record from raw account data.
    pub fn unpack(data: &[u8]) -> Result<Self, SolError> {
        match data.len() {
            TOKEN_ACCOUNT_LEN => {}
            len if len > TOKEN_ACCOUNT_LEN => {
                if data[TOKEN_ACCOUNT_LEN] != ACCOUNT_TYPE_TAG {
                    return Err(SolError::MalformedAccountData(format!(
                        "extended record has account type {}, expected {ACCOUNT_TYPE_TAG}",
                        data[TOKEN_ACCOUNT_LEN]
                    )));
                }
            }
            len => {
                return Err(SolError::MalformedAccountData(format!(
                    "expected {TOKEN_ACCOUNT_LEN} bytes, got {len}"
                )))
            }
        }

        let state = match data[108] {
            1 => AccountState::Initialized,
            2 => AccountState::Frozen,
            0 => {
                return Err(SolError::MalformedAccountData(
                    "token account is uninitialized".into(),
                ))
            }
            other => {
                return Err(SolError::MalformedAccountData(format!(
                    "invalid account state {other}"
                )))
            }
        };

        Ok(TokenAccount {
            mint: Address::from_slice(&data[0..32])?,
            owner: Address::from_slice(&data[32..64])?,
            amount: LedgerAmount::new(read_u64(&data[64..72])),
            delegate: read_option(&data[72..108], "delegate")?
                .map(Address::from_slice)
                .transpose()?,
            state,
            is_native: read_option(&data[109..121], "is_native")?.map(read_u64),
            delegated_amount: LedgerAmount::new(read_u64(&data[121..129])),
            close_authority: read_option(&data[129..165], "close_authority")?
                .map(Address::from_slice)
                .transpose()?,
        })
    }

    /// Serialize to the base 165-byte layout.
    pub fn pack(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(TOKEN_ACCOUNT_LEN);
        data.extend_from_slice(self.mint.as_bytes());
        data.extend_from_slice(self.owner.as_bytes());
        data.extend_from_slice(&self.amount.units().to_le_bytes());
        write_option(&mut data, self.delegate.as_ref().map(Address::as_bytes));
        data.push(match self.state {
            AccountState::Initialized => 1,
            AccountState::Frozen => 2,
        });
        write_option(&mut data, self.is_native.map(u64::to_le_bytes).as_ref());
        data.extend_from_slice(&self.delegated_amount.units().to_le_bytes());
        write_option(&mut data, self.close_authority.as_ref().map(Address::as_bytes));
        data
    }
}

fn write_option<const N: usize>(out: &mut Vec<u8>, value: Option<&[u8; N]>) {
    match value {
        Some(bytes) => {
            out.extend_from_slice(&1u32.to_le_bytes());
            out.extend_from_slice(bytes);
        }
        None => {
            out.extend_from_slice(&0u32.to_le_bytes());
            out.resize(out.len() + N, 0);
        }
    }
}

/// Read a little-endian u64 from an 8-byte slice.
fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}

/// Decode a `COption<T>`: a u32 LE tag (0 = none, 1 = some) followed by the
/// fixed-size payload, which is returned when present.
fn read_option<'a>(bytes: &'a [u8], field: &str) -> Result<Option<&'a [u8]>, SolError> {
    let (tag, payload) = bytes.split_at(4);
    match tag {
        [0, 0, 0, 0] => Ok(None),
        [1, 0, 0, 0] => Ok(Some(payload)),
        _ => Err(SolError::MalformedAccountData(format!(
            "invalid option tag for {field}: {tag:?}"
        ))),
    }
}
