//! Solana address encoding and validation.
//!
//! Solana addresses are Base58-encoded 32-byte values. For wallets they are
//! Ed25519 public keys; for program derived addresses they are SHA-256
//! digests that deliberately fall off the curve. Either way the wire form
//! is the raw 32 bytes and the display form is the standard Bitcoin Base58
//! alphabet used by the `bs58` crate.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolError;

/// Length of every Solana address in bytes.
pub const ADDRESS_LEN: usize = 32;

/// A 32-byte Solana account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// Wrap 32 raw bytes. Infallible because the length is fixed by the type.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Build an address from an arbitrary byte slice.
    ///
    /// Fails with `MalformedAddress` unless the slice is exactly 32 bytes;
    /// shorter input is never padded and longer input is never truncated.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SolError> {
        let arr: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
            SolError::MalformedAddress(format!(
                "expected {ADDRESS_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub const fn to_bytes(&self) -> [u8; ADDRESS_LEN] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }
}

impl FromStr for Address {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolError::MalformedAddress(format!("base58 decode failed: {e}")))?;
        Self::from_slice(&bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = SolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Decode a Base58 address string.
pub fn decode_address(text: &str) -> Result<Address, SolError> {
    text.parse()
}

/// Encode raw bytes as an address, rejecting anything that is not 32 bytes.
pub fn encode_address(bytes: &[u8]) -> Result<Address, SolError> {
    Address::from_slice(bytes)
}
