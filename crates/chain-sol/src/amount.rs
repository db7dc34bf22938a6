//! Conversion between raw ledger units and decimal display amounts.
//!
//! Token balances live on-chain as `u64` base units; a mint's `decimals`
//! says how many of those units make one whole token. A [`DecimalAmount`]
//! is an exact fixed-point value (`units / 10^scale`), so no floating point
//! is involved anywhere.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SolError;

/// Largest precision accepted. `10^38` is the largest power of ten a
/// `u128` can hold.
pub const MAX_DECIMALS: u8 = 38;

/// Decimals of the native SOL balance (lamports per SOL = 10^9).
pub const NATIVE_DECIMALS: u8 = 9;

/// A raw amount in a token's smallest unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerAmount(u64);

impl LedgerAmount {
    pub const ZERO: LedgerAmount = LedgerAmount(0);

    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u64 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for LedgerAmount {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl TryFrom<u128> for LedgerAmount {
    type Error = SolError;

    fn try_from(units: u128) -> Result<Self, Self::Error> {
        u64::try_from(units)
            .map(Self)
            .map_err(|_| SolError::AmountOverflow(format!("{units} exceeds u64::MAX")))
    }
}

impl fmt::Display for LedgerAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative fixed-point amount: `units / 10^scale`.
///
/// `Display` always prints exactly `scale` fractional digits, so a 6-decimal
/// token's 2.5 renders as `2.500000`. Equality and hashing compare values,
/// not representations: `2.5 == 2.500000`.
#[derive(Debug, Clone, Copy)]
pub struct DecimalAmount {
    units: u128,
    scale: u8,
}

impl DecimalAmount {
    pub fn new(units: u128, scale: u8) -> Result<Self, SolError> {
        check_precision(scale)?;
        Ok(Self { units, scale })
    }

    pub const fn units(&self) -> u128 {
        self.units
    }

    /// Number of fractional digits.
    pub const fn scale(&self) -> u8 {
        self.scale
    }

    /// Re-express at `target` fractional digits, rounding half-up when
    /// digits are dropped.
    pub fn rescale(&self, target: u8) -> Result<Self, SolError> {
        check_precision(target)?;
        let units = if target >= self.scale {
            self.units
                .checked_mul(pow10(target - self.scale)?)
                .ok_or_else(|| overflow(self.units, target))?
        } else {
            let divisor = pow10(self.scale - target)?;
            let quotient = self.units / divisor;
            let remainder = self.units % divisor;
            if remainder >= divisor - remainder {
                quotient + 1
            } else {
                quotient
            }
        };
        Ok(Self {
            units,
            scale: target,
        })
    }

    /// Drop trailing fractional zeros (`2.500000` becomes `2.5`).
    pub fn normalized(&self) -> Self {
        let mut out = *self;
        while out.scale > 0 && out.units % 10 == 0 {
            out.units /= 10;
            out.scale -= 1;
        }
        out
    }
}

impl PartialEq for DecimalAmount {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.normalized(), other.normalized());
        a.units == b.units && a.scale == b.scale
    }
}

impl Eq for DecimalAmount {}

impl Hash for DecimalAmount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let n = self.normalized();
        n.units.hash(state);
        n.scale.hash(state);
    }
}

impl fmt::Display for DecimalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // scale <= MAX_DECIMALS is enforced at construction.
        let divisor = 10u128.pow(u32::from(self.scale));
        let whole = self.units / divisor;
        if self.scale == 0 {
            return write!(f, "{whole}");
        }
        let frac = self.units % divisor;
        write!(f, "{whole}.{frac:0width$}", width = usize::from(self.scale))
    }
}

impl FromStr for DecimalAmount {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SolError::MalformedAmount(format!("{s:?} is not a decimal amount"));

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(malformed());
        }
        if !whole.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if s.ends_with('.') {
            return Err(malformed());
        }

        let scale = u8::try_from(frac.len())
            .ok()
            .filter(|scale| *scale <= MAX_DECIMALS)
            .ok_or_else(|| {
                SolError::MalformedAmount(format!(
                    "{s:?} has more than {MAX_DECIMALS} fractional digits"
                ))
            })?;

        let mut units: u128 = 0;
        for digit in whole.bytes().chain(frac.bytes()) {
            units = units
                .checked_mul(10)
                .and_then(|u| u.checked_add(u128::from(digit - b'0')))
                .ok_or_else(|| SolError::AmountOverflow(format!("{s} does not fit in u128")))?;
        }

        Ok(Self { units, scale })
    }
}

impl Serialize for DecimalAmount {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DecimalAmount {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Convert raw base units to a display amount with `decimals` fractional digits.
pub fn to_display(raw: LedgerAmount, decimals: u8) -> Result<DecimalAmount, SolError> {
    check_precision(decimals)?;
    // raw / 10^decimals is exact at `decimals` digits, so half-up rounding
    // never has anything to round.
    Ok(DecimalAmount {
        units: u128::from(raw.units()),
        scale: decimals,
    })
}

/// Convert a display amount back to raw base units.
///
/// Refuses to truncate: a display amount with more significant fractional
/// digits than the token supports fails with `PrecisionLoss`.
pub fn to_raw(display: DecimalAmount, decimals: u8) -> Result<LedgerAmount, SolError> {
    check_precision(decimals)?;
    let normalized = display.normalized();
    if normalized.scale > decimals {
        return Err(SolError::PrecisionLoss(format!(
            "{display} has {} fractional digits, token supports {decimals}",
            normalized.scale
        )));
    }
    let scaled = normalized.rescale(decimals)?;
    LedgerAmount::try_from(scaled.units)
}

fn check_precision(decimals: u8) -> Result<(), SolError> {
    if decimals > MAX_DECIMALS {
        return Err(SolError::InvalidPrecision(format!(
            "{decimals} decimals exceeds maximum of {MAX_DECIMALS}"
        )));
    }
    Ok(())
}

fn pow10(exp: u8) -> Result<u128, SolError> {
    10u128
        .checked_pow(u32::from(exp))
        .ok_or_else(|| SolError::InvalidPrecision(format!("10^{exp} does not fit in u128")))
}

fn overflow(units: u128, scale: u8) -> SolError {
    SolError::AmountOverflow(format!("{units} at scale {scale} does not fit in u128"))
}
