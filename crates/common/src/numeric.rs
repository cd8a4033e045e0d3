//! Fixed-point decimal types used by the protocol ledger.
//!
//! All monetary and ratio quantities on-chain are integers scaled by a fixed
//! power of ten: `Wad` carries 18 decimal places (collateral, normalized debt,
//! liquidation penalty), `Ray` carries 27 (prices, ratios, the rate
//! accumulator). Arithmetic stays in exact integers with the protocol's
//! truncating rescale (`x * y / 10^27` for Ray products); conversion to `f64`
//! happens only at the reporting boundary.

use std::fmt;

use alloy::primitives::U256;
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors from fixed-point construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumericError {
    #[error("invalid fixed-point literal: {0:?}")]
    InvalidLiteral(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("fixed-point overflow")]
    Overflow,
}

/// Wad → Ray upscale factor (10^9).
const WAD_TO_RAY: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);

fn parse_raw(literal: &str) -> Result<U256, NumericError> {
    U256::from_str_radix(literal.trim(), 10)
        .map_err(|_| NumericError::InvalidLiteral(literal.to_string()))
}

fn fmt_fixed(f: &mut fmt::Formatter<'_>, raw: U256, decimals: usize) -> fmt::Result {
    let digits = raw.to_string();
    if digits.len() <= decimals {
        write!(f, "0.{digits:0>decimals$}")
    } else {
        let (int_part, frac_part) = digits.split_at(digits.len() - decimals);
        write!(f, "{int_part}.{frac_part}")
    }
}

/// Fixed-point integer with 18 decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wad(U256);

impl Wad {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]));

    /// Parse a raw base-10 integer string as emitted by the data source.
    pub fn from_dec_str(literal: &str) -> Result<Self, NumericError> {
        parse_raw(literal).map(Self)
    }

    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, NumericError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    /// Convert for reporting. Goes through the exact decimal expansion so the
    /// result is the nearest double, not a double-rounded quotient.
    pub fn to_f64(self) -> f64 {
        self.to_string().parse().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fixed(f, self.0, 18)
    }
}

impl Serialize for Wad {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Fixed-point integer with 27 decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ray(U256);

impl Ray {
    pub const ZERO: Self = Self(U256::ZERO);
    pub const ONE: Self = Self(U256::from_limbs([11_515_845_246_265_065_472, 54_210_108, 0, 0]));

    /// Parse a raw base-10 integer string as emitted by the data source.
    pub fn from_dec_str(literal: &str) -> Result<Self, NumericError> {
        parse_raw(literal).map(Self)
    }

    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> U256 {
        self.0
    }

    /// Upscale a Wad quantity to Ray precision.
    pub fn from_wad(wad: Wad) -> Result<Self, NumericError> {
        wad.raw()
            .checked_mul(WAD_TO_RAY)
            .map(Self)
            .ok_or(NumericError::Overflow)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Ray product with the protocol's truncating rescale: `x * y / 10^27`.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, NumericError> {
        self.0
            .checked_mul(rhs.0)
            .map(|product| Self(product / Self::ONE.0))
            .ok_or(NumericError::Overflow)
    }

    /// Ray quotient: `x * 10^27 / y`, truncating.
    pub fn checked_div(self, rhs: Self) -> Result<Self, NumericError> {
        if rhs.0.is_zero() {
            return Err(NumericError::DivisionByZero);
        }
        self.0
            .checked_mul(Self::ONE.0)
            .map(|scaled| Self(scaled / rhs.0))
            .ok_or(NumericError::Overflow)
    }

    /// Convert for reporting. Goes through the exact decimal expansion so the
    /// result is the nearest double, not a double-rounded quotient.
    pub fn to_f64(self) -> f64 {
        self.to_string().parse().unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_fixed(f, self.0, 27)
    }
}

impl Serialize for Ray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
