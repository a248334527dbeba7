// Copyright (C) 2015-2026 The Neo Project.
//
// datoshi.rs file belongs to the neo project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

//! `Datoshi`: a signed fixed-point GAS amount, 10⁻⁸ GAS per unit (spec.md §3).
//!
//! Arithmetic never wraps silently; overflow and negative results are
//! returned as [`PrimitivesError`] so callers (fee accounting, native
//! contract balances) cannot mistake a wrapped amount for a real one.

use crate::error::PrimitivesError;
use std::fmt;

/// Number of datoshi in one GAS.
pub const DATOSHI_PER_GAS: i64 = 100_000_000;

/// A signed amount of GAS measured in datoshi (10⁻⁸ GAS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Datoshi(i64);

impl Datoshi {
    /// The zero amount.
    pub const ZERO: Datoshi = Datoshi(0);

    /// Wraps a raw datoshi count.
    pub const fn from_raw(value: i64) -> Self {
        Datoshi(value)
    }

    /// Returns the raw datoshi count.
    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Builds an amount from whole and fractional GAS, failing on overflow.
    pub fn from_gas(whole_gas: i64, datoshi_fraction: i64) -> Result<Self, PrimitivesError> {
        whole_gas
            .checked_mul(DATOSHI_PER_GAS)
            .and_then(|w| w.checked_add(datoshi_fraction))
            .map(Datoshi)
            .ok_or(PrimitivesError::AmountOverflow)
    }

    /// Checked addition.
    pub fn checked_add(self, other: Datoshi) -> Result<Self, PrimitivesError> {
        self.0
            .checked_add(other.0)
            .map(Datoshi)
            .ok_or(PrimitivesError::AmountOverflow)
    }

    /// Checked subtraction.
    pub fn checked_sub(self, other: Datoshi) -> Result<Self, PrimitivesError> {
        self.0
            .checked_sub(other.0)
            .map(Datoshi)
            .ok_or(PrimitivesError::AmountOverflow)
    }

    /// Checked multiplication by an integer scalar (used for fee-per-byte math).
    pub fn checked_mul(self, scalar: i64) -> Result<Self, PrimitivesError> {
        self.0
            .checked_mul(scalar)
            .map(Datoshi)
            .ok_or(PrimitivesError::AmountOverflow)
    }

    /// Fails if the amount is negative. Many protocol fields (system_fee,
    /// network_fee) are required to be non-negative (spec.md §3).
    pub fn require_non_negative(self) -> Result<Self, PrimitivesError> {
        if self.0 < 0 {
            Err(PrimitivesError::NegativeAmount(self.0))
        } else {
            Ok(self)
        }
    }

    /// True if this amount is zero.
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Datoshi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / DATOSHI_PER_GAS;
        let frac = (self.0 % DATOSHI_PER_GAS).abs();
        write!(f, "{whole}.{frac:08}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_overflow_is_detected() {
        let max = Datoshi::from_raw(i64::MAX);
        assert!(max.checked_add(Datoshi::from_raw(1)).is_err());
    }

    #[test]
    fn negative_amount_rejected_when_required_non_negative() {
        assert!(Datoshi::from_raw(-1).require_non_negative().is_err());
        assert!(Datoshi::from_raw(0).require_non_negative().is_ok());
    }

    #[test]
    fn display_matches_gas_fraction() {
        let ten_gas = Datoshi::from_gas(10, 0).unwrap();
        assert_eq!(ten_gas.to_string(), "10.00000000");
    }
}
