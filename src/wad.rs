//! WAD fixed-point amounts.
//!
//! Masses and scores arrive from the chain as unsigned 256-bit integers
//! scaled by 10^18. All aggregation happens in this exact integer domain;
//! conversion to native floats is lossy and reserved for display code.

use core::fmt;
use core::ops::{Add, AddAssign};

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::WadError;

/// One whole unit in WAD scaling (10^18).
const WAD_ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Non-negative fixed-point decimal scaled by 10^18.
///
/// Ordering and equality are exact, so near-tied scores never collapse the
/// way they would after an early float conversion.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Wad(U256);

impl Wad {
    pub const ZERO: Self = Self(U256::ZERO);

    /// Scale a whole-unit count up to WAD.
    pub fn from_units(units: u64) -> Self {
        Self(U256::from(units) * WAD_ONE)
    }

    /// Wrap an already-scaled raw value.
    pub const fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> U256 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    /// Exact subtraction. Fails with [`WadError::Underflow`] when the result
    /// would be negative.
    pub fn checked_sub(self, rhs: Self) -> Result<Self, WadError> {
        self.0
            .checked_sub(rhs.0)
            .map(Self)
            .ok_or(WadError::Underflow)
    }

    /// Subtraction for running-sum bookkeeping where `rhs` is known to be a
    /// constituent of `self` (it was added earlier and never removed). All
    /// fallible arithmetic goes through [`Self::checked_sub`] instead.
    pub(crate) fn unchecked_sub(self, rhs: Self) -> Self {
        debug_assert!(rhs <= self, "subtrahend was never part of this sum");
        Self(self.0.wrapping_sub(rhs.0))
    }

    /// Whole-unit count with floor semantics. Display only.
    pub fn floor_units(self) -> U256 {
        self.0 / WAD_ONE
    }

    /// Lossy conversion for rendering. Never feed the result back into
    /// aggregation.
    pub fn to_f64(self) -> f64 {
        let scaled = self
            .0
            .into_limbs()
            .iter()
            .rev()
            .fold(0.0_f64, |acc, &limb| acc * 2.0_f64.powi(64) + limb as f64);
        scaled / 1e18
    }
}

impl Add for Wad {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Wad {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Wad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.floor_units())
    }
}
