//! Currency amounts.
//!
//! Amounts are non-negative raw integers (u128), which covers the total supply
//! of the network with a wide margin. There is deliberately no `Add` impl:
//! every sum goes through [`Currency::checked_add`] so overflow is always
//! observed by the caller instead of wrapping or panicking.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative amount of currency, in the smallest unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Currency(u128);

impl Currency {
    pub const ZERO: Self = Self(0);

    pub fn new(raw: u128) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Sum an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
    {
        values
            .into_iter()
            .try_fold(Self::ZERO, |acc, v| acc.checked_add(v))
    }
}

impl From<u128> for Currency {
    fn from(raw: u128) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} H", self.0)
    }
}
