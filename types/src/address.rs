//! Unlock hash (address) type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte unlock hash identifying a spendable destination.
///
/// Whether the destination is controlled by this wallet is recorded per
/// input/output on the processed transaction, not on the address itself.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnlockHash([u8; 32]);

impl UnlockHash {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for UnlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnlockHash({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for UnlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
