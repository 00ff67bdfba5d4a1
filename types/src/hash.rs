//! Identifier types for transactions and storage contracts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte transaction identifier, stable per underlying transaction.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId([u8; 32]);

impl TransactionId {
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TransactionId({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A 32-byte storage contract identifier.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FileContractId([u8; 32]);

impl FileContractId {
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for FileContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileContractId({}\u{2026})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for FileContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnlockHash;

    #[test]
    fn debug_is_abbreviated_the_same_way_for_every_id() {
        let bytes = [0xab; 32];
        assert_eq!(format!("{:?}", TransactionId::new(bytes)), "TransactionId(abababab\u{2026})");
        assert_eq!(format!("{:?}", FileContractId::new(bytes)), "FileContractId(abababab\u{2026})");
        assert_eq!(format!("{:?}", UnlockHash::new(bytes)), "UnlockHash(abababab\u{2026})");
    }
}
