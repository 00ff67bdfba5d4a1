//! Fundamental types for the Skein wallet.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, identifiers, currency amounts, raw transactions and the
//! wallet-annotated processed transaction records.

pub mod address;
pub mod currency;
pub mod fund;
pub mod hash;
pub mod processed;
pub mod transaction;

pub use address::UnlockHash;
pub use currency::Currency;
pub use fund::FundType;
pub use hash::{FileContractId, TransactionId};
pub use processed::{ProcessedInput, ProcessedOutput, ProcessedTransaction};
pub use transaction::{FileContract, FileContractRevision, Transaction};

/// Height of a block in the canonical chain.
pub type BlockHeight = u64;

/// Sentinel confirmation height carried by transactions that are not yet in a block.
pub const UNCONFIRMED_HEIGHT: BlockHeight = u64::MAX;
