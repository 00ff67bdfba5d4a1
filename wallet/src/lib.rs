//! Wallet transaction history for a Skein storage node.
//!
//! Provides everything callers need to inspect the wallet's activity:
//! - Durable history of confirmed transactions with id and address lookups
//! - Height-bounded range queries over the confirmed history
//! - The in-memory pool of unconfirmed transactions
//! - Classification of each transaction's incoming and outgoing value

pub mod classify;
pub mod config;
pub mod error;
pub mod pool;
pub mod range;
pub mod wallet;

pub use classify::{classify, SuperTransaction, UnsupportedReason, Valuation};
pub use config::WalletConfig;
pub use error::{CorruptIndex, WalletError};
pub use pool::UnconfirmedPool;
pub use range::query_range;
pub use wallet::{AddressHistory, SkipReason, SkippedEntry, Wallet};
