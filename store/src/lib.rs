//! Abstract storage traits for the Skein wallet history.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The wallet depends only on the traits.

pub mod error;
pub mod history;

pub use error::StoreError;
pub use history::{HistoryReader, HistoryScan, HistoryStore};
