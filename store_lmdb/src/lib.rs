//! LMDB storage backend for the Skein wallet history.
//!
//! Implements the traits from `skein-store` using the `heed` LMDB bindings.
//! The history lives in four named databases inside a single environment:
//!
//! - `processed_txns`: `sequence_be_u64(8)` → bincode `ProcessedTransaction`.
//!   Big-endian keys sort numerically, so cursor order is sequence order.
//! - `txn_index`: `transaction_id(32)` → `sequence_be_u64(8)`.
//! - `addr_txns`: composite key `address(32) ++ sequence_be_u64(8)` → empty.
//!   A prefix range scan yields one address's sequence numbers in ascending
//!   order, and re-inserting the same pair is a no-op.
//! - `meta`: schema version, sequence counter, last indexed height and the
//!   consensus height.

pub mod environment;
pub mod error;
pub mod history;
pub mod integrity;
mod meta;
pub mod migration;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use history::{LmdbHistoryReader, LmdbHistoryStore};
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
