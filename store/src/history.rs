//! Transaction history storage traits.
//!
//! The history is a primary index of confirmed transactions keyed by a dense
//! sequence number (starting at 1, assigned in confirmation order) plus two
//! secondary indexes: transaction id → sequence number and
//! address → ordered set of sequence numbers.
//!
//! Records are stored in non-decreasing confirmation height order. The range
//! query binary search depends on it, so [`HistoryStore::append_confirmed`]
//! refuses any record that would break the ordering.

use skein_types::{BlockHeight, ProcessedTransaction, TransactionId, UnlockHash};

use crate::StoreError;

/// Forward iteration over the primary index, in sequence order.
pub type HistoryScan<'a> =
    Box<dyn Iterator<Item = Result<(u64, ProcessedTransaction), StoreError>> + 'a>;

/// A consistent, read-only snapshot of the history indexes.
///
/// All reads through one reader observe the same committed state.
pub trait HistoryReader {
    /// Chain height the wallet has processed up to.
    fn consensus_height(&self) -> Result<BlockHeight, StoreError>;

    /// Highest assigned sequence number, 0 when the index is empty.
    fn last_sequence(&self) -> Result<u64, StoreError>;

    /// Number of records in the primary index.
    fn len(&self) -> Result<u64, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Fetch the record stored under `sequence`.
    ///
    /// Returns `Ok(None)` when no record exists and
    /// [`StoreError::Serialization`] when the stored bytes do not decode.
    fn get(&self, sequence: u64) -> Result<Option<ProcessedTransaction>, StoreError>;

    /// Open a cursor at the first record whose sequence number is
    /// `>= sequence` and walk forward from there.
    ///
    /// Each item decodes one record; a record that does not decode yields
    /// [`StoreError::Serialization`] without ending the scan.
    fn scan_from(&self, sequence: u64) -> Result<HistoryScan<'_>, StoreError>;

    /// Look up a sequence number through the transaction id index.
    fn sequence_of(&self, id: &TransactionId) -> Result<Option<u64>, StoreError>;

    /// Sequence numbers of every record touching `address`, ascending.
    fn address_sequences(&self, address: &UnlockHash) -> Result<Vec<u64>, StoreError>;
}

/// Durable storage of the confirmed transaction history.
pub trait HistoryStore: Send + Sync {
    type Reader<'a>: HistoryReader
    where
        Self: 'a;

    /// Open a read snapshot of the latest committed state.
    fn reader(&self) -> Result<Self::Reader<'_>, StoreError>;

    /// Flush committed state to durable media.
    fn sync(&self) -> Result<(), StoreError>;

    /// Append a confirmed transaction, returning its new sequence number.
    ///
    /// The primary record and both secondary indexes are written in one
    /// atomic transaction.
    fn append_confirmed(&self, pt: &ProcessedTransaction) -> Result<u64, StoreError>;

    /// Record the chain height the wallet has processed up to.
    fn set_consensus_height(&self, height: BlockHeight) -> Result<(), StoreError>;
}
