use skein_store::StoreError;
use skein_store_lmdb::LmdbError;
use skein_types::{BlockHeight, TransactionId};
use skein_utils::GateClosed;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("wallet is shutting down")]
    ShutDown,

    #[error(
        "requesting transactions at unknown confirmation heights: [{start}, {end}] with chain height {chain_height}"
    )]
    OutOfBounds {
        start: BlockHeight,
        end: BlockHeight,
        chain_height: BlockHeight,
    },

    #[error("corrupt transaction index: {0}")]
    CorruptIndex(#[from] CorruptIndex),

    #[error("transaction {0} is already confirmed")]
    AlreadyConfirmed(TransactionId),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("configuration error: {0}")]
    Config(String),
}

/// What exactly is wrong with the durable index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorruptIndex {
    #[error("record {sequence} is missing from the primary index")]
    MissingRecord { sequence: u64 },

    #[error("record {sequence} cannot be decoded: {reason}")]
    Undecodable { sequence: u64, reason: String },

    #[error("record {sequence} at height {height} is out of order (neighbouring height {neighbour_height})")]
    Unsorted {
        sequence: u64,
        height: BlockHeight,
        neighbour_height: BlockHeight,
    },
}

impl WalletError {
    /// Classify a store error raised while reading the record at `sequence`.
    ///
    /// Decode failures and backend-reported corruption become
    /// [`CorruptIndex::Undecodable`]; anything else stays a store error.
    pub(crate) fn reading(sequence: u64, err: StoreError) -> Self {
        match err {
            StoreError::Serialization(reason) | StoreError::Corruption(reason) => {
                WalletError::CorruptIndex(CorruptIndex::Undecodable { sequence, reason })
            }
            other => WalletError::Store(other),
        }
    }
}

impl From<GateClosed> for WalletError {
    fn from(_: GateClosed) -> Self {
        WalletError::ShutDown
    }
}

impl From<LmdbError> for WalletError {
    fn from(e: LmdbError) -> Self {
        WalletError::Store(e.into())
    }
}
