use skein_types::{BlockHeight, TransactionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate transaction id: {0}")]
    Duplicate(TransactionId),

    #[error("transaction {0} has no confirmation height")]
    Unconfirmed(TransactionId),

    #[error("confirmation height {attempted} is below the last indexed height {last}")]
    OutOfOrder {
        last: BlockHeight,
        attempted: BlockHeight,
    },

    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database is corrupted: {0}")]
    Corruption(String),
}
