//! Raw transaction bodies as handed to the wallet by consensus.
//!
//! Only the parts the wallet inspects are modelled: storage contract
//! formations and revisions, miner fees and arbitrary data.

use serde::{Deserialize, Serialize};

use crate::{BlockHeight, Currency, FileContractId, UnlockHash};

/// A storage contract formed between a renter and a host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContract {
    pub file_size: u64,
    pub file_merkle_root: [u8; 32],
    pub window_start: BlockHeight,
    pub window_end: BlockHeight,
    /// Total collateral and payment locked into the contract.
    pub payout: Currency,
    pub unlock_hash: UnlockHash,
    pub revision_number: u64,
}

/// A revision of an existing storage contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContractRevision {
    pub parent_id: FileContractId,
    pub new_revision_number: u64,
    pub new_file_size: u64,
    pub new_file_merkle_root: [u8; 32],
    pub new_window_start: BlockHeight,
    pub new_window_end: BlockHeight,
    pub new_unlock_hash: UnlockHash,
}

/// The underlying raw transaction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub file_contracts: Vec<FileContract>,
    #[serde(default)]
    pub file_contract_revisions: Vec<FileContractRevision>,
    #[serde(default)]
    pub miner_fees: Vec<Currency>,
    #[serde(default)]
    pub arbitrary_data: Vec<Vec<u8>>,
}

impl Transaction {
    pub fn has_contracts(&self) -> bool {
        !self.file_contracts.is_empty()
    }

    pub fn has_revisions(&self) -> bool {
        !self.file_contract_revisions.is_empty()
    }
}
