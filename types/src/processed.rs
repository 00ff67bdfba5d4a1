//! Processed transactions: a raw transaction plus the per-input/output
//! annotations the wallet needs to reason about value.

use serde::{Deserialize, Serialize};

use crate::{
    BlockHeight, Currency, FundType, Transaction, TransactionId, UnlockHash, UNCONFIRMED_HEIGHT,
};

/// One consumed output, annotated for the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedInput {
    pub fund_type: FundType,
    pub related_address: UnlockHash,
    /// Whether `related_address` is owned by this wallet.
    pub wallet_address: bool,
    pub value: Currency,
}

/// One produced output, annotated for the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedOutput {
    pub fund_type: FundType,
    /// Height at which the output becomes spendable.
    pub maturity_height: BlockHeight,
    pub related_address: UnlockHash,
    /// Whether `related_address` is owned by this wallet.
    pub wallet_address: bool,
    pub value: Currency,
}

/// A transaction together with wallet-relevant annotations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedTransaction {
    pub transaction: Transaction,
    pub transaction_id: TransactionId,
    /// [`UNCONFIRMED_HEIGHT`] until the containing block is accepted.
    pub confirmation_height: BlockHeight,
    /// Unix seconds of the confirming block, 0 while unconfirmed.
    pub confirmation_timestamp: u64,
    pub inputs: Vec<ProcessedInput>,
    pub outputs: Vec<ProcessedOutput>,
}

impl ProcessedTransaction {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation_height != UNCONFIRMED_HEIGHT
    }

    /// Whether `address` appears on any input or output.
    pub fn touches(&self, address: &UnlockHash) -> bool {
        self.inputs.iter().any(|i| &i.related_address == address)
            || self.outputs.iter().any(|o| &o.related_address == address)
    }

    /// Every distinct address this transaction touches, in first-seen order.
    pub fn related_addresses(&self) -> Vec<UnlockHash> {
        let mut seen = Vec::new();
        let all = self
            .inputs
            .iter()
            .map(|i| i.related_address)
            .chain(self.outputs.iter().map(|o| o.related_address));
        for addr in all {
            if !seen.contains(&addr) {
                seen.push(addr);
            }
        }
        seen
    }
}
