//! In-memory pool of unconfirmed transactions.
//!
//! Insertion order is preserved and is the only ordering guarantee: nothing
//! in the pool has a confirmation height yet. Lookups are linear scans; the
//! pool only ever holds the wallet's own pending activity.

use skein_types::{ProcessedTransaction, TransactionId, UnlockHash};

#[derive(Debug, Default)]
pub struct UnconfirmedPool {
    transactions: Vec<ProcessedTransaction>,
}

impl UnconfirmedPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a transaction. Returns `false` if one with the same id is already
    /// pooled.
    pub fn insert(&mut self, pt: ProcessedTransaction) -> bool {
        if self.contains(&pt.transaction_id) {
            return false;
        }
        self.transactions.push(pt);
        true
    }

    /// Remove a transaction, keeping the order of the rest.
    pub fn remove(&mut self, id: &TransactionId) -> Option<ProcessedTransaction> {
        let index = self
            .transactions
            .iter()
            .position(|pt| &pt.transaction_id == id)?;
        Some(self.transactions.remove(index))
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.transactions.iter().any(|pt| &pt.transaction_id == id)
    }

    pub fn lookup(&self, id: &TransactionId) -> Option<&ProcessedTransaction> {
        self.transactions.iter().find(|pt| &pt.transaction_id == id)
    }

    /// Every pooled transaction with `address` on at least one input or output.
    pub fn scan_by_address(&self, address: &UnlockHash) -> Vec<ProcessedTransaction> {
        self.transactions
            .iter()
            .filter(|pt| pt.touches(address))
            .cloned()
            .collect()
    }

    pub fn snapshot(&self) -> Vec<ProcessedTransaction> {
        self.transactions.clone()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
