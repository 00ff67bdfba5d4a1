//! The wallet's transaction history API.
//!
//! [`Wallet`] owns the durable history store and the unconfirmed pool behind
//! one read/write lock. Queries take the read lock for their whole duration
//! and read through a single store snapshot, so a query never observes a
//! half-applied promotion. Pipeline mutations take the write lock.
//!
//! Every call registers with an [`OperationGate`]; once [`Wallet::close`] has
//! begun, new calls fail with [`WalletError::ShutDown`] and the close waits
//! for the calls already running.

use parking_lot::{RwLock, RwLockReadGuard};
use serde::Serialize;

use skein_store::{HistoryReader, HistoryStore, StoreError};
use skein_store_lmdb::{
    check_data_dir, check_integrity, LmdbEnvironment, LmdbHistoryStore, Migrator,
};
use skein_types::{BlockHeight, ProcessedTransaction, TransactionId, UnlockHash};
use skein_utils::OperationGate;

use crate::classify::SuperTransaction;
use crate::config::WalletConfig;
use crate::error::{CorruptIndex, WalletError};
use crate::pool::UnconfirmedPool;
use crate::range::query_range;

/// Why an address index entry was left out of an [`AddressHistory`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// The primary index holds no record under the sequence number.
    Missing,
    /// The record exists but does not decode.
    Undecodable(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub sequence: u64,
    pub reason: SkipReason,
}

/// Confirmed transactions touching one address.
///
/// Address lookups tolerate damaged records: anything the address index
/// points at but cannot be read is listed in `skipped` instead of failing
/// the whole lookup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AddressHistory {
    pub transactions: Vec<ProcessedTransaction>,
    pub skipped: Vec<SkippedEntry>,
}

impl AddressHistory {
    /// Whether every indexed record was returned.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

struct WalletState<S> {
    store: S,
    unconfirmed: UnconfirmedPool,
}

pub struct Wallet<S: HistoryStore> {
    state: RwLock<WalletState<S>>,
    gate: OperationGate,
    sync_before_read: bool,
}

impl Wallet<LmdbHistoryStore> {
    /// Open the LMDB-backed history described by `config`.
    ///
    /// Brings the on-disk schema up to date and, when configured, checks the
    /// indexes for damage. Damage is logged, not fatal: queries that run into
    /// it report [`WalletError::CorruptIndex`] themselves.
    pub fn open(config: &WalletConfig) -> Result<Self, WalletError> {
        if let Err(reason) = check_data_dir(&config.data_dir) {
            tracing::warn!(%reason, "data directory check failed");
        }

        let env = LmdbEnvironment::open(&config.data_dir, config.max_dbs, config.map_size)?;
        Migrator::run(&env)?;

        if config.verify_integrity_on_open {
            let report = check_integrity(&env)?;
            for error in &report.errors {
                tracing::warn!(%error, "history index integrity violation");
            }
            tracing::info!(
                records = report.records_checked,
                id_entries = report.id_entries_checked,
                address_entries = report.address_entries_checked,
                healthy = report.is_healthy(),
                "history integrity check complete"
            );
        }

        tracing::info!(data_dir = %config.data_dir.display(), "wallet history opened");
        Ok(Self::new(env.history_store(), config.sync_before_read))
    }
}

impl<S: HistoryStore> Wallet<S> {
    pub fn new(store: S, sync_before_read: bool) -> Self {
        Self {
            state: RwLock::new(WalletState {
                store,
                unconfirmed: UnconfirmedPool::new(),
            }),
            gate: OperationGate::new(),
            sync_before_read,
        }
    }

    /// Take the read lock, synchronising the store first if configured.
    fn read_state(&self) -> Result<RwLockReadGuard<'_, WalletState<S>>, WalletError> {
        let state = self.state.read();
        if self.sync_before_read {
            state.store.sync()?;
        }
        Ok(state)
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Confirmed transactions touching `address`, in confirmation order.
    pub fn address_transactions(&self, address: &UnlockHash) -> Result<AddressHistory, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.read_state()?;
        let reader = state.store.reader()?;

        let mut history = AddressHistory::default();
        for sequence in reader.address_sequences(address)? {
            let reason = match reader.get(sequence) {
                Ok(Some(pt)) => {
                    history.transactions.push(pt);
                    continue;
                }
                Ok(None) => SkipReason::Missing,
                Err(StoreError::Serialization(reason)) | Err(StoreError::Corruption(reason)) => {
                    SkipReason::Undecodable(reason)
                }
                Err(e) => return Err(e.into()),
            };
            tracing::warn!(%address, sequence, ?reason, "skipping unreadable address index entry");
            history.skipped.push(SkippedEntry { sequence, reason });
        }

        tracing::debug!(
            %address,
            found = history.transactions.len(),
            skipped = history.skipped.len(),
            "address history"
        );
        Ok(history)
    }

    /// Unconfirmed transactions touching `address`, in insertion order.
    pub fn address_unconfirmed_transactions(
        &self,
        address: &UnlockHash,
    ) -> Result<Vec<ProcessedTransaction>, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.read_state()?;
        Ok(state.unconfirmed.scan_by_address(address))
    }

    /// Look a transaction up by id, confirmed history first, then the pool.
    pub fn transaction(
        &self,
        id: &TransactionId,
    ) -> Result<Option<ProcessedTransaction>, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.read_state()?;
        let reader = state.store.reader()?;

        if let Some(sequence) = reader.sequence_of(id)? {
            return match reader.get(sequence) {
                Ok(Some(pt)) => Ok(Some(pt)),
                Ok(None) => Err(CorruptIndex::MissingRecord { sequence }.into()),
                Err(e) => Err(WalletError::reading(sequence, e)),
            };
        }
        Ok(state.unconfirmed.lookup(id).cloned())
    }

    /// Classified confirmed transactions with `start <= height <= end`.
    pub fn transactions(
        &self,
        start: BlockHeight,
        end: BlockHeight,
    ) -> Result<Vec<SuperTransaction>, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.read_state()?;
        let reader = state.store.reader()?;
        query_range(&reader, start, end)
    }

    /// Every pooled transaction, in insertion order.
    pub fn unconfirmed_transactions(&self) -> Result<Vec<ProcessedTransaction>, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.state.read();
        Ok(state.unconfirmed.snapshot())
    }

    /// Chain height the history has been processed up to.
    pub fn consensus_height(&self) -> Result<BlockHeight, WalletError> {
        let _op = self.gate.begin()?;
        let state = self.read_state()?;
        let height = state.store.reader()?.consensus_height()?;
        Ok(height)
    }

    // ── Pipeline ───────────────────────────────────────────────────────

    /// Add a newly observed transaction to the pool.
    ///
    /// Returns `false` if it is already pooled. A transaction that carries a
    /// confirmation height or is already in the confirmed history is refused.
    pub fn add_unconfirmed(&self, pt: ProcessedTransaction) -> Result<bool, WalletError> {
        let _op = self.gate.begin()?;
        if pt.is_confirmed() {
            return Err(WalletError::AlreadyConfirmed(pt.transaction_id));
        }
        let mut guard = self.state.write();
        let state = &mut *guard;
        if state.store.reader()?.sequence_of(&pt.transaction_id)?.is_some() {
            return Err(WalletError::AlreadyConfirmed(pt.transaction_id));
        }
        let id = pt.transaction_id;
        let added = state.unconfirmed.insert(pt);
        tracing::debug!(%id, added, pooled = state.unconfirmed.len(), "unconfirmed transaction");
        Ok(added)
    }

    /// Evict a transaction from the pool.
    pub fn remove_unconfirmed(
        &self,
        id: &TransactionId,
    ) -> Result<Option<ProcessedTransaction>, WalletError> {
        let _op = self.gate.begin()?;
        Ok(self.state.write().unconfirmed.remove(id))
    }

    /// Append a confirmed transaction to the history and drop any pooled
    /// copy, returning its sequence number.
    pub fn confirm(&self, pt: &ProcessedTransaction) -> Result<u64, WalletError> {
        let _op = self.gate.begin()?;
        let mut guard = self.state.write();
        let state = &mut *guard;
        let sequence = state.store.append_confirmed(pt)?;
        let was_pooled = state.unconfirmed.remove(&pt.transaction_id).is_some();
        tracing::debug!(
            id = %pt.transaction_id,
            height = pt.confirmation_height,
            sequence,
            was_pooled,
            "confirmed transaction"
        );
        Ok(sequence)
    }

    /// Move a pooled transaction into the confirmed history at `height`.
    ///
    /// Returns `None` when `id` is not pooled. The pool is left untouched if
    /// the append fails.
    pub fn promote(
        &self,
        id: &TransactionId,
        height: BlockHeight,
        timestamp: u64,
    ) -> Result<Option<u64>, WalletError> {
        let _op = self.gate.begin()?;
        let mut guard = self.state.write();
        let state = &mut *guard;
        let Some(pooled) = state.unconfirmed.lookup(id) else {
            return Ok(None);
        };
        let mut pt = pooled.clone();
        pt.confirmation_height = height;
        pt.confirmation_timestamp = timestamp;

        let sequence = state.store.append_confirmed(&pt)?;
        state.unconfirmed.remove(id);
        tracing::debug!(%id, height, sequence, "promoted transaction");
        Ok(Some(sequence))
    }

    pub fn set_consensus_height(&self, height: BlockHeight) -> Result<(), WalletError> {
        let _op = self.gate.begin()?;
        self.state.write().store.set_consensus_height(height)?;
        Ok(())
    }

    // ── Shutdown ───────────────────────────────────────────────────────

    /// Refuse new calls, wait for running ones, then flush the store.
    pub fn close(&self) -> Result<(), WalletError> {
        self.gate.close();
        self.state.read().store.sync()?;
        tracing::info!("wallet history closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.gate.is_closed()
    }
}
