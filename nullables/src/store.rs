//! Nullable history store: thread-safe in-memory storage for testing.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard};

use skein_store::{HistoryReader, HistoryScan, HistoryStore, StoreError};
use skein_types::{BlockHeight, ProcessedTransaction, TransactionId, UnlockHash};

/// A primary index slot. `Corrupt` stands in for bytes that no longer decode.
#[derive(Clone)]
enum Slot {
    Record(ProcessedTransaction),
    Corrupt,
}

#[derive(Default)]
struct State {
    records: BTreeMap<u64, Slot>,
    ids: HashMap<TransactionId, u64>,
    addresses: HashMap<UnlockHash, BTreeSet<u64>>,
    sequence: u64,
    last_height: BlockHeight,
    consensus_height: BlockHeight,
}

impl State {
    fn index(&mut self, pt: &ProcessedTransaction) -> u64 {
        self.sequence += 1;
        let sequence = self.sequence;
        self.ids.insert(pt.transaction_id, sequence);
        for address in pt.related_addresses() {
            self.addresses.entry(address).or_default().insert(sequence);
        }
        self.records.insert(sequence, Slot::Record(pt.clone()));
        self.last_height = pt.confirmation_height;
        sequence
    }
}

/// An in-memory history store with the same append rules as the LMDB backend,
/// plus hooks for simulating on-disk corruption.
pub struct NullHistoryStore {
    state: RwLock<State>,
    syncs: AtomicU64,
}

impl NullHistoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State::default()),
            syncs: AtomicU64::new(0),
        }
    }

    /// Number of times [`HistoryStore::sync`] has been called.
    pub fn sync_count(&self) -> u64 {
        self.syncs.load(Ordering::SeqCst)
    }

    /// Make the record under `sequence` undecodable.
    pub fn corrupt_record(&self, sequence: u64) {
        let mut state = self.state.write().unwrap();
        if let Some(slot) = state.records.get_mut(&sequence) {
            *slot = Slot::Corrupt;
        }
    }

    /// Remove the primary record under `sequence`, leaving both secondary
    /// indexes pointing at it.
    pub fn drop_record(&self, sequence: u64) {
        self.state.write().unwrap().records.remove(&sequence);
    }

    /// Append without the ordering and duplicate checks, as a damaged
    /// database might contain.
    pub fn insert_raw_unchecked(&self, pt: &ProcessedTransaction) -> u64 {
        self.state.write().unwrap().index(pt)
    }
}

impl Default for NullHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Read snapshot holding the store's read lock for its lifetime.
pub struct NullHistoryReader<'a> {
    state: RwLockReadGuard<'a, State>,
}

impl NullHistoryReader<'_> {
    fn decode(sequence: u64, slot: &Slot) -> Result<ProcessedTransaction, StoreError> {
        match slot {
            Slot::Record(pt) => Ok(pt.clone()),
            Slot::Corrupt => Err(StoreError::Serialization(format!(
                "processed transaction {}: corrupt record",
                sequence
            ))),
        }
    }
}

impl HistoryStore for NullHistoryStore {
    type Reader<'a> = NullHistoryReader<'a>;

    fn reader(&self) -> Result<Self::Reader<'_>, StoreError> {
        Ok(NullHistoryReader {
            state: self.state.read().unwrap(),
        })
    }

    fn sync(&self) -> Result<(), StoreError> {
        self.syncs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn append_confirmed(&self, pt: &ProcessedTransaction) -> Result<u64, StoreError> {
        if !pt.is_confirmed() {
            return Err(StoreError::Unconfirmed(pt.transaction_id));
        }
        let mut state = self.state.write().unwrap();
        if state.ids.contains_key(&pt.transaction_id) {
            return Err(StoreError::Duplicate(pt.transaction_id));
        }
        if state.sequence > 0 && pt.confirmation_height < state.last_height {
            return Err(StoreError::OutOfOrder {
                last: state.last_height,
                attempted: pt.confirmation_height,
            });
        }
        Ok(state.index(pt))
    }

    fn set_consensus_height(&self, height: BlockHeight) -> Result<(), StoreError> {
        self.state.write().unwrap().consensus_height = height;
        Ok(())
    }
}

impl HistoryReader for NullHistoryReader<'_> {
    fn consensus_height(&self) -> Result<BlockHeight, StoreError> {
        Ok(self.state.consensus_height)
    }

    fn last_sequence(&self) -> Result<u64, StoreError> {
        Ok(self.state.sequence)
    }

    fn len(&self) -> Result<u64, StoreError> {
        Ok(self.state.records.len() as u64)
    }

    fn get(&self, sequence: u64) -> Result<Option<ProcessedTransaction>, StoreError> {
        self.state
            .records
            .get(&sequence)
            .map(|slot| Self::decode(sequence, slot))
            .transpose()
    }

    fn scan_from(&self, sequence: u64) -> Result<HistoryScan<'_>, StoreError> {
        Ok(Box::new(self.state.records.range(sequence..).map(
            |(&found, slot)| Self::decode(found, slot).map(|pt| (found, pt)),
        )))
    }

    fn sequence_of(&self, id: &TransactionId) -> Result<Option<u64>, StoreError> {
        Ok(self.state.ids.get(id).copied())
    }

    fn address_sequences(&self, address: &UnlockHash) -> Result<Vec<u64>, StoreError> {
        Ok(self
            .state
            .addresses
            .get(address)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default())
    }
}
