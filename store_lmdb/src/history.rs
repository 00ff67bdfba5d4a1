//! LMDB implementation of HistoryStore.

use std::ops::Bound;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RoTxn};

use skein_store::{HistoryReader, HistoryScan, HistoryStore, StoreError};
use skein_types::{BlockHeight, ProcessedTransaction, TransactionId, UnlockHash};

use crate::meta::{self, CONSENSUS_HEIGHT_KEY, LAST_HEIGHT_KEY, SEQUENCE_KEY};
use crate::LmdbError;

/// Handles to the four history databases. Database handles are plain ids,
/// so the struct is freely copied into stores and readers.
#[derive(Clone, Copy)]
pub(crate) struct HistoryDbs {
    pub(crate) processed: Database<Bytes, Bytes>,
    pub(crate) txn_index: Database<Bytes, Bytes>,
    pub(crate) addr_txns: Database<Bytes, Bytes>,
    pub(crate) meta: Database<Bytes, Bytes>,
}

pub struct LmdbHistoryStore {
    pub(crate) env: Arc<Env>,
    pub(crate) dbs: HistoryDbs,
}

/// A read snapshot backed by an LMDB read transaction.
pub struct LmdbHistoryReader<'a> {
    txn: RoTxn<'a>,
    dbs: HistoryDbs,
}

/// Build the 40-byte composite key `address ++ sequence_be_u64` for `addr_txns`.
pub(crate) fn address_key(address: &UnlockHash, sequence: u64) -> [u8; 40] {
    let mut key = [0u8; 40];
    key[..32].copy_from_slice(address.as_bytes());
    key[32..].copy_from_slice(&sequence.to_be_bytes());
    key
}

pub(crate) fn decode_sequence(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes.try_into().map_err(|_| {
        LmdbError::Corruption(format!("sequence key has {} bytes, expected 8", bytes.len()))
    })?;
    Ok(u64::from_be_bytes(arr))
}

pub(crate) fn decode_record(sequence: u64, bytes: &[u8]) -> Result<ProcessedTransaction, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| {
        LmdbError::Serialization(format!("processed transaction {}: {}", sequence, e))
    })
}

fn decode_entry(
    entry: heed::Result<(&[u8], &[u8])>,
) -> Result<(u64, ProcessedTransaction), StoreError> {
    let (key, val) = entry.map_err(LmdbError::from)?;
    let sequence = decode_sequence(key)?;
    Ok((sequence, decode_record(sequence, val)?))
}

impl HistoryStore for LmdbHistoryStore {
    type Reader<'a> = LmdbHistoryReader<'a>;

    fn reader(&self) -> Result<Self::Reader<'_>, StoreError> {
        let txn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(LmdbHistoryReader {
            txn,
            dbs: self.dbs,
        })
    }

    fn sync(&self) -> Result<(), StoreError> {
        self.env.force_sync().map_err(LmdbError::from)?;
        Ok(())
    }

    fn append_confirmed(&self, pt: &ProcessedTransaction) -> Result<u64, StoreError> {
        if !pt.is_confirmed() {
            return Err(StoreError::Unconfirmed(pt.transaction_id));
        }

        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        if self
            .dbs
            .txn_index
            .get(&wtxn, pt.transaction_id.as_bytes())
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(pt.transaction_id));
        }

        let last = meta::get_u64(&self.dbs.meta, &wtxn, SEQUENCE_KEY)?.unwrap_or(0);
        if last > 0 {
            let last_height = meta::get_u64(&self.dbs.meta, &wtxn, LAST_HEIGHT_KEY)?.unwrap_or(0);
            if pt.confirmation_height < last_height {
                return Err(StoreError::OutOfOrder {
                    last: last_height,
                    attempted: pt.confirmation_height,
                });
            }
        }

        let sequence = last + 1;
        let seq_key = sequence.to_be_bytes();
        let bytes = bincode::serialize(pt).map_err(LmdbError::from)?;

        self.dbs
            .processed
            .put(&mut wtxn, &seq_key, &bytes)
            .map_err(LmdbError::from)?;
        self.dbs
            .txn_index
            .put(&mut wtxn, pt.transaction_id.as_bytes(), &seq_key)
            .map_err(LmdbError::from)?;
        for address in pt.related_addresses() {
            self.dbs
                .addr_txns
                .put(&mut wtxn, &address_key(&address, sequence), &[])
                .map_err(LmdbError::from)?;
        }
        meta::put_u64(&self.dbs.meta, &mut wtxn, SEQUENCE_KEY, sequence)?;
        meta::put_u64(
            &self.dbs.meta,
            &mut wtxn,
            LAST_HEIGHT_KEY,
            pt.confirmation_height,
        )?;

        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(
            sequence,
            txid = %pt.transaction_id,
            height = pt.confirmation_height,
            "indexed confirmed transaction"
        );
        Ok(sequence)
    }

    fn set_consensus_height(&self, height: BlockHeight) -> Result<(), StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        meta::put_u64(&self.dbs.meta, &mut wtxn, CONSENSUS_HEIGHT_KEY, height)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}

impl HistoryReader for LmdbHistoryReader<'_> {
    fn consensus_height(&self) -> Result<BlockHeight, StoreError> {
        Ok(meta::get_u64(&self.dbs.meta, &self.txn, CONSENSUS_HEIGHT_KEY)?.unwrap_or(0))
    }

    fn last_sequence(&self) -> Result<u64, StoreError> {
        Ok(meta::get_u64(&self.dbs.meta, &self.txn, SEQUENCE_KEY)?.unwrap_or(0))
    }

    fn len(&self) -> Result<u64, StoreError> {
        let count = self
            .dbs
            .processed
            .len(&self.txn)
            .map_err(LmdbError::from)?;
        Ok(count)
    }

    fn get(&self, sequence: u64) -> Result<Option<ProcessedTransaction>, StoreError> {
        let val = self
            .dbs
            .processed
            .get(&self.txn, &sequence.to_be_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode_record(sequence, bytes)?)),
            None => Ok(None),
        }
    }

    fn scan_from(&self, sequence: u64) -> Result<HistoryScan<'_>, StoreError> {
        let key = sequence.to_be_bytes();
        let bounds = (Bound::Included(&key[..]), Bound::<&[u8]>::Unbounded);
        let iter = self
            .dbs
            .processed
            .range(&self.txn, &bounds)
            .map_err(LmdbError::from)?;
        Ok(Box::new(iter.map(decode_entry)))
    }

    fn sequence_of(&self, id: &TransactionId) -> Result<Option<u64>, StoreError> {
        let val = self
            .dbs
            .txn_index
            .get(&self.txn, id.as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => Ok(Some(decode_sequence(bytes)?)),
            None => Ok(None),
        }
    }

    fn address_sequences(&self, address: &UnlockHash) -> Result<Vec<u64>, StoreError> {
        let lower = address_key(address, 0);
        let upper = address_key(address, u64::MAX);
        let bounds = (Bound::Included(&lower[..]), Bound::Included(&upper[..]));
        let iter = self
            .dbs
            .addr_txns
            .range(&self.txn, &bounds)
            .map_err(LmdbError::from)?;
        let mut results = Vec::new();
        for entry in iter {
            let (key, _) = entry.map_err(LmdbError::from)?;
            if key.len() != 40 {
                return Err(LmdbError::Corruption(format!(
                    "address index key has {} bytes, expected 40",
                    key.len()
                ))
                .into());
            }
            results.push(decode_sequence(&key[32..])?);
        }
        Ok(results)
    }
}
