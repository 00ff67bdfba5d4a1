//! Height-bounded range queries over the confirmed history.
//!
//! Records are appended in non-decreasing confirmation height order under
//! dense sequence numbers starting at 1, so the first record at or above a
//! start height can be found by binary search over the sequence numbers.
//! The matching records then follow contiguously and are collected with a
//! forward scan until the end height is passed.
//!
//! Every record read on the way is checked against that ordering. A gap in
//! the sequence, a record that does not decode, or a height that runs
//! backwards is reported as [`CorruptIndex`] rather than producing a wrong
//! answer.

use skein_store::HistoryReader;
use skein_types::{BlockHeight, ProcessedTransaction};

use crate::classify::{classify, SuperTransaction};
use crate::error::{CorruptIndex, WalletError};

/// Classified confirmed transactions with `start <= height <= end`, in
/// confirmation order.
pub fn query_range<R: HistoryReader>(
    reader: &R,
    start: BlockHeight,
    end: BlockHeight,
) -> Result<Vec<SuperTransaction>, WalletError> {
    let chain_height = reader.consensus_height()?;
    if start > chain_height || start > end {
        return Err(WalletError::OutOfBounds {
            start,
            end,
            chain_height,
        });
    }

    let next_key = reader.last_sequence()?.saturating_add(1);
    if next_key == 1 {
        return Ok(Vec::new());
    }

    let first = lower_bound(reader, start, next_key)?;
    if first == next_key {
        tracing::debug!(start, end, "no records at or above start height");
        return Ok(Vec::new());
    }

    let records = scan(reader, first, next_key, start, end)?;
    tracing::debug!(start, end, first, found = records.len(), "range query");
    Ok(records.into_iter().map(classify).collect())
}

/// Read the record that must exist under `sequence`.
fn record_at<R: HistoryReader>(
    reader: &R,
    sequence: u64,
) -> Result<ProcessedTransaction, WalletError> {
    match reader.get(sequence) {
        Ok(Some(pt)) => Ok(pt),
        Ok(None) => Err(CorruptIndex::MissingRecord { sequence }.into()),
        Err(e) => Err(WalletError::reading(sequence, e)),
    }
}

/// Smallest sequence number in `[1, next_key)` whose height is `>= start`,
/// or `next_key` when every record is below `start`.
fn lower_bound<R: HistoryReader>(
    reader: &R,
    start: BlockHeight,
    next_key: u64,
) -> Result<u64, WalletError> {
    let mut lo = 1;
    let mut hi = next_key;
    let mut probes: Vec<(u64, BlockHeight)> = Vec::new();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        let height = record_at(reader, mid)?.confirmation_height;
        probes.push((mid, height));
        if height >= start {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    // The probes are a sample of the index; their heights must be ordered
    // the same way as their sequence numbers.
    probes.sort_unstable_by_key(|&(sequence, _)| sequence);
    for pair in probes.windows(2) {
        let (_, previous) = pair[0];
        let (sequence, height) = pair[1];
        if height < previous {
            return Err(CorruptIndex::Unsorted {
                sequence,
                height,
                neighbour_height: previous,
            }
            .into());
        }
    }

    Ok(lo)
}

/// Collect records from `first` onwards until one passes `end`, walking a
/// single cursor over the primary index.
fn scan<R: HistoryReader>(
    reader: &R,
    first: u64,
    next_key: u64,
    start: BlockHeight,
    end: BlockHeight,
) -> Result<Vec<ProcessedTransaction>, WalletError> {
    let mut cursor = reader.scan_from(first)?;
    let mut records = Vec::new();
    let mut previous = start;

    for expected in first..next_key {
        let pt = match cursor.next() {
            Some(Ok((sequence, pt))) if sequence == expected => pt,
            Some(Ok(_)) | None => {
                return Err(CorruptIndex::MissingRecord { sequence: expected }.into())
            }
            Some(Err(e)) => return Err(WalletError::reading(expected, e)),
        };
        let height = pt.confirmation_height;
        if height < previous {
            return Err(CorruptIndex::Unsorted {
                sequence: expected,
                height,
                neighbour_height: previous,
            }
            .into());
        }
        if height > end {
            break;
        }
        previous = height;
        records.push(pt);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use skein_nullables::NullHistoryStore;
    use skein_store::{HistoryScan, HistoryStore, StoreError};
    use skein_types::{
        Currency, FundType, ProcessedOutput, Transaction, TransactionId, UnlockHash,
    };

    /// Counts how the range engine touches the primary index.
    struct CountingReader<R> {
        inner: R,
        point_reads: Cell<u64>,
        scans: Cell<u64>,
    }

    impl<R: HistoryReader> HistoryReader for CountingReader<R> {
        fn consensus_height(&self) -> Result<BlockHeight, StoreError> {
            self.inner.consensus_height()
        }

        fn last_sequence(&self) -> Result<u64, StoreError> {
            self.inner.last_sequence()
        }

        fn len(&self) -> Result<u64, StoreError> {
            self.inner.len()
        }

        fn get(&self, sequence: u64) -> Result<Option<ProcessedTransaction>, StoreError> {
            self.point_reads.set(self.point_reads.get() + 1);
            self.inner.get(sequence)
        }

        fn scan_from(&self, sequence: u64) -> Result<HistoryScan<'_>, StoreError> {
            self.scans.set(self.scans.get() + 1);
            self.inner.scan_from(sequence)
        }

        fn sequence_of(&self, id: &TransactionId) -> Result<Option<u64>, StoreError> {
            self.inner.sequence_of(id)
        }

        fn address_sequences(&self, address: &UnlockHash) -> Result<Vec<u64>, StoreError> {
            self.inner.address_sequences(address)
        }
    }

    fn payout(id: u8, height: BlockHeight) -> ProcessedTransaction {
        ProcessedTransaction {
            transaction: Transaction::default(),
            transaction_id: TransactionId::new([id; 32]),
            confirmation_height: height,
            confirmation_timestamp: 1_500_000_000 + height,
            inputs: vec![],
            outputs: vec![ProcessedOutput {
                fund_type: FundType::MinerPayout,
                maturity_height: height + 144,
                related_address: UnlockHash::new([1; 32]),
                wallet_address: true,
                value: Currency::new(u128::from(id)),
            }],
        }
    }

    fn store_with(heights: &[BlockHeight], chain_height: BlockHeight) -> NullHistoryStore {
        let store = NullHistoryStore::new();
        for (i, &height) in heights.iter().enumerate() {
            store.append_confirmed(&payout(i as u8 + 1, height)).unwrap();
        }
        store.set_consensus_height(chain_height).unwrap();
        store
    }

    fn ids(result: &[SuperTransaction]) -> Vec<u8> {
        result
            .iter()
            .map(|st| st.processed.transaction_id.as_bytes()[0])
            .collect()
    }

    #[test]
    fn empty_index_returns_nothing() {
        let store = store_with(&[], 20);
        let reader = store.reader().unwrap();
        assert!(query_range(&reader, 0, 20).unwrap().is_empty());
    }

    #[test]
    fn ties_keep_confirmation_order() {
        let store = store_with(&[10, 10, 12, 15], 15);
        let reader = store.reader().unwrap();
        assert_eq!(ids(&query_range(&reader, 10, 12).unwrap()), vec![1, 2, 3]);
        assert_eq!(ids(&query_range(&reader, 0, 100).unwrap()), vec![1, 2, 3, 4]);
        assert_eq!(ids(&query_range(&reader, 15, 15).unwrap()), vec![4]);
    }

    #[test]
    fn gap_between_heights_is_empty() {
        let store = store_with(&[10, 10, 12, 15], 15);
        let reader = store.reader().unwrap();
        assert!(query_range(&reader, 13, 14).unwrap().is_empty());
        assert!(query_range(&reader, 11, 11).unwrap().is_empty());
    }

    #[test]
    fn start_above_every_record_is_empty() {
        let store = store_with(&[3, 4], 30);
        let reader = store.reader().unwrap();
        assert!(query_range(&reader, 5, 30).unwrap().is_empty());
    }

    #[test]
    fn out_of_bounds() {
        let store = store_with(&[10, 10, 12, 15], 15);
        let reader = store.reader().unwrap();
        assert!(matches!(
            query_range(&reader, 16, 10),
            Err(WalletError::OutOfBounds { start: 16, end: 10, chain_height: 15 })
        ));
        assert!(matches!(
            query_range(&reader, 16, 20),
            Err(WalletError::OutOfBounds { .. })
        ));
        assert!(matches!(
            query_range(&reader, 12, 11),
            Err(WalletError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn results_are_classified() {
        let store = store_with(&[7], 7);
        let reader = store.reader().unwrap();
        let result = query_range(&reader, 7, 7).unwrap();
        assert_eq!(result[0].confirmed_incoming_value, Currency::new(1));
        assert!(result[0].is_value_known());
    }

    #[test]
    fn undecodable_record_in_search_path() {
        let store = store_with(&[1, 2, 3, 4, 5, 6, 7], 7);
        // 4 is the first probe of a search over [1, 8).
        store.corrupt_record(4);
        let reader = store.reader().unwrap();
        let err = query_range(&reader, 2, 7).unwrap_err();
        assert!(matches!(
            err,
            WalletError::CorruptIndex(CorruptIndex::Undecodable { sequence: 4, .. })
        ));
    }

    #[test]
    fn missing_record_in_scan() {
        let store = store_with(&[1, 2, 3, 4, 5, 6, 7], 7);
        store.drop_record(6);
        let reader = store.reader().unwrap();
        // The scan stops at record 5 and never reaches the gap.
        assert_eq!(ids(&query_range(&reader, 1, 4).unwrap()), vec![1, 2, 3, 4]);
        assert!(matches!(
            query_range(&reader, 4, 7),
            Err(WalletError::CorruptIndex(CorruptIndex::MissingRecord { sequence: 6 }))
        ));
    }

    #[test]
    fn unsorted_record_in_scan() {
        let store = store_with(&[5, 6, 7], 20);
        store.insert_raw_unchecked(&payout(4, 3));
        let reader = store.reader().unwrap();
        assert!(matches!(
            query_range(&reader, 5, 20),
            Err(WalletError::CorruptIndex(CorruptIndex::Unsorted {
                sequence: 4,
                height: 3,
                neighbour_height: 7,
            }))
        ));
    }

    #[test]
    fn unsorted_probes_are_detected() {
        // Searching for 10 over [1, 6) probes 3, 2 and 1.
        let store = NullHistoryStore::new();
        for (id, height) in [(1, 0), (2, 60), (3, 50), (4, 70), (5, 80)] {
            store.insert_raw_unchecked(&payout(id, height));
        }
        store.set_consensus_height(80).unwrap();
        let reader = store.reader().unwrap();
        assert!(matches!(
            query_range(&reader, 10, 80),
            Err(WalletError::CorruptIndex(CorruptIndex::Unsorted {
                sequence: 3,
                height: 50,
                neighbour_height: 60,
            }))
        ));
    }

    #[test]
    fn scan_uses_one_cursor() {
        let store = NullHistoryStore::new();
        for i in 0..1024u16 {
            let mut pt = payout(0, u64::from(i / 2));
            let mut id = [0u8; 32];
            id[..2].copy_from_slice(&(i + 1).to_be_bytes());
            pt.transaction_id = TransactionId::new(id);
            store.append_confirmed(&pt).unwrap();
        }
        store.set_consensus_height(2000).unwrap();

        let reader = CountingReader {
            inner: store.reader().unwrap(),
            point_reads: Cell::new(0),
            scans: Cell::new(0),
        };
        assert_eq!(query_range(&reader, 0, 2000).unwrap().len(), 1024);
        assert_eq!(reader.scans.get(), 1);
        // Only the binary search reads single records.
        assert!(reader.point_reads.get() <= 11, "{} point reads", reader.point_reads.get());
    }
}
