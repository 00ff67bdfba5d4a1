use proptest::prelude::*;

use skein_nullables::NullHistoryStore;
use skein_store::HistoryStore;
use skein_types::{
    BlockHeight, Currency, FundType, ProcessedOutput, ProcessedTransaction, Transaction,
    TransactionId, UnlockHash,
};
use skein_wallet::{Wallet, WalletError};

fn record(index: u16, height: BlockHeight) -> ProcessedTransaction {
    let mut id = [0u8; 32];
    id[..2].copy_from_slice(&index.to_be_bytes());
    ProcessedTransaction {
        transaction: Transaction::default(),
        transaction_id: TransactionId::new(id),
        confirmation_height: height,
        confirmation_timestamp: height,
        inputs: vec![],
        outputs: vec![ProcessedOutput {
            fund_type: FundType::CurrencyOutput,
            maturity_height: 0,
            related_address: UnlockHash::new([(index % 7) as u8; 32]),
            wallet_address: true,
            value: Currency::new(1),
        }],
    }
}

/// Non-decreasing heights, as the promotion pipeline produces them.
fn sorted_heights() -> impl Strategy<Value = Vec<BlockHeight>> {
    prop::collection::vec(0u64..40, 0..60).prop_map(|mut heights| {
        heights.sort_unstable();
        heights
    })
}

fn build(heights: &[BlockHeight], chain_height: BlockHeight) -> (Wallet<NullHistoryStore>, Vec<ProcessedTransaction>) {
    let store = NullHistoryStore::new();
    let records: Vec<_> = heights
        .iter()
        .enumerate()
        .map(|(i, &h)| record(i as u16, h))
        .collect();
    for pt in &records {
        store.append_confirmed(pt).unwrap();
    }
    store.set_consensus_height(chain_height).unwrap();
    (Wallet::new(store, false), records)
}

proptest! {
    /// Every returned record lies inside the range, in non-decreasing height order.
    #[test]
    fn range_is_sorted_and_bounded(
        heights in sorted_heights(),
        lo in 0u64..45,
        span in 0u64..45,
    ) {
        let (wallet, _) = build(&heights, 45);
        let hi = lo + span;
        let result = wallet.transactions(lo, hi).unwrap();
        for st in &result {
            let h = st.processed.confirmation_height;
            prop_assert!(lo <= h && h <= hi, "height {} outside [{}, {}]", h, lo, hi);
        }
        for pair in result.windows(2) {
            prop_assert!(pair[0].processed.confirmation_height <= pair[1].processed.confirmation_height);
        }
    }

    /// The range returns exactly the indexed records in range, in confirmation order.
    #[test]
    fn range_matches_linear_filter(
        heights in sorted_heights(),
        lo in 0u64..45,
        span in 0u64..45,
    ) {
        let (wallet, records) = build(&heights, 45);
        let hi = lo + span;
        let expected: Vec<TransactionId> = records
            .iter()
            .filter(|pt| lo <= pt.confirmation_height && pt.confirmation_height <= hi)
            .map(|pt| pt.transaction_id)
            .collect();
        let actual: Vec<TransactionId> = wallet
            .transactions(lo, hi)
            .unwrap()
            .iter()
            .map(|st| st.processed.transaction_id)
            .collect();
        prop_assert_eq!(actual, expected);
    }

    /// Starts above the chain height or past the end are rejected.
    #[test]
    fn invalid_ranges_are_out_of_bounds(
        heights in sorted_heights(),
        chain_height in 0u64..40,
        lo in 0u64..80,
        hi in 0u64..80,
    ) {
        let (wallet, _) = build(&heights, chain_height);
        let result = wallet.transactions(lo, hi);
        if lo > chain_height || lo > hi {
            let is_out_of_bounds = matches!(result, Err(WalletError::OutOfBounds { .. }));
            prop_assert!(is_out_of_bounds);
        } else {
            prop_assert!(result.is_ok());
        }
    }

    /// Address lookups return every record touching the address, none skipped.
    #[test]
    fn address_history_is_complete(heights in sorted_heights(), which in 0u8..7) {
        let (wallet, records) = build(&heights, 45);
        let address = UnlockHash::new([which; 32]);
        let history = wallet.address_transactions(&address).unwrap();
        let expected: Vec<_> = records.into_iter().filter(|pt| pt.touches(&address)).collect();
        prop_assert!(history.is_complete());
        prop_assert_eq!(history.transactions, expected);
    }
}
