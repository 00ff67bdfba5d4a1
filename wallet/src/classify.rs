//! Value classification of processed transactions.
//!
//! Turns a [`ProcessedTransaction`] into a [`SuperTransaction`] carrying the
//! value the wallet received and sent. Storage contracts lock collateral into
//! escrow on chain rather than paying anyone, so naive input/output summation
//! misattributes their value; contracts and revisions are handled as special
//! cases here instead of in every caller.

use serde::{Deserialize, Serialize};

use skein_types::{Currency, FundType, ProcessedTransaction};

/// Why the value figures of a transaction cannot be trusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnsupportedReason {
    /// The transaction revises a storage contract. Revision value is not
    /// modelled yet.
    ContractRevision,
    /// A value sum exceeded the currency range.
    ValueOverflow,
}

/// How complete the value figures on a [`SuperTransaction`] are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Valuation {
    /// Plain transaction: both figures are exact.
    Complete,
    /// Forms one or more storage contracts. Incoming value is zero; outgoing
    /// value still includes the funding inputs, which overstates what left
    /// the wallet for good.
    ContractFormation,
    /// Both figures are zero and must not be relied on.
    Unsupported(UnsupportedReason),
}

/// A processed transaction annotated with the wallet's confirmed value flow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperTransaction {
    pub processed: ProcessedTransaction,
    /// Total received by wallet-owned addresses.
    pub confirmed_incoming_value: Currency,
    /// Total sent from wallet-owned addresses.
    pub confirmed_outgoing_value: Currency,
    pub valuation: Valuation,
}

impl SuperTransaction {
    /// Whether the value figures can be shown to a user.
    pub fn is_value_known(&self) -> bool {
        !matches!(self.valuation, Valuation::Unsupported(_))
    }
}

/// Classify a processed transaction. Never fails; shapes that cannot be
/// valued are reported through [`Valuation::Unsupported`].
pub fn classify(pt: ProcessedTransaction) -> SuperTransaction {
    let outgoing = Currency::checked_sum(
        pt.inputs
            .iter()
            .filter(|i| i.fund_type == FundType::CurrencyInput && i.wallet_address)
            .map(|i| i.value),
    );
    let incoming = Currency::checked_sum(
        pt.outputs
            .iter()
            .filter(|o| {
                matches!(o.fund_type, FundType::MinerPayout | FundType::CurrencyOutput)
                    && o.wallet_address
            })
            .map(|o| o.value),
    );

    let has_contracts = pt.transaction.has_contracts();
    let has_revisions = pt.transaction.has_revisions();

    let (incoming, outgoing, valuation) = match (incoming, outgoing) {
        _ if has_revisions => (
            Currency::ZERO,
            Currency::ZERO,
            Valuation::Unsupported(UnsupportedReason::ContractRevision),
        ),
        (_, Some(outgoing)) if has_contracts => {
            (Currency::ZERO, outgoing, Valuation::ContractFormation)
        }
        (Some(incoming), Some(outgoing)) => (incoming, outgoing, Valuation::Complete),
        _ => (
            Currency::ZERO,
            Currency::ZERO,
            Valuation::Unsupported(UnsupportedReason::ValueOverflow),
        ),
    };

    SuperTransaction {
        processed: pt,
        confirmed_incoming_value: incoming,
        confirmed_outgoing_value: outgoing,
        valuation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_types::{
        FileContract, FileContractRevision, ProcessedInput, ProcessedOutput, Transaction,
        TransactionId, UnlockHash,
    };

    fn input(fund_type: FundType, wallet: bool, value: u128) -> ProcessedInput {
        ProcessedInput {
            fund_type,
            related_address: UnlockHash::new([1; 32]),
            wallet_address: wallet,
            value: Currency::new(value),
        }
    }

    fn output(fund_type: FundType, wallet: bool, value: u128) -> ProcessedOutput {
        ProcessedOutput {
            fund_type,
            maturity_height: 0,
            related_address: UnlockHash::new([2; 32]),
            wallet_address: wallet,
            value: Currency::new(value),
        }
    }

    fn txn(inputs: Vec<ProcessedInput>, outputs: Vec<ProcessedOutput>) -> ProcessedTransaction {
        ProcessedTransaction {
            transaction: Transaction::default(),
            transaction_id: TransactionId::new([3; 32]),
            confirmation_height: 7,
            confirmation_timestamp: 0,
            inputs,
            outputs,
        }
    }

    #[test]
    fn wallet_input_only_is_outgoing() {
        let st = classify(txn(vec![input(FundType::CurrencyInput, true, 500)], vec![]));
        assert_eq!(st.confirmed_outgoing_value, Currency::new(500));
        assert_eq!(st.confirmed_incoming_value, Currency::ZERO);
        assert_eq!(st.valuation, Valuation::Complete);
    }

    #[test]
    fn only_wallet_owned_currency_counts() {
        let st = classify(txn(
            vec![
                input(FundType::CurrencyInput, true, 100),
                input(FundType::CurrencyInput, false, 1_000),
            ],
            vec![
                output(FundType::CurrencyOutput, true, 30),
                output(FundType::MinerPayout, true, 20),
                output(FundType::CurrencyOutput, false, 900),
                output(FundType::MinerFee, true, 5),
                output(FundType::ClaimOutput, true, 7),
            ],
        ));
        assert_eq!(st.confirmed_outgoing_value, Currency::new(100));
        assert_eq!(st.confirmed_incoming_value, Currency::new(50));
    }

    #[test]
    fn incoming_and_outgoing_are_not_netted() {
        let st = classify(txn(
            vec![input(FundType::CurrencyInput, true, 100)],
            vec![output(FundType::CurrencyOutput, true, 60)],
        ));
        assert_eq!(st.confirmed_outgoing_value, Currency::new(100));
        assert_eq!(st.confirmed_incoming_value, Currency::new(60));
    }

    #[test]
    fn contract_formation_zeroes_incoming_only() {
        let mut pt = txn(
            vec![input(FundType::CurrencyInput, true, 400)],
            vec![output(FundType::CurrencyOutput, true, 150)],
        );
        pt.transaction.file_contracts.push(FileContract {
            payout: Currency::new(250),
            ..FileContract::default()
        });
        let st = classify(pt);
        assert_eq!(st.confirmed_incoming_value, Currency::ZERO);
        assert_eq!(st.confirmed_outgoing_value, Currency::new(400));
        assert_eq!(st.valuation, Valuation::ContractFormation);
        assert!(st.is_value_known());
    }

    #[test]
    fn revision_is_unsupported_and_zeroed() {
        let mut pt = txn(
            vec![input(FundType::CurrencyInput, true, 400)],
            vec![output(FundType::CurrencyOutput, true, 150)],
        );
        pt.transaction
            .file_contract_revisions
            .push(FileContractRevision::default());
        let st = classify(pt);
        assert_eq!(st.confirmed_incoming_value, Currency::ZERO);
        assert_eq!(st.confirmed_outgoing_value, Currency::ZERO);
        assert_eq!(
            st.valuation,
            Valuation::Unsupported(UnsupportedReason::ContractRevision)
        );
        assert!(!st.is_value_known());
    }

    #[test]
    fn revision_wins_over_formation() {
        let mut pt = txn(vec![input(FundType::CurrencyInput, true, 1)], vec![]);
        pt.transaction.file_contracts.push(FileContract::default());
        pt.transaction
            .file_contract_revisions
            .push(FileContractRevision::default());
        assert_eq!(
            classify(pt).valuation,
            Valuation::Unsupported(UnsupportedReason::ContractRevision)
        );
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let st = classify(txn(
            vec![],
            vec![
                output(FundType::CurrencyOutput, true, u128::MAX),
                output(FundType::CurrencyOutput, true, 1),
            ],
        ));
        assert_eq!(
            st.valuation,
            Valuation::Unsupported(UnsupportedReason::ValueOverflow)
        );
        assert_eq!(st.confirmed_incoming_value, Currency::ZERO);
    }

    #[test]
    fn super_transaction_serializes_valuation() {
        let st = classify(txn(vec![input(FundType::CurrencyInput, true, 9)], vec![]));
        let json = serde_json::to_value(&st).unwrap();
        assert_eq!(json["valuation"], "Complete");
        assert_eq!(json["confirmed_outgoing_value"], 9);
    }
}
