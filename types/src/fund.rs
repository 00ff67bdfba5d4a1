//! Fund type tags attached to processed inputs and outputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Distinguishes where a processed input or output came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundType {
    /// A spent currency output.
    CurrencyInput,
    /// A created currency output.
    CurrencyOutput,
    /// Block reward paid to a miner payout address.
    MinerPayout,
    /// Fee paid to miners by the transaction.
    MinerFee,
    /// Payout of a storage contract whose storage proof succeeded.
    ValidProofOutput,
    /// Payout of a storage contract whose storage proof was missed.
    MissedProofOutput,
    /// Claim paid out to a fund holder.
    ClaimOutput,
}

impl FundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FundType::CurrencyInput => "currency input",
            FundType::CurrencyOutput => "currency output",
            FundType::MinerPayout => "miner payout",
            FundType::MinerFee => "miner fee",
            FundType::ValidProofOutput => "valid proof output",
            FundType::MissedProofOutput => "missed proof output",
            FundType::ClaimOutput => "claim output",
        }
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
