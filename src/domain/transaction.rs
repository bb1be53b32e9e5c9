//! Call descriptors bundled into one proxy-executed batch.

use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Serialize;

/// What a [`TransactionStep`] does. Used for logging and auditing a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Wrap,
    Approve,
    ApproveForAll,
    Transfer,
    Buy,
    Sell,
    AskQuestion,
    AnnounceCondition,
    PrepareCondition,
    CreateMarket,
    AddFunding,
    RemoveFunding,
    MergePositions,
    ResolveCondition,
    ClaimWinnings,
    RedeemPositions,
    Unwrap,
    Withdraw,
    WithdrawBond,
    SubmitAnswer,
    RelayFee,
    Bridge,
    UpgradeProxy,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wrap => "wrap",
            Self::Approve => "approve",
            Self::ApproveForAll => "approve_for_all",
            Self::Transfer => "transfer",
            Self::Buy => "buy",
            Self::Sell => "sell",
            Self::AskQuestion => "ask_question",
            Self::AnnounceCondition => "announce_condition",
            Self::PrepareCondition => "prepare_condition",
            Self::CreateMarket => "create_market",
            Self::AddFunding => "add_funding",
            Self::RemoveFunding => "remove_funding",
            Self::MergePositions => "merge_positions",
            Self::ResolveCondition => "resolve_condition",
            Self::ClaimWinnings => "claim_winnings",
            Self::RedeemPositions => "redeem_positions",
            Self::Unwrap => "unwrap",
            Self::Withdraw => "withdraw",
            Self::WithdrawBond => "withdraw_bond",
            Self::SubmitAnswer => "submit_answer",
            Self::RelayFee => "relay_fee",
            Self::Bridge => "bridge",
            Self::UpgradeProxy => "upgrade_proxy",
        };
        f.write_str(name)
    }
}

/// One call to be bundled into a batch. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionStep {
    kind: StepKind,
    to: Address,
    data: Bytes,
    value: Option<U256>,
}

impl TransactionStep {
    /// A contract call without native value.
    #[must_use]
    pub fn call(kind: StepKind, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            kind,
            to,
            data: data.into(),
            value: None,
        }
    }

    /// A contract call carrying native value.
    #[must_use]
    pub fn call_with_value(
        kind: StepKind,
        to: Address,
        data: impl Into<Bytes>,
        value: U256,
    ) -> Self {
        Self {
            kind,
            to,
            data: data.into(),
            value: Some(value),
        }
    }

    /// A plain native-asset transfer.
    #[must_use]
    pub fn send_value(kind: StepKind, to: Address, value: U256) -> Self {
        Self {
            kind,
            to,
            data: Bytes::new(),
            value: Some(value),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> StepKind {
        self.kind
    }

    #[must_use]
    pub const fn to(&self) -> Address {
        self.to
    }

    #[must_use]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    #[must_use]
    pub const fn value(&self) -> Option<U256> {
        self.value
    }

    /// Native value, zero when absent.
    #[must_use]
    pub fn value_or_zero(&self) -> U256 {
        self.value.unwrap_or(U256::ZERO)
    }
}

/// Batch-level transaction options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TxOptions {
    /// Native value sent along with the batch (funds the proxy).
    pub value: Option<U256>,
    /// Explicit gas limit.
    pub gas: Option<u64>,
}

/// What the proxy returned when a batch was submitted.
///
/// Direct submissions carry a transaction hash; Safe submissions may only
/// carry a Safe transaction hash that is resolved later.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub hash: Option<B256>,
    pub safe_tx_hash: Option<B256>,
}

/// Inclusion receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Final result of waiting for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Confirmation {
    /// Mined and indexed.
    Confirmed(Receipt),
    /// A multisig needs more signatures; nothing more to wait for here.
    PendingSignatures { safe_tx_hash: Option<B256> },
}

impl Confirmation {
    /// The receipt, when the transaction was mined.
    #[must_use]
    pub const fn receipt(&self) -> Option<&Receipt> {
        match self {
            Self::Confirmed(receipt) => Some(receipt),
            Self::PendingSignatures { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::PendingSignatures { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_defaults_to_zero() {
        let step = TransactionStep::call(StepKind::Approve, Address::ZERO, Bytes::new());
        assert_eq!(step.value(), None);
        assert_eq!(step.value_or_zero(), U256::ZERO);

        let send = TransactionStep::send_value(StepKind::Withdraw, Address::ZERO, U256::from(7));
        assert_eq!(send.value_or_zero(), U256::from(7));
        assert!(send.data().is_empty());
    }

    #[test]
    fn kind_displays_snake_case() {
        assert_eq!(StepKind::AnnounceCondition.to_string(), "announce_condition");
    }
}
