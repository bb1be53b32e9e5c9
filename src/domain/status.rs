//! Transaction lifecycle state.

use std::fmt;

use serde::Serialize;

/// Lifecycle of one submitted batch.
///
/// `Idle → WaitingConfirmation → TransactionSubmitted → TransactionConfirmed`,
/// with `Error` terminal and reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Idle,
    /// Waiting for the wallet to sign and send.
    WaitingConfirmation,
    /// Sent; waiting for inclusion and indexing.
    TransactionSubmitted,
    TransactionConfirmed,
    Error,
}

impl TransactionStatus {
    const fn rank(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::WaitingConfirmation => 1,
            Self::TransactionSubmitted => 2,
            Self::TransactionConfirmed => 3,
            Self::Error => 4,
        }
    }

    /// True for `TransactionConfirmed` and `Error`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::TransactionConfirmed | Self::Error)
    }

    /// Whether moving from `self` to `next` respects the lifecycle.
    #[must_use]
    pub const fn can_advance_to(self, next: Self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            Self::Error => true,
            _ => next.rank() > self.rank(),
        }
    }

    /// Move to `next`, or report the rejected transition.
    ///
    /// # Errors
    ///
    /// Returns the pair `(from, to)` when the transition goes backwards or
    /// leaves a terminal state.
    pub fn advance(self, next: Self) -> Result<Self, (Self, Self)> {
        if self.can_advance_to(next) {
            Ok(next)
        } else {
            Err((self, next))
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::WaitingConfirmation => "waiting_confirmation",
            Self::TransactionSubmitted => "transaction_submitted",
            Self::TransactionConfirmed => "transaction_confirmed",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}
