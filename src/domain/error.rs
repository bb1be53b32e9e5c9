//! Domain validation errors for trading math and market definitions.
//!
//! These errors are returned when an input violates a domain rule: an
//! outcome index outside the holdings vector, inconsistent scalar bounds,
//! or odds that cannot be turned into a distribution hint.
//!
//! # Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use ctfpipe::domain::error::DomainError;
//! use ctfpipe::domain::trade::compute_balance_after_trade;
//!
//! let holdings = [U256::from(100), U256::from(100)];
//! let result = compute_balance_after_trade(&holdings, 2, U256::from(50), U256::from(100));
//!
//! assert!(matches!(result, Err(DomainError::IndexOutOfRange { index: 2, len: 2 })));
//! ```

use alloy_primitives::U256;
use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Outcome index does not address an entry of the holdings vector.
    #[error("outcome index {index} out of range for {len} outcomes")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of outcomes available.
        len: usize,
    },

    /// Scalar market bounds are inconsistent.
    #[error("invalid scalar bounds: {reason}")]
    InvalidBounds {
        /// Which rule was violated.
        reason: String,
    },

    /// Markets need at least two outcomes.
    #[error("at least two outcomes are required, got {count}")]
    EmptyOutcomes {
        /// Number of outcomes provided.
        count: usize,
    },

    /// Odds must be positive and match the outcome count.
    #[error("invalid odds: {reason}")]
    InvalidOdds {
        /// Which rule was violated.
        reason: String,
    },

    /// A balance would become negative.
    #[error("balance underflow at outcome {index}: {balance} < {debit}")]
    Underflow {
        /// Outcome whose balance would go negative.
        index: usize,
        /// Balance before the debit.
        balance: U256,
        /// Amount being debited.
        debit: U256,
    },

    /// Fee must be a fraction in `[0, 1)`.
    #[error("fee must be in [0, 1), got {fee}")]
    InvalidFee {
        /// The rejected fee.
        fee: rust_decimal::Decimal,
    },

    /// A `1e18`-scaled fee of one or more would consume the whole amount.
    #[error("scaled fee {fee_wad} must be below 1e18")]
    FeeOutOfRange {
        /// The rejected fee, scaled by `1e18`.
        fee_wad: U256,
    },
}
