//! Pure domain types and trading math. No I/O.

pub mod calls;
pub mod condition;
pub mod error;
pub mod fixed;
pub mod funding;
pub mod market;
pub mod pricing;
pub mod status;
pub mod token;
pub mod trade;
pub mod transaction;

pub use error::DomainError;
pub use funding::FundingAllocation;
pub use market::{ClaimHistory, MarketData, MarketKind, Question, ScalarBounds};
pub use status::TransactionStatus;
pub use token::Token;
pub use trade::{CostBreakdown, TradeQuote};
pub use transaction::{Confirmation, Receipt, StepKind, Submission, TransactionStep, TxOptions};
