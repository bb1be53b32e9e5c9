//! Typed record threaded through pipeline stages.
//!
//! A context starts with the caller's inputs, gains environment facts in
//! `Setup`, and accumulates steps and intermediate values as each stage
//! runs. Stages consume a context and hand back a new one.

use alloy_primitives::{Address, B256, U256};

use crate::domain::market::{MarketData, Question};
use crate::domain::transaction::{TransactionStep, TxOptions};
use crate::error::PipelineError;
use crate::port::ProxyMode;

/// Environment facts gathered once by the `Setup` stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupFacts {
    /// The user's signing account.
    pub account: Address,
    pub chain_id: u64,
    pub proxy: Address,
    pub mode: ProxyMode,
}

/// Working state of one pipeline invocation.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    steps: Vec<TransactionStep>,
    options: TxOptions,
    facts: Option<SetupFacts>,

    amount: Option<U256>,
    collateral: Option<Address>,
    native_deposit: bool,
    spender: Option<Address>,
    market_maker: Option<Address>,
    outcome_index: Option<usize>,
    outcome_count: Option<usize>,
    shares: Option<U256>,

    market: Option<MarketData>,
    question: Option<Question>,
    question_id: Option<B256>,
    condition_question_id: Option<B256>,
    condition_id: Option<B256>,
    scalar_range: Option<(U256, U256)>,
    salt_nonce: Option<U256>,
    predicted_market_maker: Option<Address>,
    condition_resolved: bool,

    answer: Option<B256>,
    bond: Option<U256>,
    proceeds: Option<U256>,
    deliver_native: bool,
}

macro_rules! required {
    ($name:ident, $field:ident, $ty:ty) => {
        #[doc = concat!("The `", stringify!($field), "` value, or `MissingInput` if no stage produced it.")]
        pub fn $name(&self) -> Result<$ty, PipelineError> {
            self.$field.ok_or(PipelineError::MissingInput(stringify!($field)))
        }
    };
}

impl PipelineContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- steps and options --------------------------------------------------

    #[must_use]
    pub fn steps(&self) -> &[TransactionStep] {
        &self.steps
    }

    #[must_use]
    pub fn options(&self) -> &TxOptions {
        &self.options
    }

    /// Append a step; batch order follows call order.
    #[must_use]
    pub fn with_step(mut self, step: TransactionStep) -> Self {
        self.steps.push(step);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.options.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.options.gas = Some(gas);
        self
    }

    /// Split into the batch and its options for submission.
    #[must_use]
    pub fn into_batch(self) -> (Vec<TransactionStep>, TxOptions) {
        (self.steps, self.options)
    }

    // --- environment --------------------------------------------------------

    #[must_use]
    pub fn with_facts(mut self, facts: SetupFacts) -> Self {
        self.facts = Some(facts);
        self
    }

    required!(facts, facts, SetupFacts);

    // --- inputs and intermediate values --------------------------------------

    #[must_use]
    pub fn with_amount(mut self, amount: U256) -> Self {
        self.amount = Some(amount);
        self
    }

    required!(require_amount, amount, U256);

    /// Collateral token address; `Address::ZERO` stands for the native asset.
    #[must_use]
    pub fn with_collateral(mut self, collateral: Address) -> Self {
        self.collateral = Some(collateral);
        self
    }

    #[must_use]
    pub const fn collateral(&self) -> Option<Address> {
        self.collateral
    }

    required!(require_collateral, collateral, Address);

    /// Mark that the native asset is deposited as batch value.
    #[must_use]
    pub fn with_native_deposit(mut self) -> Self {
        self.native_deposit = true;
        self
    }

    #[must_use]
    pub const fn native_deposit(&self) -> bool {
        self.native_deposit
    }

    #[must_use]
    pub fn with_spender(mut self, spender: Address) -> Self {
        self.spender = Some(spender);
        self
    }

    required!(require_spender, spender, Address);

    #[must_use]
    pub fn with_market_maker(mut self, market_maker: Address) -> Self {
        self.market_maker = Some(market_maker);
        self
    }

    required!(require_market_maker, market_maker, Address);

    #[must_use]
    pub fn with_outcome_index(mut self, index: usize) -> Self {
        self.outcome_index = Some(index);
        self
    }

    required!(require_outcome_index, outcome_index, usize);

    #[must_use]
    pub fn with_outcome_count(mut self, count: usize) -> Self {
        self.outcome_count = Some(count);
        self
    }

    required!(require_outcome_count, outcome_count, usize);

    #[must_use]
    pub fn with_shares(mut self, shares: U256) -> Self {
        self.shares = Some(shares);
        self
    }

    required!(require_shares, shares, U256);

    #[must_use]
    pub fn with_market(mut self, market: MarketData) -> Self {
        self.market = Some(market);
        self
    }

    /// # Errors
    ///
    /// `MissingInput("market")` when no market data was provided.
    pub fn require_market(&self) -> Result<&MarketData, PipelineError> {
        self.market.as_ref().ok_or(PipelineError::MissingInput("market"))
    }

    #[must_use]
    pub fn with_question(mut self, question: Question) -> Self {
        self.question = Some(question);
        self
    }

    /// # Errors
    ///
    /// `MissingInput("question")` when no question was provided.
    pub fn require_question(&self) -> Result<&Question, PipelineError> {
        self.question.as_ref().ok_or(PipelineError::MissingInput("question"))
    }

    #[must_use]
    pub fn with_question_id(mut self, id: B256) -> Self {
        self.question_id = Some(id);
        self
    }

    #[must_use]
    pub const fn question_id(&self) -> Option<B256> {
        self.question_id
    }

    required!(require_question_id, question_id, B256);

    #[must_use]
    pub fn with_condition_question_id(mut self, id: B256) -> Self {
        self.condition_question_id = Some(id);
        self
    }

    required!(require_condition_question_id, condition_question_id, B256);

    #[must_use]
    pub fn with_condition_id(mut self, id: B256) -> Self {
        self.condition_id = Some(id);
        self
    }

    #[must_use]
    pub const fn condition_id(&self) -> Option<B256> {
        self.condition_id
    }

    required!(require_condition_id, condition_id, B256);

    /// Bounds of a scalar market being resolved.
    #[must_use]
    pub fn with_scalar_range(mut self, lower: U256, upper: U256) -> Self {
        self.scalar_range = Some((lower, upper));
        self
    }

    #[must_use]
    pub const fn scalar_range(&self) -> Option<(U256, U256)> {
        self.scalar_range
    }

    #[must_use]
    pub fn with_salt_nonce(mut self, salt: U256) -> Self {
        self.salt_nonce = Some(salt);
        self
    }

    required!(require_salt_nonce, salt_nonce, U256);

    #[must_use]
    pub fn with_predicted_market_maker(mut self, address: Address) -> Self {
        self.predicted_market_maker = Some(address);
        self
    }

    #[must_use]
    pub const fn predicted_market_maker(&self) -> Option<Address> {
        self.predicted_market_maker
    }

    #[must_use]
    pub fn with_condition_resolved(mut self, resolved: bool) -> Self {
        self.condition_resolved = resolved;
        self
    }

    #[must_use]
    pub const fn condition_resolved(&self) -> bool {
        self.condition_resolved
    }

    #[must_use]
    pub fn with_answer(mut self, answer: B256, bond: U256) -> Self {
        self.answer = Some(answer);
        self.bond = Some(bond);
        self
    }

    required!(require_answer, answer, B256);
    required!(require_bond, bond, U256);

    /// Collateral the batch should hand back to the user.
    #[must_use]
    pub fn with_proceeds(mut self, proceeds: U256) -> Self {
        self.proceeds = Some(proceeds);
        self
    }

    #[must_use]
    pub const fn proceeds(&self) -> Option<U256> {
        self.proceeds
    }

    /// Deliver proceeds as the native asset after unwrapping.
    #[must_use]
    pub fn with_native_delivery(mut self) -> Self {
        self.deliver_native = true;
        self
    }

    #[must_use]
    pub const fn deliver_native(&self) -> bool {
        self.deliver_native
    }
}
