//! In-memory chain implementing every outbound port.
//!
//! Responses are scripted through [`FakeChainBuilder`]; submissions are
//! recorded so tests can assert on the exact batch a pipeline produced.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};

use crate::application::pipeline::{Contracts, StageEnv, StatusBoard};
use crate::application::tracker::{ConfirmationTracker, PollingPolicy};
use crate::domain::market::ClaimHistory;
use crate::domain::transaction::{Receipt, Submission, TransactionStep, TxOptions};
use crate::error::{ExecutionError, Result};
use crate::port::{
    ChainReader, IndexerStatus, MarketMakerSeed, ProxyExecutor, ProxyMode, RelayInfo,
    RelayInfoSource, SafeTransactionService, WalletProvider,
};

/// Signer used by default.
pub const SIGNER: Address = Address::repeat_byte(0xa1);
/// Proxy used by default.
pub const PROXY: Address = Address::repeat_byte(0xb2);
/// Hash returned for every direct submission.
pub const TX_HASH: B256 = B256::repeat_byte(0xc3);
/// Safe transaction hash returned for every submission.
pub const SAFE_TX_HASH: B256 = B256::repeat_byte(0xd4);

/// A batch as the proxy received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedBatch {
    pub steps: Vec<TransactionStep>,
    pub options: TxOptions,
}

#[derive(Debug)]
struct State {
    chain_id: u64,
    mode: ProxyMode,
    threshold: u64,
    deployed: bool,
    master_copy: Address,
    allowances: HashMap<(Address, Address, Address), U256>,
    approved_for_all: bool,
    market_collateral: HashMap<Address, Address>,
    market_condition: HashMap<Address, B256>,
    buy_amount: U256,
    sell_amount: U256,
    prepared: HashSet<B256>,
    predicted: Address,
    claims: HashMap<B256, ClaimHistory>,
    realitio_balance: U256,
    relay: RelayInfo,
    reject_submission: Option<String>,
    receipt_block: Option<u64>,
    reverted: bool,
    /// Receipt polls answered with `None` before the receipt appears.
    pending_receipt_polls: u32,
    /// Receipt lookups never complete, like a node that stops answering.
    stalled_receipts: bool,
    /// Safe service polls answered with `None` before the hash appears.
    pending_safe_polls: u32,
    /// Indexer heights returned in order; the last one repeats.
    indexed_blocks: VecDeque<u64>,
    failing_indexer_polls: u32,
    batches: Vec<RecordedBatch>,
    receipt_polls: u32,
    indexer_polls: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            chain_id: 100,
            mode: ProxyMode::default(),
            threshold: 1,
            deployed: true,
            master_copy: Address::ZERO,
            allowances: HashMap::new(),
            approved_for_all: false,
            market_collateral: HashMap::new(),
            market_condition: HashMap::new(),
            buy_amount: U256::ZERO,
            sell_amount: U256::ZERO,
            prepared: HashSet::new(),
            predicted: Address::repeat_byte(0xe5),
            claims: HashMap::new(),
            realitio_balance: U256::ZERO,
            relay: RelayInfo {
                address: Address::repeat_byte(0xf6),
                fee: U256::ZERO,
            },
            reject_submission: None,
            receipt_block: Some(1_000),
            reverted: false,
            pending_receipt_polls: 0,
            stalled_receipts: false,
            pending_safe_polls: 0,
            indexed_blocks: VecDeque::from([1_000]),
            failing_indexer_polls: 0,
            batches: Vec::new(),
            receipt_polls: 0,
            indexer_polls: 0,
        }
    }
}

/// Scriptable fake for the node, the proxy and the off-chain services.
#[derive(Debug, Default)]
pub struct FakeChain {
    state: Mutex<State>,
}

impl FakeChain {
    #[must_use]
    pub fn builder() -> FakeChainBuilder {
        FakeChainBuilder::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock()
    }

    /// Every batch submitted so far.
    #[must_use]
    pub fn batches(&self) -> Vec<RecordedBatch> {
        self.state().batches.clone()
    }

    /// The only submitted batch.
    ///
    /// # Panics
    ///
    /// Panics unless exactly one batch was submitted.
    #[must_use]
    pub fn single_batch(&self) -> RecordedBatch {
        let batches = self.batches();
        assert_eq!(batches.len(), 1, "expected exactly one batch, got {batches:#?}");
        batches[0].clone()
    }

    #[must_use]
    pub fn receipt_polls(&self) -> u32 {
        self.state().receipt_polls
    }

    #[must_use]
    pub fn indexer_polls(&self) -> u32 {
        self.state().indexer_polls
    }
}

/// Builder for [`FakeChain`].
#[derive(Debug, Default)]
pub struct FakeChainBuilder {
    state: State,
}

impl FakeChainBuilder {
    #[must_use]
    pub fn mode(mut self, mode: ProxyMode) -> Self {
        self.state.mode = mode;
        self
    }

    #[must_use]
    pub fn relay_fee(mut self, fee: U256) -> Self {
        self.state.relay.fee = fee;
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: u64) -> Self {
        self.state.threshold = threshold;
        self
    }

    #[must_use]
    pub fn deployed(mut self, deployed: bool) -> Self {
        self.state.deployed = deployed;
        self
    }

    #[must_use]
    pub fn master_copy(mut self, master_copy: Address) -> Self {
        self.state.master_copy = master_copy;
        self
    }

    /// Allowance of the proxy towards `spender`.
    #[must_use]
    pub fn allowance(mut self, token: Address, spender: Address, amount: U256) -> Self {
        self.state.allowances.insert((token, PROXY, spender), amount);
        self
    }

    #[must_use]
    pub fn approved_for_all(mut self, approved: bool) -> Self {
        self.state.approved_for_all = approved;
        self
    }

    #[must_use]
    pub fn market(mut self, market_maker: Address, collateral: Address, condition_id: B256) -> Self {
        self.state.market_collateral.insert(market_maker, collateral);
        self.state.market_condition.insert(market_maker, condition_id);
        self
    }

    #[must_use]
    pub fn buy_amount(mut self, shares: U256) -> Self {
        self.state.buy_amount = shares;
        self
    }

    #[must_use]
    pub fn sell_amount(mut self, shares: U256) -> Self {
        self.state.sell_amount = shares;
        self
    }

    #[must_use]
    pub fn prepared_condition(mut self, condition_id: B256) -> Self {
        self.state.prepared.insert(condition_id);
        self
    }

    #[must_use]
    pub fn predicted_market_maker(mut self, address: Address) -> Self {
        self.state.predicted = address;
        self
    }

    #[must_use]
    pub fn claim_history(mut self, question_id: B256, history: ClaimHistory) -> Self {
        self.state.claims.insert(question_id, history);
        self
    }

    #[must_use]
    pub fn realitio_balance(mut self, balance: U256) -> Self {
        self.state.realitio_balance = balance;
        self
    }

    #[must_use]
    pub fn reject_submission(mut self, reason: impl Into<String>) -> Self {
        self.state.reject_submission = Some(reason.into());
        self
    }

    #[must_use]
    pub fn receipt_block(mut self, block: Option<u64>) -> Self {
        self.state.receipt_block = block;
        self
    }

    #[must_use]
    pub fn reverted(mut self) -> Self {
        self.state.reverted = true;
        self
    }

    #[must_use]
    pub fn pending_receipt_polls(mut self, polls: u32) -> Self {
        self.state.pending_receipt_polls = polls;
        self
    }

    #[must_use]
    pub fn stalled_receipts(mut self) -> Self {
        self.state.stalled_receipts = true;
        self
    }

    #[must_use]
    pub fn pending_safe_polls(mut self, polls: u32) -> Self {
        self.state.pending_safe_polls = polls;
        self
    }

    #[must_use]
    pub fn indexed_blocks(mut self, blocks: impl IntoIterator<Item = u64>) -> Self {
        self.state.indexed_blocks = blocks.into_iter().collect();
        self
    }

    #[must_use]
    pub fn failing_indexer_polls(mut self, polls: u32) -> Self {
        self.state.failing_indexer_polls = polls;
        self
    }

    #[must_use]
    pub fn build(self) -> Arc<FakeChain> {
        Arc::new(FakeChain {
            state: Mutex::new(self.state),
        })
    }
}

/// Polling fast enough for tests, bounded so a broken script fails quickly.
#[must_use]
pub fn fast_polling() -> PollingPolicy {
    PollingPolicy {
        interval: Duration::from_millis(1),
        timeout: Some(Duration::from_secs(2)),
    }
}

/// Tracker whose every port is `fake`.
#[must_use]
pub fn tracker(fake: &Arc<FakeChain>, policy: PollingPolicy) -> ConfirmationTracker {
    ConfirmationTracker::new(
        fake.clone(),
        fake.clone(),
        fake.clone(),
        fake.clone(),
        policy,
    )
}

/// Stage environment backed entirely by `fake`.
#[must_use]
pub fn stage_env(fake: &Arc<FakeChain>, contracts: Contracts) -> StageEnv {
    StageEnv {
        wallet: fake.clone(),
        proxy: fake.clone(),
        chain: fake.clone(),
        relay: fake.clone(),
        tracker: tracker(fake, fast_polling()),
        contracts,
        default_gas: 1_500_000,
        status: StatusBoard::new(),
    }
}

#[async_trait]
impl WalletProvider for FakeChain {
    fn signer_address(&self) -> Address {
        SIGNER
    }

    async fn chain_id(&self) -> Result<u64> {
        Ok(self.state().chain_id)
    }

    async fn wait_for_transaction(&self, hash: B256) -> Result<Option<Receipt>> {
        let stalled = {
            let mut state = self.state();
            state.receipt_polls += 1;
            state.stalled_receipts
        };
        if stalled {
            std::future::pending::<()>().await;
        }

        let mut state = self.state();
        if state.pending_receipt_polls > 0 {
            state.pending_receipt_polls -= 1;
            return Ok(None);
        }
        Ok(Some(Receipt {
            transaction_hash: hash,
            block_number: state.receipt_block,
            success: !state.reverted,
        }))
    }

    async fn send(&self, method: &str, _params: serde_json::Value) -> Result<serde_json::Value> {
        match method {
            "eth_chainId" => Ok(serde_json::json!(format!("{:#x}", self.state().chain_id))),
            other => Err(ExecutionError::Provider(format!("unsupported method {other}")).into()),
        }
    }
}

#[async_trait]
impl ProxyExecutor for FakeChain {
    fn address(&self) -> Address {
        PROXY
    }

    fn mode(&self) -> ProxyMode {
        self.state().mode
    }

    async fn exec_transactions(
        &self,
        steps: &[TransactionStep],
        options: &TxOptions,
    ) -> Result<Submission> {
        let mut state = self.state();
        if let Some(reason) = &state.reject_submission {
            return Err(ExecutionError::TransactionRejected(reason.clone()).into());
        }
        state.batches.push(RecordedBatch {
            steps: steps.to_vec(),
            options: options.clone(),
        });
        // A Safe UI only hands back the Safe transaction hash.
        let hash = (!state.mode.connected_to_safe).then_some(TX_HASH);
        Ok(Submission {
            hash,
            safe_tx_hash: Some(SAFE_TX_HASH),
        })
    }

    async fn threshold(&self) -> Result<u64> {
        Ok(self.state().threshold)
    }

    async fn is_deployed(&self) -> Result<bool> {
        Ok(self.state().deployed)
    }

    async fn master_copy(&self) -> Result<Address> {
        Ok(self.state().master_copy)
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        Ok(self
            .state()
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default())
    }

    async fn is_approved_for_all(&self, _owner: Address, _operator: Address) -> Result<bool> {
        Ok(self.state().approved_for_all)
    }

    async fn market_collateral(&self, market_maker: Address) -> Result<Address> {
        self.state()
            .market_collateral
            .get(&market_maker)
            .copied()
            .ok_or_else(|| ExecutionError::Provider(format!("unknown market {market_maker}")).into())
    }

    async fn market_condition_id(&self, market_maker: Address) -> Result<B256> {
        self.state()
            .market_condition
            .get(&market_maker)
            .copied()
            .ok_or_else(|| ExecutionError::Provider(format!("unknown market {market_maker}")).into())
    }

    async fn calc_buy_amount(
        &self,
        _market_maker: Address,
        _investment: U256,
        _outcome_index: usize,
    ) -> Result<U256> {
        Ok(self.state().buy_amount)
    }

    async fn calc_sell_amount(
        &self,
        _market_maker: Address,
        _return_amount: U256,
        _outcome_index: usize,
    ) -> Result<U256> {
        Ok(self.state().sell_amount)
    }

    async fn condition_exists(&self, condition_id: B256) -> Result<bool> {
        Ok(self.state().prepared.contains(&condition_id))
    }

    async fn predict_market_maker(&self, _seed: &MarketMakerSeed) -> Result<Address> {
        Ok(self.state().predicted)
    }

    async fn claim_history(&self, question_id: B256) -> Result<Option<ClaimHistory>> {
        Ok(self.state().claims.get(&question_id).cloned())
    }

    async fn realitio_balance(&self, _account: Address) -> Result<U256> {
        Ok(self.state().realitio_balance)
    }
}

#[async_trait]
impl SafeTransactionService for FakeChain {
    async fn transaction_hash(&self, _chain_id: u64, safe_tx_hash: B256) -> Result<Option<B256>> {
        let mut state = self.state();
        if safe_tx_hash != SAFE_TX_HASH {
            return Ok(None);
        }
        if state.pending_safe_polls > 0 {
            state.pending_safe_polls -= 1;
            return Ok(None);
        }
        Ok(Some(TX_HASH))
    }
}

#[async_trait]
impl IndexerStatus for FakeChain {
    async fn latest_indexed_block(&self, _chain_id: u64) -> Result<u64> {
        let mut state = self.state();
        state.indexer_polls += 1;
        if state.failing_indexer_polls > 0 {
            state.failing_indexer_polls -= 1;
            return Err(ExecutionError::Provider("indexer unavailable".to_string()).into());
        }
        let block = if state.indexed_blocks.len() > 1 {
            state.indexed_blocks.pop_front()
        } else {
            state.indexed_blocks.front().copied()
        };
        Ok(block.unwrap_or_default())
    }
}

#[async_trait]
impl RelayInfoSource for FakeChain {
    async fn info(&self) -> Result<RelayInfo> {
        Ok(self.state().relay.clone())
    }
}
