//! Calldata encoders for every contract call a batch can contain.
//!
//! Each function returns a ready [`TransactionStep`]; nothing here talks to
//! a node.

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolCall};

use super::condition::index_sets;
use super::market::ClaimHistory;
use super::transaction::{StepKind, TransactionStep};

sol! {
    interface IERC20 {
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function transferAndCall(address to, uint256 value, bytes data) external returns (bool);
    }

    interface IWrappedNative {
        function deposit() external payable;
        function withdraw(uint256 wad) external;
    }

    interface IConditionalTokens {
        function prepareCondition(address oracle, bytes32 questionId, uint256 outcomeSlotCount) external;
        function setApprovalForAll(address operator, bool approved) external;
        function mergePositions(address collateralToken, bytes32 parentCollectionId, bytes32 conditionId, uint256[] partition, uint256 amount) external;
        function redeemPositions(address collateralToken, bytes32 parentCollectionId, bytes32 conditionId, uint256[] indexSets) external;
    }

    interface IFixedProductMarketMaker {
        function buy(uint256 investmentAmount, uint256 outcomeIndex, uint256 minOutcomeTokensToBuy) external;
        function sell(uint256 returnAmount, uint256 outcomeIndex, uint256 maxOutcomeTokensToSell) external;
        function addFunding(uint256 addedFunds, uint256[] distributionHint) external;
        function removeFunding(uint256 sharesToBurn) external;
    }

    interface IMarketMakerFactory {
        function create2FixedProductMarketMaker(uint256 saltNonce, address conditionalTokens, address collateralToken, bytes32[] conditionIds, uint256 fee, uint256 initialFunds, uint256[] distributionHint) external returns (address);
    }

    interface IRealitio {
        function askQuestion(uint256 templateId, string question, address arbitrator, uint32 timeout, uint32 openingTs, uint256 nonce) external payable returns (bytes32);
        function submitAnswer(bytes32 questionId, bytes32 answer, uint256 maxPrevious) external payable;
        function claimWinnings(bytes32 questionId, bytes32[] historyHashes, address[] addrs, uint256[] bonds, bytes32[] answers) external;
        function withdraw() external;
    }

    interface IOracleProxy {
        function resolve(bytes32 questionId, uint256 templateId, string question, uint256 numOutcomes) external;
    }

    interface IScalarAdapter {
        function announceConditionQuestionId(bytes32 questionId, uint256 low, uint256 high) external;
        function resolve(bytes32 questionId, string question, uint256 low, uint256 high) external;
    }

    interface IProxyMasterCopy {
        function changeMasterCopy(address masterCopy) external;
    }

    interface INativeBridge {
        function relayTokens(address receiver) external payable;
    }

    interface IForeignBridge {
        function relayTokens(address sender, address receiver, uint256 amount) external;
    }
}

fn step(kind: StepKind, to: Address, call: &impl SolCall) -> TransactionStep {
    TransactionStep::call(kind, to, call.abi_encode())
}

/// Unlimited ERC-20 approval of `spender`.
#[must_use]
pub fn approve_unlimited(token: Address, spender: Address) -> TransactionStep {
    step(
        StepKind::Approve,
        token,
        &IERC20::approveCall {
            spender,
            amount: U256::MAX,
        },
    )
}

/// Pull `amount` from `from` into `to`.
#[must_use]
pub fn transfer_from(token: Address, from: Address, to: Address, amount: U256) -> TransactionStep {
    step(
        StepKind::Transfer,
        token,
        &IERC20::transferFromCall { from, to, amount },
    )
}

/// Deliver `amount` of an ERC-20 to `to`.
#[must_use]
pub fn deliver_token(token: Address, to: Address, amount: U256) -> TransactionStep {
    step(StepKind::Withdraw, token, &IERC20::transferCall { to, amount })
}

/// Deliver native value to `to`.
#[must_use]
pub fn deliver_native(to: Address, amount: U256) -> TransactionStep {
    TransactionStep::send_value(StepKind::Withdraw, to, amount)
}

#[must_use]
pub fn wrap(wrapped: Address, amount: U256) -> TransactionStep {
    TransactionStep::call_with_value(
        StepKind::Wrap,
        wrapped,
        IWrappedNative::depositCall {}.abi_encode(),
        amount,
    )
}

#[must_use]
pub fn unwrap(wrapped: Address, amount: U256) -> TransactionStep {
    step(
        StepKind::Unwrap,
        wrapped,
        &IWrappedNative::withdrawCall { wad: amount },
    )
}

#[must_use]
pub fn set_approval_for_all(conditional_tokens: Address, operator: Address) -> TransactionStep {
    step(
        StepKind::ApproveForAll,
        conditional_tokens,
        &IConditionalTokens::setApprovalForAllCall {
            operator,
            approved: true,
        },
    )
}

#[must_use]
pub fn prepare_condition(
    conditional_tokens: Address,
    oracle: Address,
    question_id: B256,
    outcome_slot_count: usize,
) -> TransactionStep {
    step(
        StepKind::PrepareCondition,
        conditional_tokens,
        &IConditionalTokens::prepareConditionCall {
            oracle,
            questionId: question_id,
            outcomeSlotCount: U256::from(outcome_slot_count),
        },
    )
}

/// Merge a full set of outcome shares back into collateral.
#[must_use]
pub fn merge_positions(
    conditional_tokens: Address,
    collateral: Address,
    condition_id: B256,
    outcome_count: usize,
    amount: U256,
) -> TransactionStep {
    step(
        StepKind::MergePositions,
        conditional_tokens,
        &IConditionalTokens::mergePositionsCall {
            collateralToken: collateral,
            parentCollectionId: B256::ZERO,
            conditionId: condition_id,
            partition: index_sets(outcome_count),
            amount,
        },
    )
}

/// Redeem every outcome position of a resolved condition.
#[must_use]
pub fn redeem_positions(
    conditional_tokens: Address,
    collateral: Address,
    condition_id: B256,
    outcome_count: usize,
) -> TransactionStep {
    step(
        StepKind::RedeemPositions,
        conditional_tokens,
        &IConditionalTokens::redeemPositionsCall {
            collateralToken: collateral,
            parentCollectionId: B256::ZERO,
            conditionId: condition_id,
            indexSets: index_sets(outcome_count),
        },
    )
}

#[must_use]
pub fn buy(
    market_maker: Address,
    investment: U256,
    outcome_index: usize,
    min_shares: U256,
) -> TransactionStep {
    step(
        StepKind::Buy,
        market_maker,
        &IFixedProductMarketMaker::buyCall {
            investmentAmount: investment,
            outcomeIndex: U256::from(outcome_index),
            minOutcomeTokensToBuy: min_shares,
        },
    )
}

#[must_use]
pub fn sell(
    market_maker: Address,
    return_amount: U256,
    outcome_index: usize,
    max_shares: U256,
) -> TransactionStep {
    step(
        StepKind::Sell,
        market_maker,
        &IFixedProductMarketMaker::sellCall {
            returnAmount: return_amount,
            outcomeIndex: U256::from(outcome_index),
            maxOutcomeTokensToSell: max_shares,
        },
    )
}

/// Add funding to an existing market; an empty hint keeps current odds.
#[must_use]
pub fn add_funding(market_maker: Address, amount: U256) -> TransactionStep {
    step(
        StepKind::AddFunding,
        market_maker,
        &IFixedProductMarketMaker::addFundingCall {
            addedFunds: amount,
            distributionHint: Vec::new(),
        },
    )
}

#[must_use]
pub fn remove_funding(market_maker: Address, shares: U256) -> TransactionStep {
    step(
        StepKind::RemoveFunding,
        market_maker,
        &IFixedProductMarketMaker::removeFundingCall {
            sharesToBurn: shares,
        },
    )
}

/// Arguments of the factory's deterministic deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarketArgs {
    pub salt_nonce: U256,
    pub conditional_tokens: Address,
    pub collateral: Address,
    pub condition_id: B256,
    pub fee: U256,
    pub initial_funds: U256,
    pub distribution_hint: Vec<U256>,
}

#[must_use]
pub fn create_market(factory: Address, args: CreateMarketArgs) -> TransactionStep {
    step(
        StepKind::CreateMarket,
        factory,
        &IMarketMakerFactory::create2FixedProductMarketMakerCall {
            saltNonce: args.salt_nonce,
            conditionalTokens: args.conditional_tokens,
            collateralToken: args.collateral,
            conditionIds: vec![args.condition_id],
            fee: args.fee,
            initialFunds: args.initial_funds,
            distributionHint: args.distribution_hint,
        },
    )
}

#[must_use]
pub fn ask_question(
    realitio: Address,
    template_id: u64,
    question: String,
    arbitrator: Address,
    timeout: u32,
    opening_ts: u32,
    nonce: U256,
) -> TransactionStep {
    step(
        StepKind::AskQuestion,
        realitio,
        &IRealitio::askQuestionCall {
            templateId: U256::from(template_id),
            question,
            arbitrator,
            timeout,
            openingTs: opening_ts,
            nonce,
        },
    )
}

/// Post an answer backed by `bond`.
#[must_use]
pub fn submit_answer(realitio: Address, question_id: B256, answer: B256, bond: U256) -> TransactionStep {
    TransactionStep::call_with_value(
        StepKind::SubmitAnswer,
        realitio,
        IRealitio::submitAnswerCall {
            questionId: question_id,
            answer,
            maxPrevious: U256::ZERO,
        }
        .abi_encode(),
        bond,
    )
}

#[must_use]
pub fn claim_winnings(realitio: Address, question_id: B256, history: &ClaimHistory) -> TransactionStep {
    step(
        StepKind::ClaimWinnings,
        realitio,
        &IRealitio::claimWinningsCall {
            questionId: question_id,
            historyHashes: history.history_hashes.clone(),
            addrs: history.answerers.clone(),
            bonds: history.bonds.clone(),
            answers: history.answers.clone(),
        },
    )
}

/// Withdraw the proxy's Realitio balance.
#[must_use]
pub fn withdraw_bond(realitio: Address) -> TransactionStep {
    step(StepKind::WithdrawBond, realitio, &IRealitio::withdrawCall {})
}

#[must_use]
pub fn resolve_condition(
    oracle: Address,
    question_id: B256,
    template_id: u64,
    question: String,
    outcome_count: usize,
) -> TransactionStep {
    step(
        StepKind::ResolveCondition,
        oracle,
        &IOracleProxy::resolveCall {
            questionId: question_id,
            templateId: U256::from(template_id),
            question,
            numOutcomes: U256::from(outcome_count),
        },
    )
}

#[must_use]
pub fn resolve_scalar_condition(
    scalar_adapter: Address,
    question_id: B256,
    question: String,
    lower: U256,
    upper: U256,
) -> TransactionStep {
    step(
        StepKind::ResolveCondition,
        scalar_adapter,
        &IScalarAdapter::resolveCall {
            questionId: question_id,
            question,
            low: lower,
            high: upper,
        },
    )
}

#[must_use]
pub fn announce_condition(
    scalar_adapter: Address,
    question_id: B256,
    lower: U256,
    upper: U256,
) -> TransactionStep {
    step(
        StepKind::AnnounceCondition,
        scalar_adapter,
        &IScalarAdapter::announceConditionQuestionIdCall {
            questionId: question_id,
            low: lower,
            high: upper,
        },
    )
}

/// Point the proxy at a new implementation.
#[must_use]
pub fn change_master_copy(proxy: Address, master_copy: Address) -> TransactionStep {
    step(
        StepKind::UpgradeProxy,
        proxy,
        &IProxyMasterCopy::changeMasterCopyCall {
            masterCopy: master_copy,
        },
    )
}

/// Native asset over the DAI bridge.
#[must_use]
pub fn relay_native(bridge: Address, receiver: Address, amount: U256) -> TransactionStep {
    TransactionStep::call_with_value(
        StepKind::Bridge,
        bridge,
        INativeBridge::relayTokensCall { receiver }.abi_encode(),
        amount,
    )
}

/// ERC-677 token over the omni-bridge; the receiver rides in the call data.
#[must_use]
pub fn relay_token(token: Address, bridge: Address, receiver: Address, amount: U256) -> TransactionStep {
    step(
        StepKind::Bridge,
        token,
        &IERC20::transferAndCallCall {
            to: bridge,
            value: amount,
            data: Bytes::copy_from_slice(receiver.as_slice()),
        },
    )
}

/// ERC-20 over the foreign bridge towards the sidechain.
#[must_use]
pub fn relay_foreign(bridge: Address, sender: Address, receiver: Address, amount: U256) -> TransactionStep {
    step(
        StepKind::Bridge,
        bridge,
        &IForeignBridge::relayTokensCall {
            sender,
            receiver,
            amount,
        },
    )
}

/// Payment to the relay for sponsoring gas.
#[must_use]
pub fn relay_fee(relay: Address, fee: U256) -> TransactionStep {
    TransactionStep::send_value(StepKind::RelayFee, relay, fee)
}
