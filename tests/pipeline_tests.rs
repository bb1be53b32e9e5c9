//! Pipeline scenarios run end to end against the in-memory chain.

use alloy_primitives::{Address, B256, U256};

use ctfpipe::application::pipeline::trade::Buy;
use ctfpipe::application::pipeline::{Contracts, Pipeline, PipelineContext};
use ctfpipe::application::service::{
    AddFundingParams, BridgeParams, BuyParams, RedeemParams, RemoveFundingParams, ResolveParams,
    SellParams, SubmitAnswerParams, TransactionService,
};
use ctfpipe::domain::{ClaimHistory, Confirmation, StepKind, TransactionStatus, TransactionStep};
use ctfpipe::error::{Error, ExecutionError, PipelineError};
use ctfpipe::port::ProxyMode;
use ctfpipe::testkit::chain::{stage_env, FakeChain, PROXY, SAFE_TX_HASH, SIGNER, TX_HASH};
use ctfpipe::testkit::domain::{
    binary_market, contracts, dai, market_maker, native, question, scalar_market, units,
};

fn service(fake: &std::sync::Arc<FakeChain>) -> TransactionService {
    TransactionService::new(stage_env(fake, contracts()))
}

fn service_with(fake: &std::sync::Arc<FakeChain>, contracts: Contracts) -> TransactionService {
    TransactionService::new(stage_env(fake, contracts))
}

fn relayed() -> ProxyMode {
    ProxyMode {
        relay: true,
        ..ProxyMode::default()
    }
}

fn kinds(steps: &[TransactionStep]) -> Vec<StepKind> {
    steps.iter().map(TransactionStep::kind).collect()
}

fn buy_params(collateral: ctfpipe::domain::Token) -> BuyParams {
    BuyParams {
        amount: units(2),
        collateral,
        outcome_index: 0,
        market_maker: market_maker(),
    }
}

#[tokio::test]
async fn native_buy_wraps_approves_deposits_and_buys() {
    let fake = FakeChain::builder().buy_amount(units(3)).build();
    let service = service(&fake);

    let outcome = service.buy_outcomes(&buy_params(native())).await.unwrap();

    let batch = fake.single_batch();
    assert_eq!(
        kinds(&batch.steps),
        vec![StepKind::Wrap, StepKind::Approve, StepKind::Buy]
    );
    assert_eq!(batch.steps[0].to(), contracts().wrapped_native);
    assert_eq!(batch.steps[0].value(), Some(units(2)));
    assert_eq!(batch.steps[1].to(), contracts().wrapped_native);
    assert_eq!(batch.steps[2].to(), market_maker());
    // The native deposit rides along as the batch value.
    assert_eq!(batch.options.value, Some(units(2)));
    assert_eq!(batch.options.gas, None);

    assert!(matches!(outcome.confirmation, Confirmation::Confirmed(ref r) if r.transaction_hash == TX_HASH));
    assert_eq!(*service.status().borrow(), TransactionStatus::TransactionConfirmed);
    assert_eq!(*service.tx_hash().borrow(), Some(TX_HASH));
}

#[tokio::test]
async fn sufficient_allowance_skips_approval() {
    let fake = FakeChain::builder()
        .allowance(contracts().wrapped_native, market_maker(), units(2))
        .build();

    service(&fake).buy_outcomes(&buy_params(native())).await.unwrap();

    assert_eq!(
        kinds(&fake.single_batch().steps),
        vec![StepKind::Wrap, StepKind::Buy]
    );
}

#[tokio::test]
async fn erc20_buy_pulls_collateral_from_the_signer() {
    let fake = FakeChain::builder().build();

    let ctx = service(&fake)
        .plan_buy_outcomes(&buy_params(dai()))
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![StepKind::Approve, StepKind::Transfer, StepKind::Buy]
    );
    assert_eq!(ctx.steps()[1].to(), dai().address);
    assert_eq!(ctx.options().value, None);
    // Planning never submits.
    assert!(fake.batches().is_empty());
}

#[tokio::test]
async fn proxy_holding_funds_skips_deposit_and_fixes_gas() {
    let fake = FakeChain::builder()
        .mode(ProxyMode {
            safe_app: true,
            ..ProxyMode::default()
        })
        .build();

    let ctx = service(&fake)
        .plan_buy_outcomes(&buy_params(dai()))
        .await
        .unwrap();

    assert_eq!(kinds(ctx.steps()), vec![StepKind::Approve, StepKind::Buy]);
    assert_eq!(ctx.options().gas, Some(1_500_000));
}

#[tokio::test]
async fn relay_fee_is_deducted_and_paid_last() {
    let fee = U256::from(1_000);
    let fake = FakeChain::builder()
        .mode(ProxyMode {
            relay: true,
            ..ProxyMode::default()
        })
        .relay_fee(fee)
        .build();

    service(&fake).buy_outcomes(&buy_params(dai())).await.unwrap();

    let batch = fake.single_batch();
    assert_eq!(
        kinds(&batch.steps),
        vec![StepKind::Approve, StepKind::Buy, StepKind::RelayFee]
    );
    assert_eq!(batch.steps[2].value(), Some(fee));
    assert_eq!(batch.options.gas, Some(1_500_000));
}

#[tokio::test]
async fn amount_below_relay_fee_aborts_before_submission() {
    let fake = FakeChain::builder()
        .mode(ProxyMode {
            relay: true,
            ..ProxyMode::default()
        })
        .relay_fee(units(5))
        .build();
    let service = service(&fake);

    let err = service.buy_outcomes(&buy_params(dai())).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::AmountBelowFee { .. })
    ));
    assert!(fake.batches().is_empty());
    assert_eq!(*service.status().borrow(), TransactionStatus::Error);
}

#[tokio::test]
async fn missing_input_names_the_field() {
    let fake = FakeChain::builder().build();
    let env = stage_env(&fake, contracts());

    let err = Pipeline::new("bare_buy")
        .then(Buy)
        .run(PipelineContext::new(), &env)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("market_maker"))
    ));
    assert!(fake.batches().is_empty());
}

#[tokio::test]
async fn rejected_submission_ends_in_error() {
    let fake = FakeChain::builder()
        .reject_submission("user denied")
        .build();
    let service = service(&fake);

    let err = service.buy_outcomes(&buy_params(dai())).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Execution(ExecutionError::TransactionRejected(_))
    ));
    assert_eq!(*service.status().borrow(), TransactionStatus::Error);
    assert_eq!(*service.tx_hash().borrow(), None);
}

#[tokio::test]
async fn safe_ui_waits_for_the_safe_transaction() {
    let fake = FakeChain::builder()
        .mode(ProxyMode {
            connected_to_safe: true,
            ..ProxyMode::default()
        })
        .pending_safe_polls(2)
        .build();

    let outcome = service(&fake)
        .buy_outcomes(&buy_params(dai()))
        .await
        .unwrap();

    let receipt = outcome.confirmation.receipt().unwrap();
    assert_eq!(receipt.transaction_hash, TX_HASH);
}

#[tokio::test]
async fn multisig_stops_at_pending_signatures() {
    let fake = FakeChain::builder()
        .mode(ProxyMode {
            connected_to_safe: true,
            ..ProxyMode::default()
        })
        .threshold(2)
        .build();

    let outcome = service(&fake)
        .buy_outcomes(&buy_params(dai()))
        .await
        .unwrap();

    assert_eq!(
        outcome.confirmation,
        Confirmation::PendingSignatures {
            safe_tx_hash: Some(SAFE_TX_HASH)
        }
    );
    assert_eq!(fake.receipt_polls(), 0);
}

#[tokio::test]
async fn native_sell_unwraps_and_delivers_proceeds() {
    let fake = FakeChain::builder()
        .market(market_maker(), contracts().wrapped_native, B256::repeat_byte(0xcc))
        .sell_amount(units(4))
        .build();

    let ctx = service(&fake)
        .plan_sell_outcomes(&SellParams {
            amount: units(1),
            outcome_index: 1,
            market_maker: market_maker(),
        })
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![
            StepKind::ApproveForAll,
            StepKind::Sell,
            StepKind::Unwrap,
            StepKind::Withdraw
        ]
    );
    let delivery = &ctx.steps()[3];
    assert_eq!(delivery.to(), SIGNER);
    assert_eq!(delivery.value(), Some(units(1)));
}

#[tokio::test]
async fn approved_operator_skips_approval_for_all() {
    let fake = FakeChain::builder()
        .market(market_maker(), dai().address, B256::repeat_byte(0xcc))
        .approved_for_all(true)
        .build();

    let ctx = service(&fake)
        .plan_sell_outcomes(&SellParams {
            amount: units(1),
            outcome_index: 0,
            market_maker: market_maker(),
        })
        .await
        .unwrap();

    assert_eq!(kinds(ctx.steps()), vec![StepKind::Sell, StepKind::Withdraw]);
    assert_eq!(ctx.steps()[1].to(), dai().address);
}

#[tokio::test]
async fn scalar_creation_announces_condition_before_preparing_it() {
    let predicted = Address::repeat_byte(0x99);
    let fake = FakeChain::builder().predicted_market_maker(predicted).build();
    let service = service(&fake);

    let binary = service
        .plan_create_market(&binary_market(dai()))
        .await
        .unwrap();
    let scalar = service
        .plan_create_scalar_market(&scalar_market(dai()))
        .await
        .unwrap();

    assert_eq!(
        kinds(binary.steps()),
        vec![
            StepKind::Approve,
            StepKind::Transfer,
            StepKind::AskQuestion,
            StepKind::PrepareCondition,
            StepKind::CreateMarket
        ]
    );
    assert_eq!(
        kinds(scalar.steps()),
        vec![
            StepKind::Approve,
            StepKind::Transfer,
            StepKind::AskQuestion,
            StepKind::AnnounceCondition,
            StepKind::PrepareCondition,
            StepKind::CreateMarket
        ]
    );
    assert_eq!(scalar.steps()[3].to(), contracts().scalar_adapter);
    assert_ne!(binary.condition_id(), scalar.condition_id());
    assert_eq!(scalar.predicted_market_maker(), Some(predicted));
    // The factory is the spender of the initial funding.
    assert_eq!(binary.steps()[0].to(), dai().address);
}

#[tokio::test]
async fn existing_condition_is_not_prepared_again() {
    let fake = FakeChain::builder().build();
    let service = service(&fake);
    let market = binary_market(dai());
    let condition_id = service
        .plan_create_market(&market)
        .await
        .unwrap()
        .condition_id()
        .unwrap();

    let fake = FakeChain::builder().prepared_condition(condition_id).build();
    let ctx = self::service(&fake)
        .plan_create_market(&market)
        .await
        .unwrap();

    assert!(!kinds(ctx.steps()).contains(&StepKind::PrepareCondition));
}

#[tokio::test]
async fn create_rejects_mismatched_market_kind() {
    let fake = FakeChain::builder().build();
    let err = service(&fake)
        .plan_create_market(&scalar_market(dai()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Pipeline(PipelineError::Unsupported(_))));
}

#[tokio::test]
async fn create_market_reports_ids_and_address() {
    let predicted = Address::repeat_byte(0x99);
    let fake = FakeChain::builder().predicted_market_maker(predicted).build();

    let outcome = service(&fake)
        .create_market(&binary_market(native()))
        .await
        .unwrap();

    assert_eq!(outcome.predicted_market_maker, Some(predicted));
    assert!(outcome.question_id.is_some());
    assert!(outcome.condition_id.is_some());
    let batch = fake.single_batch();
    assert_eq!(batch.steps[0].kind(), StepKind::Wrap);
    assert_eq!(batch.options.value, Some(units(10)));
}

#[tokio::test]
async fn remove_funding_merges_and_delivers_earnings() {
    let condition_id = B256::repeat_byte(0xcc);
    let fake = FakeChain::builder()
        .market(market_maker(), dai().address, condition_id)
        .build();

    let ctx = service(&fake)
        .plan_remove_funding(&RemoveFundingParams {
            market_maker: market_maker(),
            shares_to_burn: units(5),
            amount_to_merge: units(4),
            earnings: units(1),
            outcome_count: 2,
            condition_id: None,
        })
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![
            StepKind::RemoveFunding,
            StepKind::MergePositions,
            StepKind::Withdraw
        ]
    );
    assert_eq!(ctx.proceeds(), Some(units(5)));
    assert_eq!(ctx.condition_id(), Some(condition_id));
}

fn history() -> ClaimHistory {
    ClaimHistory {
        history_hashes: vec![B256::ZERO],
        answerers: vec![PROXY],
        bonds: vec![units(1)],
        answers: vec![B256::with_last_byte(1)],
    }
}

#[tokio::test]
async fn redeem_resolves_claims_redeems_and_withdraws_bond() {
    let fake = FakeChain::builder()
        .market(market_maker(), contracts().wrapped_native, B256::repeat_byte(0xcc))
        .claim_history(question().id, history())
        .realitio_balance(units(1))
        .build();

    let ctx = service(&fake)
        .plan_redeem_positions(&RedeemParams {
            resolve: ResolveParams {
                question: question(),
                outcome_count: 2,
                scalar_range: None,
            },
            condition_resolved: false,
            market_maker: market_maker(),
            collateral: ctfpipe::domain::Token::new(contracts().wrapped_native, "WXDAI", 18),
            earned_collateral: units(3),
        })
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![
            StepKind::ResolveCondition,
            StepKind::ClaimWinnings,
            StepKind::RedeemPositions,
            StepKind::Unwrap,
            StepKind::Withdraw,
            StepKind::WithdrawBond,
            StepKind::Withdraw
        ]
    );
    assert_eq!(ctx.steps()[4].value(), Some(units(3)));
    assert_eq!(ctx.steps()[6].value(), Some(units(1)));
}

#[tokio::test]
async fn resolved_condition_without_earnings_only_withdraws_bond() {
    let fake = FakeChain::builder().realitio_balance(units(1)).build();

    let ctx = service(&fake)
        .plan_redeem_positions(&RedeemParams {
            resolve: ResolveParams {
                question: question(),
                outcome_count: 2,
                scalar_range: None,
            },
            condition_resolved: true,
            market_maker: market_maker(),
            collateral: dai(),
            earned_collateral: U256::ZERO,
        })
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![StepKind::WithdrawBond, StepKind::Withdraw]
    );
}

#[tokio::test]
async fn submit_answer_sends_the_bond() {
    let fake = FakeChain::builder().build();

    let ctx = service(&fake)
        .plan_submit_answer(&SubmitAnswerParams {
            question_id: question().id,
            answer: B256::with_last_byte(1),
            bond: units(1),
        })
        .await
        .unwrap();

    assert_eq!(kinds(ctx.steps()), vec![StepKind::SubmitAnswer]);
    assert_eq!(ctx.steps()[0].to(), contracts().realitio);
    assert_eq!(ctx.options().value, Some(units(1)));
}

#[tokio::test]
async fn proxy_upgrade_targets_configured_implementation() {
    let fake = FakeChain::builder()
        .master_copy(Address::repeat_byte(0x42))
        .build();
    let service = service(&fake);

    assert!(!service.proxy_is_up_to_date().await.unwrap());
    let ctx = service.plan_upgrade_proxy_implementation().await.unwrap();
    assert_eq!(kinds(ctx.steps()), vec![StepKind::UpgradeProxy]);
    assert_eq!(ctx.steps()[0].to(), PROXY);

    let current = FakeChain::builder()
        .master_copy(contracts().proxy_implementation)
        .build();
    assert!(self::service(&current).proxy_is_up_to_date().await.unwrap());

    let undeployed = FakeChain::builder()
        .deployed(false)
        .master_copy(contracts().proxy_implementation)
        .build();
    assert!(!self::service(&undeployed).proxy_is_up_to_date().await.unwrap());
}

#[tokio::test]
async fn unset_proxy_implementation_is_reported() {
    let fake = FakeChain::builder().build();
    let service = service_with(
        &fake,
        Contracts {
            proxy_implementation: Address::ZERO,
            ..contracts()
        },
    );

    let err = service.proxy_is_up_to_date().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("contracts.proxy_implementation"))
    ));

    let err = service.upgrade_proxy_implementation().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("contracts.proxy_implementation"))
    ));
    assert!(fake.batches().is_empty());
}

#[tokio::test]
async fn scalar_market_needs_a_scalar_adapter() {
    let fake = FakeChain::builder().build();
    let service = service_with(
        &fake,
        Contracts {
            scalar_adapter: Address::ZERO,
            ..contracts()
        },
    );

    let err = service
        .create_scalar_market(&scalar_market(dai()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("contracts.scalar_adapter"))
    ));
    assert!(fake.batches().is_empty());
    // Categorical markets never touch the adapter.
    service.plan_create_market(&binary_market(dai())).await.unwrap();
}

#[tokio::test]
async fn scalar_resolution_needs_a_scalar_adapter() {
    let fake = FakeChain::builder().build();
    let service = service_with(
        &fake,
        Contracts {
            scalar_adapter: Address::ZERO,
            ..contracts()
        },
    );
    let params = ResolveParams {
        question: question(),
        outcome_count: 2,
        scalar_range: Some((U256::ZERO, U256::from(100))),
    };

    let err = service.plan_resolve_condition(&params).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("contracts.scalar_adapter"))
    ));
}

// --- liquidity ---------------------------------------------------------------

fn add_params(collateral: ctfpipe::domain::Token) -> AddFundingParams {
    AddFundingParams {
        amount: units(4),
        collateral,
        market_maker: market_maker(),
    }
}

#[tokio::test]
async fn native_add_funding_with_allowance_wraps_and_funds() {
    let fake = FakeChain::builder()
        .allowance(contracts().wrapped_native, market_maker(), units(4))
        .build();
    let service = service(&fake);

    service.add_funding(&add_params(native())).await.unwrap();

    let batch = fake.single_batch();
    assert_eq!(
        kinds(&batch.steps),
        vec![StepKind::Wrap, StepKind::AddFunding]
    );
    assert_eq!(batch.steps[0].to(), contracts().wrapped_native);
    assert_eq!(batch.steps[0].value(), Some(units(4)));
    assert_eq!(batch.steps[1].to(), market_maker());
    assert_eq!(batch.options.value, Some(units(4)));
    assert_eq!(*service.status().borrow(), TransactionStatus::TransactionConfirmed);
}

#[tokio::test]
async fn erc20_add_funding_approves_and_deposits() {
    let fake = FakeChain::builder().build();

    let ctx = service(&fake)
        .plan_add_funding(&add_params(dai()))
        .await
        .unwrap();

    assert_eq!(
        kinds(ctx.steps()),
        vec![StepKind::Approve, StepKind::Transfer, StepKind::AddFunding]
    );
    assert_eq!(ctx.steps()[0].to(), dai().address);
    assert_eq!(ctx.steps()[1].to(), dai().address);
    assert_eq!(ctx.steps()[2].to(), market_maker());
    assert_eq!(ctx.options().value, None);
    assert!(fake.batches().is_empty());
}

#[tokio::test]
async fn relayed_add_funding_invests_the_amount_net_of_fee() {
    let fee = U256::from(1_000);
    let fake = FakeChain::builder().mode(relayed()).relay_fee(fee).build();
    let service = service(&fake);

    let ctx = service.plan_add_funding(&add_params(dai())).await.unwrap();
    assert_eq!(ctx.require_amount().unwrap(), units(4) - fee);
    assert_eq!(
        kinds(ctx.steps()),
        vec![StepKind::Approve, StepKind::AddFunding]
    );

    service.add_funding(&add_params(dai())).await.unwrap();
    let batch = fake.single_batch();
    assert_eq!(
        kinds(&batch.steps),
        vec![StepKind::Approve, StepKind::AddFunding, StepKind::RelayFee]
    );
    assert_eq!(batch.steps[2].value(), Some(fee));
    assert_eq!(batch.options.gas, Some(1_500_000));
}

// --- bridging ----------------------------------------------------------------

fn bridge_params(token: Address) -> BridgeParams {
    BridgeParams {
        amount: units(3),
        token,
    }
}

#[tokio::test]
async fn bridge_approval_targets_the_omni_bridge_token() {
    let fake = FakeChain::builder().build();
    let service = service(&fake);

    service.approve_for_bridge(dai().address).await.unwrap();

    let batch = fake.single_batch();
    assert_eq!(kinds(&batch.steps), vec![StepKind::Approve]);
    assert_eq!(batch.steps[0].to(), dai().address);
    assert_eq!(batch.steps[0].value(), None);
}

#[tokio::test]
async fn send_to_mainnet_requires_a_relayed_proxy() {
    let fake = FakeChain::builder().build();
    let service = service(&fake);

    let err = service
        .send_to_mainnet(&bridge_params(dai().address))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Pipeline(PipelineError::Unsupported(_))));
    assert!(fake.batches().is_empty());
    assert_eq!(*service.status().borrow(), TransactionStatus::Error);
}

#[tokio::test]
async fn native_asset_goes_through_the_native_bridge() {
    let fake = FakeChain::builder().mode(relayed()).build();

    let ctx = service(&fake)
        .plan_send_to_mainnet(&bridge_params(Address::ZERO))
        .await
        .unwrap();

    assert_eq!(kinds(ctx.steps()), vec![StepKind::Bridge]);
    assert_eq!(ctx.steps()[0].to(), contracts().native_bridge);
    assert_eq!(ctx.steps()[0].value(), Some(units(3)));
}

#[tokio::test]
async fn tokens_go_through_the_omni_bridge() {
    let fee = U256::from(500);
    let fake = FakeChain::builder().mode(relayed()).relay_fee(fee).build();

    service(&fake)
        .send_to_mainnet(&bridge_params(dai().address))
        .await
        .unwrap();

    let batch = fake.single_batch();
    assert_eq!(kinds(&batch.steps), vec![StepKind::Bridge, StepKind::RelayFee]);
    // transferAndCall is sent to the token itself.
    assert_eq!(batch.steps[0].to(), dai().address);
    assert_eq!(batch.steps[0].value(), None);
    assert_eq!(batch.steps[1].value(), Some(fee));
}

#[tokio::test]
async fn send_to_sidechain_deposits_then_relays_through_the_foreign_bridge() {
    let fake = FakeChain::builder().build();

    service(&fake)
        .send_to_sidechain(&bridge_params(dai().address))
        .await
        .unwrap();

    let batch = fake.single_batch();
    assert_eq!(
        kinds(&batch.steps),
        vec![StepKind::Approve, StepKind::Transfer, StepKind::Bridge]
    );
    assert_eq!(batch.steps[0].to(), dai().address);
    assert_eq!(batch.steps[1].to(), dai().address);
    assert_eq!(batch.steps[2].to(), contracts().foreign_bridge);
}

#[tokio::test]
async fn send_to_sidechain_refuses_an_unset_foreign_bridge() {
    let fake = FakeChain::builder().build();
    let service = service_with(
        &fake,
        Contracts {
            foreign_bridge: Address::ZERO,
            ..contracts()
        },
    );

    let err = service
        .plan_send_to_sidechain(&bridge_params(dai().address))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Pipeline(PipelineError::MissingInput("contracts.foreign_bridge"))
    ));
    assert!(fake.batches().is_empty());
}
