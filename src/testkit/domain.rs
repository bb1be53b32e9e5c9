//! Builders for domain primitives used across tests.

use alloy_primitives::{Address, B256, U256};
use rust_decimal_macros::dec;

use crate::application::pipeline::Contracts;
use crate::domain::{MarketData, MarketKind, Question, ScalarBounds, Token};

/// One ether (or one token with 18 decimals) in base units.
pub const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// `n` whole units with 18 decimals.
pub fn units(n: u64) -> U256 {
    U256::from(n) * ONE
}

/// Contract set where each address is a distinct repeated byte.
pub fn contracts() -> Contracts {
    Contracts {
        conditional_tokens: Address::repeat_byte(0x01),
        market_maker_factory: Address::repeat_byte(0x02),
        realitio: Address::repeat_byte(0x03),
        oracle: Address::repeat_byte(0x04),
        scalar_adapter: Address::repeat_byte(0x05),
        wrapped_native: Address::repeat_byte(0x06),
        proxy_implementation: Address::repeat_byte(0x07),
        omni_bridge: Address::repeat_byte(0x08),
        native_bridge: Address::repeat_byte(0x09),
        foreign_bridge: Address::repeat_byte(0x0a),
    }
}

/// An 18-decimal ERC-20 collateral.
pub fn dai() -> Token {
    Token::new(Address::repeat_byte(0xda), "DAI", 18)
}

pub fn native() -> Token {
    Token::native("xDAI")
}

/// Market maker address used by trade tests.
pub fn market_maker() -> Address {
    Address::repeat_byte(0x3a)
}

fn market(collateral: Token, kind: MarketKind) -> MarketData {
    MarketData {
        question: "Will the bridge reopen before June?".to_string(),
        category: "infrastructure".to_string(),
        language: "en".to_string(),
        arbitrator: Address::repeat_byte(0x0b),
        opening_ts: 1_760_000_000,
        timeout: 86_400,
        collateral,
        funding: units(10),
        fee: dec!(0.02),
        kind,
        nonce: U256::ZERO,
        salt_nonce: Some(U256::from(7)),
    }
}

/// Yes/No market at even odds.
pub fn binary_market(collateral: Token) -> MarketData {
    categorical_market(collateral, &["Yes", "No"], &[50.0, 50.0])
}

pub fn categorical_market(collateral: Token, outcomes: &[&str], odds: &[f64]) -> MarketData {
    market(
        collateral,
        MarketKind::Categorical {
            outcomes: outcomes.iter().map(ToString::to_string).collect(),
            odds: odds.to_vec(),
        },
    )
}

/// Scalar market over `[0, 100]` opening at 25.
pub fn scalar_market(collateral: Token) -> MarketData {
    let bounds = ScalarBounds::try_new(U256::ZERO, U256::from(100), U256::from(25))
        .expect("valid bounds");
    market(
        collateral,
        MarketKind::Scalar {
            unit: "km".to_string(),
            bounds,
        },
    )
}

/// Binary question with a fixed id.
pub fn question() -> Question {
    Question {
        id: B256::repeat_byte(0x51),
        template_id: 2,
        raw: "Will the bridge reopen before June?\u{241f}\"Yes\",\"No\"\u{241f}infrastructure\u{241f}en"
            .to_string(),
        outcome_count: 2,
    }
}
