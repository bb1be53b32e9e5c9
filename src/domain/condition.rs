//! Identifier derivations for questions, conditions and outcome index sets.
//!
//! Every id is a keccak hash over tightly packed fields, mirroring what the
//! Realitio and conditional tokens contracts compute on-chain, so the ids of
//! a market can be known before its creation batch is mined.

use alloy_primitives::{keccak256, Address, B256, U256};

use super::market::{MarketData, MarketKind};

/// Unit separator between fields of a Realitio question text.
pub const QUESTION_SEPARATOR: char = '\u{241f}';

/// Hash of the question content: `templateId ‖ openingTs ‖ question`.
#[must_use]
pub fn question_content_hash(template_id: u64, opening_ts: u32, question: &str) -> B256 {
    let mut packed = Vec::with_capacity(32 + 4 + question.len());
    packed.extend_from_slice(&U256::from(template_id).to_be_bytes::<32>());
    packed.extend_from_slice(&opening_ts.to_be_bytes());
    packed.extend_from_slice(question.as_bytes());
    keccak256(packed)
}

/// Realitio question id as computed by `askQuestion` for `sender`.
#[must_use]
pub fn question_id(
    content_hash: B256,
    arbitrator: Address,
    timeout: u32,
    sender: Address,
    nonce: U256,
) -> B256 {
    let mut packed = Vec::with_capacity(32 + 20 + 4 + 20 + 32);
    packed.extend_from_slice(content_hash.as_slice());
    packed.extend_from_slice(arbitrator.as_slice());
    packed.extend_from_slice(&timeout.to_be_bytes());
    packed.extend_from_slice(sender.as_slice());
    packed.extend_from_slice(&nonce.to_be_bytes::<32>());
    keccak256(packed)
}

/// Conditional tokens condition id.
#[must_use]
pub fn condition_id(oracle: Address, question_id: B256, outcome_slot_count: usize) -> B256 {
    let mut packed = Vec::with_capacity(20 + 32 + 32);
    packed.extend_from_slice(oracle.as_slice());
    packed.extend_from_slice(question_id.as_slice());
    packed.extend_from_slice(&U256::from(outcome_slot_count).to_be_bytes::<32>());
    keccak256(packed)
}

/// Question id the scalar adapter prepares its condition under.
#[must_use]
pub fn scalar_condition_question_id(question_id: B256, lower: U256, upper: U256) -> B256 {
    let mut packed = Vec::with_capacity(32 * 3);
    packed.extend_from_slice(question_id.as_slice());
    packed.extend_from_slice(&lower.to_be_bytes::<32>());
    packed.extend_from_slice(&upper.to_be_bytes::<32>());
    keccak256(packed)
}

/// Singleton index sets `[1, 2, 4, ...]`, one per outcome.
#[must_use]
pub fn index_sets(outcome_count: usize) -> Vec<U256> {
    (0..outcome_count).map(|i| U256::from(1u8) << i).collect()
}

/// Realitio question text for a market.
///
/// Categorical markets embed their outcomes as JSON strings; scalar markets
/// only carry title, category and language. Every field is JSON-escaped
/// because Realitio substitutes them into a JSON template.
#[must_use]
pub fn encode_question_text(market: &MarketData) -> String {
    let title = escape(&market.question);
    let category = escape(&market.category);
    let language = escape(&market.language);
    let sep = QUESTION_SEPARATOR;
    match &market.kind {
        MarketKind::Categorical { outcomes, .. } => {
            let outcomes = outcomes
                .iter()
                .map(|o| format!("\"{}\"", escape(o)))
                .collect::<Vec<_>>()
                .join(",");
            format!("{title}{sep}{outcomes}{sep}{category}{sep}{language}")
        }
        MarketKind::Scalar { .. } => format!("{title}{sep}{category}{sep}{language}"),
    }
}

// JSON string escaping without the surrounding quotes.
fn escape(text: &str) -> String {
    let quoted = serde_json::Value::String(text.to_owned()).to_string();
    quoted[1..quoted.len() - 1].to_owned()
}

/// Ids a market will get once its creation batch is mined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketIds {
    pub question_id: B256,
    /// Question id the condition is prepared under; differs for scalar markets.
    pub condition_question_id: B256,
    pub condition_id: B256,
}

/// Derive the question and condition ids of `market`.
///
/// `sender` is the account calling `askQuestion` (the proxy). `oracle` is
/// the reporting contract: the scalar adapter for scalar markets, the
/// oracle proxy otherwise.
#[must_use]
pub fn derive_market_ids(market: &MarketData, sender: Address, oracle: Address) -> MarketIds {
    let text = encode_question_text(market);
    let content = question_content_hash(market.template_id(), market.opening_ts, &text);
    let question_id = question_id(content, market.arbitrator, market.timeout, sender, market.nonce);
    let condition_question = match market.bounds() {
        Some(bounds) => scalar_condition_question_id(question_id, bounds.lower(), bounds.upper()),
        None => question_id,
    };
    MarketIds {
        question_id,
        condition_question_id: condition_question,
        condition_id: condition_id(oracle, condition_question, market.outcome_slot_count()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::ScalarBounds;
    use crate::domain::token::Token;
    use rust_decimal_macros::dec;

    fn market(kind: MarketKind) -> MarketData {
        MarketData {
            question: "Who wins?".into(),
            category: "sports".into(),
            language: "en_US".into(),
            arbitrator: Address::repeat_byte(3),
            opening_ts: 1_700_000_000,
            timeout: 86_400,
            collateral: Token::native("ETH"),
            funding: U256::from(10),
            fee: dec!(0.02),
            kind,
            nonce: U256::ZERO,
            salt_nonce: None,
        }
    }

    #[test]
    fn index_sets_are_powers_of_two() {
        assert_eq!(
            index_sets(4),
            vec![U256::from(1), U256::from(2), U256::from(4), U256::from(8)]
        );
        assert!(index_sets(0).is_empty());
    }

    #[test]
    fn categorical_text_quotes_outcomes() {
        let data = market(MarketKind::Categorical {
            outcomes: vec!["Home".into(), "Say \"away\"".into()],
            odds: vec![50.0, 50.0],
        });
        assert_eq!(
            encode_question_text(&data),
            "Who wins?\u{241f}\"Home\",\"Say \\\"away\\\"\"\u{241f}sports\u{241f}en_US"
        );
    }

    #[test]
    fn scalar_text_omits_outcomes() {
        let bounds = ScalarBounds::try_new(U256::ZERO, U256::from(10), U256::from(5)).unwrap();
        let data = market(MarketKind::Scalar {
            unit: "goals".into(),
            bounds,
        });
        assert_eq!(encode_question_text(&data), "Who wins?\u{241f}sports\u{241f}en_US");
    }

    #[test]
    fn category_and_language_are_escaped_like_the_title() {
        let mut data = market(MarketKind::Categorical {
            outcomes: vec!["Yes".into(), "No".into()],
            odds: vec![50.0, 50.0],
        });
        data.category = "art \"modern\"".into();
        data.language = "en\\US".into();
        assert_eq!(
            encode_question_text(&data),
            "Who wins?\u{241f}\"Yes\",\"No\"\u{241f}art \\\"modern\\\"\u{241f}en\\\\US"
        );
    }

    #[test]
    fn condition_id_matches_manual_packing() {
        let oracle = Address::repeat_byte(0xaa);
        let question = B256::repeat_byte(0x11);
        let mut packed = Vec::new();
        packed.extend_from_slice(oracle.as_slice());
        packed.extend_from_slice(question.as_slice());
        packed.extend_from_slice(&U256::from(2).to_be_bytes::<32>());
        assert_eq!(condition_id(oracle, question, 2), keccak256(&packed));
        assert_eq!(packed.len(), 84);
    }

    #[test]
    fn ids_depend_on_sender_and_nonce() {
        let data = market(MarketKind::Categorical {
            outcomes: vec!["A".into(), "B".into()],
            odds: vec![50.0, 50.0],
        });
        let oracle = Address::repeat_byte(0xbb);
        let a = derive_market_ids(&data, Address::repeat_byte(1), oracle);
        let b = derive_market_ids(&data, Address::repeat_byte(2), oracle);
        assert_ne!(a.question_id, b.question_id);

        let mut renonced = data.clone();
        renonced.nonce = U256::from(1);
        assert_ne!(derive_market_ids(&renonced, Address::repeat_byte(1), oracle), a);
    }

    #[test]
    fn scalar_condition_uses_bounded_question() {
        let bounds = ScalarBounds::try_new(U256::ZERO, U256::from(10), U256::from(5)).unwrap();
        let data = market(MarketKind::Scalar {
            unit: "goals".into(),
            bounds,
        });
        let adapter = Address::repeat_byte(0xcc);
        let ids = derive_market_ids(&data, Address::repeat_byte(1), adapter);
        let bounded = scalar_condition_question_id(ids.question_id, U256::ZERO, U256::from(10));
        assert_eq!(ids.condition_id, condition_id(adapter, bounded, 2));
    }
}
