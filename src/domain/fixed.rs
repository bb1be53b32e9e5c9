//! Fixed-point helpers over `U256` amounts.
//!
//! On-chain amounts are integers scaled by the token decimals. Market maker
//! math uses an additional `1e18` scale ([`ONE`]) for intermediate products.

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::error::DomainError;

/// `1e18`, the fixed-point unit used by the market maker contracts.
pub const ONE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Integer division rounding towards positive infinity.
#[must_use]
pub fn ceil_div(numerator: U256, denominator: U256) -> U256 {
    let quotient = numerator / denominator;
    if quotient * denominator == numerator {
        quotient
    } else {
        quotient + U256::from(1)
    }
}

/// Lossy conversion for ratios and display. Exact up to 2^53.
#[must_use]
pub fn to_f64(value: U256) -> f64 {
    value
        .as_limbs()
        .iter()
        .rev()
        .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
}

/// Ratio `numerator / denominator` as a float. Zero when the denominator is zero.
#[must_use]
pub fn div_u256(numerator: U256, denominator: U256) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    to_f64(numerator) / to_f64(denominator)
}

/// Clamp `value` into `[min, max]`.
#[must_use]
pub fn clamp(value: U256, min: U256, max: U256) -> U256 {
    value.max(min).min(max)
}

/// An amount below `0.00001` of a whole token is dust.
#[must_use]
pub fn is_dust(amount: U256, decimals: u8) -> bool {
    let threshold = U256::from(10).pow(U256::from(decimals.saturating_sub(5)));
    amount < threshold
}

/// Convert a fee fraction such as `0.02` into its `1e18`-scaled form.
///
/// # Errors
///
/// Returns [`DomainError::InvalidFee`] unless `0 <= fee < 1`.
pub fn fee_to_wad(fee: Decimal) -> Result<U256, DomainError> {
    if fee < Decimal::ZERO || fee >= Decimal::ONE {
        return Err(DomainError::InvalidFee { fee });
    }
    let scaled = (fee * Decimal::from(1_000_000_000_000_000_000u64)).trunc();
    let wad = scaled.to_u128().ok_or(DomainError::InvalidFee { fee })?;
    Ok(U256::from(wad))
}

/// Scale a decimal token amount to base units, truncating extra precision.
#[must_use]
pub fn to_base_units(amount: Decimal, decimals: u8) -> U256 {
    amount
        .checked_mul(Decimal::from(10u64.pow(u32::from(decimals.min(18)))))
        .and_then(|scaled| scaled.trunc().to_u128())
        .map(U256::from)
        .unwrap_or(U256::ZERO)
}
