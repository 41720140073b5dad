//! 18-decimal fixed-point conversions.
//!
//! The vault returns every amount, USD valuation, and health factor as a
//! WAD-scaled (1e18) integer. Off-chain arithmetic uses `Decimal` throughout;
//! comparisons always run on full precision and only rendering rounds.

use alloy::primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::constants::{DISPLAY_DECIMALS, WAD};

/// Convert an on-chain WAD value to `Decimal`.
///
/// Values beyond `Decimal` range collapse to zero, matching the degraded-read
/// default for the field.
pub fn wad_to_decimal(raw: U256) -> Decimal {
    let raw = Decimal::from_str(&raw.to_string()).unwrap_or_default();
    raw / WAD
}

/// Convert a fixed-point value with an arbitrary decimal count to `Decimal`.
pub fn fixed_to_decimal(raw: U256, decimals: u32) -> Decimal {
    let scale = Decimal::from(10u64.pow(decimals.min(18)));
    let raw = Decimal::from_str(&raw.to_string()).unwrap_or_default();
    raw / scale
}

/// Convert a `Decimal` amount to its WAD representation, truncating any
/// precision beyond 18 decimal places. Negative amounts map to zero.
pub fn decimal_to_wad(value: Decimal) -> U256 {
    if value.is_sign_negative() {
        return U256::ZERO;
    }
    let scaled = (value * WAD).trunc();
    match scaled.to_u128() {
        Some(units) => U256::from(units),
        None => U256::ZERO,
    }
}

/// Parse an operator-entered amount string.
///
/// Returns `None` for anything `Decimal` cannot represent; range and sign
/// checks belong to the validator, not the parser.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    Decimal::from_str(input.trim()).ok()
}

/// Render a USD amount or health factor for display: two decimal places,
/// rounding half away from zero. Never feed the result back into
/// comparisons — those use the unrounded value.
pub fn format_display(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(DISPLAY_DECIMALS, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}
