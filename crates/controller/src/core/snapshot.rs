//! Pure derivation of position and protocol metrics from raw chain reads.
//!
//! Deriving twice from the same reads yields identical values — nothing here
//! consults clocks, counters, or previous state. Unit conversion happens
//! once, at this boundary; everything downstream works in `Decimal`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

use crate::chain::gateway::{RawBalanceReads, RawPositionReads, RawProtocolReads};
use crate::constants::BPS_PER_PERCENT;
use crate::types::wad::{fixed_to_decimal, wad_to_decimal};
use crate::types::{Position, ProtocolStats, WalletBalances};

const HUNDRED: Decimal = dec!(100);

/// Derive a [`Position`] from raw per-user reads.
///
/// `ltv_percent` is zero for collateral-free wallets; `is_liquidatable` is a
/// function of the health factor alone (`0 < hf < 1`), on full precision —
/// the rounded display value is never consulted.
pub fn derive_position(raw: &RawPositionReads) -> Position {
    let collateral_value_usd = wad_to_decimal(raw.collateral);
    let debt_usdt = wad_to_decimal(raw.debt);
    let health_factor = wad_to_decimal(raw.health_factor);

    let ltv_percent = if collateral_value_usd.is_zero() {
        Decimal::ZERO
    } else {
        debt_usdt / collateral_value_usd * HUNDRED
    };

    let is_liquidatable = health_factor > Decimal::ZERO && health_factor < Decimal::ONE;

    Position {
        collateral_value_usd,
        debt_usdt,
        receipt_token_balance: wad_to_decimal(raw.receipt_balance),
        health_factor,
        ltv_percent,
        is_liquidatable,
    }
}

/// Derive [`ProtocolStats`] from raw vault-wide reads.
pub fn derive_protocol(raw: &RawProtocolReads) -> ProtocolStats {
    let total_value_locked = wad_to_decimal(raw.tvl);
    let total_debt = wad_to_decimal(raw.total_debt);

    let utilization_percent = if total_value_locked.is_zero() {
        Decimal::ZERO
    } else {
        total_debt / total_value_locked * HUNDRED
    };

    // Rate arrives in basis points as a plain integer, not WAD-scaled.
    let rate_bps = Decimal::from_str(&raw.interest_rate_bps.to_string()).unwrap_or_default();

    ProtocolStats {
        total_value_locked,
        total_debt,
        utilization_percent,
        interest_rate_apy: rate_bps / BPS_PER_PERCENT,
    }
}

/// Convert raw wallet balances to `Decimal`.
pub fn derive_balances(raw: &RawBalanceReads, token_decimals: u32) -> WalletBalances {
    WalletBalances {
        collateral_token: fixed_to_decimal(raw.collateral_token, token_decimals),
        borrow_tokens: raw
            .borrow_tokens
            .iter()
            .map(|(addr, bal)| (*addr, fixed_to_decimal(*bal, token_decimals)))
            .collect(),
    }
}
