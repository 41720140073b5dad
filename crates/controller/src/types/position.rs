use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;

use super::tx::TransactionRecord;

/// A wallet's derived vault position. Rebuilt wholesale on every refresh;
/// `ltv_percent` and `is_liquidatable` are computed from the other fields at
/// derivation time and never stored independently of them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Position {
    #[serde(with = "rust_decimal::serde::str")]
    pub collateral_value_usd: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub debt_usdt: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub receipt_token_balance: Decimal,
    /// Safety ratio; `0` is the sentinel for "no debt / unknown".
    #[serde(with = "rust_decimal::serde::str")]
    pub health_factor: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub ltv_percent: Decimal,
    pub is_liquidatable: bool,
}

impl Position {
    /// Remaining borrow capacity under the given ceiling, floored at zero.
    pub fn borrow_headroom(&self, borrow_ceiling: Decimal) -> Decimal {
        (self.collateral_value_usd * borrow_ceiling - self.debt_usdt).max(Decimal::ZERO)
    }

    /// Collateral that can leave the vault while the post-withdrawal LTV
    /// stays under the liquidation threshold. Debt-free positions can
    /// withdraw everything.
    pub fn available_to_withdraw(&self, liquidation_threshold: Decimal) -> Decimal {
        if self.debt_usdt.is_zero() {
            return self.collateral_value_usd;
        }
        if liquidation_threshold.is_zero() {
            return Decimal::ZERO;
        }
        (self.collateral_value_usd - self.debt_usdt / liquidation_threshold).max(Decimal::ZERO)
    }
}

/// Vault-wide figures, recomputed on every refresh alongside the position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProtocolStats {
    #[serde(with = "rust_decimal::serde::str")]
    pub total_value_locked: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_debt: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub utilization_percent: Decimal,
    /// Annual interest rate as a percentage (500 bps on-chain → 5.00).
    #[serde(with = "rust_decimal::serde::str")]
    pub interest_rate_apy: Decimal,
}

/// Spendable wallet balances consulted by deposit/repay validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WalletBalances {
    /// Collateral-token balance of the operator's wallet.
    #[serde(with = "rust_decimal::serde::str")]
    pub collateral_token: Decimal,
    /// Balances of the vault's allowed borrow tokens, keyed by address.
    pub borrow_tokens: Vec<(Address, Decimal)>,
}

impl WalletBalances {
    /// Balance of an allowed borrow token; unknown tokens read as zero.
    pub fn borrow_token(&self, token: Address) -> Decimal {
        self.borrow_tokens
            .iter()
            .find(|(addr, _)| *addr == token)
            .map(|(_, bal)| *bal)
            .unwrap_or_default()
    }
}

/// Approval flags for the two spenders of the collateral token.
///
/// Each flag is true iff that spender's allowance is greater than zero.
/// The flags are independent: approving the vault says nothing about the
/// integrator, and vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllowanceState {
    pub vault_approved: bool,
    pub integrator_approved: bool,
}

/// Whether the vault reports a configured price oracle.
///
/// Deployments without the accessor are marked at configuration time; the
/// controller then reports `Fallback` without issuing the call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum OracleStatus {
    Connected { oracle: Address },
    #[default]
    Fallback,
}

/// The read-only tuple published to presentation. Replaced wholesale on each
/// refresh (the transaction record is owned by the lifecycle controller and
/// updated through its transitions only).
#[derive(Debug, Clone, Default, Serialize)]
pub struct ControllerState {
    pub position: Position,
    pub protocol: ProtocolStats,
    pub allowances: AllowanceState,
    pub balances: WalletBalances,
    pub oracle: OracleStatus,
    pub allowed_borrow_tokens: Vec<Address>,
    pub transaction: TransactionRecord,
}
