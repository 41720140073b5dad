//! Local guardrails mirroring the vault's own invariants.
//!
//! Every rule that would make the contract revert is checked here first, so
//! an invalid action dies with a specific reason before any wallet
//! interaction. Validation is synchronous, side-effect free, and identical
//! whether or not a wallet is connected — connection state is the network
//! guard's concern, not this module's.

use rust_decimal::Decimal;
use std::fmt;

use crate::types::wad::format_display;
use crate::types::{AllowanceState, PendingAction, Position, RepayAsset, WalletBalances};

/// The two LTV constants. The borrow ceiling is deliberately tighter than
/// the liquidation threshold; conflating them would erase the safety buffer.
#[derive(Debug, Clone, Copy)]
pub struct RiskParams {
    pub borrow_ceiling: Decimal,
    pub liquidation_threshold: Decimal,
}

/// Outcome of validating a proposed action.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Accepted,
    Rejected(RejectReason),
}

/// Why an action was rejected. `Display` renders the operator-facing
/// message.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    NonPositiveAmount,
    InsufficientBalance,
    ApprovalRequired,
    NoCollateral,
    ExceedsBorrowLimit { headroom: Decimal },
    InsufficientWithdrawable,
    IntegratorApprovalRequired,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount => write!(f, "amount must be positive"),
            Self::InsufficientBalance => write!(f, "insufficient balance"),
            Self::ApprovalRequired => write!(f, "approval required"),
            Self::NoCollateral => write!(f, "no collateral deposited"),
            Self::ExceedsBorrowLimit { headroom } => write!(
                f,
                "exceeds borrow limit (available to borrow: ${})",
                format_display(*headroom)
            ),
            Self::InsufficientWithdrawable => write!(f, "insufficient withdrawable balance"),
            Self::IntegratorApprovalRequired => write!(f, "integrator approval required"),
        }
    }
}

/// Evaluate the rules for `action` in order; the first failing rule wins.
pub fn validate(
    action: &PendingAction,
    position: &Position,
    allowances: &AllowanceState,
    balances: &WalletBalances,
    risk: &RiskParams,
) -> Validation {
    if action.amount() <= Decimal::ZERO {
        return Validation::Rejected(RejectReason::NonPositiveAmount);
    }

    match *action {
        PendingAction::Deposit { amount } => {
            if amount > balances.collateral_token {
                return Validation::Rejected(RejectReason::InsufficientBalance);
            }
            if !allowances.vault_approved {
                return Validation::Rejected(RejectReason::ApprovalRequired);
            }
        }
        PendingAction::Borrow { amount } => {
            if position.collateral_value_usd.is_zero() {
                return Validation::Rejected(RejectReason::NoCollateral);
            }
            let ceiling = position.collateral_value_usd * risk.borrow_ceiling;
            if position.debt_usdt + amount > ceiling {
                return Validation::Rejected(RejectReason::ExceedsBorrowLimit {
                    headroom: position.borrow_headroom(risk.borrow_ceiling),
                });
            }
        }
        PendingAction::Withdraw { amount } => {
            if amount > position.available_to_withdraw(risk.liquidation_threshold) {
                return Validation::Rejected(RejectReason::InsufficientWithdrawable);
            }
        }
        PendingAction::Repay { amount, asset } => {
            let available = match asset {
                RepayAsset::Collateral => balances.collateral_token,
                RepayAsset::BorrowToken(token) => balances.borrow_token(token),
            };
            if amount > available {
                return Validation::Rejected(RejectReason::InsufficientBalance);
            }
        }
        PendingAction::Leverage { .. } => {
            if !allowances.integrator_approved {
                return Validation::Rejected(RejectReason::IntegratorApprovalRequired);
            }
        }
        // Approvals and the faucet only need a positive amount.
        PendingAction::ApproveVault { .. }
        | PendingAction::ApproveIntegrator { .. }
        | PendingAction::Mint { .. } => {}
    }

    Validation::Accepted
}
