use alloy::primitives::Address;
use rust_decimal::Decimal;
use serde::Serialize;

/// Which asset settles a repayment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepayAsset {
    /// Direct repayment in the collateral/debt token.
    Collateral,
    /// Repayment in one of the vault's allowed borrow tokens.
    BorrowToken(Address),
}

/// An operator-initiated action, created when a form is submitted and
/// consumed exactly once by the lifecycle controller. Adding a variant
/// forces every dispatch site to handle it — there is no string-keyed
/// fall-through to an "unknown action" path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PendingAction {
    Deposit { amount: Decimal },
    Borrow { amount: Decimal },
    Withdraw { amount: Decimal },
    Repay { amount: Decimal, asset: RepayAsset },
    ApproveVault { amount: Decimal },
    ApproveIntegrator { amount: Decimal },
    Leverage { amount: Decimal },
    /// Test-token faucet on the deployment's collateral token.
    Mint { amount: Decimal },
}

impl PendingAction {
    pub fn amount(&self) -> Decimal {
        match *self {
            Self::Deposit { amount }
            | Self::Borrow { amount }
            | Self::Withdraw { amount }
            | Self::Repay { amount, .. }
            | Self::ApproveVault { amount }
            | Self::ApproveIntegrator { amount }
            | Self::Leverage { amount }
            | Self::Mint { amount } => amount,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "deposit",
            Self::Borrow { .. } => "borrow",
            Self::Withdraw { .. } => "withdraw",
            Self::Repay { .. } => "repay",
            Self::ApproveVault { .. } => "approve_vault",
            Self::ApproveIntegrator { .. } => "approve_integrator",
            Self::Leverage { .. } => "leverage",
            Self::Mint { .. } => "mint",
        }
    }
}
