use alloy::primitives::B256;
use serde::Serialize;

/// Lifecycle phase of the single tracked transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxPhase {
    #[default]
    Idle,
    AwaitingSignature,
    Broadcast,
    Confirmed,
    Failed,
}

impl TxPhase {
    /// A new submission is legal from `Idle` or a terminal phase.
    pub fn accepts_submission(&self) -> bool {
        matches!(self, Self::Idle | Self::Confirmed | Self::Failed)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingSignature => "awaiting_signature",
            Self::Broadcast => "broadcast",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

/// Why a transaction ended in `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCause {
    /// The operator refused the signature request in the wallet.
    Declined,
    /// Execution reverted, either in pre-broadcast simulation or on-chain.
    Reverted,
}

/// Human-readable failure with the provider's low-level detail when one
/// was supplied (decoded revert string, wallet error code).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub cause: FailureCause,
    pub message: String,
    pub detail: Option<String>,
}

impl FailureDetail {
    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            cause: FailureCause::Declined,
            message: message.into(),
            detail: None,
        }
    }

    pub fn reverted(message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            cause: FailureCause::Reverted,
            message: message.into(),
            detail,
        }
    }
}

/// The single tracked transaction. Owned by the lifecycle controller; at
/// most one record is in flight at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: Option<B256>,
    pub phase: TxPhase,
    pub failure: Option<FailureDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_legal_from_idle_and_terminals() {
        assert!(TxPhase::Idle.accepts_submission());
        assert!(TxPhase::Confirmed.accepts_submission());
        assert!(TxPhase::Failed.accepts_submission());
        assert!(!TxPhase::AwaitingSignature.accepts_submission());
        assert!(!TxPhase::Broadcast.accepts_submission());
    }

    #[test]
    fn terminal_phases() {
        assert!(TxPhase::Confirmed.is_terminal());
        assert!(TxPhase::Failed.is_terminal());
        assert!(!TxPhase::Idle.is_terminal());
        assert!(!TxPhase::Broadcast.is_terminal());
    }
}
