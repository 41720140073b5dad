use thiserror::Error;

/// Typed error hierarchy for the vault controller.
///
/// Library-internal errors use specific variants; application code wraps with
/// `anyhow::Context` for propagation. Validation rejections are not errors —
/// they are ordinary [`crate::core::validator::Validation`] outcomes.
#[derive(Error, Debug)]
pub enum ControllerError {
    // -- Network ------------------------------------------------------------
    #[error("active chain {actual} does not match target chain {expected}")]
    NetworkMismatch { expected: u64, actual: u64 },

    // -- Wallet / lifecycle -------------------------------------------------
    #[error("signature request declined: {reason}")]
    UserDeclined { reason: String },

    #[error("simulation reverted: {reason}")]
    SimulationReverted { reason: String },

    #[error("transaction reverted: {reason} (tx: {tx_hash})")]
    ExecutionReverted { tx_hash: String, reason: String },

    #[error("transaction unconfirmed after {timeout_seconds}s (tx: {tx_hash})")]
    ConfirmationTimeout { tx_hash: String, timeout_seconds: u64 },

    #[error("wallet error: {reason}")]
    Wallet { reason: String },

    // -- Configuration ------------------------------------------------------
    #[error("configuration error: {0}")]
    Config(String),

    // -- Forwarded errors ---------------------------------------------------
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),
}
