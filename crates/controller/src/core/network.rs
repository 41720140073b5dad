//! Target-chain gate.
//!
//! Every write must land on the configured chain. The check fails closed: if
//! the wallet cannot report its active chain, writes stay blocked.

use std::sync::Arc;
use tracing::debug;

use crate::chain::wallet::Wallet;
use crate::errors::ControllerError;

pub struct NetworkGuard<W: Wallet> {
    wallet: Arc<W>,
    target_chain_id: u64,
}

impl<W: Wallet> NetworkGuard<W> {
    pub fn new(wallet: Arc<W>, target_chain_id: u64) -> Self {
        Self {
            wallet,
            target_chain_id,
        }
    }

    pub fn target_chain_id(&self) -> u64 {
        self.target_chain_id
    }

    pub async fn is_on_target_chain(&self) -> bool {
        self.check().await.is_ok()
    }

    /// `Ok` on the target chain, `NetworkMismatch` otherwise. An unreadable
    /// chain id reports as chain 0 — still a mismatch.
    pub async fn check(&self) -> Result<(), ControllerError> {
        let actual = self.wallet.active_chain_id().await.unwrap_or(0);
        if actual == self.target_chain_id {
            Ok(())
        } else {
            Err(ControllerError::NetworkMismatch {
                expected: self.target_chain_id,
                actual,
            })
        }
    }

    /// Ask the wallet to move to the target chain. Fire-and-forget: the
    /// provider UI is asynchronous and user-driven, so nothing awaits the
    /// outcome here.
    pub async fn request_switch(&self) {
        debug!(target = self.target_chain_id, "requesting chain switch");
        self.wallet.request_switch(self.target_chain_id).await;
    }
}
