//! The controller facade.
//!
//! Owns the published `{position, protocol, allowances, transaction}` state
//! and the three operator entry points. Snapshot refreshes fan out the chain
//! reads concurrently, join them, and replace the published value wholesale —
//! a newer refresh supersedes an older one instead of merging with it, so a
//! slow field from a stale request can never overwrite a fresher value.

use alloy::primitives::{Address, B256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::chain::gateway::ChainReads;
use crate::chain::wallet::Wallet;
use crate::chain::ContractAddresses;
use crate::config::ControllerConfig;
use crate::errors::ControllerError;
use crate::types::{ControllerState, FailureDetail, PendingAction};

use super::lifecycle::{LifecycleResult, TransactionLifecycleController};
use super::network::NetworkGuard;
use super::validator::{self, RejectReason, RiskParams, Validation};
use super::{allowance, snapshot};

/// What became of a `submit_action` call. Every variant is an ordinary
/// operator-visible outcome; none escalate as faults.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Confirmed { tx_hash: B256 },
    /// A local guardrail rejected the action before any wallet interaction.
    Rejected(RejectReason),
    /// Off the target chain; a switch was requested instead of submitting.
    SwitchRequested,
    Failed(FailureDetail),
    /// Another transaction is in flight.
    Busy,
}

/// Static wiring for one controller instance, fixed per deployment.
#[derive(Debug, Clone, Copy)]
pub struct ControllerParams {
    pub target_chain_id: u64,
    pub contracts: ContractAddresses,
    pub risk: RiskParams,
    pub token_decimals: u32,
    pub settle_delay: Duration,
}

impl ControllerParams {
    pub fn from_config(config: &ControllerConfig) -> Result<Self, ControllerError> {
        Ok(Self {
            target_chain_id: config.chain.chain_id,
            contracts: ContractAddresses::from_config(&config.chain.contracts)?,
            risk: RiskParams {
                borrow_ceiling: config.vault.borrow_ceiling_ltv,
                liquidation_threshold: config.vault.liquidation_threshold_ltv,
            },
            token_decimals: u32::from(config.vault.token_decimals),
            settle_delay: Duration::from_millis(config.timing.settle_delay_ms),
        })
    }
}

pub struct VaultController<G: ChainReads, W: Wallet> {
    gateway: Arc<G>,
    guard: NetworkGuard<W>,
    lifecycle: TransactionLifecycleController<W>,
    state: Arc<watch::Sender<ControllerState>>,
    owner: Address,
    risk: RiskParams,
    token_decimals: u32,
    settle_delay: Duration,
}

impl<G: ChainReads, W: Wallet> VaultController<G, W> {
    pub fn new(gateway: Arc<G>, wallet: Arc<W>, owner: Address, params: ControllerParams) -> Self {
        let state = Arc::new(watch::Sender::new(ControllerState::default()));
        Self {
            gateway,
            guard: NetworkGuard::new(wallet.clone(), params.target_chain_id),
            lifecycle: TransactionLifecycleController::new(
                wallet,
                state.clone(),
                params.contracts,
                owner,
            ),
            state,
            owner,
            risk: params.risk,
            token_decimals: params.token_decimals,
            settle_delay: params.settle_delay,
        }
    }

    /// Subscribe to state replacements. Receivers always observe the latest
    /// published value; intermediate values may be skipped.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Clone of the currently published state.
    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    /// Re-read the chain and replace the published snapshot.
    ///
    /// Reads fan out concurrently and fail per field (a failed read leaves
    /// that field at its default). Off the target chain, nothing is read and
    /// the stale snapshot stays published.
    pub async fn refresh(&self) -> Result<(), ControllerError> {
        self.guard.check().await?;

        let borrow_tokens = self.gateway.allowed_borrow_tokens().await;
        let (position_raw, protocol_raw, allowance_raw, balance_raw, oracle) = tokio::join!(
            self.gateway.position_reads(self.owner),
            self.gateway.protocol_reads(self.owner),
            self.gateway.allowance_reads(self.owner),
            self.gateway.balance_reads(self.owner, &borrow_tokens),
            self.gateway.oracle_status(),
        );

        let position = snapshot::derive_position(&position_raw);
        if position.is_liquidatable != position_raw.liquidatable_flag {
            warn!(
                derived = position.is_liquidatable,
                reported = position_raw.liquidatable_flag,
                "vault liquidation flag disagrees with derived value"
            );
        }
        let protocol = snapshot::derive_protocol(&protocol_raw);
        let allowances = allowance::derive(&allowance_raw);
        let balances = snapshot::derive_balances(&balance_raw, self.token_decimals);

        self.state.send_modify(|state| {
            state.position = position;
            state.protocol = protocol;
            state.allowances = allowances;
            state.balances = balances;
            state.oracle = oracle;
            state.allowed_borrow_tokens = borrow_tokens;
        });
        debug!("snapshot replaced");
        Ok(())
    }

    /// Validate and execute an operator action.
    ///
    /// Off-target submissions request a chain switch and stop — neither the
    /// validator nor the write path runs. Confirmed transactions trigger
    /// exactly one snapshot refresh after the settle delay.
    pub async fn submit_action(&self, action: PendingAction) -> SubmitOutcome {
        if !self.guard.is_on_target_chain().await {
            info!(action = action.kind(), "wrong network, requesting switch");
            self.guard.request_switch().await;
            return SubmitOutcome::SwitchRequested;
        }

        let current = self.state.borrow().clone();
        if let Validation::Rejected(reason) = validator::validate(
            &action,
            &current.position,
            &current.allowances,
            &current.balances,
            &self.risk,
        ) {
            info!(action = action.kind(), reason = %reason, "action rejected locally");
            return SubmitOutcome::Rejected(reason);
        }

        match self.lifecycle.execute(action).await {
            LifecycleResult::Busy => SubmitOutcome::Busy,
            LifecycleResult::Failed(detail) => SubmitOutcome::Failed(detail),
            LifecycleResult::Confirmed(tx_hash) => {
                // Some backends serve pre-inclusion state right after the
                // receipt lands; give them a beat before re-reading.
                tokio::time::sleep(self.settle_delay).await;
                if let Err(e) = self.refresh().await {
                    warn!(error = %e, "post-confirmation refresh failed");
                }
                SubmitOutcome::Confirmed { tx_hash }
            }
        }
    }

    /// Clear a terminal transaction record. Call when the operator switches
    /// tabs or edits the amount, so stale banners never outlive their input.
    pub fn reset_transaction(&self) {
        self.lifecycle.reset();
    }

    /// Ask the wallet to move to the target chain (fire-and-forget).
    pub async fn request_network_switch(&self) {
        self.guard.request_switch().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::gateway::{RawAllowanceReads, RawBalanceReads, RawPositionReads};
    use crate::testing::{test_contracts, MockChainState, MockGateway, MockWallet, TEST_CHAIN_ID};
    use crate::types::TxPhase;
    use alloy::primitives::U256;
    use rust_decimal_macros::dec;

    fn params() -> ControllerParams {
        ControllerParams {
            target_chain_id: TEST_CHAIN_ID,
            contracts: test_contracts(),
            risk: RiskParams {
                borrow_ceiling: dec!(0.50),
                liquidation_threshold: dec!(0.80),
            },
            token_decimals: 18,
            settle_delay: Duration::from_millis(0),
        }
    }

    fn wad(n: u128) -> U256 {
        U256::from(n) * U256::from(1_000_000_000_000_000_000u128)
    }

    fn funded_state() -> MockChainState {
        MockChainState {
            position: RawPositionReads {
                collateral: wad(1000),
                debt: wad(100),
                health_factor: wad(4),
                receipt_balance: wad(1000),
                liquidatable_flag: false,
            },
            allowances: RawAllowanceReads {
                vault: U256::MAX,
                integrator: U256::MAX,
            },
            balances: RawBalanceReads {
                collateral_token: wad(500),
                borrow_tokens: vec![],
            },
            ..Default::default()
        }
    }

    fn controller(
        gateway: Arc<MockGateway>,
        wallet: Arc<MockWallet>,
    ) -> VaultController<MockGateway, MockWallet> {
        VaultController::new(gateway, wallet, Address::repeat_byte(0x11), params())
    }

    #[tokio::test]
    async fn off_target_submission_requests_switch_and_stops() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::on_chain(1));
        let ctl = controller(gateway.clone(), wallet.clone());

        let outcome = ctl
            .submit_action(PendingAction::Deposit { amount: dec!(10) })
            .await;

        assert_eq!(outcome, SubmitOutcome::SwitchRequested);
        assert_eq!(wallet.switch_requests(), 1);
        // Neither validator consequence nor write path ran
        assert_eq!(wallet.sign_calls(), 0);
        assert_eq!(gateway.refreshes(), 0);
        assert_eq!(ctl.state().transaction.phase, TxPhase::Idle);
    }

    #[tokio::test]
    async fn refresh_off_target_keeps_stale_snapshot() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::on_chain(1));
        let ctl = controller(gateway.clone(), wallet);
        let rx = ctl.subscribe();

        let err = ctl.refresh().await.unwrap_err();
        assert!(matches!(err, ControllerError::NetworkMismatch { expected: 5003, actual: 1 }));
        assert_eq!(gateway.refreshes(), 0);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn refresh_publishes_derived_snapshot() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway, wallet);
        let mut rx = ctl.subscribe();

        ctl.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        let state = ctl.state();
        assert_eq!(state.position.collateral_value_usd, dec!(1000));
        assert_eq!(state.position.debt_usdt, dec!(100));
        assert_eq!(state.position.ltv_percent, dec!(10));
        assert!(state.allowances.vault_approved);
        assert_eq!(state.balances.collateral_token, dec!(500));
    }

    #[tokio::test]
    async fn refresh_is_idempotent_for_unchanged_chain_state() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway, wallet);

        ctl.refresh().await.unwrap();
        let first = ctl.state().position;
        ctl.refresh().await.unwrap();
        let second = ctl.state().position;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn newer_refresh_replaces_the_whole_snapshot() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway.clone(), wallet);
        ctl.refresh().await.unwrap();
        assert_eq!(ctl.state().position.debt_usdt, dec!(100));

        gateway.set_position(RawPositionReads {
            collateral: wad(1000),
            debt: wad(600),
            health_factor: U256::from(900_000_000_000_000_000u128), // 0.9
            receipt_balance: wad(1000),
            liquidatable_flag: true,
        });
        ctl.refresh().await.unwrap();

        let position = ctl.state().position;
        assert_eq!(position.debt_usdt, dec!(600));
        assert_eq!(position.ltv_percent, dec!(60));
        assert!(position.is_liquidatable);
    }

    #[tokio::test]
    async fn rejected_action_never_reaches_the_wallet() {
        // Empty wallet: deposit must die at the balance rule
        let gateway = Arc::new(MockGateway::new(MockChainState::default()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway, wallet.clone());
        ctl.refresh().await.unwrap();

        let outcome = ctl
            .submit_action(PendingAction::Deposit { amount: dec!(10) })
            .await;

        assert_eq!(outcome, SubmitOutcome::Rejected(RejectReason::InsufficientBalance));
        assert_eq!(wallet.sign_calls(), 0);
        assert_eq!(ctl.state().transaction.phase, TxPhase::Idle);
    }

    #[tokio::test]
    async fn confirmation_triggers_exactly_one_refresh() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway.clone(), wallet);
        ctl.refresh().await.unwrap();
        assert_eq!(gateway.refreshes(), 1);

        let outcome = ctl
            .submit_action(PendingAction::Deposit { amount: dec!(10) })
            .await;

        assert!(matches!(outcome, SubmitOutcome::Confirmed { .. }));
        assert_eq!(gateway.refreshes(), 2);
        assert_eq!(ctl.state().transaction.phase, TxPhase::Confirmed);
    }

    #[tokio::test]
    async fn failed_action_skips_the_refresh() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::declining("user rejected"));
        let ctl = controller(gateway.clone(), wallet);
        ctl.refresh().await.unwrap();

        let outcome = ctl
            .submit_action(PendingAction::Deposit { amount: dec!(10) })
            .await;

        assert!(matches!(outcome, SubmitOutcome::Failed(_)));
        assert_eq!(gateway.refreshes(), 1);
        assert_eq!(ctl.state().transaction.phase, TxPhase::Failed);
    }

    #[tokio::test]
    async fn reset_transaction_clears_failed_banner() {
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::declining("no"));
        let ctl = controller(gateway, wallet);
        ctl.refresh().await.unwrap();
        ctl.submit_action(PendingAction::Deposit { amount: dec!(10) }).await;
        assert_eq!(ctl.state().transaction.phase, TxPhase::Failed);

        ctl.reset_transaction();
        let record = ctl.state().transaction;
        assert_eq!(record.phase, TxPhase::Idle);
        assert!(record.failure.is_none());
    }

    #[tokio::test]
    async fn validation_runs_against_freshly_published_state() {
        // Borrow capacity comes from the snapshot, not from ad hoc reads
        let gateway = Arc::new(MockGateway::new(funded_state()));
        let wallet = Arc::new(MockWallet::granting());
        let ctl = controller(gateway, wallet);
        ctl.refresh().await.unwrap();

        // 1000 collateral, 100 debt → 400 headroom at the 50% ceiling
        let outcome = ctl
            .submit_action(PendingAction::Borrow { amount: dec!(400.01) })
            .await;
        assert_eq!(
            outcome,
            SubmitOutcome::Rejected(RejectReason::ExceedsBorrowLimit { headroom: dec!(400) })
        );
    }
}
