//! Transaction lifecycle state machine.
//!
//! `Idle → AwaitingSignature → Broadcast → Confirmed`, with `Failed`
//! reachable from either in-flight phase. At most one transaction is in
//! flight per controller; a submission while one is pending is turned away,
//! and failed transactions are never retried without a fresh operator
//! submission. Phase transitions publish through the shared state channel,
//! where the transaction record is owned exclusively by this module.

use alloy::primitives::Address;
use alloy::sol_types::SolCall;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::chain::contracts::{ICollateralVault, ILeverageIntegrator, IVaultToken};
use crate::chain::wallet::{CallPlan, Wallet};
use crate::chain::ContractAddresses;
use crate::errors::ControllerError;
use crate::types::wad::decimal_to_wad;
use crate::types::{
    ControllerState, FailureDetail, PendingAction, RepayAsset, TransactionRecord, TxPhase,
};

/// Terminal outcome of one lifecycle run.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleResult {
    Confirmed(alloy::primitives::B256),
    Failed(FailureDetail),
    /// Another transaction is still in flight; nothing was submitted.
    Busy,
}

pub struct TransactionLifecycleController<W: Wallet> {
    wallet: Arc<W>,
    state: Arc<watch::Sender<ControllerState>>,
    /// Held for the duration of one run; `try_lock` failure is the
    /// mutual-exclusion signal.
    submit_guard: Mutex<()>,
    contracts: ContractAddresses,
    owner: Address,
}

impl<W: Wallet> TransactionLifecycleController<W> {
    pub fn new(
        wallet: Arc<W>,
        state: Arc<watch::Sender<ControllerState>>,
        contracts: ContractAddresses,
        owner: Address,
    ) -> Self {
        Self {
            wallet,
            state,
            submit_guard: Mutex::new(()),
            contracts,
            owner,
        }
    }

    /// Run `action` through signature, broadcast, and confirmation.
    ///
    /// Legal from `Idle` or a terminal phase; submitting from a terminal
    /// phase implicitly resets the previous record.
    pub async fn execute(&self, action: PendingAction) -> LifecycleResult {
        let Ok(_guard) = self.submit_guard.try_lock() else {
            let phase = self.state.borrow().transaction.phase;
            debug!(
                action = action.kind(),
                phase = phase.as_str(),
                "submission refused: transaction in flight"
            );
            return LifecycleResult::Busy;
        };

        let plan = self.encode_action(&action);
        info!(action = action.kind(), to = %plan.to, "requesting signature");
        self.update_record(|record| {
            *record = TransactionRecord {
                id: None,
                phase: TxPhase::AwaitingSignature,
                failure: None,
            };
        });

        let tx_hash = match self.wallet.sign_and_send(&plan).await {
            Ok(hash) => hash,
            Err(e) => return self.fail(action.kind(), e),
        };

        self.update_record(|record| {
            record.id = Some(tx_hash);
            record.phase = TxPhase::Broadcast;
        });

        match self.wallet.await_inclusion(tx_hash).await {
            Ok(()) => {
                self.update_record(|record| record.phase = TxPhase::Confirmed);
                info!(action = action.kind(), tx_hash = %tx_hash, "action confirmed");
                LifecycleResult::Confirmed(tx_hash)
            }
            Err(e) => self.fail(action.kind(), e),
        }
    }

    /// Return to `Idle` from a terminal phase, clearing the failure. In
    /// flight or already idle, this is a no-op — stale error banners die
    /// here without disturbing live submissions.
    pub fn reset(&self) {
        self.state.send_if_modified(|state| {
            if state.transaction.phase.is_terminal() {
                state.transaction = TransactionRecord::default();
                true
            } else {
                false
            }
        });
    }

    /// Encode an action into the contract call it stands for. Exhaustive:
    /// a new action variant will not compile until it is given a call here.
    pub fn encode_action(&self, action: &PendingAction) -> CallPlan {
        let amount = decimal_to_wad(action.amount());
        let token = self.contracts.collateral_token;
        match *action {
            PendingAction::ApproveVault { .. } => CallPlan {
                label: "approve_vault",
                to: token,
                input: IVaultToken::approveCall {
                    spender: self.contracts.vault,
                    amount,
                }
                .abi_encode()
                .into(),
            },
            PendingAction::ApproveIntegrator { .. } => CallPlan {
                label: "approve_integrator",
                to: token,
                input: IVaultToken::approveCall {
                    spender: self.contracts.leverage_integrator,
                    amount,
                }
                .abi_encode()
                .into(),
            },
            PendingAction::Deposit { .. } => CallPlan {
                label: "deposit",
                to: self.contracts.vault,
                input: ICollateralVault::depositERC20Call { asset: token, amount }
                    .abi_encode()
                    .into(),
            },
            PendingAction::Borrow { .. } => CallPlan {
                label: "borrow",
                to: self.contracts.vault,
                input: ICollateralVault::borrowCall { asset: token, amount }
                    .abi_encode()
                    .into(),
            },
            PendingAction::Withdraw { .. } => CallPlan {
                label: "withdraw",
                to: self.contracts.vault,
                input: ICollateralVault::withdrawERC20Call { asset: token, amount }
                    .abi_encode()
                    .into(),
            },
            PendingAction::Repay { asset, .. } => match asset {
                RepayAsset::Collateral => CallPlan {
                    label: "repay",
                    to: self.contracts.vault,
                    input: ICollateralVault::repayCall { amount }.abi_encode().into(),
                },
                RepayAsset::BorrowToken(borrow_token) => CallPlan {
                    label: "repay_with_borrow_token",
                    to: self.contracts.vault,
                    input: ICollateralVault::repayWithBorrowTokenCall {
                        token: borrow_token,
                        amount,
                    }
                    .abi_encode()
                    .into(),
                },
            },
            PendingAction::Leverage { .. } => CallPlan {
                label: "leverage",
                to: self.contracts.leverage_integrator,
                input: ILeverageIntegrator::automatedLeverageCall { asset: token, amount }
                    .abi_encode()
                    .into(),
            },
            PendingAction::Mint { .. } => CallPlan {
                label: "mint",
                to: token,
                input: IVaultToken::mintCall {
                    to: self.owner,
                    amount,
                }
                .abi_encode()
                .into(),
            },
        }
    }

    fn update_record(&self, apply: impl FnOnce(&mut TransactionRecord)) {
        self.state.send_modify(|state| apply(&mut state.transaction));
    }

    fn fail(&self, action: &'static str, error: ControllerError) -> LifecycleResult {
        let failure = failure_from_error(error);
        warn!(
            action,
            cause = ?failure.cause,
            message = %failure.message,
            "transaction failed"
        );
        self.update_record(|record| {
            record.phase = TxPhase::Failed;
            record.failure = Some(failure.clone());
        });
        LifecycleResult::Failed(failure)
    }
}

/// Map a wallet-layer error to the failure recorded on the transaction.
/// Declined signatures stay distinguishable from reverts.
fn failure_from_error(error: ControllerError) -> FailureDetail {
    match error {
        ControllerError::UserDeclined { reason } => FailureDetail::declined(reason),
        ControllerError::SimulationReverted { reason } => {
            FailureDetail::reverted("execution reverted in simulation", Some(reason))
        }
        ControllerError::ExecutionReverted { reason, tx_hash } => {
            FailureDetail::reverted(reason, Some(format!("tx: {tx_hash}")))
        }
        other => FailureDetail::reverted(other.to_string(), None),
    }
}
