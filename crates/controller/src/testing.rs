//! Mock wallet and gateway used by lifecycle and controller tests.

use alloy::primitives::{Address, B256};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

use crate::chain::gateway::{
    ChainReads, RawAllowanceReads, RawBalanceReads, RawPositionReads, RawProtocolReads,
};
use crate::chain::wallet::{CallPlan, Wallet};
use crate::chain::ContractAddresses;
use crate::errors::ControllerError;
use crate::types::OracleStatus;

pub fn test_contracts() -> ContractAddresses {
    ContractAddresses {
        collateral_token: Address::repeat_byte(0xA1),
        vault: Address::repeat_byte(0xB2),
        leverage_integrator: Address::repeat_byte(0xC3),
    }
}

pub const TEST_CHAIN_ID: u64 = 5003;

// ---------------------------------------------------------------------------
// MockWallet
// ---------------------------------------------------------------------------

enum SignBehavior {
    Grant,
    Decline(String),
    SimulationRevert(String),
}

enum InclusionBehavior {
    Confirm,
    Revert(String),
    /// Park in `Broadcast` until `release()` is called.
    Hold,
}

pub struct MockWallet {
    chain_id: Option<u64>,
    sign: SignBehavior,
    inclusion: InclusionBehavior,
    sign_calls: AtomicU32,
    inclusion_calls: AtomicU32,
    switch_requests: AtomicU32,
    release: Notify,
}

impl MockWallet {
    fn with(chain_id: Option<u64>, sign: SignBehavior, inclusion: InclusionBehavior) -> Self {
        Self {
            chain_id,
            sign,
            inclusion,
            sign_calls: AtomicU32::new(0),
            inclusion_calls: AtomicU32::new(0),
            switch_requests: AtomicU32::new(0),
            release: Notify::new(),
        }
    }

    /// Signs and confirms everything, on the test chain.
    pub fn granting() -> Self {
        Self::with(Some(TEST_CHAIN_ID), SignBehavior::Grant, InclusionBehavior::Confirm)
    }

    /// Signs and confirms everything, on the given chain.
    pub fn on_chain(chain_id: u64) -> Self {
        Self::with(Some(chain_id), SignBehavior::Grant, InclusionBehavior::Confirm)
    }

    /// Cannot report its active chain.
    pub fn chain_unavailable() -> Self {
        Self::with(None, SignBehavior::Grant, InclusionBehavior::Confirm)
    }

    /// Refuses every signature request.
    pub fn declining(reason: &str) -> Self {
        Self::with(
            Some(TEST_CHAIN_ID),
            SignBehavior::Decline(reason.into()),
            InclusionBehavior::Confirm,
        )
    }

    /// Reverts in pre-broadcast simulation with the given decoded reason.
    pub fn simulation_reverting(reason: &str) -> Self {
        Self::with(
            Some(TEST_CHAIN_ID),
            SignBehavior::SimulationRevert(reason.into()),
            InclusionBehavior::Confirm,
        )
    }

    /// Broadcasts, then reports an on-chain revert.
    pub fn inclusion_reverting(reason: &str) -> Self {
        Self::with(
            Some(TEST_CHAIN_ID),
            SignBehavior::Grant,
            InclusionBehavior::Revert(reason.into()),
        )
    }

    /// Broadcasts, then stays unconfirmed until `release()`.
    pub fn holding() -> Self {
        Self::with(Some(TEST_CHAIN_ID), SignBehavior::Grant, InclusionBehavior::Hold)
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub fn sign_calls(&self) -> u32 {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn inclusion_calls(&self) -> u32 {
        self.inclusion_calls.load(Ordering::SeqCst)
    }

    pub fn switch_requests(&self) -> u32 {
        self.switch_requests.load(Ordering::SeqCst)
    }
}

impl Wallet for MockWallet {
    async fn active_chain_id(&self) -> Result<u64, ControllerError> {
        self.chain_id.ok_or(ControllerError::Wallet {
            reason: "chain id unavailable".into(),
        })
    }

    async fn request_switch(&self, _chain_id: u64) {
        self.switch_requests.fetch_add(1, Ordering::SeqCst);
    }

    async fn sign_and_send(&self, _plan: &CallPlan) -> Result<B256, ControllerError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        match &self.sign {
            SignBehavior::Grant => Ok(B256::repeat_byte(0xAB)),
            SignBehavior::Decline(reason) => Err(ControllerError::UserDeclined {
                reason: reason.clone(),
            }),
            SignBehavior::SimulationRevert(reason) => Err(ControllerError::SimulationReverted {
                reason: reason.clone(),
            }),
        }
    }

    async fn await_inclusion(&self, tx_hash: B256) -> Result<(), ControllerError> {
        self.inclusion_calls.fetch_add(1, Ordering::SeqCst);
        match &self.inclusion {
            InclusionBehavior::Confirm => Ok(()),
            InclusionBehavior::Revert(reason) => Err(ControllerError::ExecutionReverted {
                tx_hash: tx_hash.to_string(),
                reason: reason.clone(),
            }),
            InclusionBehavior::Hold => {
                self.release.notified().await;
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// MockGateway
// ---------------------------------------------------------------------------

#[derive(Default, Clone)]
pub struct MockChainState {
    pub position: RawPositionReads,
    pub protocol: RawProtocolReads,
    pub allowances: RawAllowanceReads,
    pub balances: RawBalanceReads,
    pub borrow_tokens: Vec<Address>,
    pub oracle: OracleStatus,
}

pub struct MockGateway {
    state: Mutex<MockChainState>,
    refreshes: AtomicU32,
}

impl MockGateway {
    pub fn new(state: MockChainState) -> Self {
        Self {
            state: Mutex::new(state),
            refreshes: AtomicU32::new(0),
        }
    }

    /// Number of position read fan-outs issued, i.e. completed refreshes.
    pub fn refreshes(&self) -> u32 {
        self.refreshes.load(Ordering::SeqCst)
    }

    pub fn set_position(&self, raw: RawPositionReads) {
        self.state.lock().unwrap().position = raw;
    }
}

impl ChainReads for MockGateway {
    async fn position_reads(&self, _owner: Address) -> RawPositionReads {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().position
    }

    async fn protocol_reads(&self, _owner: Address) -> RawProtocolReads {
        self.state.lock().unwrap().protocol
    }

    async fn allowance_reads(&self, _owner: Address) -> RawAllowanceReads {
        self.state.lock().unwrap().allowances
    }

    async fn balance_reads(&self, _owner: Address, _tokens: &[Address]) -> RawBalanceReads {
        self.state.lock().unwrap().balances.clone()
    }

    async fn allowed_borrow_tokens(&self) -> Vec<Address> {
        self.state.lock().unwrap().borrow_tokens.clone()
    }

    async fn oracle_status(&self) -> OracleStatus {
        self.state.lock().unwrap().oracle
    }
}
