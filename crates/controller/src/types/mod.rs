pub mod action;
pub mod position;
pub mod tx;
pub mod wad;

pub use action::{PendingAction, RepayAsset};
pub use position::{
    AllowanceState, ControllerState, OracleStatus, Position, ProtocolStats, WalletBalances,
};
pub use tx::{FailureCause, FailureDetail, TransactionRecord, TxPhase};
