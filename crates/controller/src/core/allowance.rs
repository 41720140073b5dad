//! Approval flags for the two collateral-token spenders.
//!
//! An allowance of exactly the requested amount is sufficient — the system
//! never requires unlimited approval, and it never issues allowance-reducing
//! calls: an excess grant stays valid until revoked externally.

use alloy::primitives::U256;

use crate::chain::gateway::RawAllowanceReads;
use crate::types::AllowanceState;

/// `allowance > 0 → approved`, per spender, independently.
pub fn derive(raw: &RawAllowanceReads) -> AllowanceState {
    AllowanceState {
        vault_approved: raw.vault > U256::ZERO,
        integrator_approved: raw.integrator > U256::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_allowances_mean_nothing_approved() {
        let state = derive(&RawAllowanceReads::default());
        assert!(!state.vault_approved);
        assert!(!state.integrator_approved);
    }

    #[test]
    fn any_positive_allowance_approves() {
        let state = derive(&RawAllowanceReads {
            vault: U256::from(1u64),
            integrator: U256::ZERO,
        });
        assert!(state.vault_approved);
        assert!(!state.integrator_approved);
    }

    #[test]
    fn spender_flags_are_independent() {
        let state = derive(&RawAllowanceReads {
            vault: U256::ZERO,
            integrator: U256::MAX,
        });
        assert!(!state.vault_approved);
        assert!(state.integrator_approved);
    }
}
