use anyhow::{bail, Result};
use rust_decimal::Decimal;

use crate::chain::ContractAddresses;

use super::ControllerConfig;

/// Sanity-check a loaded config before anything is constructed from it.
///
/// The borrow ceiling and the liquidation threshold are distinct constants
/// with an ordering invariant; a config that conflates them is refused
/// outright rather than silently erasing the safety buffer between them.
pub fn validate_config(config: &ControllerConfig) -> Result<()> {
    if config.chain.chain_id == 0 {
        bail!("chain_id must be set");
    }
    if config.chain.rpc.http_url.is_empty() {
        bail!("rpc.http_url must be set");
    }

    ContractAddresses::from_config(&config.chain.contracts)?;

    let ceiling = config.vault.borrow_ceiling_ltv;
    let threshold = config.vault.liquidation_threshold_ltv;
    if ceiling <= Decimal::ZERO || ceiling >= Decimal::ONE {
        bail!("borrow_ceiling_ltv must be in (0, 1), got {ceiling}");
    }
    if threshold <= Decimal::ZERO || threshold > Decimal::ONE {
        bail!("liquidation_threshold_ltv must be in (0, 1], got {threshold}");
    }
    if ceiling >= threshold {
        bail!(
            "borrow_ceiling_ltv ({ceiling}) must stay below liquidation_threshold_ltv ({threshold})"
        );
    }

    if config.vault.token_decimals == 0 || config.vault.token_decimals > 18 {
        bail!(
            "token_decimals must be in 1..=18, got {}",
            config.vault.token_decimals
        );
    }

    if config.timing.confirmation_timeout_seconds == 0 {
        bail!("confirmation_timeout_seconds must be positive");
    }
    if config.timing.receipt_poll_interval_ms == 0 {
        bail!("receipt_poll_interval_ms must be positive");
    }

    Ok(())
}
