pub mod contracts;
pub mod gateway;
pub mod wallet;

use alloy::primitives::Address;
use alloy::providers::RootProvider;

use crate::config::ContractsConfig;
use crate::errors::ControllerError;

/// Concrete provider type: Alloy HTTP provider over Ethereum network.
pub type HttpProvider = RootProvider;

/// Parsed addresses of the three contracts the controller talks to.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    pub collateral_token: Address,
    pub vault: Address,
    pub leverage_integrator: Address,
}

impl ContractAddresses {
    pub fn from_config(contracts: &ContractsConfig) -> Result<Self, ControllerError> {
        let parse = |label: &str, raw: &str| -> Result<Address, ControllerError> {
            raw.parse()
                .map_err(|_| ControllerError::Config(format!("invalid {label} address: {raw:?}")))
        };
        Ok(Self {
            collateral_token: parse("collateral_token", &contracts.collateral_token)?,
            vault: parse("vault", &contracts.vault)?,
            leverage_integrator: parse("leverage_integrator", &contracts.leverage_integrator)?,
        })
    }
}
