//! Typed read-only access to the vault deployment.
//!
//! Every read degrades independently: a failing call yields that field's
//! default (`0`, `false`, empty list) with a `warn!`, never an error to the
//! caller. A snapshot therefore always publishes, field-by-field stale at
//! worst. Reads for one snapshot are issued concurrently and joined.

use alloy::primitives::{Address, U256};
use tracing::warn;

use crate::config::VaultConfig;
use crate::types::OracleStatus;

use super::contracts::{ICollateralVault, IVaultToken};
use super::{ContractAddresses, HttpProvider};

// ---------------------------------------------------------------------------
// Raw read bundles
// ---------------------------------------------------------------------------

/// Per-user vault reads, still in on-chain fixed-point units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawPositionReads {
    pub collateral: U256,
    pub debt: U256,
    pub health_factor: U256,
    pub receipt_balance: U256,
    /// The vault's own liquidation flag, kept for cross-checking against
    /// the derived value.
    pub liquidatable_flag: bool,
}

/// Vault-wide reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawProtocolReads {
    pub tvl: U256,
    pub total_debt: U256,
    /// Annual rate in basis points.
    pub interest_rate_bps: U256,
}

/// Allowances of the two spenders for the collateral token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawAllowanceReads {
    pub vault: U256,
    pub integrator: U256,
}

/// Spendable wallet balances, in on-chain units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBalanceReads {
    pub collateral_token: U256,
    pub borrow_tokens: Vec<(Address, U256)>,
}

// ---------------------------------------------------------------------------
// Read seam
// ---------------------------------------------------------------------------

/// Read operations the controller consumes. Implementations absorb
/// individual call failures into per-field defaults.
#[allow(async_fn_in_trait)]
pub trait ChainReads: Send + Sync {
    async fn position_reads(&self, owner: Address) -> RawPositionReads;
    async fn protocol_reads(&self, owner: Address) -> RawProtocolReads;
    async fn allowance_reads(&self, owner: Address) -> RawAllowanceReads;
    async fn balance_reads(&self, owner: Address, borrow_tokens: &[Address]) -> RawBalanceReads;
    async fn allowed_borrow_tokens(&self) -> Vec<Address>;
    async fn oracle_status(&self) -> OracleStatus;
}

// ---------------------------------------------------------------------------
// ChainReadGateway
// ---------------------------------------------------------------------------

/// Live gateway over an Alloy HTTP provider.
///
/// Accepts the provider via dependency injection so the same connection is
/// shared with the wallet layer. Stateless beyond connection context.
pub struct ChainReadGateway {
    token: IVaultToken::IVaultTokenInstance<HttpProvider>,
    vault: ICollateralVault::ICollateralVaultInstance<HttpProvider>,
    provider: HttpProvider,
    addresses: ContractAddresses,
    fallback_rate_bps: u32,
    oracle_accessor: bool,
}

impl ChainReadGateway {
    pub fn new(provider: HttpProvider, addresses: ContractAddresses, vault_cfg: &VaultConfig) -> Self {
        Self {
            token: IVaultToken::new(addresses.collateral_token, provider.clone()),
            vault: ICollateralVault::new(addresses.vault, provider.clone()),
            provider,
            addresses,
            fallback_rate_bps: vault_cfg.fallback_interest_rate_bps,
            oracle_accessor: vault_cfg.has_oracle_accessor,
        }
    }

    /// Balance of an arbitrary ERC20 held by `owner`, degraded to zero.
    async fn erc20_balance(&self, token: Address, owner: Address) -> U256 {
        let erc20 = IVaultToken::new(token, self.provider.clone());
        match erc20.balanceOf(owner).call().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, token = %token, read = "balanceOf", "chain read degraded");
                U256::ZERO
            }
        }
    }
}

/// Resolve a read future to its value, or log and fall back to a default.
macro_rules! degrade {
    ($fut:expr, $label:literal, $default:expr) => {
        match $fut.await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, read = $label, "chain read degraded");
                $default
            }
        }
    };
}

impl ChainReads for ChainReadGateway {
    async fn position_reads(&self, owner: Address) -> RawPositionReads {
        let (collateral, debt, health_factor, receipt_balance, liquidatable_flag) = tokio::join!(
            async { degrade!(self.vault.getTotalCollateralUSD(owner).call(), "getTotalCollateralUSD", U256::ZERO) },
            async { degrade!(self.vault.getDebtUSDT(owner).call(), "getDebtUSDT", U256::ZERO) },
            async { degrade!(self.vault.getHealthFactor(owner).call(), "getHealthFactor", U256::ZERO) },
            async { degrade!(self.vault.balanceOf(owner).call(), "vault.balanceOf", U256::ZERO) },
            async { degrade!(self.vault.isLiquidatable(owner).call(), "isLiquidatable", false) },
        );
        RawPositionReads {
            collateral,
            debt,
            health_factor,
            receipt_balance,
            liquidatable_flag,
        }
    }

    async fn protocol_reads(&self, owner: Address) -> RawProtocolReads {
        let fallback_rate = U256::from(self.fallback_rate_bps);
        let (tvl, total_debt, interest_rate_bps) = tokio::join!(
            async { degrade!(self.vault.getUserCollateralValue(owner).call(), "getUserCollateralValue", U256::ZERO) },
            async { degrade!(self.vault.getVaultDebt(owner).call(), "getVaultDebt", U256::ZERO) },
            async { degrade!(self.vault.interestRatePerYear().call(), "interestRatePerYear", fallback_rate) },
        );
        RawProtocolReads {
            tvl,
            total_debt,
            interest_rate_bps,
        }
    }

    async fn allowance_reads(&self, owner: Address) -> RawAllowanceReads {
        let (vault, integrator) = tokio::join!(
            async {
                degrade!(
                    self.token.allowance(owner, self.addresses.vault).call(),
                    "allowance(vault)",
                    U256::ZERO
                )
            },
            async {
                degrade!(
                    self.token.allowance(owner, self.addresses.leverage_integrator).call(),
                    "allowance(integrator)",
                    U256::ZERO
                )
            },
        );
        RawAllowanceReads { vault, integrator }
    }

    async fn balance_reads(&self, owner: Address, borrow_tokens: &[Address]) -> RawBalanceReads {
        let collateral_token = self.erc20_balance(self.addresses.collateral_token, owner).await;
        let mut balances = Vec::with_capacity(borrow_tokens.len());
        for &token in borrow_tokens {
            // The collateral token is already covered above.
            if token == self.addresses.collateral_token {
                continue;
            }
            balances.push((token, self.erc20_balance(token, owner).await));
        }
        RawBalanceReads {
            collateral_token,
            borrow_tokens: balances,
        }
    }

    async fn allowed_borrow_tokens(&self) -> Vec<Address> {
        match self.vault.allowedBorrowTokens().call().await {
            Ok(tokens) if !tokens.is_empty() => tokens,
            Ok(_) => vec![self.addresses.collateral_token],
            Err(e) => {
                warn!(error = %e, read = "allowedBorrowTokens", "chain read degraded");
                vec![self.addresses.collateral_token]
            }
        }
    }

    async fn oracle_status(&self) -> OracleStatus {
        // Deployments without the accessor are flagged in config; probing
        // them would only manufacture a degraded read.
        if !self.oracle_accessor {
            return OracleStatus::Fallback;
        }
        match self.vault.oracle().call().await {
            Ok(addr) if addr != Address::ZERO => OracleStatus::Connected { oracle: addr },
            Ok(_) => OracleStatus::Fallback,
            Err(e) => {
                warn!(error = %e, read = "oracle", "chain read degraded");
                OracleStatus::Fallback
            }
        }
    }
}
