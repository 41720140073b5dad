use rust_decimal::Decimal;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Top-level aggregate
// ---------------------------------------------------------------------------

/// All deployment configuration, constructed once at process start and
/// passed by reference. There are no module-level config globals.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerConfig {
    pub app: AppConfig,
    pub chain: ChainConfig,
    pub vault: VaultConfig,
    pub timing: TimingConfig,
}

// ---------------------------------------------------------------------------
// app.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
}

// ---------------------------------------------------------------------------
// chains/5003.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub native_token: String,
    pub rpc: RpcConfig,
    pub explorer_url: String,
    pub contracts: ContractsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    pub http_url: String,
    #[serde(default)]
    pub http_url_fallback: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractsConfig {
    pub collateral_token: String,
    pub vault: String,
    pub leverage_integrator: String,
}

// ---------------------------------------------------------------------------
// vault.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Borrow ceiling as a fraction of collateral value. Strictly below the
    /// liquidation threshold.
    #[serde(with = "rust_decimal::serde::str")]
    pub borrow_ceiling_ltv: Decimal,
    /// LTV at which positions become liquidatable.
    #[serde(with = "rust_decimal::serde::str")]
    pub liquidation_threshold_ltv: Decimal,
    pub token_decimals: u8,
    /// Rate assumed when `interestRatePerYear()` cannot be read.
    pub fallback_interest_rate_bps: u32,
    /// Whether this deployment's vault exposes the `oracle()` accessor.
    /// When false the controller never issues the call.
    pub has_oracle_accessor: bool,
}

// ---------------------------------------------------------------------------
// timing.json
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    pub confirmation_timeout_seconds: u64,
    pub receipt_poll_interval_ms: u64,
    /// Grace period between confirmation and the follow-up refresh.
    pub settle_delay_ms: u64,
    /// Cadence of the binary's periodic background refresh.
    pub refresh_interval_seconds: u64,
}
