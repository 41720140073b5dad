use alloy::primitives::{address, Address};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ---------------------------------------------------------------------------
// Numeric constants
// ---------------------------------------------------------------------------

/// WAD: 1e18 — the fixed-point scale used by the vault for every amount,
/// USD valuation, and health factor it returns.
pub const WAD: Decimal = dec!(1_000_000_000_000_000_000);

/// Basis points per percent. `interestRatePerYear()` reports in bps.
pub const BPS_PER_PERCENT: Decimal = dec!(100);

/// Decimal places used when rendering USD amounts and health factors.
pub const DISPLAY_DECIMALS: u32 = 2;

// ---------------------------------------------------------------------------
// Risk parameters
// ---------------------------------------------------------------------------

/// Borrow ceiling: total debt may not exceed 50% of collateral value.
/// Deliberately below the liquidation threshold to preserve a buffer.
pub const DEFAULT_BORROW_CEILING_LTV: Decimal = dec!(0.50);

/// Liquidation threshold: positions above 80% LTV are liquidatable.
pub const DEFAULT_LIQUIDATION_THRESHOLD_LTV: Decimal = dec!(0.80);

/// Interest rate assumed when `interestRatePerYear()` cannot be read (bps).
pub const DEFAULT_FALLBACK_INTEREST_RATE_BPS: u32 = 500;

// ---------------------------------------------------------------------------
// Mantle Sepolia deployment
// ---------------------------------------------------------------------------

pub const MANTLE_SEPOLIA_CHAIN_ID: u64 = 5003;
pub const MANTLE_SEPOLIA_RPC: &str = "https://rpc.sepolia.mantle.xyz";

pub const COLLATERAL_TOKEN: Address = address!("915cC86fE0871835e750E93e025080FFf9927A3f");
pub const VAULT: Address = address!("40776dF7BB64828BfaFBE4cfacFECD80fED34266");
pub const LEVERAGE_INTEGRATOR: Address = address!("AE95E2F4DBFa908fb88744C12325e5e44244b6B0");

// ---------------------------------------------------------------------------
// Timing defaults
// ---------------------------------------------------------------------------

/// Grace period between confirmation and the follow-up snapshot refresh.
/// Some RPC backends serve pre-inclusion state immediately after a receipt.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1_000;

pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;

/// Gas limit applied when estimation fails.
pub const FALLBACK_GAS_LIMIT: u64 = 800_000;
