//! Client-side controller for an on-chain collateralized-lending vault.
//!
//! Reads a wallet's position (collateral, debt, receipt shares, health
//! factor), derives risk and capacity metrics, validates operator actions
//! against the protocol's constraints before any transaction is built, and
//! drives submitted transactions through signature, broadcast, confirmation,
//! and post-confirmation state refresh. Presentation layers subscribe to the
//! published state and call the three entry points on [`core::controller::VaultController`];
//! they never mutate controller state directly.

pub mod chain;
pub mod config;
pub mod constants;
pub mod core;
pub mod errors;
pub mod logging;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;
