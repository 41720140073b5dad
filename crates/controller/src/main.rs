use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::RootProvider;
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use vault_controller::chain::gateway::ChainReadGateway;
use vault_controller::chain::wallet::LocalWallet;
use vault_controller::chain::ContractAddresses;
use vault_controller::config;
use vault_controller::core::controller::{ControllerParams, VaultController};
use vault_controller::logging;
use vault_controller::types::wad::format_display;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignore if missing).
    let _ = dotenvy::dotenv();

    let config_dir = std::env::var("VAULT_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"));

    let config = config::load_config(&config_dir)?;

    // Hold the guard for the process lifetime.
    let _guard = logging::init_tracing(&config.app.logging)?;

    info!(
        chain_id = config.chain.chain_id,
        chain_name = %config.chain.chain_name,
        vault = %config.chain.contracts.vault,
        "vault controller starting"
    );

    // -----------------------------------------------------------------------
    // Provider, wallet, and owner address
    // -----------------------------------------------------------------------

    let rpc_url: Url = config
        .chain
        .rpc
        .http_url
        .parse()
        .context("failed to parse RPC URL")?;
    let provider = RootProvider::new_http(rpc_url);

    let signer: PrivateKeySigner = std::env::var("OPERATOR_PRIVATE_KEY")
        .context("OPERATOR_PRIVATE_KEY must be set")?
        .parse()
        .context("failed to parse OPERATOR_PRIVATE_KEY")?;

    let owner: Address = match std::env::var("OPERATOR_ADDRESS") {
        Ok(raw) => raw.parse().context("failed to parse OPERATOR_ADDRESS")?,
        Err(_) => signer.address(),
    };

    let wallet = Arc::new(LocalWallet::new(
        provider.clone(),
        signer,
        config.chain.chain_id,
        &config.timing,
    ));

    let addresses = ContractAddresses::from_config(&config.chain.contracts)?;
    let gateway = Arc::new(ChainReadGateway::new(
        provider,
        addresses,
        &config.vault,
    ));

    let params = ControllerParams::from_config(&config)?;
    let controller = Arc::new(VaultController::new(gateway, wallet, owner, params));

    info!(owner = %owner, "controller wired");

    // -----------------------------------------------------------------------
    // State-change subscriber
    // -----------------------------------------------------------------------

    let mut state_rx = controller.subscribe();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            info!(
                collateral_usd = %format_display(state.position.collateral_value_usd),
                debt_usdt = %format_display(state.position.debt_usdt),
                health_factor = %format_display(state.position.health_factor),
                ltv_percent = %format_display(state.position.ltv_percent),
                liquidatable = state.position.is_liquidatable,
                tx_phase = state.transaction.phase.as_str(),
                "state updated"
            );
        }
    });

    // -----------------------------------------------------------------------
    // Refresh loop
    // -----------------------------------------------------------------------

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
                shutdown.cancel();
            }
        });
    }

    if let Err(e) = controller.refresh().await {
        warn!(error = %e, "initial refresh failed");
    }

    let mut ticker =
        tokio::time::interval(Duration::from_secs(config.timing.refresh_interval_seconds.max(1)));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = controller.refresh().await {
                    warn!(error = %e, "refresh failed");
                }
            }
            _ = shutdown.cancelled() => break,
        }
    }

    info!("vault controller stopped");
    Ok(())
}
