pub mod types;
pub mod validate;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Load the config JSON files from `config_dir`, apply environment variable
/// overrides, and validate.
///
/// Expected directory layout:
/// ```text
/// config/
///   app.json
///   chains/5003.json
///   vault.json
///   timing.json
/// ```
///
/// # Environment variable overrides
///
/// | Env Var                     | Config Field                          |
/// |-----------------------------|---------------------------------------|
/// | `VAULT_RPC_URL`             | `chain.rpc.http_url`                  |
/// | `VAULT_RPC_URL_FALLBACK`    | `chain.rpc.http_url_fallback`         |
/// | `VAULT_ADDRESS`             | `chain.contracts.vault`               |
/// | `COLLATERAL_TOKEN_ADDRESS`  | `chain.contracts.collateral_token`    |
/// | `INTEGRATOR_ADDRESS`        | `chain.contracts.leverage_integrator` |
/// | `SETTLE_DELAY_MS`           | `timing.settle_delay_ms`              |
pub fn load_config(config_dir: &Path) -> Result<ControllerConfig> {
    let read = |name: &str| -> Result<String> {
        let path = config_dir.join(name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))
    };

    let app: AppConfig = serde_json::from_str(&read("app.json")?).context("parsing app.json")?;

    let chain: ChainConfig =
        serde_json::from_str(&read("chains/5003.json")?).context("parsing chains/5003.json")?;

    let vault: VaultConfig =
        serde_json::from_str(&read("vault.json")?).context("parsing vault.json")?;

    let timing: TimingConfig =
        serde_json::from_str(&read("timing.json")?).context("parsing timing.json")?;

    let mut config = ControllerConfig {
        app,
        chain,
        vault,
        timing,
    };

    apply_env_overrides(&mut config);
    validate::validate_config(&config)?;

    Ok(config)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Only non-empty env vars take effect; parse failures leave the JSON value.
fn apply_env_overrides(config: &mut ControllerConfig) {
    if let Some(val) = env_string("VAULT_RPC_URL") {
        info!("env override: VAULT_RPC_URL");
        config.chain.rpc.http_url = val;
    }

    if let Some(val) = env_string("VAULT_RPC_URL_FALLBACK") {
        info!("env override: VAULT_RPC_URL_FALLBACK");
        config.chain.rpc.http_url_fallback = val;
    }

    if let Some(val) = env_string("VAULT_ADDRESS") {
        info!("env override: VAULT_ADDRESS");
        config.chain.contracts.vault = val;
    }

    if let Some(val) = env_string("COLLATERAL_TOKEN_ADDRESS") {
        info!("env override: COLLATERAL_TOKEN_ADDRESS");
        config.chain.contracts.collateral_token = val;
    }

    if let Some(val) = env_string("INTEGRATOR_ADDRESS") {
        info!("env override: INTEGRATOR_ADDRESS");
        config.chain.contracts.leverage_integrator = val;
    }

    if let Some(val) = env_parse::<u64>("SETTLE_DELAY_MS") {
        info!(val, "env override: SETTLE_DELAY_MS");
        config.timing.settle_delay_ms = val;
    }
}

/// Read a non-empty env var as a `String`.
fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Read a non-empty env var and parse it as `T`.
fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serial_test::serial;

    fn write_test_configs(dir: &Path) {
        std::fs::create_dir_all(dir.join("chains")).unwrap();

        std::fs::write(
            dir.join("app.json"),
            r#"{ "logging": { "log_dir": "logs" } }"#,
        )
        .unwrap();

        std::fs::write(
            dir.join("chains/5003.json"),
            r#"{
                "chain_id": 5003,
                "chain_name": "Mantle Sepolia",
                "native_token": "MNT",
                "rpc": { "http_url": "https://rpc.sepolia.mantle.xyz" },
                "explorer_url": "https://sepolia.mantlescan.xyz",
                "contracts": {
                    "collateral_token": "0x915cC86fE0871835e750E93e025080FFf9927A3f",
                    "vault": "0x40776dF7BB64828BfaFBE4cfacFECD80fED34266",
                    "leverage_integrator": "0xAE95E2F4DBFa908fb88744C12325e5e44244b6B0"
                }
            }"#,
        )
        .unwrap();

        std::fs::write(
            dir.join("vault.json"),
            r#"{
                "borrow_ceiling_ltv": "0.50",
                "liquidation_threshold_ltv": "0.80",
                "token_decimals": 18,
                "fallback_interest_rate_bps": 500,
                "has_oracle_accessor": true
            }"#,
        )
        .unwrap();

        std::fs::write(
            dir.join("timing.json"),
            r#"{
                "confirmation_timeout_seconds": 60,
                "receipt_poll_interval_ms": 1000,
                "settle_delay_ms": 1000,
                "refresh_interval_seconds": 15
            }"#,
        )
        .unwrap();
    }

    /// Remove all controller env vars so tests don't interfere.
    fn clean_env() {
        for key in [
            "VAULT_RPC_URL",
            "VAULT_RPC_URL_FALLBACK",
            "VAULT_ADDRESS",
            "COLLATERAL_TOKEN_ADDRESS",
            "INTEGRATOR_ADDRESS",
            "SETTLE_DELAY_MS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn loads_and_validates() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());
        let config = load_config(tmp.path()).expect("test config should load");
        assert_eq!(config.chain.chain_id, 5003);
        assert_eq!(config.vault.borrow_ceiling_ltv, dec!(0.50));
        assert_eq!(config.vault.liquidation_threshold_ltv, dec!(0.80));
        assert_eq!(config.timing.settle_delay_ms, 1000);
        clean_env();
    }

    #[test]
    #[serial]
    fn missing_file_errors_with_path() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        let err = load_config(tmp.path()).unwrap_err();
        assert!(
            err.to_string().contains("failed to read config file"),
            "expected file-not-found error, got: {err}"
        );
        clean_env();
    }

    #[test]
    #[serial]
    fn env_overrides_rpc_url() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());

        std::env::set_var("VAULT_RPC_URL", "https://custom-rpc.example.com");
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.chain.rpc.http_url, "https://custom-rpc.example.com");
        clean_env();
    }

    #[test]
    #[serial]
    fn env_override_empty_string_ignored() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());

        std::env::set_var("SETTLE_DELAY_MS", "");
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.timing.settle_delay_ms, 1000);
        clean_env();
    }

    #[test]
    #[serial]
    fn env_override_invalid_parse_ignored() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());

        std::env::set_var("SETTLE_DELAY_MS", "not_a_number");
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.timing.settle_delay_ms, 1000);
        clean_env();
    }

    #[test]
    #[serial]
    fn env_override_bad_address_fails_validation() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());

        std::env::set_var("VAULT_ADDRESS", "0xnotanaddress");
        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("vault"), "got: {err}");
        clean_env();
    }

    #[test]
    #[serial]
    fn conflated_ltv_constants_are_refused() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());
        std::fs::write(
            tmp.path().join("vault.json"),
            r#"{
                "borrow_ceiling_ltv": "0.80",
                "liquidation_threshold_ltv": "0.80",
                "token_decimals": 18,
                "fallback_interest_rate_bps": 500,
                "has_oracle_accessor": true
            }"#,
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(
            err.to_string().contains("must stay below"),
            "expected ordering error, got: {err}"
        );
        clean_env();
    }

    #[test]
    #[serial]
    fn zero_decimals_refused() {
        clean_env();
        let tmp = tempfile::tempdir().unwrap();
        write_test_configs(tmp.path());
        std::fs::write(
            tmp.path().join("vault.json"),
            r#"{
                "borrow_ceiling_ltv": "0.50",
                "liquidation_threshold_ltv": "0.80",
                "token_decimals": 0,
                "fallback_interest_rate_bps": 500,
                "has_oracle_accessor": false
            }"#,
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("token_decimals"), "got: {err}");
        clean_env();
    }
}
