//! Wallet seam — signing, broadcast, and confirmation tracking.
//!
//! The controller never touches key material: it hands a [`CallPlan`] to a
//! [`Wallet`] implementation and observes the outcome. [`LocalWallet`] is
//! the shipped implementation: it signs legacy transactions with a local
//! key, simulates via `eth_call` before broadcasting (a revert is caught and
//! decoded without spending gas), and polls for the receipt with a
//! confirmation timeout.

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::TimingConfig;
use crate::constants::FALLBACK_GAS_LIMIT;
use crate::errors::ControllerError;

use super::HttpProvider;

/// `Error(string)` selector: `keccak256("Error(string)")[0..4]`.
const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// `Panic(uint256)` selector: `keccak256("Panic(uint256)")[0..4]`.
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Gas price buffer applied over the node's quote (10%).
const GAS_PRICE_BUFFER: f64 = 1.1;

/// An encoded contract call ready for signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPlan {
    /// Action name for logs.
    pub label: &'static str,
    pub to: Address,
    pub input: Bytes,
}

/// External wallet provider.
///
/// `request_switch` is fire-and-forget: the call dispatches the request and
/// returns without awaiting the (user-driven) outcome. A declined signature
/// surfaces as [`ControllerError::UserDeclined`], distinguishable from
/// on-chain reverts.
#[allow(async_fn_in_trait)]
pub trait Wallet: Send + Sync {
    /// Chain the wallet is currently operating on.
    async fn active_chain_id(&self) -> Result<u64, ControllerError>;

    /// Ask the wallet to move to `chain_id`. Does not block on completion.
    async fn request_switch(&self, chain_id: u64);

    /// Request a signature for `plan` and broadcast it.
    async fn sign_and_send(&self, plan: &CallPlan) -> Result<B256, ControllerError>;

    /// Wait until `tx_hash` is included; `Err(ExecutionReverted)` when the
    /// receipt reports failure.
    async fn await_inclusion(&self, tx_hash: B256) -> Result<(), ControllerError>;
}

// ---------------------------------------------------------------------------
// LocalWallet
// ---------------------------------------------------------------------------

/// Key-in-process wallet over a single RPC endpoint.
pub struct LocalWallet {
    provider: HttpProvider,
    signer: PrivateKeySigner,
    chain_id: u64,
    /// Local nonce counter, `None` until first chain query.
    nonce: Mutex<Option<u64>>,
    confirmation_timeout: Duration,
    poll_interval: Duration,
}

impl LocalWallet {
    pub fn new(
        provider: HttpProvider,
        signer: PrivateKeySigner,
        chain_id: u64,
        timing: &TimingConfig,
    ) -> Self {
        info!(
            address = %signer.address(),
            chain_id,
            confirmation_timeout = timing.confirmation_timeout_seconds,
            "local wallet initialized"
        );
        Self {
            provider,
            signer,
            chain_id,
            nonce: Mutex::new(None),
            confirmation_timeout: Duration::from_secs(timing.confirmation_timeout_seconds),
            poll_interval: Duration::from_millis(timing.receipt_poll_interval_ms),
        }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Next nonce, initialised from the chain on first use.
    async fn next_nonce(&self) -> Result<u64, ControllerError> {
        let mut guard = self.nonce.lock().await;
        let nonce = match *guard {
            Some(n) => n,
            None => {
                let n = self
                    .provider
                    .get_transaction_count(self.signer.address())
                    .await?;
                debug!(nonce = n, "nonce initialized from chain");
                n
            }
        };
        *guard = Some(nonce + 1);
        Ok(nonce)
    }

    async fn gas_price(&self) -> Result<u128, ControllerError> {
        let base = self.provider.get_gas_price().await?;
        Ok(((base as f64) * GAS_PRICE_BUFFER) as u128)
    }
}

impl Wallet for LocalWallet {
    async fn active_chain_id(&self) -> Result<u64, ControllerError> {
        Ok(self.provider.get_chain_id().await?)
    }

    async fn request_switch(&self, chain_id: u64) {
        // A key-in-process wallet is pinned to its RPC endpoint; switching
        // means pointing the process at a different endpoint.
        warn!(
            requested = chain_id,
            configured = self.chain_id,
            "chain switch requested — reconfigure the RPC endpoint to honor it"
        );
    }

    async fn sign_and_send(&self, plan: &CallPlan) -> Result<B256, ControllerError> {
        let from = self.signer.address();
        let request = TransactionRequest::default()
            .with_from(from)
            .with_to(plan.to)
            .with_input(plan.input.clone());

        // Simulate first: a revert here costs nothing and carries the
        // decoded reason the mined receipt would not.
        if let Err(e) = self.provider.call(request.clone()).await {
            let reason = revert_reason_from_error(&e)
                .unwrap_or_else(|| format!("eth_call failed: {e}"));
            return Err(ControllerError::SimulationReverted { reason });
        }

        let gas_limit = match self.provider.estimate_gas(request).await {
            Ok(estimate) => estimate,
            Err(e) => {
                warn!(error = %e, fallback = FALLBACK_GAS_LIMIT, "gas estimation failed");
                FALLBACK_GAS_LIMIT
            }
        };

        let nonce = self.next_nonce().await?;
        let gas_price = self.gas_price().await?;

        let tx = TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price,
            gas_limit,
            to: TxKind::Call(plan.to),
            value: U256::ZERO,
            input: plan.input.clone(),
        };

        let sig_hash = tx.signature_hash();
        let sig = self
            .signer
            .sign_hash_sync(&sig_hash)
            .map_err(|e| ControllerError::Wallet {
                reason: format!("signing failed: {e}"),
            })?;

        let signed = tx.into_signed(sig);
        let envelope = TxEnvelope::Legacy(signed);
        let raw = envelope.encoded_2718();

        let pending = self.provider.send_raw_transaction(&raw).await?;
        let tx_hash = *pending.tx_hash();

        info!(
            tx_hash = %tx_hash,
            action = plan.label,
            nonce,
            gas_limit,
            "transaction broadcast"
        );
        Ok(tx_hash)
    }

    async fn await_inclusion(&self, tx_hash: B256) -> Result<(), ControllerError> {
        let start = tokio::time::Instant::now();
        loop {
            match self.provider.get_transaction_receipt(tx_hash).await {
                Ok(Some(receipt)) => {
                    if !receipt.status() {
                        return Err(ControllerError::ExecutionReverted {
                            tx_hash: tx_hash.to_string(),
                            reason: "transaction reverted on-chain".into(),
                        });
                    }
                    info!(
                        tx_hash = %tx_hash,
                        gas_used = receipt.gas_used,
                        "transaction confirmed"
                    );
                    return Ok(());
                }
                Ok(None) => {
                    // Not yet mined.
                }
                Err(e) => {
                    warn!(error = %e, tx_hash = %tx_hash, "receipt poll error, retrying");
                }
            }

            if start.elapsed() >= self.confirmation_timeout {
                return Err(ControllerError::ConfirmationTimeout {
                    tx_hash: tx_hash.to_string(),
                    timeout_seconds: self.confirmation_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

// ---------------------------------------------------------------------------
// Revert decoding
// ---------------------------------------------------------------------------

/// Pull revert return data out of an RPC error response, if present.
fn revert_reason_from_error(err: &alloy::transports::TransportError) -> Option<String> {
    let payload = err.as_error_resp()?;
    let data = payload.as_revert_data()?;
    Some(decode_revert_reason(&data))
}

/// Decode a Solidity revert reason from raw return data.
///
/// Handles `Error(string)` (0x08c379a0), `Panic(uint256)` (0x4e487b71), and
/// falls back to hex for unknown selectors.
pub fn decode_revert_reason(data: &[u8]) -> String {
    if data.is_empty() {
        return "unknown revert".into();
    }
    if data.len() < 4 {
        return hex::encode(data);
    }

    // Error(string): selector(4) + offset(32) + length(32) + data
    if data[..4] == ERROR_SELECTOR && data.len() >= 68 {
        if let Ok(len_bytes) = <[u8; 8]>::try_from(&data[60..68]) {
            let str_len = u64::from_be_bytes(len_bytes) as usize;
            if data.len() >= 68 + str_len {
                return String::from_utf8_lossy(&data[68..68 + str_len]).into_owned();
            }
        }
    }

    // Panic(uint256): selector(4) + code(32)
    if data[..4] == PANIC_SELECTOR && data.len() >= 36 {
        let code = U256::from_be_slice(&data[4..36]);
        return match code.to::<u64>() {
            0x01 => "panic: assertion failed".into(),
            0x11 => "panic: arithmetic overflow/underflow".into(),
            0x12 => "panic: division by zero".into(),
            0x32 => "panic: array index out of bounds".into(),
            _ => format!("panic(0x{code:x})"),
        };
    }

    hex::encode(data)
}
