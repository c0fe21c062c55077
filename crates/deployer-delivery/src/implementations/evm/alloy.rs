//! Alloy-based EVM network client.
//!
//! Submits contract-creation transactions through an alloy provider that signs
//! with a local private key, and waits for them using alloy's pending
//! transaction watcher. Building the client performs no I/O; the endpoint is
//! first contacted when a transaction is submitted.

use crate::{ConfirmationInterface, ConfirmationPolicy, DeliveryError, SubmitterInterface};
use alloy_network::{EthereumWallet, TransactionBuilder};
use alloy_primitives::{Address, TxKind, B256};
use alloy_provider::{DynProvider, PendingTransactionConfig, Provider, ProviderBuilder};
use alloy_rpc_client::RpcClient;
use alloy_rpc_types::TransactionRequest;
use alloy_signer::Signer;
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::layers::RetryBackoffLayer;
use async_trait::async_trait;
use deployer_types::{CreationPayload, DeploymentHandle};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

/// EVM network client backed by an alloy provider.
pub struct AlloyNetwork {
	provider: DynProvider,
	rpc_url: String,
	expected_chain_id: Option<u64>,
	/// Chain ID reported by the endpoint, set on first contact.
	chain_id: OnceCell<u64>,
	deployer: Address,
	policy: ConfirmationPolicy,
}

impl std::fmt::Debug for AlloyNetwork {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AlloyNetwork")
			.field("rpc_url", &self.rpc_url)
			.field("expected_chain_id", &self.expected_chain_id)
			.field("chain_id", &self.chain_id.get())
			.field("deployer", &self.deployer)
			.field("policy", &self.policy)
			.field("provider", &"<DynProvider>")
			.finish()
	}
}

impl AlloyNetwork {
	/// Creates a client for an EVM endpoint.
	///
	/// Only the URL is checked here. When `expected_chain_id` is set, the
	/// first submission refuses an endpoint serving another chain.
	pub fn new(
		rpc_url: &str,
		expected_chain_id: Option<u64>,
		signer: PrivateKeySigner,
		policy: ConfirmationPolicy,
	) -> Result<Self, DeliveryError> {
		let url = rpc_url
			.parse()
			.map_err(|e| DeliveryError::Network(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

		// Retry rate-limited and transient transport failures
		let retry_layer = RetryBackoffLayer::new(
			5,    // max_retry
			1000, // initial backoff in milliseconds
			10,   // compute units per second
		);
		let client = RpcClient::builder().layer(retry_layer).http(url);

		let signer = signer.with_chain_id(expected_chain_id);
		let deployer = signer.address();

		let provider = ProviderBuilder::new()
			.wallet(EthereumWallet::from(signer))
			.connect_client(client)
			.erased();

		Ok(Self {
			provider,
			rpc_url: rpc_url.to_string(),
			expected_chain_id,
			chain_id: OnceCell::new(),
			deployer,
			policy,
		})
	}

	/// Address that signs and pays for deployments.
	pub fn deployer(&self) -> Address {
		self.deployer
	}

	/// Returns the endpoint's chain ID, querying it on first use.
	async fn ensure_connected(&self) -> Result<u64, DeliveryError> {
		self.chain_id
			.get_or_try_init(|| async {
				let chain_id = self.provider.get_chain_id().await.map_err(|e| {
					DeliveryError::Network(format!("Failed to connect to {}: {}", self.rpc_url, e))
				})?;

				if let Some(expected) = self.expected_chain_id {
					if expected != chain_id {
						return Err(DeliveryError::Network(format!(
							"Chain ID mismatch: configured {}, endpoint reports {}",
							expected, chain_id
						)));
					}
				}

				info!(chain_id = chain_id, deployer = %self.deployer, "Connected to network");
				Ok(chain_id)
			})
			.await
			.copied()
	}

	async fn wait_for_address(&self, tx_hash: B256) -> Result<Address, DeliveryError> {
		let config = PendingTransactionConfig::new(tx_hash)
			.with_required_confirmations(self.policy.confirmations);

		let pending = self
			.provider
			.watch_pending_transaction(config)
			.await
			.map_err(|e| DeliveryError::Network(format!("Transaction watch failed: {}", e)))?;

		let confirmed_hash = pending
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to confirm transaction: {}", e)))?;

		let receipt = self
			.provider
			.get_transaction_receipt(confirmed_hash)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get receipt: {}", e)))?
			.ok_or_else(|| {
				DeliveryError::Network(format!("No receipt for transaction {}", confirmed_hash))
			})?;

		let address = contract_address_from_receipt(
			confirmed_hash,
			receipt.status(),
			receipt.contract_address,
		)?;

		let code = self
			.provider
			.get_code_at(address)
			.await
			.map_err(|e| DeliveryError::Network(format!("Failed to get code: {}", e)))?;

		if code.is_empty() {
			return Err(DeliveryError::TransactionFailed(format!(
				"No contract code at {} after transaction {}",
				address, confirmed_hash
			)));
		}

		Ok(address)
	}
}

/// Builds the creation transaction for a payload.
///
/// Gas, fees, nonce and chain ID are left to the provider's fillers.
pub(crate) fn creation_request(payload: &CreationPayload, from: Address) -> TransactionRequest {
	TransactionRequest::default()
		.with_from(from)
		.with_deploy_code(payload.bytecode.clone())
}

/// Maps the settled receipt fields of a creation transaction to its outcome.
pub(crate) fn contract_address_from_receipt(
	tx_hash: B256,
	success: bool,
	contract_address: Option<Address>,
) -> Result<Address, DeliveryError> {
	if !success {
		return Err(DeliveryError::TransactionFailed(format!(
			"Transaction {} reverted",
			tx_hash
		)));
	}
	contract_address.ok_or_else(|| {
		DeliveryError::TransactionFailed(format!(
			"Receipt of transaction {} carries no contract address",
			tx_hash
		))
	})
}

#[async_trait]
impl SubmitterInterface for AlloyNetwork {
	async fn submit(&self, payload: CreationPayload) -> Result<DeploymentHandle, DeliveryError> {
		let chain_id = self.ensure_connected().await?;
		let request = creation_request(&payload, self.deployer);

		debug!(
			chain_id = chain_id,
			contract = %payload.contract_name,
			data_len = payload.bytecode.len(),
			create = matches!(request.to, Some(TxKind::Create)),
			"Sending creation transaction"
		);

		let pending = self.provider.send_transaction(request).await.map_err(|e| {
			error!(chain_id = chain_id, contract = %payload.contract_name, "Transaction submission failed: {}", e);
			DeliveryError::Network(format!("Failed to send transaction: {}", e))
		})?;

		let tx_hash = *pending.tx_hash();
		info!(tx_hash = %tx_hash, chain_id = chain_id, contract = %payload.contract_name, "Creation transaction submitted");

		Ok(DeploymentHandle::pending(payload.contract_name, tx_hash))
	}
}

#[async_trait]
impl ConfirmationInterface for AlloyNetwork {
	async fn await_confirmation(
		&self,
		handle: &DeploymentHandle,
	) -> Result<Address, DeliveryError> {
		let tx_hash = handle.tx_hash();

		match self.policy.timeout {
			Some(limit) => {
				info!(
					tx_hash = %tx_hash,
					confirmations = self.policy.confirmations,
					timeout_seconds = limit.as_secs(),
					"Waiting for confirmation"
				);
				tokio::time::timeout(limit, self.wait_for_address(tx_hash))
					.await
					.map_err(|_| {
						warn!(tx_hash = %tx_hash, "Confirmation deadline reached");
						DeliveryError::Timeout(limit.as_secs())
					})?
			},
			None => {
				info!(
					tx_hash = %tx_hash,
					confirmations = self.policy.confirmations,
					"Waiting for confirmation"
				);
				self.wait_for_address(tx_hash).await
			},
		}
	}
}
