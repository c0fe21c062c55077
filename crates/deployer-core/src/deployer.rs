//! Single-contract deployment pipeline.
//!
//! A deployment runs resolve, submit and await in order, calling each
//! collaborator at most once. Two calls for the same contract are two
//! independent deployments.

use crate::DeploymentError;
use alloy_primitives::Address;
use deployer_artifacts::ArtifactInterface;
use deployer_delivery::{ConfirmationInterface, SubmitterInterface};
use deployer_types::{ContractArtifact, CreationPayload, DeploymentHandle};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Deploys pre-built contracts to a network.
pub struct Deployer {
	artifacts: Arc<dyn ArtifactInterface>,
	submitter: Arc<dyn SubmitterInterface>,
	waiter: Arc<dyn ConfirmationInterface>,
}

impl Deployer {
	pub fn new(
		artifacts: Arc<dyn ArtifactInterface>,
		submitter: Arc<dyn SubmitterInterface>,
		waiter: Arc<dyn ConfirmationInterface>,
	) -> Self {
		Self {
			artifacts,
			submitter,
			waiter,
		}
	}

	/// Deploys `contract_name` and returns the address of the new contract.
	pub async fn deploy(&self, contract_name: &str) -> Result<Address, DeploymentError> {
		let (_, address) = self.execute(contract_name).await?;
		Ok(address)
	}

	/// Deploys `contract_name` and returns the confirmed deployment handle.
	///
	/// On confirmation failure the handle is moved to `Failed` and returned
	/// inside `DeploymentError::Confirmation`.
	pub async fn deploy_tracked(
		&self,
		contract_name: &str,
	) -> Result<DeploymentHandle, DeploymentError> {
		let (handle, _) = self.execute(contract_name).await?;
		Ok(handle)
	}

	#[instrument(skip_all, fields(contract = %contract_name))]
	async fn execute(
		&self,
		contract_name: &str,
	) -> Result<(DeploymentHandle, Address), DeploymentError> {
		let artifact = self.resolve(contract_name)?;
		let payload = CreationPayload::from(&artifact);
		debug!(bytecode_len = payload.bytecode.len(), "Built creation payload");

		let mut handle = self.submitter.submit(payload).await.map_err(|e| {
			warn!(error = %e, "Creation transaction rejected");
			DeploymentError::Submission(e)
		})?;
		info!(tx_hash = %handle.tx_hash(), "Creation transaction submitted");

		// A settled handle has nothing left to wait for
		handle.ensure_pending()?;

		match self.waiter.await_confirmation(&handle).await {
			Ok(address) => {
				handle.confirm(address)?;
				info!(tx_hash = %handle.tx_hash(), %address, "Contract deployed");
				Ok((handle, address))
			},
			Err(source) => {
				handle.fail()?;
				warn!(tx_hash = %handle.tx_hash(), error = %source, "Deployment failed");
				Err(DeploymentError::Confirmation { handle, source })
			},
		}
	}

	fn resolve(&self, contract_name: &str) -> Result<ContractArtifact, DeploymentError> {
		if contract_name.trim().is_empty() {
			return Err(DeploymentError::ArtifactNotFound(contract_name.to_string()));
		}

		self.artifacts.resolve(contract_name).map_err(|e| {
			if e.is_not_found() {
				DeploymentError::ArtifactNotFound(contract_name.to_string())
			} else {
				DeploymentError::InvalidArtifact {
					name: contract_name.to_string(),
					source: e,
				}
			}
		})
	}
}
