//! Transaction delivery for the contract deployer.
//!
//! This module submits contract-creation transactions and waits for the
//! network to confirm them. Submission and confirmation are separate seams so
//! that each failure mode can be observed on its own; the alloy implementation
//! provides both for EVM networks.

use alloy_primitives::Address;
use async_trait::async_trait;
use deployer_types::{CreationPayload, DeploymentHandle};
use std::time::Duration;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
}

pub use implementations::evm::alloy::AlloyNetwork;

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// Error that occurs during network communication or request rejection.
	#[error("Network error: {0}")]
	Network(String),
	/// The transaction was included but did not produce a live contract.
	#[error("Transaction failed: {0}")]
	TransactionFailed(String),
	/// The transaction did not settle within the configured deadline.
	#[error("Transaction not confirmed within {0}s")]
	Timeout(u64),
}

/// How long and how deep the network layer waits for a creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
	/// Blocks that must include the transaction, the including block counted.
	pub confirmations: u64,
	/// Upper bound on the wait; `None` waits until the transaction settles.
	pub timeout: Option<Duration>,
}

impl Default for ConfirmationPolicy {
	fn default() -> Self {
		Self {
			confirmations: 1,
			timeout: None,
		}
	}
}

/// Trait defining the submission side of a network client.
///
/// Implementations sign and broadcast the creation transaction. A returned
/// handle is always `Pending`; rejection before acceptance is an error and
/// produces no handle.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait SubmitterInterface: Send + Sync {
	/// Signs and submits a contract-creation transaction.
	async fn submit(&self, payload: CreationPayload) -> Result<DeploymentHandle, DeliveryError>;
}

/// Trait defining the confirmation side of a network client.
#[async_trait]
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait ConfirmationInterface: Send + Sync {
	/// Waits until the creation transaction behind `handle` settles.
	///
	/// Returns the address of the created contract, or an error when the
	/// transaction reverted, produced no code or could not be observed.
	async fn await_confirmation(&self, handle: &DeploymentHandle)
		-> Result<Address, DeliveryError>;
}
