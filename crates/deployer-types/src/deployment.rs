//! Deployment handle and status lifecycle.
//!
//! A handle is created by the network layer once a creation transaction has
//! been accepted, starting in `Pending`. It moves exactly once to either
//! `Confirmed` (carrying the contract address) or `Failed`, and never leaves
//! a terminal state.

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// On-chain location of a newly created contract.
pub type DeployedContractAddress = Address;

/// Status of a deployment handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
	/// Creation transaction accepted, not yet settled.
	Pending,
	/// Contract exists at the recorded address.
	Confirmed,
	/// Creation transaction failed, reverted or could not be confirmed.
	Failed,
}

impl DeploymentStatus {
	/// Whether no further transition is allowed from this status.
	pub fn is_terminal(&self) -> bool {
		!matches!(self, Self::Pending)
	}
}

impl fmt::Display for DeploymentStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Pending => write!(f, "pending"),
			Self::Confirmed => write!(f, "confirmed"),
			Self::Failed => write!(f, "failed"),
		}
	}
}

/// Errors raised when a handle is asked to leave a terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandleError {
	#[error("Invalid deployment transition from {from} to {to}")]
	InvalidTransition {
		from: DeploymentStatus,
		to: DeploymentStatus,
	},
	#[error("Deployment handle is already {0}")]
	NotPending(DeploymentStatus),
}

/// In-flight or settled contract deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentHandle {
	contract_name: String,
	tx_hash: B256,
	status: DeploymentStatus,
	address: Option<Address>,
}

impl DeploymentHandle {
	/// Creates a handle for an accepted creation transaction.
	pub fn pending(contract_name: impl Into<String>, tx_hash: B256) -> Self {
		Self {
			contract_name: contract_name.into(),
			tx_hash,
			status: DeploymentStatus::Pending,
			address: None,
		}
	}

	pub fn contract_name(&self) -> &str {
		&self.contract_name
	}

	/// Hash of the creation transaction.
	pub fn tx_hash(&self) -> B256 {
		self.tx_hash
	}

	pub fn status(&self) -> DeploymentStatus {
		self.status
	}

	/// Address of the created contract, present only once confirmed.
	pub fn address(&self) -> Option<Address> {
		self.address
	}

	/// Fails unless the handle is still `Pending`.
	pub fn ensure_pending(&self) -> Result<(), HandleError> {
		match self.status {
			DeploymentStatus::Pending => Ok(()),
			status => Err(HandleError::NotPending(status)),
		}
	}

	/// Marks the deployment as confirmed at `address`.
	pub fn confirm(&mut self, address: Address) -> Result<Address, HandleError> {
		self.transition(DeploymentStatus::Confirmed)?;
		self.address = Some(address);
		Ok(address)
	}

	/// Marks the deployment as failed.
	pub fn fail(&mut self) -> Result<(), HandleError> {
		self.transition(DeploymentStatus::Failed)
	}

	fn transition(&mut self, to: DeploymentStatus) -> Result<(), HandleError> {
		if self.status.is_terminal() || to == DeploymentStatus::Pending {
			return Err(HandleError::InvalidTransition {
				from: self.status,
				to,
			});
		}
		self.status = to;
		Ok(())
	}
}

impl fmt::Display for DeploymentHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({}, tx {})", self.contract_name, self.status, self.tx_hash)?;
		if let Some(address) = self.address {
			write!(f, " at {}", address)?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	fn handle() -> DeploymentHandle {
		DeploymentHandle::pending("Greeter", B256::repeat_byte(0xab))
	}

	#[test]
	fn test_new_handle_is_pending_without_address() {
		let handle = handle();
		assert_eq!(handle.status(), DeploymentStatus::Pending);
		assert_eq!(handle.address(), None);
		assert_eq!(handle.contract_name(), "Greeter");
		assert_eq!(handle.tx_hash(), B256::repeat_byte(0xab));
	}

	#[test]
	fn test_confirm_records_address() {
		let mut handle = handle();
		let deployed = address!("5fbdb2315678afecb367f032d93f642f64180aa3");

		assert_eq!(handle.confirm(deployed), Ok(deployed));
		assert_eq!(handle.status(), DeploymentStatus::Confirmed);
		assert_eq!(handle.address(), Some(deployed));
	}

	#[test]
	fn test_fail_leaves_address_empty() {
		let mut handle = handle();

		assert!(handle.fail().is_ok());
		assert_eq!(handle.status(), DeploymentStatus::Failed);
		assert_eq!(handle.address(), None);
	}

	#[test]
	fn test_terminal_states_are_final() {
		let mut confirmed = handle();
		confirmed.confirm(Address::repeat_byte(0x11)).unwrap();

		assert_eq!(
			confirmed.fail(),
			Err(HandleError::InvalidTransition {
				from: DeploymentStatus::Confirmed,
				to: DeploymentStatus::Failed,
			})
		);
		assert!(confirmed.confirm(Address::repeat_byte(0x22)).is_err());
		assert_eq!(confirmed.address(), Some(Address::repeat_byte(0x11)));

		let mut failed = handle();
		failed.fail().unwrap();

		assert!(failed.confirm(Address::repeat_byte(0x11)).is_err());
		assert!(failed.fail().is_err());
		assert_eq!(failed.status(), DeploymentStatus::Failed);
	}

	#[test]
	fn test_ensure_pending() {
		let mut handle = handle();
		assert_eq!(handle.ensure_pending(), Ok(()));

		handle.fail().unwrap();
		assert_eq!(
			handle.ensure_pending(),
			Err(HandleError::NotPending(DeploymentStatus::Failed))
		);
	}

	#[test]
	fn test_display() {
		let mut handle = handle();
		assert!(handle.to_string().starts_with("Greeter (pending, tx 0xabab"));

		handle.confirm(Address::repeat_byte(0x11)).unwrap();
		assert!(handle
			.to_string()
			.ends_with("at 0x1111111111111111111111111111111111111111"));
	}
}
