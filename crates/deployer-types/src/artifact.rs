//! Contract artifact types.
//!
//! A `ContractArtifact` is the immutable output of an external build toolchain:
//! the creation bytecode of one contract plus its interface definition. The
//! deployer never compiles anything; it only reads artifacts by name and turns
//! them into `CreationPayload`s.

use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// A compiled, deployable contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractArtifact {
	/// Contract name as declared in the source file.
	pub name: String,
	/// Source file the contract was compiled from, when the build recorded it.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source_name: Option<String>,
	/// Interface definition of the contract.
	pub abi: JsonAbi,
	/// Creation bytecode.
	pub bytecode: Bytes,
}

impl ContractArtifact {
	/// Returns the `source:Name` form when the source is known, the bare name otherwise.
	pub fn fully_qualified_name(&self) -> String {
		match &self.source_name {
			Some(source) => format!("{}:{}", source, self.name),
			None => self.name.clone(),
		}
	}

	/// Whether the artifact carries creation code at all.
	///
	/// Interfaces and abstract contracts compile to an empty bytecode string.
	pub fn is_deployable(&self) -> bool {
		!self.bytecode.is_empty()
	}
}

/// Contract-creation request built from an artifact.
///
/// Deployments take no constructor arguments and transfer no value, so the
/// payload is exactly the artifact's creation bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationPayload {
	/// Name of the contract being created, kept for logging and handles.
	pub contract_name: String,
	/// Init code sent as the transaction input.
	pub bytecode: Bytes,
}

impl From<&ContractArtifact> for CreationPayload {
	fn from(artifact: &ContractArtifact) -> Self {
		Self {
			contract_name: artifact.name.clone(),
			bytecode: artifact.bytecode.clone(),
		}
	}
}
