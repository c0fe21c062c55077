//! Artifact resolution for the contract deployer.
//!
//! This module turns a contract name into the bytecode and interface produced
//! by an external build toolchain. The deployer only consumes artifacts through
//! `ArtifactInterface`; the file-system store reads Hardhat and Foundry build
//! directories.

use deployer_types::ContractArtifact;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod file;
}

pub use implementations::file::FileArtifactStore;

/// Errors that can occur while resolving contract artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
	/// No artifact matches the requested name.
	#[error("Artifact for contract \"{name}\" not found in {}", .root.display())]
	NotFound { name: String, root: PathBuf },
	/// A short name matches artifacts from several source files.
	#[error("Contract name \"{name}\" is ambiguous, use one of: {}", .candidates.join(", "))]
	Ambiguous {
		name: String,
		candidates: Vec<String>,
	},
	/// The artifact has no creation code (interface or abstract contract).
	#[error("Contract \"{0}\" is abstract and can't be deployed")]
	NotDeployable(String),
	/// The creation code still contains library link placeholders.
	#[error("Contract \"{0}\" has unlinked library references")]
	UnlinkedLibraries(String),
	/// The artifact file exists but could not be parsed.
	#[error("Malformed artifact {}: {reason}", .path.display())]
	Malformed { path: PathBuf, reason: String },
	/// Error that occurs while reading the artifact store.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
}

impl ArtifactError {
	/// Whether the error means the artifact does not exist, as opposed to
	/// existing in a form that cannot be deployed.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

/// Build toolchain layout of an artifact directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactLayout {
	/// Accept both bytecode encodings.
	#[default]
	Auto,
	/// `artifacts/<source>/<Name>.json` with a hex string `bytecode`.
	Hardhat,
	/// `out/<File>.sol/<Name>.json` with a `bytecode.object` field.
	Foundry,
}

impl std::fmt::Display for ArtifactLayout {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Auto => write!(f, "auto"),
			Self::Hardhat => write!(f, "hardhat"),
			Self::Foundry => write!(f, "foundry"),
		}
	}
}

/// Trait defining the interface for artifact stores.
///
/// Implementations look up compiled contracts by name. Names are either the
/// bare contract name (`Greeter`) or the fully qualified `source:Name` form
/// (`contracts/Greeter.sol:Greeter`).
#[cfg_attr(feature = "testing", mockall::automock)]
pub trait ArtifactInterface: Send + Sync {
	/// Resolves a contract name to its deployable artifact.
	fn resolve(&self, name: &str) -> Result<ContractArtifact, ArtifactError>;

	/// Lists the names of all deployable artifacts in the store.
	fn list(&self) -> Result<Vec<String>, ArtifactError>;
}
