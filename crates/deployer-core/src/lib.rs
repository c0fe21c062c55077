//! Core deployment orchestration.
//!
//! The `Deployer` ties the three external seams together: it resolves a
//! contract artifact, submits the creation transaction and waits for the
//! network to confirm it. Every failure is returned as a typed
//! `DeploymentError`; deciding what a failure means for the process is left to
//! the caller.

use deployer_artifacts::ArtifactError;
use deployer_delivery::DeliveryError;
use deployer_types::{DeploymentHandle, HandleError};
use thiserror::Error;

pub mod deployer;

pub use deployer::Deployer;

/// Errors that can occur while deploying a contract.
///
/// All variants are terminal for the invocation; the deployer never retries.
#[derive(Debug, Error)]
pub enum DeploymentError {
	/// No artifact exists for the requested name.
	#[error("Artifact not found: {0}")]
	ArtifactNotFound(String),
	/// An artifact exists but cannot be turned into a creation transaction.
	#[error("Invalid artifact for {name}: {source}")]
	InvalidArtifact { name: String, source: ArtifactError },
	/// The network rejected the creation transaction before accepting it.
	#[error("Submission failed: {0}")]
	Submission(#[from] DeliveryError),
	/// The transaction was accepted but never produced a live contract.
	/// The handle is in the `Failed` state.
	#[error("Confirmation failed for {handle}: {source}")]
	Confirmation {
		handle: DeploymentHandle,
		source: DeliveryError,
	},
	/// A collaborator returned a handle that was already settled.
	#[error("Invalid deployment state: {0}")]
	InvalidTransition(#[from] HandleError),
}
