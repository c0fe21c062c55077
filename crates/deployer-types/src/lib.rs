//! Common types for the contract deployer.
//!
//! This crate defines the data model shared by every stage of a deployment:
//! the resolved contract artifact, the creation request built from it, and the
//! handle that tracks the creation transaction until it settles.

/// Compiled contract artifacts and the creation requests built from them.
pub mod artifact;
/// Deployment handle and its status lifecycle.
pub mod deployment;
/// Utility functions for hex string handling.
pub mod utils;

pub use artifact::{ContractArtifact, CreationPayload};
pub use deployment::{DeployedContractAddress, DeploymentHandle, DeploymentStatus, HandleError};
pub use utils::without_0x_prefix;
