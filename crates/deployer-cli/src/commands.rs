//! Command handlers.
//!
//! Each handler wires the configured implementations into the library crates.
//! Errors are returned to `main`, which owns the process exit status.

use crate::output::Display;
use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use anyhow::{Context, Result};
use deployer_artifacts::{ArtifactInterface, FileArtifactStore};
use deployer_config::Config;
use deployer_core::Deployer;
use deployer_delivery::{AlloyNetwork, ConfirmationPolicy};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

async fn load_config(path: &Path) -> Result<Config> {
	Config::from_file(path)
		.await
		.with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn artifact_store(config: &Config) -> FileArtifactStore {
	FileArtifactStore::new(config.artifacts.path.clone(), config.artifacts.layout)
}

/// Handles `deployer deploy`, returning the address of the new contract.
///
/// The network is first contacted when the creation transaction is
/// submitted, so artifact problems are reported without any RPC traffic.
pub async fn deploy(config_path: &Path, contract: &str, network: Option<&str>) -> Result<Address> {
	let config = load_config(config_path).await?;
	let (network_name, network) = config.network(network)?;

	let signer: PrivateKeySigner = network
		.private_key
		.with_exposed(|key| key.trim().parse::<PrivateKeySigner>())
		.with_context(|| format!("Invalid private key for network \"{}\"", network_name))?;

	let policy = ConfirmationPolicy {
		confirmations: config.confirmation.confirmations,
		timeout: config.confirmation.timeout(),
	};

	let client = Arc::new(
		AlloyNetwork::new(&network.rpc_url, network.chain_id, signer, policy)
			.with_context(|| format!("Invalid settings for network \"{}\"", network_name))?,
	);
	info!(network = network_name, deployer = %client.deployer(), "Deploying {}", contract);

	let deployer = Deployer::new(Arc::new(artifact_store(&config)), client.clone(), client);
	Ok(deployer.deploy(contract).await?)
}

/// Handles `deployer artifacts`.
pub async fn artifacts(config_path: &Path) -> Result<()> {
	let config = load_config(config_path).await?;
	let store = artifact_store(&config);
	let names = store.list()?;

	Display::header("Deployable contracts");
	Display::kv("Directory", &store.root().display().to_string());
	Display::kv("Layout", &store.layout().to_string());
	println!();

	if names.is_empty() {
		Display::warning("No deployable artifacts found, build the contracts first");
	}
	for name in &names {
		Display::item(name);
	}

	Ok(())
}
