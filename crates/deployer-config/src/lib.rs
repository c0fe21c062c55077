//! Configuration module for the contract deployer.
//!
//! This module loads the deployer's TOML configuration: the networks a
//! contract can be deployed to, where the build artifacts live, and how long
//! to wait for a creation transaction to settle.
//!
//! String values may reference environment variables as `${VAR}` or
//! `${VAR:-default}`, which keeps private keys out of the file itself.

mod secret_string;

pub use secret_string::SecretString;

use deployer_artifacts::ArtifactLayout;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
	/// The requested network is not configured.
	#[error("Network \"{name}\" not found, available: {}", .available.join(", "))]
	UnknownNetwork {
		name: String,
		available: Vec<String>,
	},
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Keep the message, drop the input excerpt
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the deployer.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	/// Network used when none is requested explicitly.
	#[serde(default)]
	pub default_network: Option<String>,
	/// Location and layout of the build artifacts.
	#[serde(default)]
	pub artifacts: ArtifactsConfig,
	/// Confirmation policy for creation transactions.
	#[serde(default)]
	pub confirmation: ConfirmationConfig,
	/// Named networks contracts can be deployed to.
	#[serde(default)]
	pub networks: BTreeMap<String, NetworkConfig>,
}

/// Configuration of the artifact store.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactsConfig {
	/// Build output directory. Relative paths are resolved against the
	/// directory of the configuration file.
	#[serde(default = "default_artifacts_path")]
	pub path: PathBuf,
	/// Toolchain layout of the directory.
	#[serde(default)]
	pub layout: ArtifactLayout,
}

impl Default for ArtifactsConfig {
	fn default() -> Self {
		Self {
			path: default_artifacts_path(),
			layout: ArtifactLayout::default(),
		}
	}
}

/// Returns the default artifact directory, Hardhat's `artifacts`.
fn default_artifacts_path() -> PathBuf {
	PathBuf::from("artifacts")
}

/// Confirmation policy for creation transactions.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfirmationConfig {
	/// Number of blocks that must include the transaction.
	/// Defaults to 1, the including block itself.
	#[serde(default = "default_confirmations")]
	pub confirmations: u64,
	/// Optional deadline in seconds. Without it the wait is unbounded.
	#[serde(default)]
	pub timeout_seconds: Option<u64>,
}

impl ConfirmationConfig {
	pub fn timeout(&self) -> Option<Duration> {
		self.timeout_seconds.map(Duration::from_secs)
	}
}

impl Default for ConfirmationConfig {
	fn default() -> Self {
		Self {
			confirmations: default_confirmations(),
			timeout_seconds: None,
		}
	}
}

fn default_confirmations() -> u64 {
	1
}

/// Connection settings for one network.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
	/// HTTP JSON-RPC endpoint.
	pub rpc_url: String,
	/// Chain ID the endpoint must report, if pinned.
	#[serde(default)]
	pub chain_id: Option<u64>,
	/// Hex private key of the deploying account.
	pub private_key: SecretString,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {e}")))?;

	let mut result = String::with_capacity(input.len());
	let mut last = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(var_name.as_str()) {
			Ok(value) => value,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last..full_match.start()]);
		result.push_str(&value);
		last = full_match.end();
	}

	result.push_str(&input[last..]);
	Ok(result)
}

impl Config {
	/// Loads configuration from a file.
	///
	/// A `.env` file in the working directory should be loaded by the caller
	/// beforehand so its variables take part in substitution. A relative
	/// artifact path is anchored at the configuration file's directory.
	pub async fn from_file(path: &Path) -> Result<Self, ConfigError> {
		debug!(path = %path.display(), "Loading configuration");

		let content = tokio::fs::read_to_string(path).await?;
		let mut config: Config = content.parse()?;

		if config.artifacts.path.is_relative() {
			let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
			config.artifacts.path = base_dir.join(&config.artifacts.path);
		}

		Ok(config)
	}

	/// Selects the network to deploy to.
	///
	/// Uses `requested` when given, then `default_network`, then the only
	/// configured network if there is exactly one.
	pub fn network(&self, requested: Option<&str>) -> Result<(&str, &NetworkConfig), ConfigError> {
		let name = match requested.or(self.default_network.as_deref()) {
			Some(name) => name,
			None if self.networks.len() == 1 => self
				.networks
				.keys()
				.next()
				.map(String::as_str)
				.unwrap_or_default(),
			None => {
				return Err(ConfigError::Validation(
					"No network requested and no default_network configured".into(),
				));
			},
		};

		self.networks
			.get_key_value(name)
			.map(|(name, network)| (name.as_str(), network))
			.ok_or_else(|| ConfigError::UnknownNetwork {
				name: name.to_string(),
				available: self.networks.keys().cloned().collect(),
			})
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"At least one network must be configured".into(),
			));
		}

		if let Some(default) = &self.default_network {
			if !self.networks.contains_key(default) {
				return Err(ConfigError::Validation(format!(
					"default_network \"{}\" is not a configured network",
					default
				)));
			}
		}

		for (name, network) in &self.networks {
			if network.rpc_url.trim().is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network \"{}\" has an empty rpc_url",
					name
				)));
			}
			if network.private_key.is_empty() {
				return Err(ConfigError::Validation(format!(
					"Network \"{}\" has an empty private_key",
					name
				)));
			}
		}

		if self.confirmation.confirmations == 0 {
			return Err(ConfigError::Validation(
				"confirmation.confirmations must be at least 1".into(),
			));
		}

		if self.confirmation.timeout_seconds == Some(0) {
			return Err(ConfigError::Validation(
				"confirmation.timeout_seconds must be greater than 0".into(),
			));
		}

		Ok(())
	}
}

/// Parses configuration from a TOML string.
///
/// Environment variables are resolved before parsing and the result is
/// validated.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
