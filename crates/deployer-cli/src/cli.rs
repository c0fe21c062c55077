//! Command-line interface definitions and parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI application structure for the deployer
#[derive(Parser, Debug)]
#[command(name = "deployer")]
#[command(about = "Deploy pre-built smart contract artifacts to EVM networks")]
#[command(version)]
pub struct Cli {
	/// Path to the configuration file
	#[arg(
		short,
		long,
		global = true,
		env = "DEPLOYER_CONFIG",
		default_value = "deployer.toml"
	)]
	pub config: PathBuf,

	/// Enable debug logging
	#[arg(long, global = true)]
	pub debug: bool,

	#[command(subcommand)]
	pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Deploy a contract and print its address
	Deploy {
		/// Contract name, either `Name` or `path/File.sol:Name`
		contract: String,

		/// Network to deploy to, defaults to the configured default network
		#[arg(short, long, env = "DEPLOYER_NETWORK")]
		network: Option<String>,
	},

	/// List deployable contracts in the artifact directory
	Artifacts,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_deploy() {
		let cli = Cli::try_parse_from([
			"deployer",
			"deploy",
			"Greeter",
			"--network",
			"sepolia",
			"--config",
			"conf/deployer.toml",
		])
		.unwrap();

		assert_eq!(cli.config, PathBuf::from("conf/deployer.toml"));
		assert!(!cli.debug);
		match cli.command {
			Commands::Deploy { contract, network } => {
				assert_eq!(contract, "Greeter");
				assert_eq!(network.as_deref(), Some("sepolia"));
			},
			other => panic!("Expected Deploy, got {:?}", other),
		}
	}

	#[test]
	fn test_parse_fully_qualified_name() {
		let cli =
			Cli::try_parse_from(["deployer", "--debug", "deploy", "contracts/Greeter.sol:Greeter"])
				.unwrap();

		assert!(cli.debug);
		assert!(matches!(
			cli.command,
			Commands::Deploy { ref contract, .. } if contract == "contracts/Greeter.sol:Greeter"
		));
	}

	#[test]
	fn test_parse_artifacts() {
		let cli = Cli::try_parse_from(["deployer", "artifacts", "-c", "other.toml"]).unwrap();

		assert_eq!(cli.config, PathBuf::from("other.toml"));
		assert!(matches!(cli.command, Commands::Artifacts));
	}

	#[test]
	fn test_deploy_requires_contract() {
		assert!(Cli::try_parse_from(["deployer", "deploy"]).is_err());
	}
}
