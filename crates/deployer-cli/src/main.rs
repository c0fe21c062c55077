//! Main binary entry point for the contract deployer.
//!
//! Parses arguments, sets up logging and dispatches to the command handlers.
//! This is the only place that turns a failure into a process exit status.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::{Cli, Commands};
use output::Display;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
	// Load environment variables from .env file if it exists
	let _ = dotenvy::dotenv();

	let cli = Cli::parse();
	init_logging(cli.debug);

	exit_code(run(cli).await)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	match cli.command {
		Commands::Deploy { contract, network } => {
			let address = commands::deploy(&cli.config, &contract, network.as_deref()).await?;
			Display::deployed(&contract, address);
			Ok(())
		},
		Commands::Artifacts => commands::artifacts(&cli.config).await,
	}
}

/// Reports a failed command on stderr and maps the outcome to an exit status.
fn exit_code(result: anyhow::Result<()>) -> ExitCode {
	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			Display::error(&format!("{:#}", e));
			ExitCode::FAILURE
		},
	}
}

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` takes precedence; otherwise the deployer crates log at info
/// (debug with `--debug`) and everything else at warn.
fn init_logging(debug: bool) {
	use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let default_filter = if debug {
		"deployer=debug,deployer_core=debug,deployer_delivery=debug,deployer_artifacts=debug,warn"
	} else {
		"deployer=info,deployer_core=info,deployer_delivery=info,warn"
	};
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::registry()
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(true)
				.with_thread_ids(false)
				.with_file(false)
				.with_line_number(false)
				.compact(),
		)
		.with(env_filter)
		.init();
}
