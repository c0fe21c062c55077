//! Terminal output utilities.
//!
//! Results go to stdout, diagnostics to stderr, so the deployed address can be
//! captured by scripts without filtering.

use alloy_primitives::Address;
use colored::Colorize;

/// Terminal display utilities for formatted CLI output
pub struct Display;

impl Display {
	/// Displays a formatted section header with underline
	pub fn header(text: &str) {
		println!("\n{}", text.bold().cyan());
		println!("{}", "─".repeat(text.chars().count()).cyan());
	}

	/// Displays the result line of a successful deployment
	pub fn deployed(contract: &str, address: Address) {
		println!("{}", deployed_line(contract, address));
	}

	/// Displays an error message with red X symbol to stderr
	pub fn error(message: &str) {
		eprintln!("{} {}", "✗".red().bold(), message.red());
	}

	/// Displays a warning message with yellow warning symbol to stderr
	pub fn warning(message: &str) {
		eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
	}

	/// Displays a key-value pair with formatted labels
	pub fn kv(key: &str, value: &str) {
		println!("  {} {}", format!("{}:", key).bold(), value);
	}

	/// Displays one entry of a bulleted list
	pub fn item(text: &str) {
		println!("  • {}", text);
	}
}

/// Formats the success line, with the address checksummed.
pub fn deployed_line(contract: &str, address: Address) -> String {
	format!("✅ {} deployed to: {}", contract, address.to_checksum(None))
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn test_deployed_line() {
		let line = deployed_line(
			"Greeter",
			address!("5fbdb2315678afecb367f032d93f642f64180aa3"),
		);

		assert_eq!(
			line,
			"✅ Greeter deployed to: 0x5FbDB2315678afecb367f032d93F642f64180aa3"
		);
	}
}
