//! Hex string formatting helpers.

/// Removes "0x" prefix from a hex string if present.
///
/// # Arguments
/// * `hex_str` - Hex string with or without prefix
///
/// # Returns
/// Hex string slice without the prefix
pub fn without_0x_prefix(hex_str: &str) -> &str {
	hex_str
		.strip_prefix("0x")
		.or_else(|| hex_str.strip_prefix("0X"))
		.unwrap_or(hex_str)
}
