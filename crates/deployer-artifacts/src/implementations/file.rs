//! File-system artifact store.
//!
//! Reads the JSON artifacts written by Hardhat (`artifacts/`) and Foundry (`out/`).
//! Both toolchains place one file per contract inside a directory named after
//! the source file, so `contracts/Greeter.sol/Greeter.json` describes the
//! contract `contracts/Greeter.sol:Greeter`.

use crate::{ArtifactError, ArtifactInterface, ArtifactLayout};
use alloy_json_abi::JsonAbi;
use alloy_primitives::{hex, Bytes};
use deployer_types::{without_0x_prefix, ContractArtifact};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_SUFFIX: &str = ".dbg.json";
const SOURCE_EXTENSIONS: [&str; 3] = ["sol", "vy", "yul"];

/// Location of one artifact file inside the store.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ArtifactEntry {
	/// Source directory relative to the store root, e.g. `contracts/Greeter.sol`.
	source: String,
	contract: String,
	path: PathBuf,
}

impl ArtifactEntry {
	fn fully_qualified_name(&self) -> String {
		format!("{}:{}", self.source, self.contract)
	}

	/// Foundry drops the source's parent directories from `out/`, so a
	/// qualified `src/Greeter.sol` has to match the entry `Greeter.sol`.
	fn matches_source(&self, source: &str) -> bool {
		source == self.source || source.ends_with(&format!("/{}", self.source))
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
	#[serde(default)]
	contract_name: Option<String>,
	#[serde(default)]
	source_name: Option<String>,
	abi: JsonAbi,
	bytecode: RawBytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
	Hex(String),
	Object { object: String },
}

/// Artifact store backed by a build output directory.
#[derive(Debug, Clone)]
pub struct FileArtifactStore {
	root: PathBuf,
	layout: ArtifactLayout,
}

impl FileArtifactStore {
	/// Creates a store reading artifacts below `root`.
	///
	/// The directory is not required to exist yet; lookups against a missing
	/// directory report `NotFound`.
	pub fn new(root: impl Into<PathBuf>, layout: ArtifactLayout) -> Self {
		Self {
			root: root.into(),
			layout,
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn layout(&self) -> ArtifactLayout {
		self.layout
	}

	fn entries(&self) -> Result<Vec<ArtifactEntry>, ArtifactError> {
		let mut entries = Vec::new();
		if self.root.is_dir() {
			collect_entries(&self.root, &self.root, &mut entries)?;
		}
		entries.sort_by_key(|entry| entry.fully_qualified_name());
		Ok(entries)
	}

	fn find(&self, name: &str) -> Result<ArtifactEntry, ArtifactError> {
		let (source, contract) = match name.rsplit_once(':') {
			Some((source, contract)) => (Some(source), contract),
			None => (None, name),
		};

		let mut matches: Vec<ArtifactEntry> = self
			.entries()?
			.into_iter()
			.filter(|entry| entry.contract == contract)
			.filter(|entry| source.is_none_or(|source| entry.matches_source(source)))
			.collect();

		match matches.len() {
			0 => Err(ArtifactError::NotFound {
				name: name.to_string(),
				root: self.root.clone(),
			}),
			1 => Ok(matches.remove(0)),
			_ => Err(ArtifactError::Ambiguous {
				name: name.to_string(),
				candidates: matches
					.iter()
					.map(ArtifactEntry::fully_qualified_name)
					.collect(),
			}),
		}
	}

	fn load(&self, entry: &ArtifactEntry) -> Result<ContractArtifact, ArtifactError> {
		let malformed = |reason: String| ArtifactError::Malformed {
			path: entry.path.clone(),
			reason,
		};

		let content = std::fs::read_to_string(&entry.path)?;
		let raw: RawArtifact =
			serde_json::from_str(&content).map_err(|e| malformed(e.to_string()))?;

		let code = match (self.layout, raw.bytecode) {
			(ArtifactLayout::Foundry, RawBytecode::Hex(_)) => {
				return Err(malformed(
					"expected a Foundry `bytecode.object` field".to_string(),
				));
			},
			(ArtifactLayout::Hardhat, RawBytecode::Object { .. }) => {
				return Err(malformed(
					"expected a Hardhat hex string `bytecode` field".to_string(),
				));
			},
			(_, RawBytecode::Hex(code)) | (_, RawBytecode::Object { object: code }) => code,
		};

		let name = raw
			.contract_name
			.unwrap_or_else(|| entry.contract.clone());
		let hex_code = without_0x_prefix(code.trim());

		if hex_code.is_empty() {
			return Err(ArtifactError::NotDeployable(name));
		}
		// Link placeholders (`__$<hash>$__`) are the only non-hex characters solc emits
		if hex_code.contains('_') {
			return Err(ArtifactError::UnlinkedLibraries(name));
		}

		let bytecode = hex::decode(hex_code)
			.map(Bytes::from)
			.map_err(|e| malformed(format!("Invalid bytecode hex: {}", e)))?;

		Ok(ContractArtifact {
			name,
			source_name: Some(raw.source_name.unwrap_or_else(|| entry.source.clone())),
			abi: raw.abi,
			bytecode,
		})
	}
}

impl ArtifactInterface for FileArtifactStore {
	fn resolve(&self, name: &str) -> Result<ContractArtifact, ArtifactError> {
		let entry = self.find(name.trim())?;
		debug!(
			contract = %entry.contract,
			path = %entry.path.display(),
			layout = %self.layout,
			"Loading contract artifact"
		);
		self.load(&entry)
	}

	fn list(&self) -> Result<Vec<String>, ArtifactError> {
		let entries = self.entries()?;
		let mut names = Vec::new();

		for entry in &entries {
			match self.load(entry) {
				Ok(_) => {
					let duplicated = entries
						.iter()
						.filter(|other| other.contract == entry.contract)
						.count() > 1;
					names.push(if duplicated {
						entry.fully_qualified_name()
					} else {
						entry.contract.clone()
					});
				},
				Err(e) => {
					debug!(artifact = %entry.fully_qualified_name(), error = %e, "Skipping artifact");
				},
			}
		}

		names.sort();
		names.dedup();
		Ok(names)
	}
}

fn collect_entries(
	root: &Path,
	dir: &Path,
	entries: &mut Vec<ArtifactEntry>,
) -> Result<(), ArtifactError> {
	for dir_entry in std::fs::read_dir(dir)? {
		let path = dir_entry?.path();

		if path.is_dir() {
			if path.file_name().and_then(|n| n.to_str()) != Some(BUILD_INFO_DIR) {
				collect_entries(root, &path, entries)?;
			}
			continue;
		}

		let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
			continue;
		};
		if file_name.ends_with(DEBUG_SUFFIX) {
			continue;
		}
		let Some(contract) = file_name.strip_suffix(".json") else {
			continue;
		};
		// Foundry writes `Name.0.8.19.json` when several compiler versions are used
		if contract.contains('.') {
			continue;
		}
		let Some(source_dir) = path.parent().filter(|p| is_source_dir(p)) else {
			continue;
		};

		let source = source_dir
			.strip_prefix(root)
			.map(|p| p.to_string_lossy().replace('\\', "/"))
			.unwrap_or_default();

		entries.push(ArtifactEntry {
			source,
			contract: contract.to_string(),
			path: path.clone(),
		});
	}

	Ok(())
}

fn is_source_dir(dir: &Path) -> bool {
	dir.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use tempfile::TempDir;

	const GREETER_CODE: &str = "0x6080604052348015600f57600080fd5b50";
	const GREETER_ABI: &str = r#"[{"type":"function","name":"greet","inputs":[],"outputs":[{"name":"","type":"string","internalType":"string"}],"stateMutability":"view"}]"#;

	fn write_hardhat(root: &Path, source: &str, name: &str, bytecode: &str, abi: &str) {
		let dir = root.join(source);
		fs::create_dir_all(&dir).unwrap();
		let json = format!(
			r#"{{"_format":"hh-sol-artifact-1","contractName":"{name}","sourceName":"{source}","abi":{abi},"bytecode":"{bytecode}","deployedBytecode":"0x","linkReferences":{{}},"deployedLinkReferences":{{}}}}"#
		);
		fs::write(dir.join(format!("{name}.json")), json).unwrap();
		fs::write(
			dir.join(format!("{name}.dbg.json")),
			r#"{"_format":"hh-sol-dbg-1","buildInfo":"../../build-info/abc.json"}"#,
		)
		.unwrap();
	}

	fn write_foundry(root: &Path, file: &str, name: &str, bytecode: &str) {
		let dir = root.join(file);
		fs::create_dir_all(&dir).unwrap();
		let json = format!(
			r#"{{"abi":[],"bytecode":{{"object":"{bytecode}","sourceMap":"","linkReferences":{{}}}},"deployedBytecode":{{"object":"0x"}}}}"#
		);
		fs::write(dir.join(format!("{name}.json")), json).unwrap();
	}

	fn hardhat_store() -> (TempDir, FileArtifactStore) {
		let temp_dir = TempDir::new().unwrap();
		let root = temp_dir.path();
		write_hardhat(root, "contracts/Greeter.sol", "Greeter", GREETER_CODE, GREETER_ABI);
		write_hardhat(root, "contracts/IGreeter.sol", "IGreeter", "0x", "[]");
		write_hardhat(
			root,
			"contracts/Linked.sol",
			"Linked",
			"0x6080__$7c1b3e4c19b1c8c7e9f0a4f9c8e8b5d4a3$__6040",
			"[]",
		);
		write_hardhat(root, "contracts/a/Token.sol", "Token", "0x6001", "[]");
		write_hardhat(root, "contracts/b/Token.sol", "Token", "0x6002", "[]");
		fs::create_dir_all(root.join("build-info")).unwrap();
		fs::write(root.join("build-info/abc.json"), "{}").unwrap();

		let store = FileArtifactStore::new(root, ArtifactLayout::Hardhat);
		(temp_dir, store)
	}

	#[test]
	fn test_resolve_hardhat_artifact() {
		let (_dir, store) = hardhat_store();

		let artifact = store.resolve("Greeter").unwrap();

		assert_eq!(artifact.name, "Greeter");
		assert_eq!(artifact.source_name.as_deref(), Some("contracts/Greeter.sol"));
		assert_eq!(
			artifact.bytecode.to_vec(),
			hex::decode(without_0x_prefix(GREETER_CODE)).unwrap()
		);
		assert!(artifact.abi.function("greet").is_some());
	}

	#[test]
	fn test_resolve_fully_qualified_name() {
		let (_dir, store) = hardhat_store();

		let artifact = store.resolve("contracts/b/Token.sol:Token").unwrap();
		assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x02]);
		assert_eq!(artifact.source_name.as_deref(), Some("contracts/b/Token.sol"));
	}

	#[test]
	fn test_resolve_ambiguous_short_name() {
		let (_dir, store) = hardhat_store();

		match store.resolve("Token") {
			Err(ArtifactError::Ambiguous { name, candidates }) => {
				assert_eq!(name, "Token");
				assert_eq!(
					candidates,
					vec![
						"contracts/a/Token.sol:Token".to_string(),
						"contracts/b/Token.sol:Token".to_string(),
					]
				);
			},
			other => panic!("Expected Ambiguous error, got {:?}", other),
		}
	}

	#[test]
	fn test_resolve_missing_artifact() {
		let (_dir, store) = hardhat_store();

		let err = store.resolve("Missing").unwrap_err();
		assert!(err.is_not_found());
		assert!(err.to_string().contains("\"Missing\""));

		let err = store.resolve("contracts/Other.sol:Greeter").unwrap_err();
		assert!(err.is_not_found());
	}

	#[test]
	fn test_resolve_missing_root() {
		let store = FileArtifactStore::new("/nonexistent/artifacts", ArtifactLayout::Auto);

		assert!(store.resolve("Greeter").unwrap_err().is_not_found());
		assert!(store.list().unwrap().is_empty());
	}

	#[test]
	fn test_resolve_abstract_contract() {
		let (_dir, store) = hardhat_store();

		let err = store.resolve("IGreeter").unwrap_err();
		assert!(matches!(err, ArtifactError::NotDeployable(ref name) if name == "IGreeter"));
		assert!(!err.is_not_found());
	}

	#[test]
	fn test_resolve_unlinked_libraries() {
		let (_dir, store) = hardhat_store();

		let err = store.resolve("Linked").unwrap_err();
		assert!(matches!(err, ArtifactError::UnlinkedLibraries(ref name) if name == "Linked"));
	}

	#[test]
	fn test_resolve_malformed_json() {
		let temp_dir = TempDir::new().unwrap();
		let dir = temp_dir.path().join("Broken.sol");
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("Broken.json"), "{ not json").unwrap();

		let store = FileArtifactStore::new(temp_dir.path(), ArtifactLayout::Auto);
		let err = store.resolve("Broken").unwrap_err();
		assert!(matches!(err, ArtifactError::Malformed { .. }));
	}

	#[test]
	fn test_resolve_invalid_hex() {
		let temp_dir = TempDir::new().unwrap();
		write_hardhat(temp_dir.path(), "contracts/Bad.sol", "Bad", "0x60zz", "[]");

		let store = FileArtifactStore::new(temp_dir.path(), ArtifactLayout::Auto);
		let err = store.resolve("Bad").unwrap_err();
		assert!(err.to_string().contains("Invalid bytecode hex"));
	}

	#[test]
	fn test_resolve_foundry_artifact() {
		let temp_dir = TempDir::new().unwrap();
		write_foundry(temp_dir.path(), "Counter.sol", "Counter", "0x60806040");
		write_foundry(temp_dir.path(), "Counter.sol", "Counter.0.8.19", "0x6001");

		let store = FileArtifactStore::new(temp_dir.path(), ArtifactLayout::Foundry);

		let artifact = store.resolve("Counter").unwrap();
		assert_eq!(artifact.bytecode.to_vec(), vec![0x60, 0x80, 0x60, 0x40]);
		assert_eq!(artifact.source_name.as_deref(), Some("Counter.sol"));

		// Foundry keeps only the file name of the source in `out/`
		let qualified = store.resolve("src/Counter.sol:Counter").unwrap();
		assert_eq!(qualified.bytecode, artifact.bytecode);
	}

	#[test]
	fn test_layout_mismatch() {
		let temp_dir = TempDir::new().unwrap();
		write_foundry(temp_dir.path(), "Counter.sol", "Counter", "0x6080");

		let hardhat = FileArtifactStore::new(temp_dir.path(), ArtifactLayout::Hardhat);
		assert!(matches!(
			hardhat.resolve("Counter"),
			Err(ArtifactError::Malformed { .. })
		));

		let auto = FileArtifactStore::new(temp_dir.path(), ArtifactLayout::Auto);
		assert!(auto.resolve("Counter").is_ok());
	}

	#[test]
	fn test_list_deployable_artifacts() {
		let (_dir, store) = hardhat_store();

		let names = store.list().unwrap();
		assert_eq!(
			names,
			vec![
				"Greeter".to_string(),
				"contracts/a/Token.sol:Token".to_string(),
				"contracts/b/Token.sol:Token".to_string(),
			]
		);
	}
}
