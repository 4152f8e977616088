use std::path::{Path, PathBuf};

use h5refs::reference::{
	FileId, InitOptions, InitSummary, MemoryProvider, MemoryRegion, MemoryTarget, OBJ_REF_BUF_SIZE, ProviderOp, ReferenceFamily, ReferenceFlavor, ReferenceRegistry,
	ReferenceToken, RegionOptions, STD_REF_BUF_SIZE, TargetKind, TokenSource,
};
use serde::Deserialize;
use tracing::debug;

use crate::cmd::{CliError, Result};

/// JSON reference dump: raw tokens plus what the provider answers for each.
///
/// ```json
/// { "family": "standard", "token_size": 8, "tokens": ["0101010101010101"],
///   "targets": [{ "token": "0101010101010101", "flavor": "object_std", "target_kind": "group" }] }
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Dump {
	/// Registry family.
	pub family: DumpFamily,
	/// Token width; inferred from the first token when absent.
	#[serde(default)]
	pub token_size: Option<usize>,
	/// Declared capacity; defaults to the number of tokens.
	#[serde(default)]
	pub capacity: Option<i64>,
	/// File context the provider answers for.
	#[serde(default)]
	pub file_id: Option<u64>,
	/// Hex-encoded tokens in arrival order.
	pub tokens: Vec<String>,
	/// Provider table.
	#[serde(default)]
	pub targets: Vec<DumpTarget>,
	/// Make the provider report itself unavailable.
	#[serde(default)]
	pub unavailable: bool,
}

/// Family label in a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpFamily {
	/// Standard references.
	Standard,
	/// Legacy object and dataset-region references.
	Legacy,
}

impl From<DumpFamily> for ReferenceFamily {
	fn from(value: DumpFamily) -> Self {
		match value {
			DumpFamily::Standard => Self::Standard,
			DumpFamily::Legacy => Self::Legacy,
		}
	}
}

/// Provider answers for one token.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DumpTarget {
	/// Hex token, same width as the registry tokens.
	pub token: String,
	/// Flavor label (`object_std`, `region_legacy`, ...).
	pub flavor: String,
	/// Full file path.
	#[serde(default)]
	pub file_path: Option<String>,
	/// Object path inside the file.
	#[serde(default)]
	pub object_name: Option<String>,
	/// Attribute name.
	#[serde(default)]
	pub attribute_name: Option<String>,
	/// `group`, `dataset`, `named_datatype`, `unknown`, or a numeric type code.
	#[serde(default)]
	pub target_kind: Option<String>,
	/// Selection geometry.
	#[serde(default)]
	pub region: Option<DumpRegion>,
	/// Attribute value-space rank.
	#[serde(default)]
	pub attribute_rank: Option<usize>,
	/// Provider operations that fail for this token.
	#[serde(default)]
	pub fail: Vec<String>,
}

/// Selection geometry in a dump.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DumpRegion {
	/// Selection kind.
	pub kind: DumpRegionKind,
	/// Dataspace rank.
	pub rank: usize,
	/// Flattened point coordinates or block corners.
	#[serde(default)]
	pub coords: Vec<u64>,
}

/// Selection kind label in a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DumpRegionKind {
	/// Point selection.
	Points,
	/// Block selection.
	Blocks,
	/// Any other selection.
	Unknown,
}

/// Region limits shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RegionArgs {
	/// Upper bound on coordinates fetched for one region.
	#[arg(long = "max-elements")]
	pub max_elements: Option<usize>,
	/// Points or blocks requested per provider call.
	#[arg(long = "page-len")]
	pub page_len: Option<u64>,
}

impl RegionArgs {
	/// Overlay the flags on the default initialization options.
	pub fn init_options(&self) -> InitOptions {
		let defaults = RegionOptions::default();
		InitOptions {
			region: RegionOptions {
				max_elements: self.max_elements.unwrap_or(defaults.max_elements),
				page_len: self.page_len.unwrap_or(defaults.page_len),
			},
		}
	}
}

/// Registry resolved from a dump.
pub struct Resolved {
	/// Dump path.
	pub path: PathBuf,
	/// Initialized registry.
	pub registry: ReferenceRegistry,
	/// Summary of the initialization pass.
	pub summary: InitSummary,
}

/// Read, build, and initialize the registry described by the dump at `path`.
pub fn resolve(path: &Path, options: &InitOptions) -> Result<Resolved> {
	let dump = read_dump(path)?;
	let mut registry = dump.registry()?;
	let provider = dump.provider()?;
	let summary = registry.init_with(&provider, dump.file(), options)?.clone();
	debug!(path = %path.display(), records = summary.records, "dump resolved");

	Ok(Resolved {
		path: path.to_path_buf(),
		registry,
		summary,
	})
}

/// Read and parse a dump file.
pub fn read_dump(path: &Path) -> Result<Dump> {
	let raw = std::fs::read(path).map_err(|source| CliError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	serde_json::from_slice(&raw).map_err(|source| CliError::Parse {
		path: path.to_path_buf(),
		source,
	})
}

impl Dump {
	/// File context for provider calls.
	pub fn file(&self) -> FileId {
		FileId(self.file_id.unwrap_or_default())
	}

	/// Token width: explicit, else the first token's width, else the family default.
	pub fn token_size(&self) -> Result<usize> {
		if let Some(size) = self.token_size {
			return Ok(size);
		}

		match self.tokens.first() {
			Some(first) => Ok(ReferenceToken::from_hex(first)?.len()),
			None => Ok(match self.family {
				DumpFamily::Standard => STD_REF_BUF_SIZE,
				DumpFamily::Legacy => OBJ_REF_BUF_SIZE,
			}),
		}
	}

	/// Build and load the registry.
	pub fn registry(&self) -> Result<ReferenceRegistry> {
		let tokens = self.tokens.iter().map(|item| ReferenceToken::from_hex(item)).collect::<std::result::Result<Vec<_>, _>>()?;
		let capacity = match self.capacity {
			Some(capacity) => capacity,
			None => i64::try_from(tokens.len()).map_err(|_| invalid(format!("too many tokens: {}", tokens.len())))?,
		};

		let mut registry = ReferenceRegistry::new(self.family.into(), self.token_size()?, capacity)?;
		registry.load(TokenSource::list(&tokens))?;
		Ok(registry)
	}

	/// Build the in-memory provider from the target table.
	pub fn provider(&self) -> Result<MemoryProvider> {
		let token_size = self.token_size()?;
		let mut provider = MemoryProvider::new().with_file(self.file());
		for item in &self.targets {
			let (token, target) = item.build()?;
			if token.len() != token_size {
				return Err(invalid(format!("target token {} is {} bytes, expected {token_size}", item.token, token.len())));
			}
			provider.insert(token, target);
		}
		provider.set_unavailable(self.unavailable);
		Ok(provider)
	}
}

impl DumpTarget {
	fn build(&self) -> Result<(ReferenceToken, MemoryTarget)> {
		let token = ReferenceToken::from_hex(&self.token)?;
		let flavor = ReferenceFlavor::from_name(&self.flavor).ok_or_else(|| invalid(format!("unknown flavor {:?}", self.flavor)))?;

		let mut target = MemoryTarget::new(flavor);
		target.file_path = self.file_path.clone();
		target.object_name = self.object_name.clone();
		target.attribute_name = self.attribute_name.clone();
		target.attribute_rank = self.attribute_rank;
		if let Some(kind) = &self.target_kind {
			target.target_kind = parse_target_kind(kind)?;
		}
		if let Some(region) = &self.region {
			target.region = Some(region.build());
		}
		for name in &self.fail {
			let op = ProviderOp::from_name(name).ok_or_else(|| invalid(format!("unknown provider operation {name:?}")))?;
			target.failing.insert(op);
		}

		Ok((token, target))
	}
}

impl DumpRegion {
	fn build(&self) -> MemoryRegion {
		match self.kind {
			DumpRegionKind::Points => MemoryRegion::Points {
				rank: self.rank,
				coords: self.coords.clone(),
			},
			DumpRegionKind::Blocks => MemoryRegion::Blocks {
				rank: self.rank,
				corners: self.coords.clone(),
			},
			DumpRegionKind::Unknown => MemoryRegion::Other { rank: self.rank },
		}
	}
}

fn parse_target_kind(value: &str) -> Result<TargetKind> {
	match value {
		"group" => Ok(TargetKind::Group),
		"dataset" => Ok(TargetKind::Dataset),
		"named_datatype" | "datatype" => Ok(TargetKind::NamedDatatype),
		"unknown" => Ok(TargetKind::Unknown),
		other => other
			.parse::<i32>()
			.map(TargetKind::from_code)
			.map_err(|_| invalid(format!("unknown target kind {other:?}"))),
	}
}

fn invalid(reason: String) -> CliError {
	CliError::InvalidDump { reason }
}
