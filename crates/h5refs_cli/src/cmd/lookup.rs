use std::path::PathBuf;

use h5refs::reference::{ReferenceToken, describe_token};

use crate::cmd::dump::{RegionArgs, resolve};
use crate::cmd::util::{RecordJson, emit_json};
use crate::cmd::{CliError, Result};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	/// Hex token literal, optionally `0x`-prefixed.
	pub token: String,
	#[command(flatten)]
	pub region: RegionArgs,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a dump and describe the record matching one token.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file: path,
		token,
		region,
		json,
	} = args;

	let needle = ReferenceToken::from_hex(&token)?;
	let resolved = resolve(&path, &region.init_options())?;
	let registry = &resolved.registry;
	let not_found = || CliError::TokenNotFound { token: needle.to_hex() };

	if json {
		let (index, record) = registry.lookup_index(needle.as_bytes()).ok_or_else(not_found)?;
		return emit_json(&RecordJson::new(index, record));
	}

	let text = describe_token(registry, needle.as_bytes()).ok_or_else(not_found)?;
	println!("{text}");
	Ok(())
}
