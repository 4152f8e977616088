use std::path::PathBuf;

use h5refs::reference::render_all;

use crate::cmd::Result;
use crate::cmd::dump::{RegionArgs, resolve};
use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[command(flatten)]
	pub region: RegionArgs,
	#[arg(long, default_value = ", ")]
	pub delimiter: String,
	/// Characters kept per record; zero or negative keeps everything.
	#[arg(long = "max-items", default_value_t = 0, allow_negative_numbers = true)]
	pub max_items: i64,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a dump and print all record descriptions joined by a delimiter.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file: path,
		region,
		delimiter,
		max_items,
		json,
	} = args;

	let resolved = resolve(&path, &region.init_options())?;
	let text = render_all(&resolved.registry, &delimiter, max_items);

	if json {
		return emit_json(&RenderJson {
			path: resolved.path.display().to_string(),
			delimiter,
			max_items,
			text,
		});
	}

	println!("{text}");
	Ok(())
}

#[derive(serde::Serialize)]
struct RenderJson {
	path: String,
	delimiter: String,
	max_items: i64,
	text: String,
}
