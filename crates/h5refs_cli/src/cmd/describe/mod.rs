use std::path::PathBuf;

use h5refs::reference::{describe, or_sentinel};

use crate::cmd::Result;
use crate::cmd::dump::{RegionArgs, resolve};
use crate::cmd::util::{RecordJson, SummaryJson, emit_json, rank_text};

#[derive(clap::Args)]
pub struct Args {
	pub file: PathBuf,
	#[command(flatten)]
	pub region: RegionArgs,
	#[arg(long)]
	pub limit: Option<usize>,
	#[arg(long)]
	pub json: bool,
}

/// Resolve a dump and print every record with its summary.
pub fn run(args: Args) -> Result<()> {
	let Args {
		file: path,
		region,
		limit,
		json,
	} = args;

	let resolved = resolve(&path, &region.init_options())?;
	let registry = &resolved.registry;
	let shown = limit.unwrap_or(usize::MAX).min(registry.records().len());
	let records = &registry.records()[..shown];

	if json {
		let payload = DescribeJson {
			path: resolved.path.display().to_string(),
			family: registry.family().as_str(),
			token_size: registry.token_size(),
			capacity: registry.size(),
			summary: SummaryJson::from(&resolved.summary),
			records: records.iter().enumerate().map(|(index, record)| RecordJson::new(index, record)).collect(),
		};
		return emit_json(&payload);
	}

	let summary = &resolved.summary;
	println!("path: {}", resolved.path.display());
	println!("family: {}", registry.family().as_str());
	println!("token_size: {}", registry.token_size());
	println!("records: {}", summary.records);
	println!("null_tokens: {}", summary.null_tokens);
	println!("unknown: {}", summary.unknown);
	println!("degraded_fields: {}", summary.degraded_fields);
	println!("provider_failures: {}", summary.provider_failures);
	println!("released: {}", summary.released);
	if summary.mixed_family > 0 {
		println!("mixed_family: {}", summary.mixed_family);
	}
	if summary.provider_unavailable {
		println!("provider_unavailable: true");
	}
	println!();
	println!("index\ttoken\tflavor\tregion\ttag\tattr_rank\tdescription");
	for (index, record) in records.iter().enumerate() {
		println!(
			"{}\t{}\t{}\t{}\t{}\t{}\t{}",
			index,
			record.token,
			record.flavor.as_str(),
			record.region_kind.as_str(),
			or_sentinel(record.region_tag),
			rank_text(record.attribute_rank),
			describe(record)
		);
	}
	if shown < registry.records().len() {
		println!("... {} more", registry.records().len() - shown);
	}

	Ok(())
}

#[derive(serde::Serialize)]
struct DescribeJson {
	path: String,
	family: &'static str,
	token_size: usize,
	capacity: usize,
	summary: SummaryJson,
	records: Vec<RecordJson>,
}
