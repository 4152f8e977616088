use std::io::Write;

use h5refs::reference::{InitSummary, ReferenceRecord, SENTINEL, describe, describe_full, describe_object, describe_region};

use crate::cmd::Result;

/// Print a value as pretty JSON followed by a newline.
pub(crate) fn emit_json<T: serde::Serialize>(value: &T) -> Result<()> {
	let mut stdout = std::io::stdout().lock();
	serde_json::to_writer_pretty(&mut stdout, value)?;
	writeln!(stdout).map_err(serde_json::Error::io)?;
	Ok(())
}

/// JSON form of one resolved record.
#[derive(Debug, serde::Serialize)]
pub(crate) struct RecordJson {
	pub(crate) index: usize,
	pub(crate) token: String,
	pub(crate) flavor: &'static str,
	pub(crate) target_kind: &'static str,
	pub(crate) region_kind: &'static str,
	pub(crate) file_full_path: String,
	pub(crate) file_name: String,
	pub(crate) object_name: String,
	pub(crate) attribute_name: String,
	pub(crate) region_tag: String,
	pub(crate) region_description: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub(crate) attribute_rank: Option<usize>,
	pub(crate) describe: String,
	pub(crate) describe_object: String,
	pub(crate) describe_full: String,
	pub(crate) describe_region: String,
}

impl RecordJson {
	pub(crate) fn new(index: usize, record: &ReferenceRecord) -> Self {
		let [file_full_path, file_name, object_name, attribute_name, region_tag, region_description] = record.display_fields().map(str::to_owned);
		Self {
			index,
			token: record.token.to_hex(),
			flavor: record.flavor.as_str(),
			target_kind: record.target_kind.as_str(),
			region_kind: record.region_kind.as_str(),
			file_full_path,
			file_name,
			object_name,
			attribute_name,
			region_tag,
			region_description,
			attribute_rank: record.attribute_rank,
			describe: describe(record),
			describe_object: describe_object(record),
			describe_full: describe_full(record),
			describe_region: describe_region(record),
		}
	}
}

/// JSON form of an initialization summary.
#[derive(Debug, serde::Serialize)]
pub(crate) struct SummaryJson {
	pub(crate) records: usize,
	pub(crate) null_tokens: usize,
	pub(crate) unknown: usize,
	pub(crate) degraded_fields: usize,
	pub(crate) provider_failures: usize,
	pub(crate) released: usize,
	pub(crate) mixed_family: usize,
	pub(crate) provider_unavailable: bool,
}

impl From<&InitSummary> for SummaryJson {
	fn from(value: &InitSummary) -> Self {
		Self {
			records: value.records,
			null_tokens: value.null_tokens,
			unknown: value.unknown,
			degraded_fields: value.degraded_fields,
			provider_failures: value.provider_failures,
			released: value.released,
			mixed_family: value.mixed_family,
			provider_unavailable: value.provider_unavailable,
		}
	}
}

/// Render an optional rank for tab-separated output.
pub(crate) fn rank_text(rank: Option<usize>) -> String {
	rank.map_or_else(|| SENTINEL.to_owned(), |rank| rank.to_string())
}
