use crate::reference::{ReferenceRecord, ReferenceRegistry, SENTINEL};

/// Describe a record as `fileName/objectName/attributeName regionTag regionDescription`.
///
/// Absent segments are omitted along with their separators. A record with no
/// segments at all renders as [`SENTINEL`].
pub fn describe(record: &ReferenceRecord) -> String {
	let names = join_path([record.file_name.as_deref(), record.object_name.as_deref(), record.attribute_name.as_deref()], false);
	let region = join_words([record.region_tag, record.region_description.as_deref()]);
	or_sentinel_owned(join_words([non_blank(&names), non_blank(&region)]))
}

/// Describe a record as `objectName/attributeName regionDescription`.
///
/// Absolute object paths keep their leading `/`, so the root group's
/// attribute `units` renders as `/units`.
pub fn describe_object(record: &ReferenceRecord) -> String {
	let names = join_path([record.object_name.as_deref(), record.attribute_name.as_deref()], true);
	or_sentinel_owned(join_words([non_blank(&names), record.region_description.as_deref()]))
}

/// Describe a record as `fileName/objectName/attributeName regionDescription`.
pub fn describe_full(record: &ReferenceRecord) -> String {
	let names = join_path([record.file_name.as_deref(), record.object_name.as_deref(), record.attribute_name.as_deref()], false);
	or_sentinel_owned(join_words([non_blank(&names), record.region_description.as_deref()]))
}

/// Describe only the region part: `regionTag regionDescription`.
pub fn describe_region(record: &ReferenceRecord) -> String {
	or_sentinel_owned(join_words([record.region_tag, record.region_description.as_deref()]))
}

/// Look `token` up in `registry` and describe the matching record.
pub fn describe_token(registry: &ReferenceRegistry, token: &[u8]) -> Option<String> {
	registry.lookup(token).map(describe)
}

/// Describe every record in order, truncating each piece to `max_items`
/// characters when `max_items > 0`, and join the pieces with `delimiter`.
pub fn render_all(registry: &ReferenceRegistry, delimiter: &str, max_items: i64) -> String {
	let limit = usize::try_from(max_items).ok().filter(|limit| *limit > 0);

	let mut out = String::new();
	for (idx, record) in registry.records().iter().enumerate() {
		if idx > 0 {
			out.push_str(delimiter);
		}
		let text = describe(record);
		match limit {
			Some(limit) => out.push_str(truncate_chars(&text, limit)),
			None => out.push_str(&text),
		}
	}
	out
}

/// Keep at most `max_chars` characters of `value`.
pub fn truncate_chars(value: &str, max_chars: usize) -> &str {
	match value.char_indices().nth(max_chars) {
		Some((end, _)) => &value[..end],
		None => value,
	}
}

/// Join name segments with single `/` separators. With `rooted`, a leading
/// `/` on the first non-empty segment is kept.
fn join_path<const N: usize>(segments: [Option<&str>; N], rooted: bool) -> String {
	let mut out = String::new();
	for segment in segments.into_iter().flatten() {
		let trimmed = segment.trim_matches('/');
		if rooted && out.is_empty() && segment.starts_with('/') {
			out.push('/');
		}
		if trimmed.is_empty() {
			continue;
		}
		if !out.is_empty() && !out.ends_with('/') {
			out.push('/');
		}
		out.push_str(trimmed);
	}
	out
}

fn join_words<const N: usize>(words: [Option<&str>; N]) -> String {
	let mut out = String::new();
	for word in words.into_iter().flatten().map(str::trim).filter(|word| !word.is_empty()) {
		if !out.is_empty() {
			out.push(' ');
		}
		out.push_str(word);
	}
	out
}

fn non_blank(value: &str) -> Option<&str> {
	Some(value).filter(|item| !item.is_empty())
}

fn or_sentinel_owned(value: String) -> String {
	if value.is_empty() { SENTINEL.to_owned() } else { value }
}
