use std::sync::Arc;

use crate::reference::{ReferenceFlavor, ReferenceToken, RegionKind, TargetKind};

/// Placeholder rendered for any descriptive field that could not be resolved.
pub const SENTINEL: &str = "NULL";
/// Region tag for object references.
pub const OBJ_REF_TAG: &str = "OBJ_REF";
/// Region tag for attribute references.
pub const ATTR_TAG: &str = "ATTR";
/// Region tag for tokens the provider classified as unknown.
pub const UNKNOWN_TAG: &str = "UNKNOWN";
/// Region tag for point selections.
pub const POINT_TAG: &str = "REGION_TYPE POINT";
/// Region tag for block selections.
pub const BLOCK_TAG: &str = "REGION_TYPE BLOCK";
/// Region tag for selections of any other kind.
pub const REGION_UNKNOWN_TAG: &str = "REGION_TYPE UNKNOWN";

/// Render an optional descriptive field, falling back to [`SENTINEL`].
pub fn or_sentinel(value: Option<&str>) -> &str {
	value.unwrap_or(SENTINEL)
}

/// Resolved, read-only description of one reference token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
	/// Raw token bytes; stays a valid lookup key after release.
	pub token: ReferenceToken,
	/// Classified flavor.
	pub flavor: ReferenceFlavor,
	/// Kind of the referenced object when known.
	pub target_kind: TargetKind,
	/// Full path of the referenced file.
	pub file_full_path: Option<Arc<str>>,
	/// Basename of [`ReferenceRecord::file_full_path`].
	pub file_name: Option<Arc<str>>,
	/// Path of the referenced object inside its file.
	pub object_name: Option<Arc<str>>,
	/// Referenced attribute name, for attribute references.
	pub attribute_name: Option<Arc<str>>,
	/// Region geometry kind.
	pub region_kind: RegionKind,
	/// Short tag describing the reference kind (`OBJ_REF`, `REGION_TYPE POINT`, ...).
	pub region_tag: Option<&'static str>,
	/// Region text (`{ (3,4) (5,6) }`) or object kind (`DATASET`).
	pub region_description: Option<Arc<str>>,
	/// Value-space dimensionality read for attribute references.
	pub attribute_rank: Option<usize>,
}

impl ReferenceRecord {
	/// Record for a token that has not been through the initialization pass.
	pub fn unresolved(token: ReferenceToken) -> Self {
		Self {
			token,
			flavor: ReferenceFlavor::None,
			target_kind: TargetKind::Unknown,
			file_full_path: None,
			file_name: None,
			object_name: None,
			attribute_name: None,
			region_kind: RegionKind::None,
			region_tag: None,
			region_description: None,
			attribute_rank: None,
		}
	}

	/// Descriptive fields as rendered text, in declaration order:
	/// file path, file name, object, attribute, region tag, region description.
	pub fn display_fields(&self) -> [&str; 6] {
		[
			or_sentinel(self.file_full_path.as_deref()),
			or_sentinel(self.file_name.as_deref()),
			or_sentinel(self.object_name.as_deref()),
			or_sentinel(self.attribute_name.as_deref()),
			or_sentinel(self.region_tag),
			or_sentinel(self.region_description.as_deref()),
		]
	}
}

/// Per-token accumulator used during the initialization pass.
///
/// Nothing is visible outside the pass until [`RecordBuilder::build`].
#[derive(Debug)]
pub(crate) struct RecordBuilder {
	record: ReferenceRecord,
	degraded: usize,
}

impl RecordBuilder {
	pub(crate) fn new(token: ReferenceToken) -> Self {
		Self {
			record: ReferenceRecord::unresolved(token),
			degraded: 0,
		}
	}

	pub(crate) fn token(&self) -> &ReferenceToken {
		&self.record.token
	}

	pub(crate) fn flavor(&mut self, flavor: ReferenceFlavor) {
		self.record.flavor = flavor;
	}

	pub(crate) fn target_kind(&mut self, kind: TargetKind) {
		self.record.target_kind = kind;
	}

	pub(crate) fn region(&mut self, kind: RegionKind, tag: Option<&'static str>, description: Option<String>) {
		self.record.region_kind = kind;
		self.record.region_tag = tag;
		self.record.region_description = non_empty(description);
	}

	pub(crate) fn file_full_path(&mut self, value: Option<String>) {
		self.record.file_full_path = non_empty(value);
	}

	pub(crate) fn file_name(&mut self, value: Option<&str>) {
		self.record.file_name = non_empty(value.map(str::to_owned));
	}

	pub(crate) fn object_name(&mut self, value: Option<String>) {
		self.record.object_name = non_empty(value);
	}

	pub(crate) fn attribute_name(&mut self, value: Option<String>) {
		self.record.attribute_name = non_empty(value);
	}

	pub(crate) fn attribute_rank(&mut self, rank: Option<usize>) {
		self.record.attribute_rank = rank;
	}

	/// Note one field that fell back to the sentinel.
	pub(crate) fn degrade(&mut self) {
		self.degraded += 1;
	}

	pub(crate) fn degraded(&self) -> usize {
		self.degraded
	}

	pub(crate) fn build(self) -> ReferenceRecord {
		self.record
	}
}

fn non_empty(value: Option<String>) -> Option<Arc<str>> {
	value.filter(|item| !item.is_empty() && item != SENTINEL).map(Arc::<str>::from)
}
