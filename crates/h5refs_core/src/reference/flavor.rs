/// Reference encoding family, fixed once per registry by its owning datatype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFamily {
	/// Standard `H5R_ref_t` references; resolved tokens are released after the pass.
	Standard,
	/// Pre-1.12 object and dataset-region references.
	Legacy,
}

impl ReferenceFamily {
	/// Return whether tokens of this family must be released after resolution.
	pub fn releases_tokens(self) -> bool {
		matches!(self, Self::Standard)
	}

	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Standard => "standard",
			Self::Legacy => "legacy",
		}
	}
}

/// Runtime classification of one reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFlavor {
	/// Null token, or not classified yet.
	None,
	/// Legacy object reference.
	ObjectLegacy,
	/// Legacy dataset-region reference.
	RegionLegacy,
	/// Standard object reference.
	ObjectStd,
	/// Standard dataset-region reference.
	RegionStd,
	/// Standard attribute reference.
	AttributeStd,
	/// Token could not be classified.
	Unknown,
}

impl ReferenceFlavor {
	/// Family this flavor belongs to, if any.
	pub fn family(self) -> Option<ReferenceFamily> {
		match self {
			Self::ObjectLegacy | Self::RegionLegacy => Some(ReferenceFamily::Legacy),
			Self::ObjectStd | Self::RegionStd | Self::AttributeStd => Some(ReferenceFamily::Standard),
			Self::None | Self::Unknown => None,
		}
	}

	/// Return whether the token names an attribute.
	pub fn is_attribute(self) -> bool {
		matches!(self, Self::AttributeStd)
	}

	/// Stable snake-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::ObjectLegacy => "object_legacy",
			Self::RegionLegacy => "region_legacy",
			Self::ObjectStd => "object_std",
			Self::RegionStd => "region_std",
			Self::AttributeStd => "attribute_std",
			Self::Unknown => "unknown",
		}
	}

	/// Parse a label produced by [`ReferenceFlavor::as_str`].
	pub fn from_name(name: &str) -> Option<Self> {
		[
			Self::None,
			Self::ObjectLegacy,
			Self::RegionLegacy,
			Self::ObjectStd,
			Self::RegionStd,
			Self::AttributeStd,
			Self::Unknown,
		]
		.into_iter()
		.find(|item| item.as_str() == name)
	}
}

/// Kind of object a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
	/// Kind not resolved.
	Unknown,
	/// Group object.
	Group,
	/// Dataset object.
	Dataset,
	/// Committed (named) datatype.
	NamedDatatype,
	/// Provider-specific object type code outside the known set.
	Other(i32),
}

impl TargetKind {
	/// Numeric object type code (`H5O_type_t` numbering).
	pub fn code(self) -> i32 {
		match self {
			Self::Unknown => -1,
			Self::Group => 0,
			Self::Dataset => 1,
			Self::NamedDatatype => 2,
			Self::Other(code) => code,
		}
	}

	/// Map an object type code back to a kind.
	pub fn from_code(code: i32) -> Self {
		match code {
			-1 => Self::Unknown,
			0 => Self::Group,
			1 => Self::Dataset,
			2 => Self::NamedDatatype,
			other => Self::Other(other),
		}
	}

	/// Region description used for object references.
	pub fn describe(self) -> String {
		match self {
			Self::Group => "GROUP".to_owned(),
			Self::Dataset => "DATASET".to_owned(),
			Self::NamedDatatype => "DATATYPE".to_owned(),
			Self::Unknown | Self::Other(_) => format!("UNKNOWN {}", self.code()),
		}
	}

	/// Stable snake-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Unknown => "unknown",
			Self::Group => "group",
			Self::Dataset => "dataset",
			Self::NamedDatatype => "named_datatype",
			Self::Other(_) => "other",
		}
	}
}

/// Geometry recorded for a resolved region reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
	/// No region (null, object, or attribute reference).
	None,
	/// Point selection.
	Point,
	/// Block (hyperslab) selection.
	Block,
	/// Selection kind could not be determined.
	Unknown,
}

impl RegionKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Point => "point",
			Self::Block => "block",
			Self::Unknown => "unknown",
		}
	}
}

/// Selection kind reported by a resolution provider for an open region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKind {
	/// Element (point) selection.
	Points,
	/// Hyperslab (block) selection.
	Blocks,
	/// Any other selection (none, all, or provider specific).
	Other,
}

impl From<SelectionKind> for RegionKind {
	fn from(value: SelectionKind) -> Self {
		match value {
			SelectionKind::Points => Self::Point,
			SelectionKind::Blocks => Self::Block,
			SelectionKind::Other => Self::Unknown,
		}
	}
}
