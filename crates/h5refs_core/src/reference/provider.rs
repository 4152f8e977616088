use std::fmt;

use thiserror::Error;

use crate::reference::{ReferenceFlavor, ReferenceToken, SelectionKind, TargetKind};

/// Explicit file context passed into every provider call that reads file state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FileId(pub u64);

/// Kind of an open provider handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
	/// Dereferenced object (group, dataset, or datatype).
	Object,
	/// Dataspace carrying a region selection.
	Region,
	/// Opened attribute.
	Attribute,
	/// Attribute value dataspace.
	Space,
}

impl HandleKind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Object => "object",
			Self::Region => "region",
			Self::Attribute => "attribute",
			Self::Space => "space",
		}
	}
}

impl fmt::Display for HandleKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Open handle returned by a provider; must be passed back to [`ResolutionProvider::close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
	/// Handle kind.
	pub kind: HandleKind,
	/// Provider-assigned identifier.
	pub id: u64,
}

/// Provider operation names, used for logging and failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderOp {
	/// [`ResolutionProvider::classify`].
	Classify,
	/// [`ResolutionProvider::file_path`].
	FilePath,
	/// [`ResolutionProvider::target_kind`].
	TargetKind,
	/// [`ResolutionProvider::dereference_object`].
	Dereference,
	/// [`ResolutionProvider::open_object`].
	OpenObject,
	/// [`ResolutionProvider::object_kind`].
	ObjectKind,
	/// [`ResolutionProvider::open_region`].
	OpenRegion,
	/// [`ResolutionProvider::legacy_selection_kind`].
	LegacySelectionKind,
	/// [`ResolutionProvider::open_attribute`].
	OpenAttribute,
	/// [`ResolutionProvider::attribute_space`].
	AttributeSpace,
	/// [`ResolutionProvider::selection_kind`].
	SelectionKind,
	/// [`ResolutionProvider::rank`].
	Rank,
	/// [`ResolutionProvider::point_count`].
	PointCount,
	/// [`ResolutionProvider::block_count`].
	BlockCount,
	/// [`ResolutionProvider::point_list`].
	PointList,
	/// [`ResolutionProvider::block_list`].
	BlockList,
	/// [`ResolutionProvider::object_name`].
	ObjectName,
	/// [`ResolutionProvider::attribute_name`].
	AttributeName,
	/// [`ResolutionProvider::close`].
	Close,
	/// [`ResolutionProvider::release`].
	Release,
}

impl ProviderOp {
	/// Every operation, in trait order.
	pub const ALL: [ProviderOp; 20] = [
		Self::Classify,
		Self::FilePath,
		Self::TargetKind,
		Self::Dereference,
		Self::OpenObject,
		Self::ObjectKind,
		Self::OpenRegion,
		Self::LegacySelectionKind,
		Self::OpenAttribute,
		Self::AttributeSpace,
		Self::SelectionKind,
		Self::Rank,
		Self::PointCount,
		Self::BlockCount,
		Self::PointList,
		Self::BlockList,
		Self::ObjectName,
		Self::AttributeName,
		Self::Close,
		Self::Release,
	];

	/// Stable snake-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Classify => "classify",
			Self::FilePath => "file_path",
			Self::TargetKind => "target_kind",
			Self::Dereference => "dereference",
			Self::OpenObject => "open_object",
			Self::ObjectKind => "object_kind",
			Self::OpenRegion => "open_region",
			Self::LegacySelectionKind => "legacy_selection_kind",
			Self::OpenAttribute => "open_attribute",
			Self::AttributeSpace => "attribute_space",
			Self::SelectionKind => "selection_kind",
			Self::Rank => "rank",
			Self::PointCount => "point_count",
			Self::BlockCount => "block_count",
			Self::PointList => "point_list",
			Self::BlockList => "block_list",
			Self::ObjectName => "object_name",
			Self::AttributeName => "attribute_name",
			Self::Close => "close",
			Self::Release => "release",
		}
	}

	/// Parse a label produced by [`ProviderOp::as_str`].
	pub fn from_name(name: &str) -> Option<Self> {
		Self::ALL.into_iter().find(|op| op.as_str() == name)
	}
}

impl fmt::Display for ProviderOp {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Provider-side failures. These never escape the initialization pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
	/// The resolution capability cannot be reached at all.
	#[error("resolution provider unavailable")]
	Unavailable,
	/// The token was already released and cannot be resolved again.
	#[error("reference token was released")]
	Released,
	/// The token is not known to the provider.
	#[error("reference token not recognized")]
	UnknownToken,
	/// The call was made against a file context the provider does not own.
	#[error("unknown file context {file}")]
	InvalidFile {
		/// Offending file identifier.
		file: u64,
	},
	/// Handle is not open or has the wrong kind.
	#[error("invalid {kind} handle {id}")]
	InvalidHandle {
		/// Expected or reported handle kind.
		kind: HandleKind,
		/// Handle identifier.
		id: u64,
	},
	/// Operation does not apply to this reference.
	#[error("{op} is not supported for this reference")]
	Unsupported {
		/// Rejected operation.
		op: ProviderOp,
	},
	/// Operation failed inside the provider.
	#[error("{op} failed: {reason}")]
	Failed {
		/// Failing operation.
		op: ProviderOp,
		/// Provider-supplied reason.
		reason: String,
	},
}

/// Provider result alias.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// External capability that classifies, dereferences, and enumerates reference tokens.
///
/// Calls are blocking and single-threaded. Every handle returned by an
/// `open_*`/`dereference_*`/`attribute_space` call is closed exactly once
/// through [`ResolutionProvider::close`] by the caller. After
/// [`ResolutionProvider::release`] the token must not be resolved again.
pub trait ResolutionProvider {
	/// Classify a token into a flavor.
	fn classify(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<ReferenceFlavor>;

	/// Full path of the file the token points into.
	fn file_path(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String>;

	/// Kind of the referenced object, without opening it.
	fn target_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<TargetKind>;

	/// Dereference through the older entry point.
	fn dereference_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle>;

	/// Open the referenced object through the standard entry point.
	fn open_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle>;

	/// Kind of an opened object.
	fn object_kind(&self, object: Handle) -> ProviderResult<TargetKind>;

	/// Open the dataspace carrying the referenced selection.
	fn open_region(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle>;

	/// Selection kind through the older entry point, which opens and closes internally.
	fn legacy_selection_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<SelectionKind>;

	/// Open the referenced attribute.
	fn open_attribute(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle>;

	/// Open the value dataspace of an opened attribute.
	fn attribute_space(&self, attribute: Handle) -> ProviderResult<Handle>;

	/// Selection kind of an open region.
	fn selection_kind(&self, region: Handle) -> ProviderResult<SelectionKind>;

	/// Dimensionality of an open region or space.
	fn rank(&self, space: Handle) -> ProviderResult<usize>;

	/// Number of selected points.
	fn point_count(&self, region: Handle) -> ProviderResult<u64>;

	/// Number of selected blocks.
	fn block_count(&self, region: Handle) -> ProviderResult<u64>;

	/// Flattened coordinates of `count` points starting at point `offset` (`count * rank` values).
	fn point_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>>;

	/// Flattened start/end corners of `count` blocks starting at block `offset` (`count * 2 * rank` values).
	fn block_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>>;

	/// Path of the referenced object inside its file.
	fn object_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String>;

	/// Name of the referenced attribute.
	fn attribute_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String>;

	/// Close a handle.
	fn close(&self, handle: Handle) -> ProviderResult<()>;

	/// Release a token; afterwards its bytes are only an equality key.
	fn release(&self, token: &ReferenceToken) -> ProviderResult<()>;
}
