use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, ReferenceError>;

/// Caller-visible errors from building and loading a reference registry.
///
/// Provider failures never show up here: the initialization pass absorbs
/// them and degrades the affected record fields instead.
#[derive(Debug, Error)]
pub enum ReferenceError {
	/// Declared capacity was negative or did not fit the platform.
	#[error("invalid declared capacity {capacity}")]
	InvalidCapacity {
		/// Rejected capacity value.
		capacity: i64,
	},
	/// Token size was zero.
	#[error("invalid reference token size {size}")]
	InvalidTokenSize {
		/// Rejected token size.
		size: usize,
	},
	/// Flat buffer held fewer bytes than `capacity * token_size`.
	#[error("reference buffer too short: need={need}, have={have}")]
	BufferTooShort {
		/// Required number of bytes.
		need: usize,
		/// Available bytes.
		have: usize,
	},
	/// Token list held fewer entries than the declared capacity.
	#[error("reference list too short: need={need}, have={have}")]
	ListTooShort {
		/// Required number of tokens.
		need: usize,
		/// Available tokens.
		have: usize,
	},
	/// One list entry was shorter than the token size.
	#[error("reference token {index} too short: need={need}, have={have}")]
	TokenTooShort {
		/// Position of the entry in the list.
		index: usize,
		/// Required number of bytes.
		need: usize,
		/// Available bytes.
		have: usize,
	},
	/// Registry already holds loaded tokens.
	#[error("registry already loaded with {len} tokens; clear it first")]
	AlreadyLoaded {
		/// Number of loaded tokens.
		len: usize,
	},
	/// Operation requires loaded tokens.
	#[error("registry not loaded")]
	NotLoaded,
	/// Hex token literal could not be parsed.
	#[error("invalid token literal: {value}")]
	InvalidTokenLiteral {
		/// User-provided literal.
		value: String,
	},
}
