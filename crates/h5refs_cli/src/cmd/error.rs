use std::path::PathBuf;

use h5refs::reference::ReferenceError;
use thiserror::Error;

/// CLI result alias.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors surfaced by `h5refs` subcommands.
#[derive(Debug, Error)]
pub enum CliError {
	/// Registry construction, loading, or token parsing failed.
	#[error(transparent)]
	Reference(#[from] ReferenceError),
	/// Dump file could not be read.
	#[error("failed to read {path}: {source}")]
	Io {
		/// Dump path.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},
	/// Dump file is not valid JSON or does not match the dump layout.
	#[error("failed to parse {path}: {source}")]
	Parse {
		/// Dump path.
		path: PathBuf,
		/// Underlying decode error.
		#[source]
		source: serde_json::Error,
	},
	/// Dump content is well-formed JSON but semantically invalid.
	#[error("invalid dump: {reason}")]
	InvalidDump {
		/// What was wrong.
		reason: String,
	},
	/// Lookup token is not in the registry.
	#[error("token {token} not found")]
	TokenNotFound {
		/// Hex form of the requested token.
		token: String,
	},
	/// JSON output could not be written.
	#[error("failed to write json output: {0}")]
	Output(#[from] serde_json::Error),
}
