/// Per-record description command.
pub mod describe;
/// Reference dump loading.
pub mod dump;
/// CLI error type.
pub mod error;
/// Single-token lookup command.
pub mod lookup;
/// Joined rendering command.
pub mod render;
/// Shared output helpers.
pub mod util;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{CliError, Result};
