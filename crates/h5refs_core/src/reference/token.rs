use std::fmt;

use crate::reference::{ReferenceError, Result};

/// Buffer size of a standard (`H5R_ref_t`) reference.
pub const STD_REF_BUF_SIZE: usize = 64;
/// Buffer size of a legacy object reference.
pub const OBJ_REF_BUF_SIZE: usize = 8;
/// Buffer size of a legacy dataset-region reference.
pub const DSET_REG_REF_BUF_SIZE: usize = 12;

/// Fixed-size opaque reference bytes as stored in a dataset or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceToken(Box<[u8]>);

impl ReferenceToken {
	/// Wrap raw token bytes.
	pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
		Self(bytes.into())
	}

	/// Return the raw token bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	/// Return the token length in bytes.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Return whether the token has no bytes.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Return whether every byte is zero.
	///
	/// Null tokens are never passed to a resolution provider.
	pub fn is_null(&self) -> bool {
		self.0.iter().all(|byte| *byte == 0)
	}

	/// Render as lowercase hex without prefix.
	pub fn to_hex(&self) -> String {
		let mut out = String::with_capacity(self.0.len() * 2);
		for byte in self.0.iter() {
			out.push(HEX_DIGITS[usize::from(byte >> 4)]);
			out.push(HEX_DIGITS[usize::from(byte & 0x0f)]);
		}
		out
	}

	/// Parse a hex literal, optionally `0x`-prefixed.
	pub fn from_hex(value: &str) -> Result<Self> {
		let digits = value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")).unwrap_or(value);
		let invalid = || ReferenceError::InvalidTokenLiteral { value: value.to_owned() };

		if digits.is_empty() || digits.len() % 2 != 0 || !digits.is_ascii() {
			return Err(invalid());
		}

		let mut out = Vec::with_capacity(digits.len() / 2);
		for pair in digits.as_bytes().chunks(2) {
			let text = std::str::from_utf8(pair).map_err(|_| invalid())?;
			let byte = u8::from_str_radix(text, 16).map_err(|_| invalid())?;
			out.push(byte);
		}
		Ok(Self::new(out))
	}
}

const HEX_DIGITS: [char; 16] = ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f'];

impl AsRef<[u8]> for ReferenceToken {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Display for ReferenceToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

/// Incoming token data for [`ReferenceRegistry::load`](crate::reference::ReferenceRegistry::load).
#[derive(Debug, Clone)]
pub enum TokenSource<'a> {
	/// One contiguous buffer of `capacity * token_size` bytes.
	Flat(&'a [u8]),
	/// One byte window per token; only the first `token_size` bytes of each are used.
	List(Vec<&'a [u8]>),
}

impl<'a> TokenSource<'a> {
	/// Borrow a contiguous buffer.
	pub fn flat(bytes: &'a [u8]) -> Self {
		Self::Flat(bytes)
	}

	/// Borrow a list of per-token byte windows.
	pub fn list<T: AsRef<[u8]>>(items: &'a [T]) -> Self {
		Self::List(items.iter().map(AsRef::as_ref).collect())
	}

	/// Cut the source into `count` tokens of `token_size` bytes each.
	pub(crate) fn segment(&self, token_size: usize, count: usize) -> Result<Vec<ReferenceToken>> {
		match self {
			Self::Flat(bytes) => {
				let need = token_size.checked_mul(count).ok_or(ReferenceError::BufferTooShort {
					need: usize::MAX,
					have: bytes.len(),
				})?;
				if bytes.len() < need {
					return Err(ReferenceError::BufferTooShort { need, have: bytes.len() });
				}

				Ok(bytes[..need].chunks(token_size).map(ReferenceToken::new).collect())
			}
			Self::List(items) => {
				if items.len() < count {
					return Err(ReferenceError::ListTooShort {
						need: count,
						have: items.len(),
					});
				}

				let mut out = Vec::with_capacity(count);
				for (index, item) in items.iter().take(count).enumerate() {
					let window = item.get(..token_size).ok_or(ReferenceError::TokenTooShort {
						index,
						need: token_size,
						have: item.len(),
					})?;
					out.push(ReferenceToken::new(window));
				}
				Ok(out)
			}
		}
	}
}
