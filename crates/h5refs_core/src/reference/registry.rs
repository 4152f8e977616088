use tracing::debug;

use crate::reference::classify::resolve_records;
use crate::reference::{FileId, InitOptions, InitSummary, ReferenceError, ReferenceFamily, ReferenceRecord, ResolutionProvider, Result, TokenSource};

/// Resolution state of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
	/// Records hold raw tokens only.
	Unresolved,
	/// The initialization pass has run; records are read-only.
	Resolved,
}

/// Ordered, fixed-capacity collection of reference records for one
/// reference-typed dataset or attribute.
#[derive(Debug, Clone)]
pub struct ReferenceRegistry {
	family: ReferenceFamily,
	token_size: usize,
	capacity: usize,
	records: Vec<ReferenceRecord>,
	loaded: bool,
	lifecycle: Lifecycle,
	summary: Option<InitSummary>,
}

impl ReferenceRegistry {
	/// Create an empty registry for `capacity` tokens of `token_size` bytes.
	pub fn new(family: ReferenceFamily, token_size: usize, capacity: i64) -> Result<Self> {
		if token_size == 0 {
			return Err(ReferenceError::InvalidTokenSize { size: token_size });
		}

		Ok(Self {
			family,
			token_size,
			capacity: checked_capacity(capacity)?,
			records: Vec::new(),
			loaded: false,
			lifecycle: Lifecycle::Unresolved,
			summary: None,
		})
	}

	/// Change the declared capacity before tokens are loaded.
	pub fn set_capacity(&mut self, capacity: i64) -> Result<()> {
		if self.loaded {
			return Err(ReferenceError::AlreadyLoaded { len: self.records.len() });
		}

		self.capacity = checked_capacity(capacity)?;
		Ok(())
	}

	/// Segment `source` into `capacity` tokens and store them as unresolved records.
	pub fn load(&mut self, source: TokenSource<'_>) -> Result<()> {
		if self.loaded {
			return Err(ReferenceError::AlreadyLoaded { len: self.records.len() });
		}

		let tokens = source.segment(self.token_size, self.capacity)?;
		self.records = tokens.into_iter().map(ReferenceRecord::unresolved).collect();
		self.loaded = true;
		debug!(family = self.family.as_str(), count = self.records.len(), token_size = self.token_size, "reference registry loaded");
		Ok(())
	}

	/// Run the initialization pass with default options.
	pub fn init<P: ResolutionProvider + ?Sized>(&mut self, provider: &P, file: FileId) -> Result<&InitSummary> {
		self.init_with(provider, file, &InitOptions::default())
	}

	/// Run the initialization pass once; later calls return the stored summary.
	pub fn init_with<P: ResolutionProvider + ?Sized>(&mut self, provider: &P, file: FileId, options: &InitOptions) -> Result<&InitSummary> {
		if !self.loaded {
			return Err(ReferenceError::NotLoaded);
		}

		if self.lifecycle == Lifecycle::Unresolved {
			let (records, summary) = resolve_records(provider, file, self.family, self.records.iter().map(|record| &record.token), options);
			debug!(
				records = summary.records,
				null = summary.null_tokens,
				unknown = summary.unknown,
				degraded = summary.degraded_fields,
				released = summary.released,
				"reference registry initialized"
			);
			self.records = records;
			self.summary = Some(summary);
			self.lifecycle = Lifecycle::Resolved;
		}

		self.summary.as_ref().ok_or(ReferenceError::NotLoaded)
	}

	/// Find the record whose raw token equals `token`.
	pub fn lookup(&self, token: &[u8]) -> Option<&ReferenceRecord> {
		self.lookup_index(token).map(|(_, record)| record)
	}

	/// Find the first record whose raw token equals `token`, with its position.
	pub fn lookup_index(&self, token: &[u8]) -> Option<(usize, &ReferenceRecord)> {
		if token.len() != self.token_size {
			return None;
		}
		self.records.iter().enumerate().find(|(_, record)| record.token.as_bytes() == token)
	}

	/// Discard records and reset to the unloaded, unresolved state.
	pub fn clear(&mut self) {
		self.records.clear();
		self.loaded = false;
		self.lifecycle = Lifecycle::Unresolved;
		self.summary = None;
	}

	/// Declared capacity.
	pub fn size(&self) -> usize {
		self.capacity
	}

	/// Records in arrival order.
	pub fn records(&self) -> &[ReferenceRecord] {
		&self.records
	}

	/// Return whether tokens have been loaded.
	pub fn is_loaded(&self) -> bool {
		self.loaded
	}

	/// Return whether the initialization pass has run.
	pub fn is_initialized(&self) -> bool {
		self.lifecycle == Lifecycle::Resolved
	}

	/// Current lifecycle state.
	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	/// Reference family fixed at construction.
	pub fn family(&self) -> ReferenceFamily {
		self.family
	}

	/// Token width in bytes.
	pub fn token_size(&self) -> usize {
		self.token_size
	}

	/// Summary of the initialization pass, once it has run.
	pub fn summary(&self) -> Option<&InitSummary> {
		self.summary.as_ref()
	}
}

fn checked_capacity(capacity: i64) -> Result<usize> {
	usize::try_from(capacity).map_err(|_| ReferenceError::InvalidCapacity { capacity })
}

#[cfg(test)]
mod tests;
