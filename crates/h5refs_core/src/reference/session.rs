use std::cell::Cell;

use tracing::{debug, warn};

use crate::reference::{FileId, Handle, ProviderError, ProviderOp, ProviderResult, ResolutionProvider};

/// Provider access for one initialization pass.
///
/// Every call is isolated: failures are logged and turned into `None`. The
/// first `Unavailable` answer latches, and later calls are skipped.
pub(crate) struct Session<'p, P: ResolutionProvider + ?Sized> {
	provider: &'p P,
	file: FileId,
	unavailable: Cell<bool>,
	failures: Cell<usize>,
}

impl<'p, P: ResolutionProvider + ?Sized> Session<'p, P> {
	pub(crate) fn new(provider: &'p P, file: FileId) -> Self {
		Self {
			provider,
			file,
			unavailable: Cell::new(false),
			failures: Cell::new(0),
		}
	}

	pub(crate) fn file(&self) -> FileId {
		self.file
	}

	pub(crate) fn is_unavailable(&self) -> bool {
		self.unavailable.get()
	}

	/// Number of provider calls that returned an error.
	pub(crate) fn failures(&self) -> usize {
		self.failures.get()
	}

	pub(crate) fn call<T>(&self, op: ProviderOp, f: impl FnOnce(&P) -> ProviderResult<T>) -> Option<T> {
		if self.unavailable.get() {
			return None;
		}

		match f(self.provider) {
			Ok(value) => Some(value),
			Err(ProviderError::Unavailable) => {
				warn!(%op, "resolution provider unavailable, skipping remaining provider calls");
				self.unavailable.set(true);
				self.failures.set(self.failures.get() + 1);
				None
			}
			Err(err) => {
				debug!(%op, error = %err, "provider call failed");
				self.failures.set(self.failures.get() + 1);
				None
			}
		}
	}

	/// Open a handle that is closed when the returned guard drops.
	pub(crate) fn open(&self, op: ProviderOp, f: impl FnOnce(&P) -> ProviderResult<Handle>) -> Option<OpenHandle<'_, 'p, P>> {
		let handle = self.call(op, f)?;
		Some(OpenHandle { session: self, handle })
	}
}

/// Scoped provider handle.
pub(crate) struct OpenHandle<'s, 'p, P: ResolutionProvider + ?Sized> {
	session: &'s Session<'p, P>,
	handle: Handle,
}

impl<P: ResolutionProvider + ?Sized> OpenHandle<'_, '_, P> {
	pub(crate) fn handle(&self) -> Handle {
		self.handle
	}
}

impl<P: ResolutionProvider + ?Sized> Drop for OpenHandle<'_, '_, P> {
	fn drop(&mut self) {
		if let Err(err) = self.session.provider.close(self.handle) {
			debug!(kind = %self.handle.kind, id = self.handle.id, error = %err, "provider close failed");
		}
	}
}
