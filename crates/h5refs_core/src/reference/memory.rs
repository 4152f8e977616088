use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::reference::{
	FileId, Handle, HandleKind, ProviderError, ProviderOp, ProviderResult, ReferenceFlavor, ReferenceToken, ResolutionProvider, SelectionKind, TargetKind,
};

/// Selection geometry stored for one in-memory target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryRegion {
	/// Point selection; `coords` holds `rank` values per point.
	Points {
		/// Dataspace dimensionality.
		rank: usize,
		/// Flattened point coordinates.
		coords: Vec<u64>,
	},
	/// Block selection; `corners` holds start then end corner per block.
	Blocks {
		/// Dataspace dimensionality.
		rank: usize,
		/// Flattened block corners.
		corners: Vec<u64>,
	},
	/// Selection of any other kind.
	Other {
		/// Dataspace dimensionality.
		rank: usize,
	},
}

impl MemoryRegion {
	fn selection_kind(&self) -> SelectionKind {
		match self {
			Self::Points { .. } => SelectionKind::Points,
			Self::Blocks { .. } => SelectionKind::Blocks,
			Self::Other { .. } => SelectionKind::Other,
		}
	}

	fn rank(&self) -> usize {
		match self {
			Self::Points { rank, .. } | Self::Blocks { rank, .. } | Self::Other { rank } => *rank,
		}
	}
}

/// What an in-memory provider knows about one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryTarget {
	/// Flavor answered by `classify`.
	pub flavor: ReferenceFlavor,
	/// Full file path answered by `file_path`.
	pub file_path: Option<String>,
	/// Object path answered by `object_name`.
	pub object_name: Option<String>,
	/// Attribute name answered by `attribute_name`.
	pub attribute_name: Option<String>,
	/// Kind answered by `target_kind` and `object_kind`.
	pub target_kind: TargetKind,
	/// Selection reachable through `open_region`.
	pub region: Option<MemoryRegion>,
	/// Value-space rank reachable through `open_attribute`.
	pub attribute_rank: Option<usize>,
	/// Operations that fail for this token.
	pub failing: HashSet<ProviderOp>,
}

impl MemoryTarget {
	/// Target with the given flavor and nothing else resolvable.
	pub fn new(flavor: ReferenceFlavor) -> Self {
		Self {
			flavor,
			file_path: None,
			object_name: None,
			attribute_name: None,
			target_kind: TargetKind::Unknown,
			region: None,
			attribute_rank: None,
			failing: HashSet::new(),
		}
	}

	/// Set the full file path.
	pub fn with_file_path(mut self, path: impl Into<String>) -> Self {
		self.file_path = Some(path.into());
		self
	}

	/// Set the object path.
	pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
		self.object_name = Some(name.into());
		self
	}

	/// Set the attribute name.
	pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
		self.attribute_name = Some(name.into());
		self
	}

	/// Set the target kind.
	pub fn with_target_kind(mut self, kind: TargetKind) -> Self {
		self.target_kind = kind;
		self
	}

	/// Attach a point selection.
	pub fn with_points(self, rank: usize, coords: Vec<u64>) -> Self {
		self.with_region(MemoryRegion::Points { rank, coords })
	}

	/// Attach a block selection.
	pub fn with_blocks(self, rank: usize, corners: Vec<u64>) -> Self {
		self.with_region(MemoryRegion::Blocks { rank, corners })
	}

	/// Attach any selection.
	pub fn with_region(mut self, region: MemoryRegion) -> Self {
		self.region = Some(region);
		self
	}

	/// Make the target an openable attribute with the given value-space rank.
	pub fn with_attribute_rank(mut self, rank: usize) -> Self {
		self.attribute_rank = Some(rank);
		self
	}

	/// Make `op` fail for this token.
	pub fn failing(mut self, op: ProviderOp) -> Self {
		self.failing.insert(op);
		self
	}
}

#[derive(Debug, Clone)]
struct OpenEntry {
	kind: HandleKind,
	token: Box<[u8]>,
}

#[derive(Debug, Default)]
struct MemoryState {
	next_handle: u64,
	open: HashMap<u64, OpenEntry>,
	released: HashSet<Box<[u8]>>,
	calls: Vec<ProviderOp>,
}

/// Table-driven [`ResolutionProvider`] that tracks open handles and released tokens.
#[derive(Debug, Default)]
pub struct MemoryProvider {
	file: FileId,
	targets: HashMap<Box<[u8]>, MemoryTarget>,
	unavailable: Cell<bool>,
	state: RefCell<MemoryState>,
}

impl MemoryProvider {
	/// Empty provider owning the default file context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Change the file context this provider answers for.
	pub fn with_file(mut self, file: FileId) -> Self {
		self.file = file;
		self
	}

	/// Register `target` under the raw `token` bytes.
	pub fn insert(&mut self, token: impl AsRef<[u8]>, target: MemoryTarget) {
		self.targets.insert(Box::from(token.as_ref()), target);
	}

	/// Builder form of [`MemoryProvider::insert`].
	pub fn with_target(mut self, token: impl AsRef<[u8]>, target: MemoryTarget) -> Self {
		self.insert(token, target);
		self
	}

	/// File context this provider answers for.
	pub fn file(&self) -> FileId {
		self.file
	}

	/// Make every later call (except `close`) fail with [`ProviderError::Unavailable`].
	pub fn set_unavailable(&self, unavailable: bool) {
		self.unavailable.set(unavailable);
	}

	/// Number of handles opened and not yet closed.
	pub fn open_handles(&self) -> usize {
		self.state.borrow().open.len()
	}

	/// Number of distinct released tokens.
	pub fn released_count(&self) -> usize {
		self.state.borrow().released.len()
	}

	/// Return whether `token` has been released.
	pub fn is_released(&self, token: &[u8]) -> bool {
		self.state.borrow().released.contains(token)
	}

	/// Every operation invoked so far, in call order.
	pub fn calls(&self) -> Vec<ProviderOp> {
		self.state.borrow().calls.clone()
	}

	/// Number of times `op` was invoked.
	pub fn call_count(&self, op: ProviderOp) -> usize {
		self.state.borrow().calls.iter().filter(|item| **item == op).count()
	}

	fn enter(&self, op: ProviderOp) -> ProviderResult<()> {
		self.state.borrow_mut().calls.push(op);
		if self.unavailable.get() {
			return Err(ProviderError::Unavailable);
		}
		Ok(())
	}

	fn check(op: ProviderOp, target: &MemoryTarget) -> ProviderResult<()> {
		if target.failing.contains(&op) {
			return Err(ProviderError::Failed {
				op,
				reason: "injected failure".to_owned(),
			});
		}
		Ok(())
	}

	fn target(&self, op: ProviderOp, file: FileId, token: &ReferenceToken) -> ProviderResult<&MemoryTarget> {
		self.enter(op)?;
		if file != self.file {
			return Err(ProviderError::InvalidFile { file: file.0 });
		}
		if self.is_released(token.as_bytes()) {
			return Err(ProviderError::Released);
		}

		let target = self.targets.get(token.as_bytes()).ok_or(ProviderError::UnknownToken)?;
		Self::check(op, target)?;
		Ok(target)
	}

	fn handle_target(&self, op: ProviderOp, handle: Handle, kinds: &[HandleKind]) -> ProviderResult<(HandleKind, &MemoryTarget)> {
		self.enter(op)?;
		let invalid = ProviderError::InvalidHandle {
			kind: handle.kind,
			id: handle.id,
		};

		let entry = self.state.borrow().open.get(&handle.id).cloned().ok_or(invalid.clone())?;
		if entry.kind != handle.kind || !kinds.contains(&entry.kind) {
			return Err(invalid);
		}

		let target = self.targets.get(&entry.token).ok_or(ProviderError::UnknownToken)?;
		Self::check(op, target)?;
		Ok((entry.kind, target))
	}

	fn open(&self, kind: HandleKind, token: &ReferenceToken) -> Handle {
		let mut state = self.state.borrow_mut();
		state.next_handle += 1;
		let id = state.next_handle;
		state.open.insert(
			id,
			OpenEntry {
				kind,
				token: Box::from(token.as_bytes()),
			},
		);
		Handle { kind, id }
	}

	fn region_of(op: ProviderOp, target: &MemoryTarget) -> ProviderResult<&MemoryRegion> {
		target.region.as_ref().ok_or(ProviderError::Unsupported { op })
	}
}

fn page(values: &[u64], stride: usize, offset: u64, count: u64, op: ProviderOp) -> ProviderResult<Vec<u64>> {
	let out_of_range = || ProviderError::Failed {
		op,
		reason: format!("range {offset}+{count} out of bounds"),
	};
	let start = usize::try_from(offset).ok().and_then(|item| item.checked_mul(stride)).ok_or_else(out_of_range)?;
	let len = usize::try_from(count).ok().and_then(|item| item.checked_mul(stride)).ok_or_else(out_of_range)?;
	let end = start.checked_add(len).ok_or_else(out_of_range)?;
	values.get(start..end).map(<[u64]>::to_vec).ok_or_else(out_of_range)
}

fn item_count(values: &[u64], stride: usize, op: ProviderOp) -> ProviderResult<u64> {
	match values.len().checked_div(stride) {
		Some(count) if values.len() % stride == 0 => Ok(count as u64),
		_ => Err(ProviderError::Failed {
			op,
			reason: format!("{} values do not split into items of {stride}", values.len()),
		}),
	}
}

impl ResolutionProvider for MemoryProvider {
	fn classify(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<ReferenceFlavor> {
		Ok(self.target(ProviderOp::Classify, file, token)?.flavor)
	}

	fn file_path(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
		let op = ProviderOp::FilePath;
		self.target(op, file, token)?.file_path.clone().ok_or(ProviderError::Unsupported { op })
	}

	fn target_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<TargetKind> {
		Ok(self.target(ProviderOp::TargetKind, file, token)?.target_kind)
	}

	fn dereference_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
		self.target(ProviderOp::Dereference, file, token)?;
		Ok(self.open(HandleKind::Object, token))
	}

	fn open_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
		self.target(ProviderOp::OpenObject, file, token)?;
		Ok(self.open(HandleKind::Object, token))
	}

	fn object_kind(&self, object: Handle) -> ProviderResult<TargetKind> {
		let (_, target) = self.handle_target(ProviderOp::ObjectKind, object, &[HandleKind::Object])?;
		Ok(target.target_kind)
	}

	fn open_region(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
		let op = ProviderOp::OpenRegion;
		Self::region_of(op, self.target(op, file, token)?)?;
		Ok(self.open(HandleKind::Region, token))
	}

	fn legacy_selection_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<SelectionKind> {
		let op = ProviderOp::LegacySelectionKind;
		Ok(Self::region_of(op, self.target(op, file, token)?)?.selection_kind())
	}

	fn open_attribute(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
		let op = ProviderOp::OpenAttribute;
		if self.target(op, file, token)?.attribute_rank.is_none() {
			return Err(ProviderError::Unsupported { op });
		}
		Ok(self.open(HandleKind::Attribute, token))
	}

	fn attribute_space(&self, attribute: Handle) -> ProviderResult<Handle> {
		self.handle_target(ProviderOp::AttributeSpace, attribute, &[HandleKind::Attribute])?;
		let token = self
			.state
			.borrow()
			.open
			.get(&attribute.id)
			.map(|entry| ReferenceToken::new(entry.token.clone()))
			.ok_or(ProviderError::InvalidHandle {
				kind: attribute.kind,
				id: attribute.id,
			})?;
		Ok(self.open(HandleKind::Space, &token))
	}

	fn selection_kind(&self, region: Handle) -> ProviderResult<SelectionKind> {
		let op = ProviderOp::SelectionKind;
		let (_, target) = self.handle_target(op, region, &[HandleKind::Region])?;
		Ok(Self::region_of(op, target)?.selection_kind())
	}

	fn rank(&self, space: Handle) -> ProviderResult<usize> {
		let op = ProviderOp::Rank;
		match self.handle_target(op, space, &[HandleKind::Region, HandleKind::Space])? {
			(HandleKind::Space, target) => target.attribute_rank.ok_or(ProviderError::Unsupported { op }),
			(_, target) => Ok(Self::region_of(op, target)?.rank()),
		}
	}

	fn point_count(&self, region: Handle) -> ProviderResult<u64> {
		let op = ProviderOp::PointCount;
		let (_, target) = self.handle_target(op, region, &[HandleKind::Region])?;
		match Self::region_of(op, target)? {
			MemoryRegion::Points { rank, coords } => item_count(coords, *rank, op),
			_ => Err(ProviderError::Unsupported { op }),
		}
	}

	fn block_count(&self, region: Handle) -> ProviderResult<u64> {
		let op = ProviderOp::BlockCount;
		let (_, target) = self.handle_target(op, region, &[HandleKind::Region])?;
		match Self::region_of(op, target)? {
			MemoryRegion::Blocks { rank, corners } => item_count(corners, rank.saturating_mul(2), op),
			_ => Err(ProviderError::Unsupported { op }),
		}
	}

	fn point_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>> {
		let op = ProviderOp::PointList;
		let (_, target) = self.handle_target(op, region, &[HandleKind::Region])?;
		match Self::region_of(op, target)? {
			MemoryRegion::Points { rank, coords } => page(coords, *rank, offset, count, op),
			_ => Err(ProviderError::Unsupported { op }),
		}
	}

	fn block_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>> {
		let op = ProviderOp::BlockList;
		let (_, target) = self.handle_target(op, region, &[HandleKind::Region])?;
		match Self::region_of(op, target)? {
			MemoryRegion::Blocks { rank, corners } => page(corners, rank.saturating_mul(2), offset, count, op),
			_ => Err(ProviderError::Unsupported { op }),
		}
	}

	fn object_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
		let op = ProviderOp::ObjectName;
		self.target(op, file, token)?.object_name.clone().ok_or(ProviderError::Unsupported { op })
	}

	fn attribute_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
		let op = ProviderOp::AttributeName;
		self.target(op, file, token)?.attribute_name.clone().ok_or(ProviderError::Unsupported { op })
	}

	fn close(&self, handle: Handle) -> ProviderResult<()> {
		let mut state = self.state.borrow_mut();
		state.calls.push(ProviderOp::Close);
		match state.open.remove(&handle.id) {
			Some(entry) if entry.kind == handle.kind => Ok(()),
			Some(entry) => {
				state.open.insert(handle.id, entry);
				Err(ProviderError::InvalidHandle {
					kind: handle.kind,
					id: handle.id,
				})
			}
			None => Err(ProviderError::InvalidHandle {
				kind: handle.kind,
				id: handle.id,
			}),
		}
	}

	fn release(&self, token: &ReferenceToken) -> ProviderResult<()> {
		let op = ProviderOp::Release;
		self.enter(op)?;
		if let Some(target) = self.targets.get(token.as_bytes()) {
			Self::check(op, target)?;
		}
		if !self.state.borrow_mut().released.insert(Box::from(token.as_bytes())) {
			return Err(ProviderError::Released);
		}
		Ok(())
	}
}
