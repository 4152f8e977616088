use tracing::{debug, trace};

use crate::reference::session::Session;
use crate::reference::{BLOCK_TAG, Handle, POINT_TAG, ProviderOp, REGION_UNKNOWN_TAG, ReferenceToken, RegionKind, ResolutionProvider, SelectionKind};

/// Runtime limits for region geometry enumeration.
#[derive(Debug, Clone, Copy)]
pub struct RegionOptions {
	/// Maximum number of coordinate values fetched for one region.
	pub max_elements: usize,
	/// Number of points or blocks requested per provider call.
	pub page_len: u64,
}

impl Default for RegionOptions {
	fn default() -> Self {
		Self {
			max_elements: 1 << 20,
			page_len: 4096,
		}
	}
}

/// Provider entry points used to reach a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RegionAccess {
	/// `open_object` + `selection_kind` on the open region.
	Standard,
	/// `dereference_object` + `legacy_selection_kind` on the token.
	Legacy,
}

/// Result of describing a region whose dataspace could be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RegionOutcome {
	pub(crate) kind: RegionKind,
	pub(crate) description: Option<String>,
}

impl RegionOutcome {
	pub(crate) fn tag(&self) -> Option<&'static str> {
		match self.kind {
			RegionKind::Point => Some(POINT_TAG),
			RegionKind::Block => Some(BLOCK_TAG),
			RegionKind::Unknown => Some(REGION_UNKNOWN_TAG),
			RegionKind::None => None,
		}
	}
}

/// Open a referenced dataset region and render its selection.
///
/// Returns `None` when the object or its region cannot be opened. Once the
/// region is open, later failures only clear the description.
pub(crate) fn describe_dataset_region<P: ResolutionProvider + ?Sized>(
	session: &Session<'_, P>,
	token: &ReferenceToken,
	access: RegionAccess,
	options: &RegionOptions,
) -> Option<RegionOutcome> {
	let file = session.file();
	let _object = match access {
		RegionAccess::Standard => session.open(ProviderOp::OpenObject, |p| p.open_object(file, token))?,
		RegionAccess::Legacy => session.open(ProviderOp::Dereference, |p| p.dereference_object(file, token))?,
	};
	let region = session.open(ProviderOp::OpenRegion, |p| p.open_region(file, token))?;

	let selection = match access {
		RegionAccess::Standard => session.call(ProviderOp::SelectionKind, |p| p.selection_kind(region.handle())),
		RegionAccess::Legacy => session.call(ProviderOp::LegacySelectionKind, |p| p.legacy_selection_kind(file, token)),
	};
	let Some(selection) = selection else {
		return Some(RegionOutcome {
			kind: RegionKind::Unknown,
			description: None,
		});
	};

	let description = match selection {
		SelectionKind::Points => enumerate(session, region.handle(), Geometry::Points, options),
		SelectionKind::Blocks => enumerate(session, region.handle(), Geometry::Blocks, options),
		SelectionKind::Other => None,
	};
	trace!(selection = ?selection, described = description.is_some(), "region described");

	Some(RegionOutcome {
		kind: selection.into(),
		description,
	})
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Geometry {
	Points,
	Blocks,
}

impl Geometry {
	/// Coordinate tuples per item.
	fn corners(self) -> usize {
		match self {
			Self::Points => 1,
			Self::Blocks => 2,
		}
	}
}

fn enumerate<P: ResolutionProvider + ?Sized>(session: &Session<'_, P>, region: Handle, geometry: Geometry, options: &RegionOptions) -> Option<String> {
	let rank = session.call(ProviderOp::Rank, |p| p.rank(region))?;
	if rank == 0 {
		debug!("region reports rank 0, skipping geometry");
		return None;
	}
	let count = match geometry {
		Geometry::Points => session.call(ProviderOp::PointCount, |p| p.point_count(region))?,
		Geometry::Blocks => session.call(ProviderOp::BlockCount, |p| p.block_count(region))?,
	};

	let values = fetch_pages(session, region, geometry, count, rank, options)?;
	match geometry {
		Geometry::Points => format_points(&values, rank),
		Geometry::Blocks => format_blocks(&values, rank),
	}
}

fn fetch_pages<P: ResolutionProvider + ?Sized>(
	session: &Session<'_, P>,
	region: Handle,
	geometry: Geometry,
	count: u64,
	rank: usize,
	options: &RegionOptions,
) -> Option<Vec<u64>> {
	let per_item = rank.checked_mul(geometry.corners()).filter(|item| *item > 0)?;
	let total = usize::try_from(count).ok()?.checked_mul(per_item)?;
	if total > options.max_elements {
		debug!(total, max = options.max_elements, "region geometry exceeds element limit");
		return None;
	}

	let page_len = options.page_len.max(1);
	let mut values = Vec::with_capacity(total);
	let mut offset = 0_u64;
	while offset < count {
		let len = page_len.min(count - offset);
		let page = match geometry {
			Geometry::Points => session.call(ProviderOp::PointList, |p| p.point_list(region, offset, len))?,
			Geometry::Blocks => session.call(ProviderOp::BlockList, |p| p.block_list(region, offset, len))?,
		};

		let expected = usize::try_from(len).ok()?.checked_mul(per_item)?;
		if page.len() != expected {
			debug!(expected, got = page.len(), offset, "provider returned a malformed geometry page");
			return None;
		}

		values.extend_from_slice(&page);
		offset += len;
	}

	Some(values)
}

/// Render a flattened point list as `{ (c0,c1) (c0,c1) }`.
///
/// Returns `None` when `rank` is zero or does not divide the coordinate count.
pub fn format_points(coords: &[u64], rank: usize) -> Option<String> {
	if rank == 0 || coords.len() % rank != 0 {
		return None;
	}

	let mut out = String::from("{ ");
	for (idx, point) in coords.chunks(rank).enumerate() {
		if idx > 0 {
			out.push(' ');
		}
		push_tuple(&mut out, point);
	}
	out.push_str(" }");
	Some(out)
}

/// Render a flattened block list (start corner, then end corner) as `{ (s0,s1)-(e0,e1) }`.
///
/// Returns `None` when `rank` is zero or `2 * rank` does not divide the value count.
pub fn format_blocks(corners: &[u64], rank: usize) -> Option<String> {
	let stride = rank.checked_mul(2)?;
	if rank == 0 || corners.len() % stride != 0 {
		return None;
	}

	let mut out = String::from("{ ");
	for (idx, block) in corners.chunks(stride).enumerate() {
		if idx > 0 {
			out.push(' ');
		}
		let (start, end) = block.split_at(rank);
		push_tuple(&mut out, start);
		out.push('-');
		push_tuple(&mut out, end);
	}
	out.push_str(" }");
	Some(out)
}

fn push_tuple(out: &mut String, values: &[u64]) {
	out.push('(');
	for (idx, value) in values.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}
	out.push(')');
}

#[cfg(test)]
mod tests;
