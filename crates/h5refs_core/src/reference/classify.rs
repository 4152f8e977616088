use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::reference::attribute::read_attribute_rank;
use crate::reference::names::resolve_names;
use crate::reference::record::RecordBuilder;
use crate::reference::region::{RegionAccess, RegionOutcome, describe_dataset_region};
use crate::reference::session::Session;
use crate::reference::{
	ATTR_TAG, FileId, OBJ_REF_TAG, ProviderOp, ReferenceFamily, ReferenceFlavor, ReferenceRecord, ReferenceToken, RegionKind, RegionOptions, ResolutionProvider,
	TargetKind, UNKNOWN_TAG,
};

/// Options for the initialization pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
	/// Region geometry limits.
	pub region: RegionOptions,
}

/// Outcome counters of one initialization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitSummary {
	/// Records produced.
	pub records: usize,
	/// All-zero tokens skipped without provider calls.
	pub null_tokens: usize,
	/// Tokens classified as unknown or failing classification.
	pub unknown: usize,
	/// Descriptive fields that fell back to the sentinel.
	pub degraded_fields: usize,
	/// Provider calls that returned an error.
	pub provider_failures: usize,
	/// Distinct tokens released after the pass.
	pub released: usize,
	/// Tokens whose flavor belongs to the other reference family.
	pub mixed_family: usize,
	/// Whether the provider reported itself unavailable during the pass.
	pub provider_unavailable: bool,
}

/// Run classification, description, and name resolution over `tokens` in order,
/// then release standard-family tokens.
pub(crate) fn resolve_records<'t, P: ResolutionProvider + ?Sized>(
	provider: &P,
	file: FileId,
	family: ReferenceFamily,
	tokens: impl Iterator<Item = &'t ReferenceToken>,
	options: &InitOptions,
) -> (Vec<ReferenceRecord>, InitSummary) {
	let session = Session::new(provider, file);
	let mut summary = InitSummary::default();
	let mut records = Vec::new();

	for (index, token) in tokens.enumerate() {
		let record = resolve_one(&session, family, token, options, &mut summary);
		trace!(index, flavor = record.flavor.as_str(), region = record.region_kind.as_str(), "reference resolved");
		records.push(record);
	}

	if family.releases_tokens() {
		let mut seen = HashSet::new();
		for record in records.iter().filter(|item| !item.token.is_null()) {
			if !seen.insert(record.token.as_bytes()) {
				continue;
			}
			if session.call(ProviderOp::Release, |p| p.release(&record.token)).is_some() {
				summary.released += 1;
			}
		}
	}

	summary.records = records.len();
	summary.provider_failures = session.failures();
	summary.provider_unavailable = session.is_unavailable();
	(records, summary)
}

fn resolve_one<P: ResolutionProvider + ?Sized>(
	session: &Session<'_, P>,
	family: ReferenceFamily,
	token: &ReferenceToken,
	options: &InitOptions,
	summary: &mut InitSummary,
) -> ReferenceRecord {
	let mut builder = RecordBuilder::new(token.clone());
	if token.is_null() {
		summary.null_tokens += 1;
		return builder.build();
	}

	let file = session.file();
	let flavor = match session.call(ProviderOp::Classify, |p| p.classify(file, token)) {
		Some(ReferenceFlavor::None) => {
			debug!(token = %token, "provider classified a non-null token as none");
			None
		}
		other => other,
	};

	let Some(flavor) = flavor else {
		summary.unknown += 1;
		builder.flavor(ReferenceFlavor::Unknown);
		builder.region(RegionKind::Unknown, None, None);
		builder.degrade();
		resolve_names(session, ReferenceFlavor::Unknown, &mut builder);
		summary.degraded_fields += builder.degraded();
		return builder.build();
	};

	if let Some(found) = flavor.family()
		&& found != family
	{
		warn!(expected = family.as_str(), found = found.as_str(), token = %token, "reference flavor belongs to the other family");
		summary.mixed_family += 1;
	}

	builder.flavor(flavor);
	match flavor {
		ReferenceFlavor::ObjectStd => describe_object_std(session, token, options, &mut builder),
		ReferenceFlavor::ObjectLegacy => describe_object(session, token, RegionAccess::Legacy, None, &mut builder),
		ReferenceFlavor::RegionStd => describe_region(session, token, RegionAccess::Standard, options, &mut builder),
		ReferenceFlavor::RegionLegacy => describe_region(session, token, RegionAccess::Legacy, options, &mut builder),
		ReferenceFlavor::AttributeStd => describe_attribute(session, token, &mut builder),
		ReferenceFlavor::Unknown | ReferenceFlavor::None => {
			summary.unknown += 1;
			builder.region(RegionKind::Unknown, Some(UNKNOWN_TAG), None);
		}
	}

	resolve_names(session, flavor, &mut builder);
	summary.degraded_fields += builder.degraded();
	builder.build()
}

fn describe_object_std<P: ResolutionProvider + ?Sized>(session: &Session<'_, P>, token: &ReferenceToken, options: &InitOptions, builder: &mut RecordBuilder) {
	let file = session.file();
	let target = session.call(ProviderOp::TargetKind, |p| p.target_kind(file, token));
	if target != Some(TargetKind::Dataset) {
		describe_object(session, token, RegionAccess::Standard, target, builder);
		return;
	}

	// Plain object references to datasets carry no selection.
	match describe_dataset_region(session, token, RegionAccess::Standard, &options.region) {
		Some(outcome) => apply_region(builder, outcome),
		None => {
			builder.target_kind(TargetKind::Dataset);
			builder.region(RegionKind::None, Some(OBJ_REF_TAG), Some(TargetKind::Dataset.describe()));
		}
	}
}

fn describe_object<P: ResolutionProvider + ?Sized>(
	session: &Session<'_, P>,
	token: &ReferenceToken,
	access: RegionAccess,
	known: Option<TargetKind>,
	builder: &mut RecordBuilder,
) {
	let file = session.file();
	let object = match access {
		RegionAccess::Standard => session.open(ProviderOp::OpenObject, |p| p.open_object(file, token)),
		RegionAccess::Legacy => session.open(ProviderOp::Dereference, |p| p.dereference_object(file, token)),
	};
	let kind = object
		.and_then(|object| session.call(ProviderOp::ObjectKind, |p| p.object_kind(object.handle())))
		.or(known);

	match kind {
		Some(kind) => {
			builder.target_kind(kind);
			builder.region(RegionKind::None, Some(OBJ_REF_TAG), Some(kind.describe()));
		}
		None => {
			builder.degrade();
			builder.region(RegionKind::None, Some(OBJ_REF_TAG), None);
		}
	}
}

fn describe_region<P: ResolutionProvider + ?Sized>(
	session: &Session<'_, P>,
	token: &ReferenceToken,
	access: RegionAccess,
	options: &InitOptions,
	builder: &mut RecordBuilder,
) {
	match describe_dataset_region(session, token, access, &options.region) {
		Some(outcome) => apply_region(builder, outcome),
		None => {
			builder.degrade();
			builder.region(RegionKind::Unknown, None, None);
		}
	}
}

fn apply_region(builder: &mut RecordBuilder, outcome: RegionOutcome) {
	if outcome.description.is_none() {
		builder.degrade();
	}
	builder.target_kind(TargetKind::Dataset);
	let tag = outcome.tag();
	builder.region(outcome.kind, tag, outcome.description);
}

fn describe_attribute<P: ResolutionProvider + ?Sized>(session: &Session<'_, P>, token: &ReferenceToken, builder: &mut RecordBuilder) {
	let rank = read_attribute_rank(session, token);
	if rank.is_none() {
		builder.degrade();
	}
	builder.attribute_rank(rank);
	builder.region(RegionKind::None, Some(ATTR_TAG), None);
}
