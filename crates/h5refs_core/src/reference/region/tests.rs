mod formatting {
	use crate::reference::{format_blocks, format_points};

	#[test]
	fn points_render_as_tuples() {
		assert_eq!(format_points(&[3, 4, 5, 6], 2).as_deref(), Some("{ (3,4) (5,6) }"));
		assert_eq!(format_points(&[9], 1).as_deref(), Some("{ (9) }"));
	}

	#[test]
	fn blocks_render_as_corner_pairs() {
		assert_eq!(format_blocks(&[2, 2, 7, 7], 2).as_deref(), Some("{ (2,2)-(7,7) }"));
		assert_eq!(format_blocks(&[0, 0, 0, 1, 1, 1, 4, 4, 4, 5, 5, 5], 3).as_deref(), Some("{ (0,0,0)-(1,1,1) (4,4,4)-(5,5,5) }"));
	}

	#[test]
	fn empty_selection_keeps_braces() {
		assert_eq!(format_points(&[], 2).as_deref(), Some("{  }"));
		assert_eq!(format_blocks(&[], 2).as_deref(), Some("{  }"));
	}

	#[test]
	fn rank_mismatch_is_rejected() {
		assert_eq!(format_points(&[1, 2, 3], 2), None);
		assert_eq!(format_points(&[1, 2], 0), None);
		assert_eq!(format_blocks(&[1, 2, 3, 4, 5, 6], 2), None);
		assert_eq!(format_blocks(&[1, 2], 0), None);
	}
}

mod describer {
	use crate::reference::region::{RegionAccess, RegionOptions, describe_dataset_region};
	use crate::reference::session::Session;
	use crate::reference::{BLOCK_TAG, MemoryProvider, MemoryRegion, MemoryTarget, POINT_TAG, ProviderOp, REGION_UNKNOWN_TAG, ReferenceFlavor, ReferenceToken, RegionKind};

	fn token() -> ReferenceToken {
		ReferenceToken::new(vec![7; 12])
	}

	fn provider(target: MemoryTarget) -> MemoryProvider {
		MemoryProvider::new().with_target(token(), target)
	}

	#[test]
	fn point_region_is_described() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::RegionStd).with_points(2, vec![3, 4, 5, 6]));
		let session = Session::new(&provider, provider.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Point);
		assert_eq!(outcome.tag(), Some(POINT_TAG));
		assert_eq!(outcome.description.as_deref(), Some("{ (3,4) (5,6) }"));
		assert_eq!(provider.open_handles(), 0);
	}

	#[test]
	fn block_region_is_described() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::RegionStd).with_blocks(2, vec![2, 2, 7, 7]));
		let session = Session::new(&provider, provider.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Block);
		assert_eq!(outcome.tag(), Some(BLOCK_TAG));
		assert_eq!(outcome.description.as_deref(), Some("{ (2,2)-(7,7) }"));
	}

	#[test]
	fn legacy_access_renders_identical_text() {
		let target = MemoryTarget::new(ReferenceFlavor::RegionLegacy).with_blocks(1, vec![0, 3, 5, 9]);
		let standard = provider(target.clone());
		let legacy = provider(target);

		let std_session = Session::new(&standard, standard.file());
		let legacy_session = Session::new(&legacy, legacy.file());
		let options = RegionOptions::default();

		let std_outcome = describe_dataset_region(&std_session, &token(), RegionAccess::Standard, &options).expect("standard");
		let legacy_outcome = describe_dataset_region(&legacy_session, &token(), RegionAccess::Legacy, &options).expect("legacy");
		assert_eq!(std_outcome, legacy_outcome);
		assert_eq!(legacy.call_count(ProviderOp::Dereference), 1);
		assert_eq!(legacy.call_count(ProviderOp::LegacySelectionKind), 1);
		assert_eq!(legacy.call_count(ProviderOp::SelectionKind), 0);
		assert_eq!(legacy.open_handles(), 0);
	}

	#[test]
	fn geometry_is_fetched_in_pages() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::RegionStd).with_points(1, vec![1, 2, 3, 4, 5]));
		let session = Session::new(&provider, provider.file());
		let options = RegionOptions {
			page_len: 2,
			..RegionOptions::default()
		};

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &options).expect("region opens");
		assert_eq!(outcome.description.as_deref(), Some("{ (1) (2) (3) (4) (5) }"));
		assert_eq!(provider.call_count(ProviderOp::PointList), 3);
	}

	#[test]
	fn element_limit_clears_description() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::RegionStd).with_points(2, vec![3, 4, 5, 6]));
		let session = Session::new(&provider, provider.file());
		let options = RegionOptions {
			max_elements: 3,
			..RegionOptions::default()
		};

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &options).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Point);
		assert_eq!(outcome.description, None);
		assert_eq!(provider.call_count(ProviderOp::PointList), 0);
		assert_eq!(provider.open_handles(), 0);
	}

	#[test]
	fn failed_page_discards_partial_text() {
		let provider = provider(
			MemoryTarget::new(ReferenceFlavor::RegionStd)
				.with_points(2, vec![3, 4, 5, 6])
				.failing(ProviderOp::PointList),
		);
		let session = Session::new(&provider, provider.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Point);
		assert_eq!(outcome.description, None);
		assert_eq!(session.failures(), 1);
		assert_eq!(provider.open_handles(), 0);
	}

	#[test]
	fn other_selection_is_tagged_unknown() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::RegionStd).with_region(MemoryRegion::Other { rank: 2 }));
		let session = Session::new(&provider, provider.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Unknown);
		assert_eq!(outcome.tag(), Some(REGION_UNKNOWN_TAG));
		assert_eq!(outcome.description, None);
	}

	#[test]
	fn unopenable_region_yields_none_and_closes_object() {
		let provider = provider(MemoryTarget::new(ReferenceFlavor::ObjectStd));
		let session = Session::new(&provider, provider.file());

		assert_eq!(describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()), None);
		assert_eq!(provider.call_count(ProviderOp::OpenObject), 1);
		assert_eq!(provider.call_count(ProviderOp::Close), 1);
		assert_eq!(provider.open_handles(), 0);
	}
}

mod degenerate_rank {
	use crate::reference::region::{RegionAccess, RegionOptions, describe_dataset_region};
	use crate::reference::session::Session;
	use crate::reference::{
		FileId, Handle, MemoryProvider, MemoryTarget, ProviderOp, ProviderResult, ReferenceFlavor, ReferenceToken, RegionKind, ResolutionProvider, SelectionKind,
		TargetKind,
	};

	/// Reports rank 0 and an enormous point count for every region.
	struct ZeroRank(MemoryProvider);

	impl ResolutionProvider for ZeroRank {
		fn classify(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<ReferenceFlavor> {
			self.0.classify(file, token)
		}
		fn file_path(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
			self.0.file_path(file, token)
		}
		fn target_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<TargetKind> {
			self.0.target_kind(file, token)
		}
		fn dereference_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
			self.0.dereference_object(file, token)
		}
		fn open_object(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
			self.0.open_object(file, token)
		}
		fn object_kind(&self, object: Handle) -> ProviderResult<TargetKind> {
			self.0.object_kind(object)
		}
		fn open_region(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
			self.0.open_region(file, token)
		}
		fn legacy_selection_kind(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<SelectionKind> {
			self.0.legacy_selection_kind(file, token)
		}
		fn open_attribute(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<Handle> {
			self.0.open_attribute(file, token)
		}
		fn attribute_space(&self, attribute: Handle) -> ProviderResult<Handle> {
			self.0.attribute_space(attribute)
		}
		fn selection_kind(&self, region: Handle) -> ProviderResult<SelectionKind> {
			self.0.selection_kind(region)
		}
		fn rank(&self, space: Handle) -> ProviderResult<usize> {
			self.0.rank(space).map(|_| 0)
		}
		fn point_count(&self, _region: Handle) -> ProviderResult<u64> {
			Ok(1 << 40)
		}
		fn block_count(&self, _region: Handle) -> ProviderResult<u64> {
			Ok(1 << 40)
		}
		fn point_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>> {
			self.0.point_list(region, offset, count).or(Ok(Vec::new()))
		}
		fn block_list(&self, region: Handle, offset: u64, count: u64) -> ProviderResult<Vec<u64>> {
			self.0.block_list(region, offset, count).or(Ok(Vec::new()))
		}
		fn object_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
			self.0.object_name(file, token)
		}
		fn attribute_name(&self, file: FileId, token: &ReferenceToken) -> ProviderResult<String> {
			self.0.attribute_name(file, token)
		}
		fn close(&self, handle: Handle) -> ProviderResult<()> {
			self.0.close(handle)
		}
		fn release(&self, token: &ReferenceToken) -> ProviderResult<()> {
			self.0.release(token)
		}
	}

	fn token() -> ReferenceToken {
		ReferenceToken::new(vec![3; 12])
	}

	#[test]
	fn zero_rank_stops_before_listing_geometry() {
		let provider = ZeroRank(MemoryProvider::new().with_target(token(), MemoryTarget::new(ReferenceFlavor::RegionStd).with_points(2, vec![1, 2])));
		let session = Session::new(&provider, provider.0.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Standard, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Point);
		assert_eq!(outcome.description, None);
		assert_eq!(provider.0.call_count(ProviderOp::PointList), 0);
		assert_eq!(provider.0.open_handles(), 0);
	}

	#[test]
	fn zero_rank_blocks_stop_before_listing_geometry() {
		let provider = ZeroRank(MemoryProvider::new().with_target(token(), MemoryTarget::new(ReferenceFlavor::RegionLegacy).with_blocks(1, vec![0, 4])));
		let session = Session::new(&provider, provider.0.file());

		let outcome = describe_dataset_region(&session, &token(), RegionAccess::Legacy, &RegionOptions::default()).expect("region opens");
		assert_eq!(outcome.kind, RegionKind::Block);
		assert_eq!(outcome.description, None);
		assert_eq!(provider.0.call_count(ProviderOp::BlockList), 0);
	}
}
