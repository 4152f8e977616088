mod construction {
	use crate::reference::{ReferenceError, ReferenceFamily, ReferenceRegistry, STD_REF_BUF_SIZE};

	#[test]
	fn negative_capacity_is_rejected() {
		let err = ReferenceRegistry::new(ReferenceFamily::Standard, STD_REF_BUF_SIZE, -1).expect_err("negative capacity");
		assert!(matches!(err, ReferenceError::InvalidCapacity { capacity: -1 }));
	}

	#[test]
	fn zero_token_size_is_rejected() {
		let err = ReferenceRegistry::new(ReferenceFamily::Legacy, 0, 4).expect_err("zero token size");
		assert!(matches!(err, ReferenceError::InvalidTokenSize { size: 0 }));
	}

	#[test]
	fn size_reports_declared_capacity_before_load() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 8, 3).expect("registry");
		assert_eq!(registry.size(), 3);
		assert!(!registry.is_loaded());
		assert!(registry.records().is_empty());

		registry.set_capacity(5).expect("capacity before load");
		assert_eq!(registry.size(), 5);
	}
}

mod loading {
	use crate::reference::{ReferenceError, ReferenceFamily, ReferenceRegistry, TokenSource};

	#[test]
	fn flat_buffer_is_segmented_in_order() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 2, 3).expect("registry");
		registry.load(TokenSource::flat(&[1, 1, 2, 2, 3, 3])).expect("load");

		let tokens: Vec<&[u8]> = registry.records().iter().map(|record| record.token.as_bytes()).collect();
		assert_eq!(tokens, vec![&[1, 1][..], &[2, 2][..], &[3, 3][..]]);
		assert!(registry.is_loaded());
		assert!(!registry.is_initialized());
	}

	#[test]
	fn short_buffer_leaves_registry_unloaded() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 4, 2).expect("registry");
		let err = registry.load(TokenSource::flat(&[1; 7])).expect_err("short buffer");

		assert!(matches!(err, ReferenceError::BufferTooShort { need: 8, have: 7 }));
		assert!(!registry.is_loaded());
	}

	#[test]
	fn second_load_requires_clear() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 1, 2).expect("registry");
		registry.load(TokenSource::flat(&[1, 2])).expect("load");

		let err = registry.load(TokenSource::flat(&[3, 4])).expect_err("already loaded");
		assert!(matches!(err, ReferenceError::AlreadyLoaded { len: 2 }));
		assert!(registry.set_capacity(1).is_err());

		registry.clear();
		registry.load(TokenSource::flat(&[3, 4])).expect("reload");
		assert_eq!(registry.records()[0].token.as_bytes(), &[3]);
	}

	#[test]
	fn list_source_is_accepted() {
		let items = [vec![9_u8, 9, 9], vec![8, 8, 8]];
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 2, 2).expect("registry");
		registry.load(TokenSource::list(&items)).expect("load");

		assert_eq!(registry.records()[1].token.as_bytes(), &[8, 8]);
	}
}

mod lifecycle {
	use crate::reference::{
		Lifecycle, MemoryProvider, MemoryTarget, ProviderOp, ReferenceError, ReferenceFamily, ReferenceFlavor, ReferenceRegistry, TargetKind, TokenSource, describe,
	};

	#[test]
	fn all_zero_token_describes_as_null() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Standard, 16, 1).expect("registry");
		registry.load(TokenSource::flat(&[0; 16])).expect("load");

		let provider = MemoryProvider::new();
		let summary = registry.init(&provider, provider.file()).expect("init").clone();

		assert_eq!(summary.null_tokens, 1);
		assert_eq!(registry.records()[0].flavor, ReferenceFlavor::None);
		assert_eq!(describe(&registry.records()[0]), "NULL");
		assert!(provider.calls().is_empty());
	}

	#[test]
	fn init_before_load_is_rejected() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Standard, 8, 1).expect("registry");
		let provider = MemoryProvider::new();

		assert!(matches!(registry.init(&provider, provider.file()), Err(ReferenceError::NotLoaded)));
		assert_eq!(registry.lifecycle(), Lifecycle::Unresolved);
	}

	#[test]
	fn init_runs_once() {
		let provider = MemoryProvider::new().with_target([5; 8], MemoryTarget::new(ReferenceFlavor::ObjectStd).with_target_kind(TargetKind::Group));
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Standard, 8, 1).expect("registry");
		registry.load(TokenSource::flat(&[5; 8])).expect("load");

		let first = registry.init(&provider, provider.file()).expect("init").clone();
		let records = registry.records().to_vec();
		let calls = provider.calls().len();

		let second = registry.init(&provider, provider.file()).expect("init again").clone();
		assert_eq!(first, second);
		assert_eq!(registry.records(), records.as_slice());
		assert_eq!(provider.calls().len(), calls);
		assert_eq!(provider.call_count(ProviderOp::Release), 1);
		assert_eq!(registry.lifecycle(), Lifecycle::Resolved);
	}

	#[test]
	fn clear_resets_lifecycle_for_reuse() {
		let provider = MemoryProvider::new();
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 4, 1).expect("registry");
		registry.load(TokenSource::flat(&[0; 4])).expect("load");
		registry.init(&provider, provider.file()).expect("init");

		registry.clear();
		assert_eq!(registry.lifecycle(), Lifecycle::Unresolved);
		assert!(registry.summary().is_none());
		assert!(!registry.is_loaded());
		assert_eq!(registry.size(), 1);

		registry.load(TokenSource::flat(&[0; 4])).expect("reload");
		registry.init(&provider, provider.file()).expect("init after clear");
		assert!(registry.is_initialized());
	}
}

mod lookup {
	use crate::reference::{MemoryProvider, MemoryTarget, ReferenceFamily, ReferenceFlavor, ReferenceRegistry, TargetKind, TokenSource, describe_token};

	#[test]
	fn released_tokens_remain_lookup_keys() {
		let provider = MemoryProvider::new()
			.with_target([1; 4], MemoryTarget::new(ReferenceFlavor::ObjectStd).with_target_kind(TargetKind::Group).with_object_name("/grp"))
			.with_target([2; 4], MemoryTarget::new(ReferenceFlavor::ObjectStd).with_target_kind(TargetKind::Group).with_object_name("/other"));
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Standard, 4, 2).expect("registry");
		registry.load(TokenSource::flat(&[1, 1, 1, 1, 2, 2, 2, 2])).expect("load");
		registry.init(&provider, provider.file()).expect("init");

		assert!(provider.is_released(&[2; 4]));
		let record = registry.lookup(&[2; 4]).expect("found");
		assert_eq!(record.object_name.as_deref(), Some("/other"));
		assert_eq!(describe_token(&registry, &[1; 4]).as_deref(), Some("grp OBJ_REF GROUP"));
	}

	#[test]
	fn missing_or_wrong_width_tokens_are_not_found() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 4, 1).expect("registry");
		registry.load(TokenSource::flat(&[3; 4])).expect("load");

		assert!(registry.lookup(&[4; 4]).is_none());
		assert!(registry.lookup(&[3; 3]).is_none());
		assert!(describe_token(&registry, &[4; 4]).is_none());
	}

	#[test]
	fn lookup_index_reports_first_matching_position() {
		let mut registry = ReferenceRegistry::new(ReferenceFamily::Legacy, 4, 3).expect("registry");
		registry.load(TokenSource::flat(&[5, 5, 5, 5, 6, 6, 6, 6, 6, 6, 6, 6])).expect("load");

		let (index, record) = registry.lookup_index(&[6; 4]).expect("found");
		assert_eq!(index, 1);
		assert_eq!(record.token.as_bytes(), &[6; 4]);
		assert!(std::ptr::eq(registry.lookup(&[6; 4]).expect("found"), record));
		assert!(registry.lookup_index(&[6; 5]).is_none());
		assert!(registry.lookup_index(&[7; 4]).is_none());
	}
}
