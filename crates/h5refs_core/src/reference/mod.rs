mod attribute;
mod classify;
mod error;
mod flavor;
mod format;
mod memory;
mod names;
mod provider;
mod record;
mod region;
mod registry;
mod session;
mod token;

/// Initialization pass options and summary.
pub use classify::{InitOptions, InitSummary};
/// Error and result aliases.
pub use error::{ReferenceError, Result};
/// Flavor, family, and target classification enums.
pub use flavor::{ReferenceFamily, ReferenceFlavor, RegionKind, SelectionKind, TargetKind};
/// Record and registry formatting entry points.
pub use format::{describe, describe_full, describe_object, describe_region, describe_token, render_all, truncate_chars};
/// In-memory resolution provider.
pub use memory::{MemoryProvider, MemoryRegion, MemoryTarget};
/// Name helpers.
pub use names::basename;
/// Resolution provider capability and handle types.
pub use provider::{FileId, Handle, HandleKind, ProviderError, ProviderOp, ProviderResult, ResolutionProvider};
/// Resolved record type and descriptive tags.
pub use record::{ATTR_TAG, BLOCK_TAG, OBJ_REF_TAG, POINT_TAG, REGION_UNKNOWN_TAG, ReferenceRecord, SENTINEL, UNKNOWN_TAG, or_sentinel};
/// Region geometry options and text rendering.
pub use region::{RegionOptions, format_blocks, format_points};
/// Registry container and lifecycle state.
pub use registry::{Lifecycle, ReferenceRegistry};
/// Token type, input sources, and well-known token sizes.
pub use token::{DSET_REG_REF_BUF_SIZE, OBJ_REF_BUF_SIZE, STD_REF_BUF_SIZE, ReferenceToken, TokenSource};
