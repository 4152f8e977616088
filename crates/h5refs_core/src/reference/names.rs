use crate::reference::record::RecordBuilder;
use crate::reference::session::Session;
use crate::reference::{ProviderOp, ReferenceFlavor, ResolutionProvider};

/// Last `/`-separated segment of a path, or `None` when it is empty.
pub fn basename(path: &str) -> Option<&str> {
	path.rsplit('/').next().filter(|item| !item.is_empty())
}

/// Resolve file path, file name, object name, and (for attribute flavors)
/// attribute name. Each failure degrades only its own field.
pub(crate) fn resolve_names<P: ResolutionProvider + ?Sized>(session: &Session<'_, P>, flavor: ReferenceFlavor, builder: &mut RecordBuilder) {
	let file = session.file();
	let token = builder.token().clone();

	let full_path = session.call(ProviderOp::FilePath, |p| p.file_path(file, &token));
	match full_path {
		Some(path) => {
			builder.file_name(basename(&path));
			builder.file_full_path(Some(path));
		}
		None => {
			builder.degrade();
			builder.degrade();
		}
	}

	match session.call(ProviderOp::ObjectName, |p| p.object_name(file, &token)) {
		Some(name) => builder.object_name(Some(name)),
		None => builder.degrade(),
	}

	if flavor.is_attribute() {
		match session.call(ProviderOp::AttributeName, |p| p.attribute_name(file, &token)) {
			Some(name) => builder.attribute_name(Some(name)),
			None => builder.degrade(),
		}
	}
}
