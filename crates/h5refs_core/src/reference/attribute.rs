use crate::reference::session::Session;
use crate::reference::{ProviderOp, ReferenceToken, ResolutionProvider};

/// Open a referenced attribute and return the rank of its value space.
///
/// Point/block text for attribute regions is not produced; the rank is the
/// only geometry recorded for attribute references.
pub(crate) fn read_attribute_rank<P: ResolutionProvider + ?Sized>(session: &Session<'_, P>, token: &ReferenceToken) -> Option<usize> {
	let file = session.file();
	let attribute = session.open(ProviderOp::OpenAttribute, |p| p.open_attribute(file, token))?;
	let space = session.open(ProviderOp::AttributeSpace, |p| p.attribute_space(attribute.handle()))?;
	session.call(ProviderOp::Rank, |p| p.rank(space.handle()))
}
