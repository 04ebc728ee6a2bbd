use crate::identity::Identity;
use thiserror::Error;

/// Errors surfaced by [`crate::Reconciler`] and [`crate::live::LiveTree`]
/// implementations.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
	/// The value handed to [`crate::Reconciler::new`] is not a well-formed
	/// single root element.
	#[error("valid root element required: {0}")]
	InvalidInput(&'static str),

	/// A patch addressed an identity that does not resolve against the
	/// live tree. Application stops at the first such patch; earlier
	/// patches in the batch have already run and are not rolled back.
	#[error("no live node with identity {identity}")]
	TargetNotFound {
		identity: Identity,
	},
}
