//! The reconciler: one snapshot, one live-tree adapter, one update cycle.

use crate::{
	diff::{self, Patch},
	identity,
	live::{self, LiveTree},
	tree::Node,
	Error,
};
use tracing::{info, instrument};

/// Default bound on diff recursion depth. Generous for any tree a renderer
/// realistically produces; exhaustion is logged, never fatal.
pub const DEPTH_LIMIT: usize = 128;

/// Drives reconciliation for one live tree.
///
/// Holds exactly one snapshot (a stamped structural clone of the live tree
/// as of the last successful [`update`](Reconciler::update)) and the
/// injected [`LiveTree`] adapter. Single-threaded by contract: `update` is
/// not reentrant, and diff-then-apply is not transactional. A failed apply
/// leaves the live tree partially patched and the snapshot unswapped.
#[derive(Debug)]
pub struct Reconciler<L: LiveTree> {
	live: L,
	snapshot: Node,
}

impl<L: LiveTree> Reconciler<L> {
	/// Stamps identities onto the live tree and captures the initial
	/// snapshot.
	///
	/// # Errors
	///
	/// [`Error::InvalidInput`] when the exported root is not a well-formed
	/// single element (empty tag name, or text alongside element
	/// children).
	#[instrument(skip(live))]
	pub fn new(mut live: L) -> Result<Self, Error> {
		let mut snapshot = live.export();
		if !snapshot.is_valid_root() {
			return Err(Error::InvalidInput("root must be a single element with a consistent content model"));
		}
		identity::assign_root(&mut snapshot);
		live.stamp(&snapshot);
		Ok(Self { live, snapshot })
	}

	/// Diffs the stored snapshot against `next`, applies the resulting
	/// patches to the live tree, then adopts `next` as the new snapshot.
	/// Returns the applied patch list.
	///
	/// `next` is adopted as-is (no clone); the caller must not rely on it
	/// afterwards. Its shape is not validated beyond what diffing
	/// tolerates: a malformed tree may produce patches that fail to apply.
	///
	/// # Errors
	///
	/// [`Error::TargetNotFound`] when a patch does not resolve against
	/// the live tree. The snapshot is not swapped in that case, and
	/// patches applied before the failing one are not rolled back.
	#[instrument(skip(self, next))]
	pub fn update(&mut self, mut next: Node) -> Result<Vec<Patch>, Error> {
		let patches = diff::diff_trees(&self.snapshot, &mut next, DEPTH_LIMIT);
		live::apply(&patches, &mut self.live)?;
		self.snapshot = next;
		info!("Applied {} patch(es).", patches.len());
		Ok(patches)
	}

	/// Repoints which live tree future updates target, without diffing.
	/// The new tree's structure is assumed to already match the snapshot.
	pub fn re_ref(&mut self, live: L) -> &mut Self {
		self.live = live;
		self
	}

	#[must_use]
	pub fn live(&self) -> &L {
		&self.live
	}

	#[must_use]
	pub fn into_live(self) -> L {
		self.live
	}

	/// The stamped snapshot as of the last successful update.
	#[must_use]
	pub fn snapshot(&self) -> &Node {
		&self.snapshot
	}
}
