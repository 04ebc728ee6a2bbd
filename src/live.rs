//! The live-tree capability and the patch applier.
//!
//! The engine never owns the rendered tree. Everything it needs from the
//! hosting environment is behind [`LiveTree`]: one mutation operation per
//! [`Patch`] variant, each addressed by stamped identity, plus a structural
//! export used to capture snapshots. [`MemTree`] is the bundled in-memory
//! implementation, suitable both for embedders hosting plain [`Node`] trees
//! and for testing the engine without any rendering environment at all.

use crate::{
	diff::Patch,
	identity::Identity,
	tree::{Node, IDENTITY_ATTRIBUTE},
	Error,
};
use tracing::{error, instrument, trace};

/// Mutation surface of an externally owned, currently rendered tree.
///
/// Implementations resolve identities against the stamped
/// [`IDENTITY_ATTRIBUTE`] of their own nodes: the root first, then the
/// first match in a depth-first scan. Every mutation answers
/// [`Error::TargetNotFound`] when the addressed identity does not resolve.
pub trait LiveTree {
	/// A structural clone of the current live root, stamped identity
	/// attributes included. The engine captures its snapshot from this.
	fn export(&self) -> Node;

	/// Copies identity attributes from `reference` onto the live tree,
	/// node by node. `reference` must be structurally identical to the
	/// live tree; nodes without a counterpart are left alone.
	fn stamp(&mut self, reference: &Node);

	/// Inserts `node` under `parent`, immediately before the child
	/// carrying the identity `before`, or as the last child when `before`
	/// is absent or does not resolve among `parent`'s children.
	fn insert(&mut self, parent: &Identity, before: Option<&Identity>, node: &Node) -> Result<(), Error>;

	/// Detaches the node at `target` from its parent, subtree included.
	fn remove(&mut self, target: &Identity) -> Result<(), Error>;

	/// Substitutes the node at `target` with `node`, keeping its position.
	fn replace(&mut self, target: &Identity, node: &Node) -> Result<(), Error>;

	/// Sets attribute `name` to `value` on the node at `target`, creating
	/// the attribute if absent.
	fn set_attribute(&mut self, target: &Identity, name: &str, value: &str) -> Result<(), Error>;

	/// Drops attribute `name` from the node at `target`.
	fn remove_attribute(&mut self, target: &Identity, name: &str) -> Result<(), Error>;

	/// Overwrites the text payload of the node at `target`, but only when
	/// that node currently holds non-empty text. A node whose content
	/// model changed to element children is left untouched.
	fn set_text(&mut self, target: &Identity, text: &str) -> Result<(), Error>;
}

/// Applies `patches` in emission order against `live`.
///
/// Fail-fast: the first patch whose target does not resolve stops the
/// batch, leaving the live tree partially patched. There is no rollback;
/// the caller decides whether to rebuild.
#[instrument(skip(patches, live))]
pub fn apply<L: LiveTree>(patches: &[Patch], live: &mut L) -> Result<(), Error> {
	for patch in patches {
		trace!("Applying {:?} at {:?}.", variant_name(patch), patch.at().as_str());
		let applied = match patch {
			Patch::Insert { at, before, node } => live.insert(at, before.as_ref(), node),
			Patch::Remove { at } => live.remove(at),
			Patch::Replace { at, node } => live.replace(at, node),
			Patch::SetAttribute { at, name, value } => live.set_attribute(at, name, value),
			Patch::RemoveAttribute { at, name } => live.remove_attribute(at, name),
			Patch::SetText { at, text } => live.set_text(at, text),
		};
		if let Err(e) = applied {
			error!("Stopping patch application: {}", e);
			return Err(e);
		}
	}
	Ok(())
}

fn variant_name(patch: &Patch) -> &'static str {
	match patch {
		Patch::Insert { .. } => "Insert",
		Patch::Remove { .. } => "Remove",
		Patch::Replace { .. } => "Replace",
		Patch::SetAttribute { .. } => "SetAttribute",
		Patch::RemoveAttribute { .. } => "RemoveAttribute",
		Patch::SetText { .. } => "SetText",
	}
}

/// An in-memory live tree over a plain [`Node`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemTree {
	root: Node,
}

impl MemTree {
	#[must_use]
	pub fn new(root: Node) -> Self {
		Self { root }
	}

	#[must_use]
	pub fn root(&self) -> &Node {
		&self.root
	}

	#[must_use]
	pub fn into_root(self) -> Node {
		self.root
	}

	/// First node carrying `identity`, depth-first from the root.
	#[must_use]
	pub fn find(&self, identity: &str) -> Option<&Node> {
		find(&self.root, identity)
	}

	fn resolve_mut(&mut self, target: &Identity) -> Result<&mut Node, Error> {
		match find_mut(&mut self.root, target.as_str()) {
			Some(node) => Ok(node),
			None => Err(Error::TargetNotFound { identity: target.clone() }),
		}
	}

	/// The parent of the node at `target`, or `None` when `target` is the
	/// root or unresolvable.
	fn parent_of_mut(&mut self, target: &str) -> Option<&mut Node> {
		parent_of_mut(&mut self.root, target)
	}
}

impl LiveTree for MemTree {
	fn export(&self) -> Node {
		self.root.clone()
	}

	fn stamp(&mut self, reference: &Node) {
		stamp_from(&mut self.root, reference);
	}

	fn insert(&mut self, parent: &Identity, before: Option<&Identity>, node: &Node) -> Result<(), Error> {
		let parent = self.resolve_mut(parent)?;
		let position = before
			.and_then(|before| parent.children.iter().position(|child| child.identity() == Some(before.as_str())));
		match position {
			Some(position) => parent.children.insert(position, node.clone()),
			None => parent.children.push(node.clone()),
		}
		Ok(())
	}

	fn remove(&mut self, target: &Identity) -> Result<(), Error> {
		// The root has no parent to detach from; the differ never emits a
		// root removal.
		match self.parent_of_mut(target.as_str()) {
			Some(parent) => {
				parent.children.retain(|child| child.identity() != Some(target.as_str()));
				Ok(())
			}
			None => Err(Error::TargetNotFound { identity: target.clone() }),
		}
	}

	fn replace(&mut self, target: &Identity, node: &Node) -> Result<(), Error> {
		if self.root.identity() == Some(target.as_str()) {
			self.root = node.clone();
			return Ok(());
		}
		match self.parent_of_mut(target.as_str()) {
			Some(parent) => {
				for child in &mut parent.children {
					if child.identity() == Some(target.as_str()) {
						*child = node.clone();
						return Ok(());
					}
				}
				Err(Error::TargetNotFound { identity: target.clone() })
			}
			None => Err(Error::TargetNotFound { identity: target.clone() }),
		}
	}

	fn set_attribute(&mut self, target: &Identity, name: &str, value: &str) -> Result<(), Error> {
		self.resolve_mut(target)?.set_attribute(name, value);
		Ok(())
	}

	fn remove_attribute(&mut self, target: &Identity, name: &str) -> Result<(), Error> {
		self.resolve_mut(target)?.remove_attribute(name);
		Ok(())
	}

	fn set_text(&mut self, target: &Identity, text: &str) -> Result<(), Error> {
		let node = self.resolve_mut(target)?;
		match &node.text {
			Some(existing) if !existing.is_empty() => {
				node.text = Some(text.to_string());
			}
			_ => trace!("Skipping text write to {:?}: no current text payload.", target.as_str()),
		}
		Ok(())
	}
}

fn find<'a>(node: &'a Node, identity: &str) -> Option<&'a Node> {
	if node.identity() == Some(identity) {
		return Some(node);
	}
	node.children.iter().find_map(|child| find(child, identity))
}

fn find_mut<'a>(node: &'a mut Node, identity: &str) -> Option<&'a mut Node> {
	if node.identity() == Some(identity) {
		return Some(node);
	}
	node.children.iter_mut().find_map(|child| find_mut(child, identity))
}

fn parent_of_mut<'a>(node: &'a mut Node, identity: &str) -> Option<&'a mut Node> {
	if node.children.iter().any(|child| child.identity() == Some(identity)) {
		return Some(node);
	}
	node.children.iter_mut().find_map(|child| parent_of_mut(child, identity))
}

fn stamp_from(node: &mut Node, reference: &Node) {
	if let Some(identity) = reference.identity() {
		node.set_attribute(IDENTITY_ATTRIBUTE, identity);
	}
	for (child, reference) in node.children.iter_mut().zip(&reference.children) {
		stamp_from(child, reference);
	}
}
