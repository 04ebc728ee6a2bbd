//! The tree differ: compares a stamped snapshot against a target tree and
//! emits a flat, ordered list of [`Patch`]es.
//!
//! The walk is recursive, one call per aligned node pair, pairing children
//! positionally for `0 .. max(len(previous), len(next))`. Two aligned nodes
//! match when their tag names are identical and their resolved identities
//! (explicit key, or positional index) are identical; everything else is an
//! atomic subtree replacement. Moved keyed nodes are not tracked across
//! indices: a key found at a different position falls out as a replacement
//! or an insert/remove pair.

use crate::{
	identity::{self, Identity},
	tree::{Node, IDENTITY_ATTRIBUTE},
};
use hashbrown::{HashMap, HashSet};
use tracing::{error, instrument, trace, trace_span};

/// One atomic mutation instruction targeting a single identity.
///
/// Patches carry no references to each other, but the list they arrive in is
/// ordered and must be applied in emission order: a later patch may address
/// a node an earlier `Insert` just created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch {
	/// Insert `node` (a fully stamped subtree) under the element at `at`,
	/// immediately before the sibling `before`, or as the last child when
	/// `before` is absent or not present in the live tree yet.
	Insert {
		at: Identity,
		before: Option<Identity>,
		node: Node,
	},
	/// Detach the element at `at`, subtree included.
	Remove { at: Identity },
	/// Substitute the element at `at` with `node` (a fully stamped
	/// subtree), in place.
	Replace { at: Identity, node: Node },
	/// Set attribute `name` to `value` on the element at `at`, creating
	/// the attribute if absent.
	SetAttribute {
		at: Identity,
		name: String,
		value: String,
	},
	/// Drop attribute `name` from the element at `at`.
	RemoveAttribute { at: Identity, name: String },
	/// Overwrite the text payload of the element at `at`. Only applies to
	/// an element that currently holds non-empty text.
	SetText { at: Identity, text: String },
}

impl Patch {
	/// The identity this patch is addressed at.
	#[must_use]
	pub fn at(&self) -> &Identity {
		match self {
			Patch::Insert { at, .. }
			| Patch::Remove { at }
			| Patch::Replace { at, .. }
			| Patch::SetAttribute { at, .. }
			| Patch::RemoveAttribute { at, .. }
			| Patch::SetText { at, .. } => at,
		}
	}
}

/// Diffs a stamped snapshot against a target tree.
///
/// Stamps identities onto `next` (and, for inserted or replaced subtrees,
/// through the entire subtree) as a side effect, so `next` can serve as the
/// snapshot for the following diff. `depth_limit` bounds the recursion;
/// when it is exhausted the remaining subtree is left as it is and an error
/// is logged.
#[must_use]
#[instrument(skip(previous, next))]
pub fn diff_trees(previous: &Node, next: &mut Node, depth_limit: usize) -> Vec<Patch> {
	let mut patches = Vec::new();
	if depth_limit == 0 {
		error!("Depth limit is zero; nothing can be diffed.");
		return patches;
	}

	let identity = Identity::root(next.key.as_deref());
	next.set_attribute(IDENTITY_ATTRIBUTE, identity.as_str());

	if previous.tag == next.tag && previous.identity() == Some(identity.as_str()) {
		diff_matched(previous, next, &identity, depth_limit, &mut patches);
	} else {
		match previous.identity() {
			Some(at) => {
				identity::assign(next, &identity);
				patches.push(Patch::Replace {
					at: Identity::from(at),
					node: next.clone(),
				});
			}
			None => error!("Snapshot root carries no stamped identity; cannot address its replacement."),
		}
	}

	trace!("Emitted {} patch(es).", patches.len());
	patches
}

/// Diffs two nodes that matched on tag and identity: attribute patches,
/// a text patch if warranted, then the pairwise child walk.
fn diff_matched(previous: &Node, next: &mut Node, identity: &Identity, depth_limit: usize, patches: &mut Vec<Patch>) {
	let span = trace_span!("Diffing matched element", tag = next.tag.as_str(), identity = identity.as_str());
	let _enter = span.enter();

	diff_attributes(previous, next, identity, patches);
	diff_text(previous, next, identity, patches);

	if previous.children.is_empty() && next.children.is_empty() {
		return;
	}
	if depth_limit == 1 {
		return error!("Depth limit reached under {:?}; leaving this subtree as it is.", identity.as_str());
	}
	diff_children(&previous.children, &mut next.children, identity, depth_limit - 1, patches);
}

/// Pairwise walk over two child lists. Missing slots on either side become
/// inserts or removals; mismatched pairs become replacements.
fn diff_children(previous: &[Node], next: &mut [Node], parent: &Identity, depth_limit: usize, patches: &mut Vec<Patch>) {
	let len = previous.len().max(next.len());
	for index in 0..len {
		if index >= next.len() {
			// The snapshot has more children here than the target: the
			// trailing node is removed atomically, subtree and all.
			match previous[index].identity() {
				Some(at) => {
					trace!("Removing {:?}.", at);
					patches.push(Patch::Remove { at: Identity::from(at) });
				}
				None => error!("Snapshot child {} of {:?} carries no stamped identity; cannot address its removal.", index, parent.as_str()),
			}
			continue;
		}

		let (head, tail) = next.split_at_mut(index + 1);
		let target = &mut head[index];
		let identity = parent.child(target.key.as_deref(), index);
		target.set_attribute(IDENTITY_ATTRIBUTE, identity.as_str());

		match previous.get(index) {
			None => {
				// The target has more children here than the snapshot:
				// the whole new subtree goes in as one insert, anchored
				// before whichever sibling follows it in target order.
				identity::assign(target, &identity);
				let before = tail.first().map(|sibling| parent.child(sibling.key.as_deref(), index + 1));
				trace!("Inserting {:?} under {:?}.", identity.as_str(), parent.as_str());
				patches.push(Patch::Insert {
					at: parent.clone(),
					before,
					node: target.clone(),
				});
			}
			Some(existing) if existing.tag == target.tag && existing.identity() == Some(identity.as_str()) => {
				diff_matched(existing, target, &identity, depth_limit, patches);
			}
			Some(existing) => match existing.identity() {
				Some(at) => {
					identity::assign(target, &identity);
					trace!("Replacing {:?} with {:?}.", at, identity.as_str());
					patches.push(Patch::Replace {
						at: Identity::from(at),
						node: target.clone(),
					});
				}
				None => error!("Snapshot child {} of {:?} carries no stamped identity; cannot address its replacement.", index, parent.as_str()),
			},
		}
	}
}

/// Attribute diff by name. Comparing by position would silently mispair
/// attributes whenever order or count changed between the two nodes.
fn diff_attributes(previous: &Node, next: &Node, identity: &Identity, patches: &mut Vec<Patch>) {
	let mut remaining: HashMap<&str, &str> = previous.attributes.iter().map(|a| (a.name.as_str(), a.value.as_str())).collect();

	for attribute in &next.attributes {
		if remaining.remove(attribute.name.as_str()) != Some(attribute.value.as_str()) {
			patches.push(Patch::SetAttribute {
				at: identity.clone(),
				name: attribute.name.clone(),
				value: attribute.value.clone(),
			});
		}
	}

	if remaining.is_empty() {
		return;
	}
	// Emit removals in the previous node's attribute order, not map order.
	let removed: HashSet<&str> = remaining.keys().copied().collect();
	for attribute in &previous.attributes {
		if removed.contains(attribute.name.as_str()) {
			patches.push(Patch::RemoveAttribute {
				at: identity.clone(),
				name: attribute.name.clone(),
			});
		}
	}
}

/// Text diff for matched nodes. Only a node that already held non-empty
/// text gets a text patch; an absent target text counts as empty.
fn diff_text(previous: &Node, next: &Node, identity: &Identity, patches: &mut Vec<Patch>) {
	let existing = previous.text.as_deref().unwrap_or("");
	if existing.is_empty() {
		return;
	}
	let target = next.text.as_deref().unwrap_or("");
	if existing != target {
		patches.push(Patch::SetText {
			at: identity.clone(),
			text: target.to_string(),
		});
	}
}
