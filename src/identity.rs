//! Stable path-like identities for tree nodes.
//!
//! The root of a tree is `"$key"` when it declares an explicit key and `"0"`
//! otherwise. A child at position `i` of a parent with identity `P` is
//! `P.$key` when that child declares a key and `P.i` otherwise. Identities
//! are written onto nodes under [`IDENTITY_ATTRIBUTE`] so the live tree can
//! later be searched by plain attribute equality.

use crate::tree::{Node, IDENTITY_ATTRIBUTE};
use hashbrown::HashSet;
use tracing::warn;

/// A deterministic path string addressing one node within a tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Identity(String);

impl Identity {
	/// The identity of a tree root: `"$key"` or `"0"`.
	#[must_use]
	pub fn root(key: Option<&str>) -> Self {
		match key {
			Some(key) => Identity(format!("${}", key)),
			None => Identity("0".to_string()),
		}
	}

	/// The identity of the child at `index`, keyed or positional.
	#[must_use]
	pub fn child(&self, key: Option<&str>, index: usize) -> Self {
		match key {
			Some(key) => Identity(format!("{}.${}", self.0, key)),
			None => Identity(format!("{}.{}", self.0, index)),
		}
	}

	#[must_use]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl core::fmt::Display for Identity {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Identity {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl PartialEq<str> for Identity {
	fn eq(&self, other: &str) -> bool {
		self.0 == other
	}
}

impl From<&str> for Identity {
	fn from(s: &str) -> Self {
		Identity(s.to_string())
	}
}

/// Stamps `identity` onto `node` and assigns identities through its entire
/// subtree, depth-first and left-to-right.
///
/// Each child's suffix is derived from that child's own key or index.
/// A keyed sibling must never leak its suffix onto the unkeyed sibling that
/// follows it; identities within one parent stay unique unless the caller
/// supplied duplicate explicit keys, which is reported but not fatal.
pub fn assign(node: &mut Node, identity: &Identity) {
	node.set_attribute(IDENTITY_ATTRIBUTE, identity.as_str());
	let mut seen = HashSet::with_capacity(node.children.len());
	for (index, child) in node.children.iter_mut().enumerate() {
		let child_identity = identity.child(child.key.as_deref(), index);
		if !seen.insert(child_identity.clone()) {
			warn!("Duplicate child identity {:?} under {:?}; reconciliation of these siblings is unreliable.", child_identity.as_str(), identity.as_str());
		}
		assign(child, &child_identity);
	}
}

/// Assigns identities to a whole tree from its root and returns the root
/// identity.
pub fn assign_root(node: &mut Node) -> Identity {
	let identity = Identity::root(node.key.as_deref());
	assign(node, &identity);
	identity
}
