//! The tree model shared by snapshots, targets and the in-memory live tree.
//!
//! Nodes are plain data: the engine never owns the live tree, it only reads
//! tag/key/attributes/children here and issues mutations through
//! [`crate::live::LiveTree`].

/// Reserved attribute under which every stamped node carries its [`crate::identity::Identity`].
///
/// This is a visible side effect on every node the engine touches: embedders
/// must leave the attribute alone and must not use the name themselves.
pub const IDENTITY_ATTRIBUTE: &str = "data-regraft-id";

/// A single named attribute.
///
/// Attributes live in a `Vec` rather than a map so that iteration order
/// within one node stays consistent; correctness never depends on the order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
	pub name: String,
	pub value: String,
}

/// One element of a tree.
///
/// `text` and `children` are mutually exclusive by contract, matching the
/// usual markup content model. [`Node::is_valid_root`] checks this for the
/// root; deeper nodes are trusted (see the error-handling notes on
/// [`crate::Reconciler::update`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
	pub tag: String,
	/// Explicit reconciliation key, if any. Not an attribute; it only
	/// influences identity assignment and node matching.
	pub key: Option<String>,
	pub attributes: Vec<Attribute>,
	pub children: Vec<Node>,
	pub text: Option<String>,
}

impl Node {
	/// An empty element with the given tag name.
	#[must_use]
	pub fn new(tag: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			key: None,
			attributes: Vec::new(),
			children: Vec::new(),
			text: None,
		}
	}

	/// The value of the attribute `name`, if present.
	#[must_use]
	pub fn attribute(&self, name: &str) -> Option<&str> {
		self.attributes.iter().find(|a| a.name == name).map(|a| a.value.as_str())
	}

	/// Sets `name` to `value`, creating the attribute if absent.
	pub fn set_attribute(&mut self, name: &str, value: &str) {
		match self.attributes.iter_mut().find(|a| a.name == name) {
			Some(attribute) => attribute.value = value.to_string(),
			None => self.attributes.push(Attribute {
				name: name.to_string(),
				value: value.to_string(),
			}),
		}
	}

	/// Drops the attribute `name` if present.
	pub fn remove_attribute(&mut self, name: &str) {
		self.attributes.retain(|a| a.name != name);
	}

	/// The stamped identity string, if this node has been through
	/// identity assignment.
	#[must_use]
	pub fn identity(&self) -> Option<&str> {
		self.attribute(IDENTITY_ATTRIBUTE)
	}

	/// Whether this node can act as the single root element of a
	/// reconciled tree: a non-empty tag and a consistent content model.
	#[must_use]
	pub fn is_valid_root(&self) -> bool {
		!self.tag.is_empty() && !(self.text.is_some() && !self.children.is_empty())
	}
}
