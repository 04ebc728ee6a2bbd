use regraft::{
	diff::{diff_trees, Patch},
	identity::{self, Identity},
	tree::Node,
	DEPTH_LIMIT,
};


#[test]
fn identical_trees_emit_no_patches() {
	logging_::init();
	let previous = stamped(sample());
	let mut next = sample();
	assert_eq!(diff_trees(&previous, &mut next, DEPTH_LIMIT), vec![]);
}

#[test]
fn attribute_change_emits_single_set_attribute() {
	logging_::init();
	let mut base = text_el("div", "Text Content");
	base.set_attribute("class", "first");
	base.set_attribute("data-test", "broken");
	base.set_attribute("dir", "ltr");

	let previous = stamped(base.clone());
	let mut next = base;
	next.set_attribute("dir", "rtl");

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(
		patches,
		vec![Patch::SetAttribute {
			at: Identity::from("0"),
			name: "dir".to_string(),
			value: "rtl".to_string(),
		}]
	);
}

#[test]
fn new_attribute_emits_set_attribute() {
	logging_::init();
	let previous = stamped(el("div"));
	let mut next = el("div");
	next.set_attribute("class", "fresh");

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(
		patches,
		vec![Patch::SetAttribute {
			at: Identity::from("0"),
			name: "class".to_string(),
			value: "fresh".to_string(),
		}]
	);
}

#[test]
fn absent_attribute_emits_remove_attribute() {
	logging_::init();
	let mut base = el("div");
	base.set_attribute("class", "old");
	base.set_attribute("dir", "ltr");
	let previous = stamped(base);

	let mut next = el("div");
	next.set_attribute("dir", "ltr");

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(
		patches,
		vec![Patch::RemoveAttribute {
			at: Identity::from("0"),
			name: "class".to_string(),
		}]
	);
}

#[test]
fn text_change_emits_single_set_text() {
	logging_::init();
	// <div><span class="x">A</span></div> -> <div><span class="x">B</span></div>
	let mut base = el("div");
	let mut span = text_el("span", "A");
	span.set_attribute("class", "x");
	base.children.push(span);

	let previous = stamped(base.clone());
	let mut next = base;
	next.children[0].text = Some("B".to_string());

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(
		patches,
		vec![Patch::SetText {
			at: Identity::from("0.0"),
			text: "B".to_string(),
		}]
	);
}

#[test]
fn trailing_child_emits_single_insert() {
	logging_::init();
	let mut base = el("ul");
	base.children.push(keyed_text("li", "a", "1"));
	let previous = stamped(base.clone());

	let mut next = base;
	next.children.push(keyed_text("li", "b", "2"));

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 1);
	match &patches[0] {
		Patch::Insert { at, before, node } => {
			assert_eq!(at.as_str(), "0");
			assert!(before.is_none());
			assert_eq!(node.identity(), Some("0.$b"));
			assert_eq!(node.text.as_deref(), Some("2"));
		}
		other => panic!("expected Insert, got {:?}", other),
	}
}

#[test]
fn middle_growth_anchors_before_following_sibling() {
	logging_::init();
	let mut base = el("div");
	base.children.push(el("span"));
	let previous = stamped(base.clone());

	let mut next = base;
	next.children.push(el("span"));
	next.children.push(el("span"));

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 2);
	match (&patches[0], &patches[1]) {
		(Patch::Insert { before: first, .. }, Patch::Insert { before: last, .. }) => {
			assert_eq!(first.as_ref().map(Identity::as_str), Some("0.2"));
			assert!(last.is_none());
		}
		other => panic!("expected two Inserts, got {:?}", other),
	}
}

#[test]
fn inserted_subtree_is_fully_stamped() {
	logging_::init();
	let previous = stamped(el("div"));

	let mut next = el("div");
	let mut inserted = keyed("div", "div");
	inserted.children.push(keyed("span", "test"));
	inserted.children.push(el("section"));
	next.children.push(inserted);

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 1);
	match &patches[0] {
		Patch::Insert { node, .. } => {
			assert_eq!(node.identity(), Some("0.$div"));
			assert_eq!(node.children[0].identity(), Some("0.$div.$test"));
			assert_eq!(node.children[1].identity(), Some("0.$div.1"));
		}
		other => panic!("expected Insert, got {:?}", other),
	}
}

#[test]
fn missing_trailing_child_emits_single_remove() {
	logging_::init();
	let mut base = el("div");
	base.children.push(el("span"));
	base.children.push(el("section"));
	let previous = stamped(base.clone());

	let mut next = base;
	next.children.pop();

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches, vec![Patch::Remove { at: Identity::from("0.1") }]);
}

#[test]
fn tag_mismatch_replaces_instead_of_patching() {
	logging_::init();
	let mut base = el("div");
	let mut span = text_el("span", "old");
	span.set_attribute("class", "x");
	base.children.push(span);
	let previous = stamped(base);

	let mut next = el("div");
	let mut section = text_el("section", "new");
	section.set_attribute("class", "y");
	next.children.push(section);

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 1);
	match &patches[0] {
		Patch::Replace { at, node } => {
			assert_eq!(at.as_str(), "0.0");
			assert_eq!(node.tag, "section");
			assert_eq!(node.identity(), Some("0.0"));
		}
		other => panic!("expected Replace, got {:?}", other),
	}
}

#[test]
fn key_change_replaces_same_tag() {
	logging_::init();
	let mut base = el("ul");
	base.children.push(keyed("li", "a"));
	let previous = stamped(base);

	let mut next = el("ul");
	next.children.push(keyed("li", "b"));

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 1);
	match &patches[0] {
		Patch::Replace { at, node } => {
			assert_eq!(at.as_str(), "0.$a");
			assert_eq!(node.identity(), Some("0.$b"));
		}
		other => panic!("expected Replace, got {:?}", other),
	}
}

#[test]
fn replaced_subtree_is_fully_stamped() {
	logging_::init();
	let mut base = el("div");
	base.children.push(el("span"));
	let previous = stamped(base);

	let mut next = el("div");
	let mut replacement = el("section");
	replacement.children.push(el("p"));
	replacement.children.push(keyed("p", "k"));
	next.children.push(replacement);

	let patches = diff_trees(&previous, &mut next, DEPTH_LIMIT);
	assert_eq!(patches.len(), 1);
	match &patches[0] {
		Patch::Replace { node, .. } => {
			assert_eq!(node.children[0].identity(), Some("0.0.0"));
			assert_eq!(node.children[1].identity(), Some("0.0.$k"));
		}
		other => panic!("expected Replace, got {:?}", other),
	}
}

#[test]
fn depth_limit_stops_descent() {
	logging_::init();
	let mut base = el("div");
	let mut child = el("div");
	child.children.push(text_el("span", "x"));
	base.children.push(child);
	let previous = stamped(base.clone());

	let mut next = base;
	next.children[0].children[0].text = Some("y".to_string());

	// The change sits two levels down; a budget of two stops right above it.
	assert_eq!(diff_trees(&previous, &mut next.clone(), 2), vec![]);
	assert_eq!(diff_trees(&previous, &mut next, DEPTH_LIMIT).len(), 1);
}

fn sample() -> Node {
	let mut root = el("div");
	root.set_attribute("class", "first");
	let mut list = keyed("ul", "ul");
	list.children.push(keyed_text("li", "first", "One"));
	list.children.push(text_el("li", "Two"));
	root.children.push(text_el("div", "Welcome"));
	root.children.push(list);
	root
}

fn stamped(mut node: Node) -> Node {
	identity::assign_root(&mut node);
	node
}

fn el(tag: &str) -> Node {
	Node::new(tag)
}

fn keyed(tag: &str, key: &str) -> Node {
	let mut node = Node::new(tag);
	node.key = Some(key.to_string());
	node
}

fn text_el(tag: &str, text: &str) -> Node {
	let mut node = Node::new(tag);
	node.text = Some(text.to_string());
	node
}

fn keyed_text(tag: &str, key: &str, text: &str) -> Node {
	let mut node = keyed(tag, key);
	node.text = Some(text.to_string());
	node
}
