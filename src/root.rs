use crate::{
	diff::patch_element,
	error::{HostResultExt, PatchError},
	markup::{unwrap_target, MarkupContext, Target},
	node::patch_node,
	options::PatchOptions,
};
use tracing::{instrument, trace, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentFragment, Element, Node};

/// Morphs `root` into `to`, mutating the live tree, and returns the node that now stands where `root` was.
///
/// That is `root` itself unless its tag (or node kind) differed from the target's, in which case it was replaced.
///
/// `to` may be a node or a markup string. Strings are parsed to match `root`'s position:
/// as a whole page for `<html>` (or a document), as body content for `<body>`, and as a standalone snippet otherwise.
///
/// ```rust,no_run
/// use dom_morph::{patch, PatchOptions};
///
/// let document = web_sys::window().unwrap().document().unwrap();
/// let list = document.get_element_by_id("list").unwrap();
/// patch(&list, r#"<ul id="list"><li id="b">B</li><li id="a">A</li></ul>"#, &PatchOptions::default()).unwrap();
/// ```
#[instrument(skip_all, fields(root = %root.node_name(), children_only = options.is_children_only()))]
pub fn patch<'a>(root: &Node, to: impl Into<Target<'a>>, options: &PatchOptions) -> Result<Node, PatchError> {
	if options.keys().is_empty() {
		warn!("No matching keys configured. Children will be matched by position only.");
	}

	let root = unwrap_root(root)?;
	let to = match to.into() {
		Target::Markup(markup) => {
			let document = root.owner_document().ok_or(PatchError::NoOwnerDocument)?;
			MarkupContext::for_node_name(&root.node_name()).parse(&document, &markup)?
		}
		Target::Node(node) => node,
	};
	let to = unwrap_target(to)?;

	let root = if options.is_children_only() {
		root
	} else {
		let patched = patch_node(&root, &to)?;
		if !patched.is_same_node(Some(&root)) {
			if let Some(parent) = root.parent_node() {
				trace!("Removing superseded root.");
				parent.remove_child(&root).host("remove_child")?;
			}
		}
		patched
	};

	match root.dyn_ref::<Element>() {
		Some(element) => patch_element(element, &to, options).map(Into::into),
		None => Ok(root),
	}
}

/// Patches only the children of `root`, leaving its tag and attributes alone. Matches by `id`.
pub fn patch_subtree<'a>(root: &Node, to: impl Into<Target<'a>>) -> Result<Node, PatchError> {
	patch(root, to, &PatchOptions::new().children_only(true))
}

/// Like [`patch_subtree`], but with custom keys. `options`' `children_only` flag is overridden.
pub fn patch_subtree_with<'a>(root: &Node, to: impl Into<Target<'a>>, options: &PatchOptions) -> Result<Node, PatchError> {
	patch(root, to, &options.clone().children_only(true))
}

/// Fragments and documents have nothing of their own to patch; their content does.
fn unwrap_root(root: &Node) -> Result<Node, PatchError> {
	if let Some(fragment) = root.dyn_ref::<DocumentFragment>() {
		return Ok(fragment.first_child().unwrap_or_else(|| root.clone()));
	}
	if let Some(document) = root.dyn_ref::<Document>() {
		return document.document_element().map(Into::into).ok_or(PatchError::EmptyTarget);
	}
	Ok(root.clone())
}
