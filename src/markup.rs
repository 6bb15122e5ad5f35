use crate::{
	error::{HostResultExt, PatchError},
	logged,
};
use std::borrow::Cow;
use tracing::trace;
use wasm_bindgen::JsCast;
use web_sys::{Document, DocumentFragment, Element, HtmlElement, Node};

/// What to morph towards.
///
/// Nodes are consumed: children the source lacks are *moved* out of the target tree, so pass a deep clone if you still need it afterwards.
#[derive(Debug, Clone)]
pub enum Target<'a> {
	/// HTML, parsed in a context that depends on the patched root (see [`MarkupContext`]).
	Markup(Cow<'a, str>),
	Node(Node),
}
impl<'a> From<&'a str> for Target<'a> {
	fn from(markup: &'a str) -> Self {
		Self::Markup(Cow::Borrowed(markup))
	}
}
impl From<String> for Target<'_> {
	fn from(markup: String) -> Self {
		Self::Markup(Cow::Owned(markup))
	}
}
impl From<Node> for Target<'_> {
	fn from(node: Node) -> Self {
		Self::Node(node)
	}
}
impl From<Element> for Target<'_> {
	fn from(element: Element) -> Self {
		Self::Node(element.into())
	}
}
impl From<HtmlElement> for Target<'_> {
	fn from(element: HtmlElement) -> Self {
		Self::Node(element.into())
	}
}
impl From<DocumentFragment> for Target<'_> {
	fn from(fragment: DocumentFragment) -> Self {
		Self::Node(fragment.into())
	}
}

/// How a markup string must be parsed so that its tree shape lines up with the root it is patched into.
///
/// A complete page parses differently from a snippet: inside `<html>` the parser synthesizes `<head>` and `<body>`,
/// inside `<body>` it drops them, and anywhere else the first parsed node stands for the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupContext {
	Document,
	Body,
	Fragment,
}
impl MarkupContext {
	#[must_use]
	pub fn for_node_name(node_name: &str) -> Self {
		match node_name {
			"#document" | "HTML" => Self::Document,
			"BODY" => Self::Body,
			_ => Self::Fragment,
		}
	}

	/// Parses `markup` into a node comparable with a root of this context.
	pub fn parse(self, document: &Document, markup: &str) -> Result<Node, PatchError> {
		trace!(context = ?self, markup = logged(markup), "Parsing target markup.");
		match self {
			Self::Document => wrap(document, "html", markup),
			Self::Body => wrap(document, "body", markup),
			Self::Fragment => parse_fragment(document, markup)?.ok_or(PatchError::EmptyTarget),
		}
	}
}

fn wrap(document: &Document, tag: &str, markup: &str) -> Result<Node, PatchError> {
	let container = document.create_element(tag).host("create_element")?;
	container.set_inner_html(markup);
	Ok(container.into())
}

/// Parses `markup` (trimmed) as a fragment in the context of `document`'s body and returns its first node, if any.
///
/// ```rust,no_run
/// let document = web_sys::window().unwrap().document().unwrap();
/// let list = dom_morph::parse_fragment(&document, "<ul><li>1</li></ul>").unwrap().unwrap();
/// assert_eq!(list.node_name(), "UL");
/// ```
pub fn parse_fragment(document: &Document, markup: &str) -> Result<Option<Node>, PatchError> {
	let range = document.create_range().host("create_range")?;
	let fragment = range.create_contextual_fragment(markup.trim()).host("create_contextual_fragment")?;
	Ok(fragment.first_child())
}

/// Descends from a fragment-container to the node that actually gets patched.
pub(crate) fn unwrap_target(node: Node) -> Result<Node, PatchError> {
	match node.dyn_into::<DocumentFragment>() {
		Ok(fragment) => fragment.first_element_child().map(Into::into).ok_or(PatchError::EmptyTarget),
		Err(node) => Ok(node),
	}
}
