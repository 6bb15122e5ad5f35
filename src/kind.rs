use wasm_bindgen::JsCast;
use web_sys::{Element, Node};

/// What the algorithm needs to know about a node, resolved once per visit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
	Element { tag: String, control: ControlKind },
	Text,
	Comment,
	Fragment,
	Document,
	/// Doctypes, processing instructions and anything else that has neither children nor attributes worth patching.
	Other,
}
impl NodeKind {
	#[must_use]
	pub fn of(node: &Node) -> Self {
		match node.node_type() {
			Node::ELEMENT_NODE => match node.dyn_ref::<Element>() {
				Some(element) => Self::Element {
					tag: element.node_name(),
					control: ControlKind::of(element),
				},
				None => Self::Other,
			},
			Node::TEXT_NODE | Node::CDATA_SECTION_NODE => Self::Text,
			Node::COMMENT_NODE => Self::Comment,
			Node::DOCUMENT_FRAGMENT_NODE => Self::Fragment,
			Node::DOCUMENT_NODE => Self::Document,
			_ => Self::Other,
		}
	}

	#[must_use]
	pub fn is_element(&self) -> bool {
		matches!(self, Self::Element { .. })
	}

	/// Text or comment, i.e. a node that is fully described by its character data.
	#[must_use]
	pub fn is_character_data(&self) -> bool {
		matches!(self, Self::Text | Self::Comment)
	}

	#[must_use]
	pub fn control(&self) -> ControlKind {
		match self {
			Self::Element { control, .. } => *control,
			_ => ControlKind::None,
		}
	}
}

/// Elements whose meaningful state is not (fully) visible in their attributes or child list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
	None,
	/// `<input type="checkbox">` and `<input type="radio">`.
	Checkable,
	/// Any other `<input>`.
	TextInput,
	TextArea,
	/// `<template>`, whose content lives in a separate fragment that equality checks don't see.
	Template,
}
impl ControlKind {
	/// Matches descendants that disqualify a subtree from the deep-equality shortcut.
	pub const SELECTOR: &'static str = "input, textarea, template";

	#[must_use]
	pub fn of(element: &Element) -> Self {
		let tag = element.node_name();
		if tag.eq_ignore_ascii_case("INPUT") {
			Self::classify(&tag, element.get_attribute("type").as_deref())
		} else {
			Self::classify(&tag, None)
		}
	}

	/// `input_type` is the declared `type` attribute, if any. It is only consulted for `<input>`.
	#[must_use]
	pub fn classify(tag: &str, input_type: Option<&str>) -> Self {
		if tag.eq_ignore_ascii_case("INPUT") {
			match input_type.map(str::trim) {
				Some(t) if t.eq_ignore_ascii_case("checkbox") || t.eq_ignore_ascii_case("radio") => Self::Checkable,
				_ => Self::TextInput,
			}
		} else if tag.eq_ignore_ascii_case("TEXTAREA") {
			Self::TextArea
		} else if tag.eq_ignore_ascii_case("TEMPLATE") {
			Self::Template
		} else {
			Self::None
		}
	}

	#[must_use]
	pub fn is_stateful(self) -> bool {
		self != Self::None
	}
}
