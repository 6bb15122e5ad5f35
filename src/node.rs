use crate::{
	attributes::sync_attributes,
	error::{HostResultExt, PatchError},
	kind::{ControlKind, NodeKind},
	logged,
};
use tracing::{instrument, trace};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement, Node};

/// `true` iff `source` can be kept as-is for `target`: deep-equal and without state that equality can't see.
pub(crate) fn is_settled(source: &Node, target: &Node) -> Result<bool, PatchError> {
	if !source.is_equal_node(Some(target)) {
		return Ok(false);
	}
	match source.dyn_ref::<Element>() {
		Some(element) => Ok(!holds_state(element)?),
		None => Ok(true),
	}
}

/// Whether `element` is, or contains, a [stateful control](`ControlKind::is_stateful`).
pub(crate) fn holds_state(element: &Element) -> Result<bool, PatchError> {
	Ok(ControlKind::of(element).is_stateful() || element.query_selector(ControlKind::SELECTOR).host("query_selector")?.is_some())
}

/// Patches a single node in place, or replaces it if its kind or tag can't be morphed.
///
/// Returns the node now standing for `source`.
/// If that isn't `source`, `source` may still be attached right after it, and it's up to the caller to remove it.
#[instrument(level = "trace", skip_all, fields(source = %source.node_name(), target = %target.node_name()))]
pub fn patch_node(source: &Node, target: &Node) -> Result<Node, PatchError> {
	if is_settled(source, target)? {
		trace!("Already equal.");
		return Ok(source.clone());
	}

	let source_kind = NodeKind::of(source);
	let target_kind = NodeKind::of(target);

	match (source.dyn_ref::<Element>(), target.dyn_ref::<Element>()) {
		(Some(source), Some(target)) => patch_element_node(source, target, &source_kind, &target_kind).map(Into::into),
		_ if source_kind.is_character_data() && source_kind == target_kind => {
			trace!(data = logged(&target.node_value().unwrap_or_default()), "Copying character data.");
			source.set_node_value(target.node_value().as_deref());
			Ok(source.clone())
		}
		_ => {
			let parent = source.parent_node();
			let document = source.owner_document().ok_or(PatchError::NoOwnerDocument)?;
			let data = target.node_value().unwrap_or_default();
			let fresh: Option<Node> = match target_kind {
				NodeKind::Text => Some(document.create_text_node(&data).into()),
				NodeKind::Comment => Some(document.create_comment(&data).into()),
				_ => None,
			};
			match fresh {
				Some(fresh) => {
					trace!(kind = ?target_kind, "Inserting fresh character data node.");
					if let Some(parent) = parent {
						parent.insert_before(&fresh, Some(source)).host("insert_before")?;
					}
					Ok(fresh)
				}
				None => {
					trace!(from = ?source_kind, to = ?target_kind, "Replacing with a clone of the target.");
					let clone = target.clone_node_with_deep(true).host("clone_node")?;
					if let Some(parent) = parent {
						parent.replace_child(&clone, source).host("replace_child")?;
					}
					Ok(clone)
				}
			}
		}
	}
}

fn patch_element_node(source: &Element, target: &Element, source_kind: &NodeKind, target_kind: &NodeKind) -> Result<Element, PatchError> {
	let (source, source_control) = if source.node_name() == target.node_name() {
		(source.clone(), source_kind.control())
	} else {
		// The replacement has the target's tag, but none of its attributes yet.
		(retag(source, target)?, target_kind.control())
	};

	sync_control_state(&source, target, source_control, target_kind.control())?;
	sync_attributes(&source, target)?;

	if !source.has_child_nodes() {
		let markup = target.inner_html();
		if !markup.is_empty() {
			trace!(markup = logged(&markup), "Copying inner markup wholesale.");
			source.set_inner_html(&markup);
		}
	}

	Ok(source)
}

/// Swaps `source` for a new element shaped like `target`, carrying over `source`'s inner markup.
fn retag(source: &Element, target: &Element) -> Result<Element, PatchError> {
	trace!(from = %source.node_name(), to = %target.node_name(), "Replacing element with a different tag.");
	let document = source.owner_document().ok_or(PatchError::NoOwnerDocument)?;
	let element = document
		.create_element_ns(target.namespace_uri().as_deref(), &target.local_name())
		.host("create_element_ns")?;
	element.set_inner_html(&source.inner_html());
	if let Some(parent) = source.parent_node() {
		parent.replace_child(&element, source).host("replace_child")?;
	}
	Ok(element)
}

/// Live `value`/`checked`/`disabled` can drift from the declared attributes through user input, so they're compared directly.
///
/// `source` and `target` share a tag here, so `target_control` decides which state exists at all.
/// `checked` is synced if either side declares a checkable `type`.
///
/// Boolean state switched on is mirrored into the declared attribute on **both** sides,
/// so that parent-level equality checks see the two as equal afterwards.
fn sync_control_state(source: &Element, target: &Element, source_control: ControlKind, target_control: ControlKind) -> Result<(), PatchError> {
	match target_control {
		ControlKind::Checkable | ControlKind::TextInput => {
			let (a, b) = match (source.dyn_ref::<HtmlInputElement>(), target.dyn_ref::<HtmlInputElement>()) {
				(Some(a), Some(b)) => (a, b),
				_ => return Ok(()),
			};
			if a.value() != b.value() {
				trace!(value = logged(&b.value()), "Syncing input value.");
				a.set_value(&b.value());
			}
			if (source_control == ControlKind::Checkable || target_control == ControlKind::Checkable) && a.checked() != b.checked() {
				trace!(checked = b.checked(), "Syncing checked state.");
				a.set_checked(b.checked());
				if a.checked() {
					mirror(source, target, "checked")?;
				}
			}
			sync_disabled(source, target, a.disabled(), b.disabled(), |disabled| a.set_disabled(disabled))
		}
		ControlKind::TextArea => {
			let (a, b) = match (source.dyn_ref::<HtmlTextAreaElement>(), target.dyn_ref::<HtmlTextAreaElement>()) {
				(Some(a), Some(b)) => (a, b),
				_ => return Ok(()),
			};
			if a.value() != b.value() {
				trace!(value = logged(&b.value()), "Syncing textarea value.");
				a.set_value(&b.value());
			}
			sync_disabled(source, target, a.disabled(), b.disabled(), |disabled| a.set_disabled(disabled))
		}
		// Template content is carried over with the inner markup.
		ControlKind::Template | ControlKind::None => Ok(()),
	}
}

fn sync_disabled(source: &Element, target: &Element, current: bool, wanted: bool, set: impl FnOnce(bool)) -> Result<(), PatchError> {
	if current == wanted {
		return Ok(());
	}
	trace!(disabled = wanted, "Syncing disabled state.");
	set(wanted);
	if wanted {
		mirror(source, target, "disabled")?;
	}
	Ok(())
}

fn mirror(source: &Element, target: &Element, name: &str) -> Result<(), PatchError> {
	source.set_attribute(name, "").host("set_attribute")?;
	target.set_attribute(name, "").host("set_attribute")
}
