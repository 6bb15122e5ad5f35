//! The child-list walk.
//!
//! Source and target children are visited with two cursors over the *live* child lists:
//! `index` into the source, and `index - offset` into the target.
//! Target children that get adopted into the source leave the target list, which is what `offset` accounts for.

use crate::{
	error::{HostResultExt, PatchError},
	kind::NodeKind,
	logged,
	node::{is_settled, patch_node},
	options::PatchOptions,
};
use tracing::{debug, instrument, trace, trace_span};
use wasm_bindgen::JsCast;
use web_sys::{css, Element, Node};

/// Brings `source`'s child list in line with `target`'s, recursing into children, and returns `source`.
///
/// `source` itself (tag, attributes) is not touched.
///
/// An empty `source` is left empty: there is nothing to reuse, and [`patch_node`] fills childless elements wholesale.
#[instrument(level = "trace", skip_all, fields(source = %source.node_name()))]
pub fn patch_element(source: &Element, target: &Node, options: &PatchOptions) -> Result<Element, PatchError> {
	let parent: &Node = source.as_ref();
	if is_settled(parent, target)? {
		trace!("Already equal.");
		return Ok(source.clone());
	}
	if !parent.has_child_nodes() {
		trace!("No children to patch.");
		return Ok(source.clone());
	}

	let sources = parent.child_nodes();
	let targets = target.child_nodes();
	let (mut index, mut offset) = (0_u32, 0_u32);
	loop {
		let (a, b) = match (sources.get(index), targets.get(index - offset)) {
			(None, None) => break,
			(Some(a), None) => {
				trace!(index, node = %a.node_name(), "Removing surplus child.");
				parent.remove_child(&a).host("remove_child")?;
				continue;
			}
			(None, Some(b)) => {
				trace!(index, node = %b.node_name(), "Appending missing child.");
				parent.append_child(&b).host("append_child")?;
				index += 1;
				offset += 1;
				continue;
			}
			(Some(a), Some(b)) => (a, b),
		};

		let span = trace_span!("Patching child", index, offset, a = %a.node_name(), b = %b.node_name());
		let _enter = span.enter();

		let a_kind = NodeKind::of(&a);
		let b_kind = NodeKind::of(&b);

		if !a_kind.is_element() && !b_kind.is_element() && a_kind == b_kind {
			trace!(data = logged(&b.node_value().unwrap_or_default()), "Copying character data.");
			a.set_node_value(b.node_value().as_deref());
			index += 1;
			continue;
		}

		let a = if a_kind.is_element() || b_kind.is_element() {
			match match_keyed(source, &a, &b, options)? {
				Keyed::Patch(a) => a,
				Keyed::Adopted => {
					index += 1;
					offset += 1;
					continue;
				}
				Keyed::Retry => continue,
			}
		} else {
			a
		};

		if let (Some(a), Some(b)) = (a.dyn_ref::<Element>(), b.dyn_ref::<Element>()) {
			if a.has_child_nodes() {
				patch_element(a, b, options)?;
			}
		}

		let patched = patch_node(&a, &b)?;
		if !patched.is_same_node(Some(&a)) && a.parent_node().map_or(false, |p| p.is_same_node(Some(parent))) {
			trace!("Removing superseded child.");
			parent.remove_child(&a).host("remove_child")?;
		}
		index += 1;
	}

	Ok(source.clone())
}

/// How keyed matching resolved the current pair.
enum Keyed {
	/// Patch this node (the current source child or a relocated match) against the target child.
	Patch(Node),
	/// The target child was moved into the source and needs no further work; both cursors advance.
	Adopted,
	/// The source child was removed; compare the same target child with the next source child.
	Retry,
}

/// Only the first key whose values differ between `a` and `b` decides; later keys are never consulted.
fn match_keyed(parent: &Element, a: &Node, b: &Node, options: &PatchOptions) -> Result<Keyed, PatchError> {
	let a_element = a.dyn_ref::<Element>();
	let b_element = b.dyn_ref::<Element>();

	for key in options.keys() {
		let a_value = a_element.and_then(|a| a.get_attribute(key));
		let b_value = b_element.and_then(|b| b.get_attribute(key));
		if a_value == b_value {
			continue;
		}

		return match (a_value, b_value) {
			(Some(_), Some(b_value)) => match find_keyed(parent, key, &b_value)? {
				Some(found) => {
					debug!(key = %key, value = logged(&b_value), "Relocating keyed element.");
					let found: Node = found.into();
					parent.insert_before(&found, Some(a)).host("insert_before")?;
					Ok(Keyed::Patch(found))
				}
				None if a.next_sibling().is_some() => {
					debug!(key = %key, value = logged(&b_value), "Inserting keyed element.");
					parent.insert_before(b, Some(a)).host("insert_before")?;
					Ok(Keyed::Adopted)
				}
				None => {
					debug!(key = %key, value = logged(&b_value), "Replacing last child with keyed element.");
					parent.replace_child(b, a).host("replace_child")?;
					Ok(Keyed::Adopted)
				}
			},
			(Some(a_value), None) => {
				let elsewhere = find_keyed_all(parent, key, &a_value)?.into_iter().any(|other| !a.is_same_node(Some(&other)));
				if !elsewhere {
					debug!(key = %key, value = logged(&a_value), "Removing keyed element without counterpart.");
					parent.remove_child(a).host("remove_child")?;
					Ok(Keyed::Retry)
				} else if b_element.is_some() {
					// `a` slides to the next position and meets the next target child there.
					debug!(key = %key, value = logged(&a_value), "Key is also used elsewhere. Inserting unkeyed element before it.");
					parent.insert_before(b, Some(a)).host("insert_before")?;
					Ok(Keyed::Adopted)
				} else {
					Ok(Keyed::Patch(a.clone()))
				}
			}
			// The target child carries a key the source child lacks: positional.
			_ => Ok(Keyed::Patch(a.clone())),
		};
	}

	Ok(Keyed::Patch(a.clone()))
}

fn selector(key: &str, value: &str) -> String {
	format!("[{}=\"{}\"]", css::escape(key), css::escape(value))
}

fn find_keyed(parent: &Element, key: &str, value: &str) -> Result<Option<Element>, PatchError> {
	parent.query_selector(&selector(key, value)).host("query_selector")
}

fn find_keyed_all(parent: &Element, key: &str, value: &str) -> Result<Vec<Node>, PatchError> {
	let found = parent.query_selector_all(&selector(key, value)).host("query_selector_all")?;
	Ok((0..found.length()).filter_map(|i| found.get(i)).collect())
}
