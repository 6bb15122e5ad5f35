use crate::{
	error::{AttributeError, HostResultExt, PatchError},
	logged,
};
use hashbrown::HashMap;
use tracing::{debug, instrument, trace};
use web_sys::{Attr, Element};

/// Makes `source`'s attribute set equal to `target`'s.
///
/// Attributes that [***setAttribute***](https://developer.mozilla.org/en-US/docs/Web/API/Element/setAttribute) rejects
/// (names that are only valid when coming out of the HTML parser, like `@click`) are recovered from parsed markup instead.
#[instrument(level = "trace", skip_all, fields(tag = %source.node_name()))]
pub fn sync_attributes(source: &Element, target: &Element) -> Result<(), PatchError> {
	let wanted = snapshot(target);

	let attributes = source.attributes();
	for i in (0..attributes.length()).rev() {
		let attribute = match attributes.item(i) {
			Some(attribute) => attribute,
			None => continue,
		};
		if !wanted.contains_key(&attribute.name()) {
			trace!(name = %attribute.name(), "Removing attribute.");
			source.remove_attribute_node(&attribute).host("remove_attribute_node")?;
		}
	}

	let target_attributes = target.attributes();
	for i in 0..target_attributes.length() {
		let attribute = match target_attributes.item(i) {
			Some(attribute) => attribute,
			None => continue,
		};
		let (name, value) = (attribute.name(), attribute.value());
		if source.get_attribute(&name).as_deref() == Some(value.as_str()) {
			continue;
		}

		trace!(name = %name, value = logged(&value), "Setting attribute.");
		match source.set_attribute(&name, &value).map_err(AttributeError::classify) {
			Ok(()) => (),
			Err(AttributeError::Rejected(error)) => {
				debug!(name = %name, ?error, "`setAttribute` rejected the name. Recovering the attribute from markup.");
				set_from_markup(source, &name, &value)?
			}
			Err(AttributeError::Other(error)) => return Err(PatchError::Host { operation: "set_attribute", error }),
		}
	}

	Ok(())
}

fn snapshot(element: &Element) -> HashMap<String, String> {
	let attributes = element.attributes();
	(0..attributes.length())
		.filter_map(|i| attributes.item(i))
		.map(|attribute| (attribute.name(), attribute.value()))
		.collect()
}

fn set_from_markup(source: &Element, name: &str, value: &str) -> Result<(), PatchError> {
	let document = source.owner_document().ok_or(PatchError::NoOwnerDocument)?;
	let host = document.create_element("div").host("create_element")?;
	host.set_inner_html(&fallback_markup(name, value));

	let attribute: Attr = host
		.first_element_child()
		.and_then(|span| {
			let attribute = span.get_attribute_node(name)?;
			Some(span.remove_attribute_node(&attribute).map(|_| attribute))
		})
		.ok_or_else(|| PatchError::AttributeUnparsable { name: name.to_owned() })?
		.host("remove_attribute_node")?;

	source.set_attribute_node(&attribute).host("set_attribute_node")?;
	Ok(())
}

/// A minimal element carrying exactly one attribute, for the HTML parser to validate `name` leniently.
fn fallback_markup(name: &str, value: &str) -> String {
	let mut markup = String::with_capacity(name.len() + value.len() + 18);
	markup.push_str("<span ");
	markup.push_str(name);
	markup.push_str("=\"");
	for c in value.chars() {
		match c {
			'&' => markup.push_str("&amp;"),
			'"' => markup.push_str("&quot;"),
			c => markup.push(c),
		}
	}
	markup.push_str("\"></span>");
	markup
}
