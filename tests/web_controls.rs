#![cfg(target_arch = "wasm32")]

use dom_morph::{patch, PatchOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Element, HtmlInputElement, HtmlTextAreaElement, Node};

wasm_bindgen_test_configure!(run_in_browser);

use web_fixture_::{child, el, init, outer_html};

fn input(node: &Node) -> HtmlInputElement {
	node.clone().dyn_into().unwrap()
}

fn morph(a: &Element, to: &str) -> Node {
	patch(a, to, &PatchOptions::default()).unwrap()
}

#[wasm_bindgen_test]
fn live_checked_state_is_restored() {
	init();
	let a = el(r#"<input type="checkbox" checked>"#);
	let live = input(&a);
	live.set_checked(false);
	assert!(live.has_attribute("checked"));

	let result = morph(&a, r#"<input type="checkbox" checked>"#);

	assert!(result.is_same_node(Some(&a)));
	assert!(input(&result).checked());
	assert_eq!(input(&result).get_attribute("checked").as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn checks_and_unchecks() {
	init();
	let a = el(r#"<input type="checkbox">"#);

	let result = morph(&a, r#"<input type="checkbox" checked>"#);
	assert!(input(&result).checked());
	assert_eq!(outer_html(&result), r#"<input type="checkbox" checked="">"#);

	let result = morph(&a, r#"<input type="checkbox">"#);
	assert!(!input(&result).checked());
	assert_eq!(outer_html(&result), r#"<input type="checkbox">"#);
}

#[wasm_bindgen_test]
fn radio_is_checkable_too() {
	init();
	let a = el(r#"<input type="radio" name="r">"#);
	let result = morph(&a, r#"<input type="radio" name="r" checked>"#);
	assert!(input(&result).checked());
}

#[wasm_bindgen_test]
fn disables_and_enables() {
	init();
	let a = el("<input>");

	let result = morph(&a, "<input disabled>");
	assert!(input(&result).disabled());
	assert_eq!(outer_html(&result), r#"<input disabled="">"#);

	let result = morph(&a, "<input>");
	assert!(!input(&result).disabled());
	assert_eq!(outer_html(&result), "<input>");
}

#[wasm_bindgen_test]
fn input_value_is_added_changed_and_removed() {
	init();
	let a = el("<input>");

	let result = morph(&a, r#"<input value="foo">"#);
	assert_eq!(input(&result).value(), "foo");
	assert_eq!(outer_html(&result), r#"<input value="foo">"#);

	let result = morph(&a, r#"<input value="bar">"#);
	assert_eq!(input(&result).value(), "bar");
	assert_eq!(outer_html(&result), r#"<input value="bar">"#);

	let result = morph(&a, "<input>");
	assert_eq!(input(&result).value(), "");
	assert_eq!(outer_html(&result), "<input>");
}

#[wasm_bindgen_test]
fn typed_value_is_overwritten() {
	init();
	let a = el(r#"<input value="foo">"#);
	input(&a).set_value("typed");

	let result = morph(&a, r#"<input value="foo">"#);

	assert!(result.is_same_node(Some(&a)));
	assert_eq!(input(&result).value(), "foo");
}

#[wasm_bindgen_test]
fn textarea_value() {
	init();
	let a = el("<textarea></textarea>");

	let result = morph(&a, "<textarea>foo</textarea>");
	let textarea: HtmlTextAreaElement = result.clone().dyn_into().unwrap();
	assert_eq!(textarea.value(), "foo");
	assert_eq!(outer_html(&result), "<textarea>foo</textarea>");

	let result = morph(&a, "<textarea>bar</textarea>");
	assert_eq!(textarea.value(), "bar");
	assert_eq!(outer_html(&result), "<textarea>bar</textarea>");

	let result = morph(&a, "<textarea></textarea>");
	assert_eq!(textarea.value(), "");
	assert_eq!(outer_html(&result), "<textarea></textarea>");
}

#[wasm_bindgen_test]
fn typed_textarea_value_is_overwritten() {
	init();
	let a = el("<textarea>foo</textarea>");
	let textarea: HtmlTextAreaElement = a.clone().dyn_into().unwrap();
	textarea.set_value("typed");

	morph(&a, "<textarea>foo</textarea>");

	assert_eq!(textarea.value(), "foo");
}

#[wasm_bindgen_test]
fn nested_controls_disable_the_equality_shortcut() {
	init();
	let a = el(r#"<form><label>Done</label><input type="checkbox" checked></form>"#);
	let checkbox = input(&child(&a, 1));
	checkbox.set_checked(false);

	let result = morph(&a, r#"<form><label>Done</label><input type="checkbox" checked></form>"#);

	assert!(result.is_same_node(Some(&a)));
	assert!(checkbox.checked());
	assert!(child(&result, 1).is_same_node(Some(&checkbox)));
}

#[wasm_bindgen_test]
fn template_content_is_replaced() {
	init();
	let a = el("<template><p>1</p></template>");

	let result = morph(&a, "<template><p>2</p></template>");

	assert!(result.is_same_node(Some(&a)));
	assert_eq!(result.dyn_ref::<Element>().unwrap().inner_html(), "<p>2</p>");
}

#[wasm_bindgen_test]
fn retagged_element_takes_target_control_state() {
	init();
	let a = el("<span></span>");

	let result = morph(&a, r#"<input type="checkbox" checked disabled>"#);

	assert!(!result.is_same_node(Some(&a)));
	let checkbox = input(&result);
	assert!(checkbox.checked());
	assert!(checkbox.disabled());
	assert_eq!(checkbox.get_attribute("type").as_deref(), Some("checkbox"));
	assert_eq!(checkbox.get_attribute("checked").as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn textarea_disabled_state() {
	init();
	let a = el("<textarea>x</textarea>");
	let textarea: HtmlTextAreaElement = a.clone().dyn_into().unwrap();

	let result = morph(&a, "<textarea disabled>x</textarea>");
	assert!(textarea.disabled());
	assert_eq!(outer_html(&result), r#"<textarea disabled="">x</textarea>"#);

	let result = morph(&a, "<textarea>x</textarea>");
	assert!(!textarea.disabled());
	assert_eq!(outer_html(&result), "<textarea>x</textarea>");
}
