#![cfg(target_arch = "wasm32")]
#![cfg(feature = "navigation")]

use dom_morph::navigate::{NavigationOptions, Navigator};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{window, Event, MouseEvent, MouseEventInit};

wasm_bindgen_test_configure!(run_in_browser);

use web_fixture_::mount;

/// Clicks a fresh link to `href` and reports whether the default action was prevented by the time the link saw the event.
///
/// The link itself always prevents the default afterwards, so that the test page is never left.
fn click(href: &str, configure: impl FnOnce(&MouseEventInit)) -> bool {
	let container = mount(&format!(r#"<a href="{}">Go</a>"#, href));
	let link = container.first_element_child().unwrap();

	let seen = Rc::new(Cell::new(None));
	let listener = {
		let seen = Rc::clone(&seen);
		Closure::wrap(Box::new(move |event: Event| {
			seen.set(Some(event.default_prevented()));
			event.prevent_default();
		}) as Box<dyn FnMut(Event)>)
	};
	link.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref()).unwrap();

	let init = MouseEventInit::new();
	init.set_bubbles(true);
	init.set_cancelable(true);
	configure(&init);
	let event = MouseEvent::new_with_mouse_event_init_dict("click", &init).unwrap();
	link.dispatch_event(&event).unwrap();

	container.remove();
	seen.get().expect("The link didn't see the click.")
}

/// A same-origin URL that `fetch` rejects outright (it carries credentials), so no page is ever loaded.
fn unfetchable_same_origin_href() -> String {
	let origin = window().unwrap().location().origin().unwrap();
	format!("{}/elsewhere", origin.replacen("://", "://user:secret@", 1))
}

#[wasm_bindgen_test]
fn plain_same_origin_click_is_taken_over() {
	let navigator = Navigator::install_global(NavigationOptions::default()).unwrap();
	assert!(click(&unfetchable_same_origin_href(), |_| ()));
	drop(navigator);
}

#[wasm_bindgen_test]
fn modified_click_is_left_alone() {
	let navigator = Navigator::install_global(NavigationOptions::default()).unwrap();
	assert!(!click(&unfetchable_same_origin_href(), |init| init.set_ctrl_key(true)));
	assert!(!click(&unfetchable_same_origin_href(), |init| init.set_button(1)));
	drop(navigator);
}

#[wasm_bindgen_test]
fn cross_origin_click_is_left_alone() {
	let navigator = Navigator::install_global(NavigationOptions::default()).unwrap();
	assert!(!click("https://example.invalid/", |_| ()));
	drop(navigator);
}

#[wasm_bindgen_test]
fn dropped_navigator_stops_intercepting() {
	drop(Navigator::install_global(NavigationOptions::default()).unwrap());
	assert!(!click(&unfetchable_same_origin_href(), |_| ()));
}
