//! Same-origin link interception: instead of a full page load, the linked page is fetched and its `<body>` morphed into the current one.
//!
//! ```rust,no_run
//! use dom_morph::navigate::{NavigationOptions, Navigator};
//!
//! // Keep the returned value alive for as long as links should be intercepted.
//! let navigator = Navigator::install_global(NavigationOptions::default()).unwrap();
//! # drop(navigator);
//! ```

use crate::{
	error::{HostResultExt, PatchError},
	logged,
	options::PatchOptions,
	root::patch_subtree_with,
};
use core::{convert::TryFrom, time::Duration};
use js_sys::Function;
use std::rc::Rc;
use tracing::{debug, error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{AbortController, Element, HtmlAnchorElement, HtmlElement, MouseEvent, RequestInit, Response, Window};

/// Links that are followed in place: no explicit browsing context and no download.
pub const LINK_SELECTOR: &str = "a[href]:not([target]):not([download])";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationOptions {
	timeout: Duration,
	patch: PatchOptions,
}
impl Default for NavigationOptions {
	fn default() -> Self {
		Self {
			timeout: Duration::from_millis(8000),
			patch: PatchOptions::default(),
		}
	}
}
impl NavigationOptions {
	/// After this long, the page request is aborted and the click has no effect.
	#[must_use]
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Keys used when morphing the fetched body. The `children_only` flag is ignored: `<body>` itself is never replaced.
	#[must_use]
	pub fn with_patch_options(mut self, patch: PatchOptions) -> Self {
		self.patch = patch;
		self
	}

	#[must_use]
	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	#[must_use]
	pub fn patch_options(&self) -> &PatchOptions {
		&self.patch
	}
}

/// The parts of a click that decide whether it's a plain activation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClickFilter {
	pub content_editable: bool,
	pub default_prevented: bool,
	/// [`MouseEvent::button`]: 0 is the main button.
	pub button: i16,
	pub alt: bool,
	pub ctrl: bool,
	pub meta: bool,
	pub shift: bool,
}
impl ClickFilter {
	#[must_use]
	pub fn of(event: &MouseEvent) -> Self {
		Self {
			content_editable: event
				.target()
				.and_then(|target| target.dyn_into::<HtmlElement>().ok())
				.map_or(false, |target| target.is_content_editable()),
			default_prevented: event.default_prevented(),
			button: event.button(),
			alt: event.alt_key(),
			ctrl: event.ctrl_key(),
			meta: event.meta_key(),
			shift: event.shift_key(),
		}
	}

	/// Modified clicks (new tab, download, …) and clicks someone else already handled are left to the browser.
	#[must_use]
	pub fn is_significant(&self) -> bool {
		!(self.content_editable || self.default_prevented || self.button > 0 || self.alt || self.ctrl || self.meta || self.shift)
	}
}

/// Compares serialized origins (scheme, host and port), as given by `Location::origin` and `HtmlAnchorElement::origin`.
#[must_use]
pub fn is_same_origin(current_origin: &str, link_origin: &str) -> bool {
	current_origin != "null" && current_origin == link_origin
}

/// Intercepts link clicks on a [`Window`] while alive.
#[derive(Debug)]
pub struct Navigator {
	window: Window,
	listener: Closure<dyn FnMut(MouseEvent)>,
}
impl Navigator {
	#[instrument(skip_all)]
	pub fn install(window: &Window, options: NavigationOptions) -> Result<Self, PatchError> {
		let options = Rc::new(options);
		let listener_window = window.clone();
		let listener = Closure::wrap(Box::new(move |event: MouseEvent| on_click(&listener_window, &event, &options)) as Box<dyn FnMut(MouseEvent)>);
		window
			.add_event_listener_with_callback_and_bool("click", listener.as_ref().unchecked_ref(), true)
			.host("add_event_listener")?;
		debug!("Installed link interception.");
		Ok(Self { window: window.clone(), listener })
	}

	pub fn install_global(options: NavigationOptions) -> Result<Self, PatchError> {
		Self::install(&web_sys::window().ok_or(PatchError::NoWindow)?, options)
	}
}
impl Drop for Navigator {
	fn drop(&mut self) {
		if let Err(error) = self
			.window
			.remove_event_listener_with_callback_and_bool("click", self.listener.as_ref().unchecked_ref(), true)
		{
			warn!("Could not remove click listener: {:?}", error)
		}
	}
}

fn on_click(window: &Window, event: &MouseEvent, options: &Rc<NavigationOptions>) {
	if !ClickFilter::of(event).is_significant() {
		return trace!("Ignoring modified or handled click.");
	}

	let link = match event
		.target()
		.and_then(|target| target.dyn_into::<Element>().ok())
		.and_then(|target| target.closest(LINK_SELECTOR).ok().flatten())
		.and_then(|link| link.dyn_into::<HtmlAnchorElement>().ok())
	{
		Some(link) => link,
		None => return,
	};

	match window.location().origin() {
		Ok(origin) if is_same_origin(&origin, &link.origin()) => (),
		Ok(_) => return trace!("Leaving cross-origin link to the browser."),
		Err(error) => return warn!("Could not read the current origin: {:?}", error),
	}

	event.prevent_default();
	let href = link.href();
	debug!(href = logged(&href), "Following link in place.");
	spawn_local(follow(window.clone(), href, Rc::clone(options)));
}

async fn follow(window: Window, href: String, options: Rc<NavigationOptions>) {
	if let Err(error) = try_follow(&window, &href, &options).await {
		error!(href = logged(&href), "Navigation failed: {}", error);
	}
}

async fn try_follow(window: &Window, href: &str, options: &NavigationOptions) -> Result<(), PatchError> {
	let markup = fetch_markup(window, href, options.timeout).await?;

	let document = window.document().ok_or(PatchError::NoOwnerDocument)?;
	let page = document.create_element("html").host("create_element")?;
	page.set_inner_html(&markup);
	let body = page.query_selector("body").host("query_selector")?.ok_or(PatchError::EmptyTarget)?;
	let current = document.body().ok_or(PatchError::EmptyTarget)?;

	patch_subtree_with(&current, body, &options.patch)?;
	Ok(())
}

/// Fetches `href` as text, aborting the request after `timeout`.
async fn fetch_markup(window: &Window, href: &str, timeout: Duration) -> Result<String, PatchError> {
	let controller = AbortController::new().host("AbortController::new")?;
	let init = RequestInit::new();
	init.set_signal(Some(&controller.signal()));

	let abort: Closure<dyn FnMut()> = Closure::once(move || controller.abort());
	let handle = window
		.set_timeout_with_callback_and_timeout_and_arguments_0(abort.as_ref().unchecked_ref::<Function>(), timeout_millis(timeout))
		.host("set_timeout")?;
	let response = JsFuture::from(window.fetch_with_str_and_init(href, &init)).await;
	window.clear_timeout_with_handle(handle);
	drop(abort);

	let response: Response = response.host("fetch")?.dyn_into().host("fetch")?;
	let text = JsFuture::from(response.text().host("Response::text")?).await.host("Response::text")?;
	match text.as_string() {
		Some(text) => Ok(text),
		None => Err(PatchError::Host { operation: "Response::text", error: text }),
	}
}

fn timeout_millis(timeout: Duration) -> i32 {
	i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
	use super::{is_same_origin, timeout_millis, ClickFilter, NavigationOptions};
	use core::time::Duration;

	#[test]
	fn plain_click_is_significant() {
		assert!(ClickFilter::default().is_significant());
	}

	#[test]
	fn modified_clicks_are_not() {
		let plain = ClickFilter::default();
		for filter in &[
			ClickFilter { alt: true, ..plain },
			ClickFilter { ctrl: true, ..plain },
			ClickFilter { meta: true, ..plain },
			ClickFilter { shift: true, ..plain },
			ClickFilter { button: 1, ..plain },
			ClickFilter { button: 2, ..plain },
			ClickFilter { content_editable: true, ..plain },
			ClickFilter { default_prevented: true, ..plain },
		] {
			assert!(!filter.is_significant(), "{:?}", filter);
		}
	}

	#[test]
	fn origin_includes_scheme_and_port() {
		assert!(is_same_origin("https://example.org", "https://example.org"));
		assert!(!is_same_origin("https://example.org", "https://cdn.example.org"));
		assert!(!is_same_origin("https://example.org", "http://example.org"));
		assert!(!is_same_origin("https://example.org", "https://example.org:8443"));
	}

	#[test]
	fn opaque_origins_never_match() {
		assert!(!is_same_origin("null", "null"));
	}

	#[test]
	fn default_timeout() {
		assert_eq!(NavigationOptions::default().timeout(), Duration::from_secs(8));
		assert_eq!(timeout_millis(NavigationOptions::default().timeout()), 8000);
	}

	#[test]
	fn huge_timeouts_saturate() {
		assert_eq!(timeout_millis(Duration::from_secs(u64::MAX)), i32::MAX);
	}
}
