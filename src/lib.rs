//! Morphs a live DOM subtree into a target tree or HTML string, in place and in a single greedy pass.
//!
//! Nodes are reused wherever their tag (and [key](`PatchOptions::with_keys`)) allows it,
//! so focus, caret position, pending input and attached listeners survive the update.
//!
//! See [`patch`] and [`patch_subtree`].

#![doc(html_root_url = "https://docs.rs/dom-morph/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod attributes;
pub mod diff;
mod error;
pub mod kind;
mod markup;
#[cfg(feature = "navigation")]
pub mod navigate;
pub mod node;
mod options;
mod root;

pub use error::PatchError;
pub use kind::{ControlKind, NodeKind};
pub use markup::{parse_fragment, MarkupContext, Target};
pub use options::PatchOptions;
pub use root::{patch, patch_subtree, patch_subtree_with};

/// Page content as it may appear in log output.
///
/// Redacted unless the `dangerous-logging` feature is enabled.
pub(crate) fn logged(content: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		content
	} else {
		"[redacted]"
	}
}
