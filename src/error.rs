use wasm_bindgen::{JsCast, JsValue};

/// Failures that end a patch early.
///
/// There is no rollback: when one of these is returned, the source tree stays in whatever partially patched state it had reached.
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
	/// A DOM primitive threw.
	#[error("DOM operation `{operation}` failed: {error:?}")]
	Host { operation: &'static str, error: JsValue },

	#[error("the node to patch is not part of a document")]
	NoOwnerDocument,

	#[error("the patch target contains no usable node")]
	EmptyTarget,

	/// The markup fallback for attribute `name` parsed, but produced no such attribute.
	#[error("attribute {name:?} could not be recovered from markup")]
	AttributeUnparsable { name: String },

	#[error("no global `window` is available")]
	NoWindow,
}

/// Outcome of the strict attribute setter.
#[derive(Debug)]
pub(crate) enum AttributeError {
	/// The name is invalid for `setAttribute`, but may still be valid in markup.
	Rejected(JsValue),
	Other(JsValue),
}
impl AttributeError {
	pub(crate) fn classify(error: JsValue) -> Self {
		match error.dyn_ref::<web_sys::DomException>() {
			Some(exception) if exception.name() == "InvalidCharacterError" => Self::Rejected(error),
			_ => Self::Other(error),
		}
	}
}

pub(crate) trait HostResultExt<T> {
	fn host(self, operation: &'static str) -> Result<T, PatchError>;
}
impl<T> HostResultExt<T> for Result<T, JsValue> {
	fn host(self, operation: &'static str) -> Result<T, PatchError> {
		self.map_err(|error| PatchError::Host { operation, error })
	}
}
