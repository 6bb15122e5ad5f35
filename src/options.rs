/// Configures [`patch`](`crate::patch`).
///
/// ```rust
/// use dom_morph::PatchOptions;
///
/// let options = PatchOptions::new().with_keys(["id", "key"]).children_only(true);
/// assert_eq!(options.keys(), ["id", "key"]);
/// assert!(options.is_children_only());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
	keys: Vec<String>,
	children_only: bool,
}
impl Default for PatchOptions {
	fn default() -> Self {
		Self {
			keys: vec!["id".to_owned()],
			children_only: false,
		}
	}
}
impl PatchOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Attribute names that identify an element across positions, in priority order.
	///
	/// For each pair of children, only the first key whose values differ decides whether an element is moved, inserted or removed.
	///
	/// An empty list is accepted and makes matching purely positional.
	#[must_use]
	pub fn with_keys<I>(mut self, keys: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<String>,
	{
		self.keys = keys.into_iter().map(Into::into).collect();
		self
	}

	/// When set, the root itself (tag and attributes) is left alone and only its children are patched.
	#[must_use]
	pub fn children_only(mut self, children_only: bool) -> Self {
		self.children_only = children_only;
		self
	}

	#[must_use]
	pub fn keys(&self) -> &[String] {
		&self.keys
	}

	#[must_use]
	pub fn is_children_only(&self) -> bool {
		self.children_only
	}
}
