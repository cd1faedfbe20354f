use thiserror::Error;

/// A non-optional [`Selection`](`crate::Selection`) was read without an enclosing mounted scope.
///
/// This is a programming error in the host tree: The consumer was mounted outside of the
/// store it selects from. Pass [`SelectOptions::OPTIONAL`](`crate::SelectOptions::OPTIONAL`)
/// where that is intended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("`{store}` was selected outside of a mounted scope.")]
pub struct MissingScopeError {
	store: &'static str,
}

impl MissingScopeError {
	pub(crate) fn new(store: &'static str) -> Self {
		Self { store }
	}

	/// The name of the store that was selected from.
	#[must_use]
	pub fn store(&self) -> &'static str {
		self.store
	}
}
