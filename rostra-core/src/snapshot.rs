use std::{
	fmt::{self, Debug, Formatter},
	rc::Rc,
};

use crate::Version;

/// The state of a [`Scope`](`crate::Scope`) at one point in its logical time.
///
/// `value` always corresponds to `version`. The pair is only ever replaced as a whole.
pub struct Snapshot<V: ?Sized> {
	/// When `value` was published.
	pub version: Version,
	/// The aggregate as produced by the owner of the scope.
	pub value: Rc<V>,
}

impl<V: ?Sized> Snapshot<V> {
	pub(crate) fn new(version: Version, value: Rc<V>) -> Self {
		Self { version, value }
	}
}

impl<V: ?Sized> Clone for Snapshot<V> {
	fn clone(&self) -> Self {
		Self {
			version: self.version,
			value: Rc::clone(&self.value),
		}
	}
}

impl<V: ?Sized + Debug> Debug for Snapshot<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Snapshot")
			.field("version", &self.version)
			.field("value", &&*self.value)
			.finish()
	}
}
