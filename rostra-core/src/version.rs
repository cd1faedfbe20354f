//! Logical time of a [`Scope`](`crate::Scope`).

use std::fmt::{self, Display, Formatter};

/// Per-scope version stamp. Strictly increasing, advanced exactly once per broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(i64);

impl Version {
	/// Sentinel meaning "no scope has been mounted".
	///
	/// Never carried by a broadcast.
	pub const UNBOUND: Self = Self(-1);

	/// The version of a freshly mounted scope, before its first broadcast.
	pub const INITIAL: Self = Self(0);

	/// The successor of this version.
	///
	/// # Panics
	///
	/// Iff the counter overflows.
	#[must_use]
	pub fn next(self) -> Self {
		Self(
			self.0
				.checked_add(1)
				.expect("infallible within reasonable time"),
		)
	}

	/// Whether this is [`Version::UNBOUND`].
	#[must_use]
	pub fn is_unbound(self) -> bool {
		self == Self::UNBOUND
	}

	/// The raw counter value.
	#[must_use]
	pub fn get(self) -> i64 {
		self.0
	}
}

impl Display for Version {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		if self.is_unbound() {
			f.write_str("unbound")
		} else {
			write!(f, "v{}", self.0)
		}
	}
}
