/// Per-selection configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOptions {
	/// Iff `true`, reading a selection that has no enclosing scope yields [`None`]
	/// instead of a [`MissingScopeError`](`crate::MissingScopeError`).
	pub optional: bool,
}

impl SelectOptions {
	/// The default: Selecting outside of a mounted scope is an error.
	pub const REQUIRED: Self = Self { optional: false };

	/// Selecting outside of a mounted scope yields [`None`].
	pub const OPTIONAL: Self = Self { optional: true };
}
