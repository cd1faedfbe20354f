//! The Subscriber Registry of a [`Scope`](`crate::Scope`).

use std::fmt::{self, Debug, Formatter};

use slotmap::{new_key_type, SlotMap};

new_key_type! {
	/// Identifies one attachment to a [`Registry`].
	///
	/// Keys are never reused for a different attachment of the same registry,
	/// so a stale key can't detach someone else's handle.
	pub struct SubscriberKey;
}

/// An index-stable collection of subscriber handles.
///
/// Attaching and detaching are O(1). Delivery order is unspecified.
pub struct Registry<H> {
	handles: SlotMap<SubscriberKey, H>,
}

impl<H> Default for Registry<H> {
	fn default() -> Self {
		Self::new()
	}
}

impl<H> Debug for Registry<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("len", &self.handles.len())
			.finish_non_exhaustive()
	}
}

impl<H> Registry<H> {
	/// Creates a new empty [`Registry`].
	#[must_use]
	pub fn new() -> Self {
		Self {
			handles: SlotMap::with_key(),
		}
	}

	/// Adds `handle`.
	///
	/// This is **not** idempotent: A handle attached twice is delivered to twice.
	pub fn attach(&mut self, handle: H) -> SubscriberKey {
		self.handles.insert(handle)
	}

	/// Removes the handle attached as `key`.
	///
	/// **Returns** whether a handle was removed. Detaching an absent key is a no-op.
	pub fn detach(&mut self, key: SubscriberKey) -> bool {
		self.handles.remove(key).is_some()
	}

	/// The handle attached as `key`, if it is still attached.
	#[must_use]
	pub fn get(&self, key: SubscriberKey) -> Option<&H> {
		self.handles.get(key)
	}

	/// A snapshot of all currently attached keys.
	#[must_use]
	pub fn keys(&self) -> Vec<SubscriberKey> {
		self.handles.keys().collect()
	}

	/// How many handles are attached.
	#[must_use]
	pub fn len(&self) -> usize {
		self.handles.len()
	}

	/// Whether no handles are attached.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.handles.is_empty()
	}
}
