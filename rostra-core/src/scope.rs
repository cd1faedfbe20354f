//! The state owned by one mounted Scope Boundary, and the Broadcast Dispatcher writing it.
//!
//! A [`Scope`] is held by the producer and is the only way to [`publish`](`Scope::publish`).
//! Consumers hold [`ScopeHandle`]s, through which they can read the current [`Snapshot`]
//! and attach or detach themselves, but never write.

use std::{
	cell::{Cell, RefCell},
	collections::VecDeque,
	fmt::{self, Debug, Formatter},
	rc::Rc,
};

use log::{debug, trace, warn};
use scopeguard::guard;

use crate::{EventCallback, Registry, Snapshot, SubscriberKey, Version};

/// A subscriber handle as stored in the registry of a [`Scope`].
pub type Subscriber<V> = EventCallback<Snapshot<V>>;

/// What happens when [`Scope::publish`] is called while that same scope is dispatching,
/// i.e. from within one of its subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reentrancy {
	/// The value is queued and broadcast (with its own version) right after the current
	/// dispatch completes, before the outer [`publish`](`Scope::publish`) returns.
	///
	/// Broadcasts never interleave, so every subscriber sees versions in order.
	#[default]
	Queue,
	/// Re-entrant publishing is a programming error and panics.
	Forbid,
}

struct ScopeInner<V: ?Sized> {
	cell: RefCell<Snapshot<V>>,
	registry: RefCell<Registry<Subscriber<V>>>,
	reentrancy: Reentrancy,
	dispatching: Cell<bool>,
	pending: RefCell<VecDeque<Rc<V>>>,
}

/// Owner side of a mounted Scope Boundary: Snapshot Cell, Subscriber Registry and dispatcher.
///
/// Dropping this unmounts the scope. Outstanding [`ScopeHandle`]s stay valid but won't see
/// further broadcasts.
pub struct Scope<V: ?Sized + 'static> {
	handle: ScopeHandle<V>,
}

/// Consumer side of a mounted Scope Boundary.
///
/// Cheap to clone. Clones refer to the same scope.
pub struct ScopeHandle<V: ?Sized + 'static> {
	inner: Rc<ScopeInner<V>>,
}

impl<V: ?Sized + 'static> Clone for ScopeHandle<V> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<V: ?Sized + Debug + 'static> Debug for ScopeHandle<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let inner = &*self.inner;
		f.debug_struct("ScopeHandle")
			.field(
				"snapshot",
				inner
					.cell
					.try_borrow()
					.as_ref()
					.map_or_else(|_| &"(writing)" as &dyn Debug, |cell| &**cell as &dyn Debug),
			)
			.field("subscribers", &inner.registry.try_borrow().map(|r| r.len()).ok())
			.field("reentrancy", &inner.reentrancy)
			.finish_non_exhaustive()
	}
}

impl<V: ?Sized + Debug + 'static> Debug for Scope<V> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Scope").field(&self.handle).finish()
	}
}

impl<V: ?Sized + 'static> Scope<V> {
	/// Mounts a new scope holding `value` at [`Version::INITIAL`], with no subscribers.
	pub fn mount(value: Rc<V>) -> Self {
		Self::mount_with(value, Reentrancy::default())
	}

	/// Like [`mount`](`Scope::mount`), with an explicit [`Reentrancy`] policy.
	pub fn mount_with(value: Rc<V>, reentrancy: Reentrancy) -> Self {
		debug!("Mounting scope ({reentrancy:?}).");
		Self {
			handle: ScopeHandle {
				inner: Rc::new(ScopeInner {
					cell: RefCell::new(Snapshot::new(Version::INITIAL, value)),
					registry: RefCell::new(Registry::new()),
					reentrancy,
					dispatching: Cell::new(false),
					pending: RefCell::new(VecDeque::new()),
				}),
			},
		}
	}

	/// A new consumer-side handle to this scope.
	#[must_use]
	pub fn handle(&self) -> ScopeHandle<V> {
		self.handle.clone()
	}

	/// The current [`Snapshot`].
	#[must_use]
	pub fn snapshot(&self) -> Snapshot<V> {
		self.handle.snapshot()
	}

	/// See [`ScopeHandle::latest`].
	#[must_use]
	pub fn latest(&self) -> Rc<V> {
		self.handle.latest()
	}

	/// Advances the version, stores `value` alongside it and synchronously calls every
	/// attached subscriber with the new [`Snapshot`].
	///
	/// All subscribers have seen the new version by the time this method returns.
	/// A subscriber detached during the dispatch is skipped if it hasn't run yet.
	/// A subscriber attached during the dispatch doesn't see this broadcast.
	///
	/// # Logic
	///
	/// When called from within one of this scope's subscribers, see [`Reentrancy`].
	///
	/// # Panics
	///
	/// Iff called re-entrantly on a scope mounted with [`Reentrancy::Forbid`].
	///
	/// Panics from subscribers are propagated. Re-entrant broadcasts queued by the
	/// dispatch that panicked are discarded, and the scope remains usable.
	pub fn publish(&self, value: Rc<V>) {
		let inner = &*self.handle.inner;
		if inner.dispatching.get() {
			match inner.reentrancy {
				Reentrancy::Queue => {
					trace!("Queueing re-entrant broadcast.");
					inner.pending.borrow_mut().push_back(value);
					return;
				}
				Reentrancy::Forbid => panic!(
					"Tried to publish re-entrantly into a scope that is dispatching. (It was mounted with `Reentrancy::Forbid`.)"
				),
			}
		}

		inner.dispatching.set(true);
		let _dispatching = guard(inner, |inner| {
			inner.pending.borrow_mut().clear();
			inner.dispatching.set(false);
		});

		let mut next = Some(value);
		while let Some(value) = next {
			inner.broadcast(value);
			next = inner.pending.borrow_mut().pop_front();
		}
	}
}

impl<V: ?Sized + 'static> Drop for Scope<V> {
	fn drop(&mut self) {
		let remaining = self.handle.subscriber_count();
		if remaining > 0 {
			warn!("Unmounting scope with {remaining} subscriber(s) still attached.");
		} else {
			debug!("Unmounting scope.");
		}
	}
}

impl<V: ?Sized + 'static> ScopeInner<V> {
	fn broadcast(&self, value: Rc<V>) {
		let snapshot = {
			let mut cell = self.cell.borrow_mut();
			*cell = Snapshot::new(cell.version.next(), value);
			cell.clone()
		};

		let keys = self.registry.borrow().keys();
		trace!(
			"Broadcasting {} to {} subscriber(s).",
			snapshot.version,
			keys.len()
		);
		for key in keys {
			// Detached by an earlier subscriber of this same broadcast.
			let Some(subscriber) = self.registry.borrow().get(key).cloned() else {
				continue;
			};
			subscriber.call(&snapshot);
		}
	}
}

impl<V: ?Sized + 'static> ScopeHandle<V> {
	/// The current [`Snapshot`].
	#[must_use]
	pub fn snapshot(&self) -> Snapshot<V> {
		self.inner.cell.borrow().clone()
	}

	/// The current [`Version`].
	#[must_use]
	pub fn version(&self) -> Version {
		self.inner.cell.borrow().version
	}

	/// The most recently published value.
	///
	/// While re-entrant broadcasts are queued (see [`Reentrancy::Queue`]), this is the newest
	/// queued value rather than the one in the current [`Snapshot`].
	#[must_use]
	pub fn latest(&self) -> Rc<V> {
		let pending = self.inner.pending.borrow();
		pending
			.back()
			.map_or_else(|| Rc::clone(&self.inner.cell.borrow().value), Rc::clone)
	}

	/// Attaches `subscriber` to future broadcasts.
	///
	/// Attach each live subscription exactly once. Attaching the same subscriber twice
	/// delivers each broadcast to it twice.
	pub fn attach(&self, subscriber: Subscriber<V>) -> SubscriberKey {
		let key = self.inner.registry.borrow_mut().attach(subscriber);
		trace!("Attached subscriber {key:?}.");
		key
	}

	/// Detaches the subscriber attached as `key`.
	///
	/// **Idempotent** aside from the return value.
	/// **Returns** whether a subscriber was detached.
	pub fn detach(&self, key: SubscriberKey) -> bool {
		let detached = self.inner.registry.borrow_mut().detach(key);
		if detached {
			trace!("Detached subscriber {key:?}.");
		}
		detached
	}

	/// How many subscribers are currently attached.
	#[must_use]
	pub fn subscriber_count(&self) -> usize {
		self.inner.registry.borrow().len()
	}

	/// Whether `self` and `other` refer to the same scope.
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}
