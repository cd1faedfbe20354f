use std::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
	rc::{Rc, Weak},
};

use log::{debug, trace};
use rostra_core::{EventCallback, SameValue, ScopeHandle, Snapshot, SubscriberKey, Version};

use crate::{MissingScopeError, SelectOptions};

/// A consumer's subscription to one slice of a scope's state.
///
/// The selector is re-run for each broadcast that carries a different aggregate, but the
/// consumer is only asked to recompute (through `on_change`) when the *selected* value
/// changes, as decided by [`SameValue`].
///
/// A [`Selection`] binds to the scope it is given at construction, if any, and never
/// rebinds. Dropping it detaches it from that scope.
#[must_use = "Selections are detached when dropped."]
pub struct Selection<V: ?Sized + 'static, S: 'static> {
	inner: Rc<SelectionInner<V, S>>,
}

struct SelectionInner<V: ?Sized + 'static, S: 'static> {
	store: &'static str,
	optional: bool,
	selector: EventCallback<Rc<V>, S>,
	on_change: EventCallback<S>,
	bound: Option<Bound<V, S>>,
}

struct Bound<V: ?Sized + 'static, S> {
	scope: ScopeHandle<V>,
	key: SubscriberKey,
	state: RefCell<State<V, S>>,
}

struct State<V: ?Sized, S> {
	/// The newest version delivered to or read by this selection.
	/// Broadcasts at or below it are stale.
	seen: Version,
	/// The aggregate `selected` was projected from.
	value: Rc<V>,
	selected: S,
}

impl<V: ?Sized + 'static, S: 'static + Debug> Debug for Selection<V, S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let inner = &*self.inner;
		let mut debug_struct = f.debug_struct("Selection");
		debug_struct
			.field("store", &inner.store)
			.field("optional", &inner.optional);
		match &inner.bound {
			Some(bound) => match bound.state.try_borrow() {
				Ok(state) => debug_struct
					.field("version", &state.seen)
					.field("selected", &state.selected),
				Err(_) => debug_struct.field("selected", &"(updating)"),
			},
			None => debug_struct.field("version", &Version::UNBOUND),
		};
		debug_struct.finish_non_exhaustive()
	}
}

impl<V: ?Sized + 'static, S: 'static + Clone + SameValue> Selection<V, S> {
	/// Creates a new [`Selection`] of `scope`.
	///
	/// With a `scope`, `selector` runs once immediately on its current snapshot and the new
	/// selection attaches to it. Without one, the selection stays unbound for good, see
	/// [`get`](`Selection::get`).
	///
	/// `store` names the selected store in diagnostics.
	pub fn new(
		store: &'static str,
		scope: Option<ScopeHandle<V>>,
		selector: impl 'static + Fn(&Rc<V>) -> S,
		options: SelectOptions,
		on_change: impl 'static + FnMut(&S),
	) -> Self {
		let selector = EventCallback::new(selector);
		let on_change = EventCallback::from_mut(on_change);

		let inner = Rc::new_cyclic(|weak: &Weak<SelectionInner<V, S>>| {
			let bound = scope.map(|scope| {
				let Snapshot { version, value } = scope.snapshot();
				let selected = selector.call(&value);
				let key = scope.attach(EventCallback::new({
					let weak = weak.clone();
					move |snapshot: &Snapshot<V>| {
						if let Some(inner) = weak.upgrade() {
							inner.receive(snapshot);
						}
					}
				}));
				Bound {
					scope,
					key,
					state: RefCell::new(State {
						seen: version,
						value,
						selected,
					}),
				}
			});

			if bound.is_none() {
				debug!(
					"Selected `{store}` outside of a mounted scope (optional: {}).",
					options.optional
				);
			}

			SelectionInner {
				store,
				optional: options.optional,
				selector,
				on_change,
				bound,
			}
		});

		Self { inner }
	}

	/// The currently selected value.
	///
	/// **Returns** [`None`] iff this selection is unbound and was created with
	/// [`SelectOptions::OPTIONAL`].
	///
	/// # Errors
	///
	/// Iff this selection is unbound and not optional.
	pub fn get(&self) -> Result<Option<S>, MissingScopeError> {
		match &self.inner.bound {
			Some(bound) => Ok(Some(bound.state.borrow().selected.clone())),
			None if self.inner.optional => Ok(None),
			None => {
				debug!("Read `{}` outside of a mounted scope.", self.inner.store);
				Err(MissingScopeError::new(self.inner.store))
			}
		}
	}

	/// Replaces the projection without re-attaching.
	///
	/// The scope's current aggregate is re-projected right away. A different result is
	/// committed *without* a call to `on_change`, since the caller is the one recomputing.
	pub fn set_selector(&self, selector: impl 'static + Fn(&Rc<V>) -> S) {
		self.inner.selector.set(selector);
		let Some(bound) = &self.inner.bound else {
			return;
		};

		let Snapshot { version, value } = bound.scope.snapshot();
		let selected = self.inner.selector.call(&value);
		let mut state = bound.state.borrow_mut();
		state.seen = state.seen.max(version);
		state.value = value;
		if !state.selected.same_value(&selected) {
			state.selected = selected;
		}
	}

	/// Replaces the recomputation request target.
	pub fn set_on_change(&self, on_change: impl 'static + FnMut(&S)) {
		self.inner.on_change.set_mut(on_change);
	}
}

impl<V: ?Sized + 'static, S: 'static> Selection<V, S> {
	/// The newest version this selection has seen,
	/// or [`Version::UNBOUND`] iff it has no scope.
	#[must_use]
	pub fn version(&self) -> Version {
		self.inner
			.bound
			.as_ref()
			.map_or(Version::UNBOUND, |bound| bound.state.borrow().seen)
	}

	/// Whether this selection is attached to a scope.
	#[must_use]
	pub fn is_bound(&self) -> bool {
		self.inner.bound.is_some()
	}
}

impl<V: ?Sized + 'static, S: 'static + Clone + SameValue> SelectionInner<V, S> {
	fn receive(&self, snapshot: &Snapshot<V>) {
		let Some(bound) = &self.bound else {
			return;
		};

		{
			let mut state = bound.state.borrow_mut();
			if snapshot.version <= state.seen {
				trace!("`{}`: Ignored stale {}.", self.store, snapshot.version);
				return;
			}
			state.seen = snapshot.version;
			if state.value.same_value(&snapshot.value) {
				trace!("`{}`: Same aggregate at {}.", self.store, snapshot.version);
				return;
			}
		}

		// The selector runs without a borrow, so it may freely read this selection.
		let selected = self.selector.call(&snapshot.value);

		{
			let mut state = bound.state.borrow_mut();
			if state.seen != snapshot.version {
				trace!("`{}`: {} was superseded.", self.store, snapshot.version);
				return;
			}
			if state.selected.same_value(&selected) {
				trace!("`{}`: Same selection at {}.", self.store, snapshot.version);
				return;
			}
			state.value = Rc::clone(&snapshot.value);
			state.selected = selected.clone();
		}

		trace!("`{}`: Changed at {}.", self.store, snapshot.version);
		self.on_change.call(&selected);
	}
}

impl<V: ?Sized + 'static, S: 'static> Drop for SelectionInner<V, S> {
	fn drop(&mut self) {
		if let Some(bound) = &self.bound {
			bound.scope.detach(bound.key);
		}
	}
}
