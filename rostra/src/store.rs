use std::{
	fmt::{self, Debug, Formatter},
	num::NonZeroU64,
	rc::Rc,
	sync::atomic::{AtomicU64, Ordering},
};

use futures_channel::mpsc::{self, UnboundedReceiver};
use log::{debug, trace};
use rostra_core::{Reentrancy, SameValue, Scope, ScopeHandle, Snapshot};

use crate::{Context, SelectOptions, Selection};

/// Identifies one [`Store`] definition (and its clones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreId(NonZeroU64);

impl StoreId {
	fn next() -> Self {
		static COUNTER: AtomicU64 = AtomicU64::new(0);
		Self(
			(COUNTER.fetch_add(1, Ordering::Relaxed) + 1)
				.try_into()
				.expect("infallible within reasonable time"),
		)
	}
}

/// A store definition: A named producer of aggregate state `V` from props `P`.
///
/// The store itself holds no state. Each [`mount`](`Store::mount`) creates an independent
/// scope, which consumers further down the tree [`select`](`Store::select`) slices of.
///
/// Cheap to clone. Clones are the same store.
pub struct Store<V: ?Sized + 'static, P: ?Sized + 'static = ()> {
	inner: Rc<StoreInner<V, P>>,
}

struct StoreInner<V: ?Sized, P: ?Sized> {
	id: StoreId,
	name: &'static str,
	reentrancy: Reentrancy,
	producer: Box<dyn Fn(&P) -> Rc<V>>,
}

impl<V: ?Sized + 'static, P: ?Sized + 'static> Clone for Store<V, P> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<V: ?Sized + 'static, P: ?Sized + 'static> Debug for Store<V, P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("id", &self.inner.id)
			.field("name", &self.inner.name)
			.field("reentrancy", &self.inner.reentrancy)
			.finish_non_exhaustive()
	}
}

impl<V: ?Sized + 'static, P: ?Sized + 'static> Store<V, P> {
	/// Defines a new store.
	///
	/// `producer` is run once per recomputation cycle of each mount. It should return the
	/// *same* [`Rc`] for state that did not change, and keep nested values that did not
	/// change (especially action callbacks) referentially stable.
	pub fn new(name: &'static str, producer: impl 'static + Fn(&P) -> Rc<V>) -> Self {
		Self::with_reentrancy(name, Reentrancy::default(), producer)
	}

	/// Like [`new`](`Store::new`), with an explicit [`Reentrancy`] policy for each mount.
	pub fn with_reentrancy(
		name: &'static str,
		reentrancy: Reentrancy,
		producer: impl 'static + Fn(&P) -> Rc<V>,
	) -> Self {
		Self {
			inner: Rc::new(StoreInner {
				id: StoreId::next(),
				name,
				reentrancy,
				producer: Box::new(producer),
			}),
		}
	}

	/// This store's identity.
	#[must_use]
	pub fn id(&self) -> StoreId {
		self.inner.id
	}

	/// This store's name, as used in diagnostics.
	#[must_use]
	pub fn name(&self) -> &'static str {
		self.inner.name
	}

	/// Mounts a new scope of this store below `parent`, running the producer once.
	///
	/// Consumers must be created with [`Mount::context`] to see the new scope.
	pub fn mount(&self, parent: &Context, props: &P) -> Mount<V, P> {
		let scope = Scope::mount_with((self.inner.producer)(props), self.inner.reentrancy);
		debug!("Mounted `{}` at depth {}.", self.inner.name, parent.depth());
		Mount {
			context: parent.provide(self.inner.id, self.inner.name, scope.handle()),
			scope,
			store: self.clone(),
		}
	}

	/// Creates a [`Selection`] of the innermost scope of this store in `context`.
	///
	/// `on_change` is called with the new selected value whenever a broadcast changes it.
	/// The owning consumer should then be recomputed.
	pub fn select<S: 'static + Clone + SameValue>(
		&self,
		context: &Context,
		selector: impl 'static + Fn(&Rc<V>) -> S,
		options: SelectOptions,
		on_change: impl 'static + FnMut(&S),
	) -> Selection<V, S> {
		Selection::new(
			self.inner.name,
			context.nearest(self.inner.id),
			selector,
			options,
			on_change,
		)
	}

	/// Like [`select`](`Store::select`), but recomputation requests are sent through a channel.
	///
	/// Requests sent after the receiver is dropped are discarded.
	pub fn select_changes<S: 'static + Clone + SameValue>(
		&self,
		context: &Context,
		selector: impl 'static + Fn(&Rc<V>) -> S,
		options: SelectOptions,
	) -> (Selection<V, S>, UnboundedReceiver<S>) {
		let (sender, receiver) = mpsc::unbounded();
		let name = self.inner.name;
		let selection = self.select(context, selector, options, move |selected: &S| {
			if sender.unbounded_send(selected.clone()).is_err() {
				trace!("Dropped a change of `{name}`: The receiver is gone.");
			}
		});
		(selection, receiver)
	}

	/// Subscribes to the whole aggregate.
	///
	/// This is a [`Selection`] with identity projection, so `on_change` runs for every
	/// broadcast that carries a different [`Rc`].
	pub fn channel(
		&self,
		context: &Context,
		options: SelectOptions,
		on_change: impl 'static + FnMut(&Rc<V>),
	) -> Selection<V, Rc<V>> {
		self.select(context, Rc::clone, options, on_change)
	}
}

/// One mounted scope of a [`Store`].
///
/// Dropping this unmounts the scope.
pub struct Mount<V: ?Sized + 'static, P: ?Sized + 'static = ()> {
	store: Store<V, P>,
	scope: Scope<V>,
	context: Context,
}

impl<V: ?Sized + Debug + 'static, P: ?Sized + 'static> Debug for Mount<V, P> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Mount")
			.field("store", &self.store)
			.field("scope", &self.scope)
			.finish_non_exhaustive()
	}
}

impl<V: ?Sized + 'static, P: ?Sized + 'static> Mount<V, P> {
	/// The [`Context`] for descendants of this mount, in which this scope is visible.
	#[must_use]
	pub fn context(&self) -> &Context {
		&self.context
	}

	/// The mounted store.
	#[must_use]
	pub fn store(&self) -> &Store<V, P> {
		&self.store
	}

	/// A consumer-side handle to this scope.
	#[must_use]
	pub fn handle(&self) -> ScopeHandle<V> {
		self.scope.handle()
	}

	/// The current [`Snapshot`].
	#[must_use]
	pub fn snapshot(&self) -> Snapshot<V> {
		self.scope.snapshot()
	}

	/// Runs one recomputation cycle: Runs the producer with `props` and broadcasts the
	/// result iff it isn't the [`Rc`] that was published last.
	///
	/// From within a dispatch, values still queued for broadcast count as published.
	///
	/// **Returns** whether a broadcast happened (or was queued).
	pub fn recompute(&self, props: &P) -> bool {
		let value = (self.store.inner.producer)(props);
		if value.same_value(&self.scope.latest()) {
			trace!("`{}` produced the same state.", self.store.inner.name);
			false
		} else {
			self.scope.publish(value);
			true
		}
	}

	/// Broadcasts `value` unconditionally.
	///
	/// See [`Scope::publish`].
	pub fn publish(&self, value: Rc<V>) {
		self.scope.publish(value);
	}
}
