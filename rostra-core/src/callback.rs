//! [`EventCallback`] is a stable handle around a swappable strategy.
//!
//! Consumers are re-evaluated repeatedly, but whatever they registered elsewhere must keep its
//! identity across those re-evaluations. Instead of re-registering a fresh closure each time,
//! they register one [`EventCallback`] and [`set`](`EventCallback::set`) its strategy.

use std::{
	cell::RefCell,
	fmt::{self, Debug, Formatter},
	rc::Rc,
};

/// A long-lived callable whose inner strategy can be replaced without changing its identity.
///
/// Clones share the strategy cell, so [`set`](`EventCallback::set`) through one clone is
/// observed through all of them.
pub struct EventCallback<A: ?Sized, R = ()> {
	strategy: Rc<RefCell<Rc<dyn Fn(&A) -> R>>>,
}

impl<A: ?Sized, R> Clone for EventCallback<A, R> {
	fn clone(&self) -> Self {
		Self {
			strategy: Rc::clone(&self.strategy),
		}
	}
}

impl<A: ?Sized, R> Debug for EventCallback<A, R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("EventCallback")
			.field("identity", &Rc::as_ptr(&self.strategy))
			.finish_non_exhaustive()
	}
}

impl<A: ?Sized + 'static, R: 'static> EventCallback<A, R> {
	/// Creates a new [`EventCallback`] with `strategy` as initial strategy.
	pub fn new(strategy: impl 'static + Fn(&A) -> R) -> Self {
		let strategy: Rc<dyn Fn(&A) -> R> = Rc::new(strategy);
		Self {
			strategy: Rc::new(RefCell::new(strategy)),
		}
	}

	/// Creates a new [`EventCallback`] from a stateful strategy.
	///
	/// # Panics
	///
	/// The resulting callback panics when called re-entrantly (from within its own strategy).
	pub fn from_mut(strategy: impl 'static + FnMut(&A) -> R) -> Self {
		Self::new(mutable(strategy))
	}

	/// Replaces the strategy. The identity of this [`EventCallback`] doesn't change.
	///
	/// Calls that are already running finish with the previous strategy.
	pub fn set(&self, strategy: impl 'static + Fn(&A) -> R) {
		*self.strategy.borrow_mut() = Rc::new(strategy);
	}

	/// Like [`set`](`EventCallback::set`), but for a stateful strategy.
	///
	/// # Panics
	///
	/// The new strategy panics when called re-entrantly.
	pub fn set_mut(&self, strategy: impl 'static + FnMut(&A) -> R) {
		self.set(mutable(strategy));
	}

	/// Calls the current strategy.
	///
	/// No borrow is held while it runs, so the strategy may call this callback again
	/// or replace itself.
	pub fn call(&self, argument: &A) -> R {
		let strategy = Rc::clone(&*self.strategy.borrow());
		strategy(argument)
	}
}

impl<A: ?Sized, R> EventCallback<A, R> {
	/// Whether `self` and `other` are clones of the same [`EventCallback`].
	#[must_use]
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.strategy, &other.strategy)
	}
}

fn mutable<A: ?Sized, R>(strategy: impl FnMut(&A) -> R) -> impl Fn(&A) -> R {
	let strategy = RefCell::new(strategy);
	move |argument: &A| -> R {
		let mut strategy = strategy
			.try_borrow_mut()
			.expect("Stateful `EventCallback` strategies can't be called re-entrantly.");
		(&mut *strategy)(argument)
	}
}
