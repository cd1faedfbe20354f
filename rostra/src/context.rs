//! Explicit nesting of mounted scopes through a host tree.
//!
//! A [`Context`] is handed down from parent to child nodes. Mounting a store yields a child
//! [`Context`] in which the new scope shadows any ancestor scope of the same store.
//! Scopes of different stores don't interact.

use std::{
	any::Any,
	fmt::{self, Debug, Formatter},
	rc::Rc,
};

use log::trace;
use rostra_core::ScopeHandle;
use tap::TapOptional;

use crate::StoreId;

/// A persistent chain of mounted scopes, innermost first.
///
/// Cheap to clone. Extending a [`Context`] never changes it or its other clones.
#[derive(Clone, Default)]
pub struct Context {
	frame: Option<Rc<Frame>>,
}

struct Frame {
	store: StoreId,
	name: &'static str,
	/// A `ScopeHandle<V>` for the store's `V`.
	scope: Box<dyn Any>,
	parent: Option<Rc<Frame>>,
}

impl Debug for Context {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_list()
			.entries(self.frames().map(|frame| frame.name))
			.finish()
	}
}

impl Context {
	/// A [`Context`] without any mounted scopes.
	#[must_use]
	pub fn root() -> Self {
		Self::default()
	}

	/// Extends this [`Context`] with `scope`, mounted for `store`.
	#[must_use]
	pub fn provide<V: ?Sized + 'static>(
		&self,
		store: StoreId,
		name: &'static str,
		scope: ScopeHandle<V>,
	) -> Self {
		Self {
			frame: Some(Rc::new(Frame {
				store,
				name,
				scope: Box::new(scope),
				parent: self.frame.clone(),
			})),
		}
	}

	/// The innermost scope mounted for `store`, if any.
	#[must_use]
	pub fn nearest<V: ?Sized + 'static>(&self, store: StoreId) -> Option<ScopeHandle<V>> {
		self.frames()
			.find(|frame| frame.store == store)
			.and_then(|frame| frame.scope.downcast_ref::<ScopeHandle<V>>())
			.cloned()
			.tap_none(|| trace!("No scope mounted for {store:?} in {self:?}."))
	}

	/// How many scopes are mounted along this chain, shadowed ones included.
	#[must_use]
	pub fn depth(&self) -> usize {
		self.frames().count()
	}

	fn frames(&self) -> impl '_ + Iterator<Item = &Frame> {
		std::iter::successors(self.frame.as_deref(), |frame| frame.parent.as_deref())
	}
}
