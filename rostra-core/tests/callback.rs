use std::{
	cell::RefCell,
	panic::{catch_unwind, AssertUnwindSafe},
	rc::Rc,
};

use rostra_core::EventCallback;

use _validator::Validator;

#[test]
fn set_keeps_identity() {
	let v = &Validator::new();

	let callback = EventCallback::new({
		let v = v.clone();
		move |x: &i32| v.push(("first", *x))
	});
	let registered = callback.clone();

	registered.call(&1);
	callback.set({
		let v = v.clone();
		move |x: &i32| v.push(("second", *x))
	});
	registered.call(&2);

	v.expect([("first", 1), ("second", 2)]);
	assert!(callback.ptr_eq(&registered));
	assert!(!callback.ptr_eq(&EventCallback::new(|_: &i32| ())));
}

#[test]
fn returns_values() {
	let double = EventCallback::new(|x: &i32| x * 2);
	assert_eq!(double.call(&21), 42);
	double.set(|x: &i32| x + 1);
	assert_eq!(double.call(&21), 22);
}

#[test]
fn stateful_strategy() {
	let counter = EventCallback::from_mut({
		let mut count = 0;
		move |(): &()| {
			count += 1;
			count
		}
	});
	assert_eq!(counter.call(&()), 1);
	assert_eq!(counter.call(&()), 2);
}

#[test]
fn strategy_may_replace_itself() {
	let v = &Validator::new();

	let callback = EventCallback::new(|(): &()| ());
	callback.set({
		let this = callback.clone();
		let v = v.clone();
		move |(): &()| {
			v.push("once");
			this.set(|(): &()| ());
		}
	});

	callback.call(&());
	callback.call(&());
	v.expect(["once"]);
}

#[test]
fn reentrant_stateful_strategy_panics() {
	let slot: Rc<RefCell<Option<EventCallback<()>>>> = Rc::default();
	let callback = EventCallback::from_mut({
		let slot = Rc::clone(&slot);
		move |(): &()| {
			if let Some(this) = slot.borrow().as_ref() {
				this.call(&());
			}
		}
	});
	*slot.borrow_mut() = Some(callback.clone());

	let result = catch_unwind(AssertUnwindSafe(|| callback.call(&())));
	assert!(result.is_err());

	slot.borrow_mut().take();
}
