use std::rc::Rc;

use rostra_core::{EventCallback, Scope, Snapshot, Version};

use _validator::Validator;

fn spy(v: &Validator<(i64, i32)>) -> EventCallback<Snapshot<i32>> {
	let v = v.clone();
	EventCallback::new(move |snapshot: &Snapshot<i32>| v.push((snapshot.version.get(), *snapshot.value)))
}

#[test]
fn mount_starts_at_initial_version() {
	let scope = Scope::mount(Rc::new(5));
	let snapshot = scope.snapshot();
	assert_eq!(snapshot.version, Version::INITIAL);
	assert_eq!(*snapshot.value, 5);
	assert_eq!(scope.handle().subscriber_count(), 0);
}

#[test]
fn publish_updates_cell_then_notifies_everyone() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();
	let _a = handle.attach(spy(v));
	let _b = handle.attach(spy(v));

	let value = Rc::new(1);
	scope.publish(Rc::clone(&value));
	v.expect([(1, 1), (1, 1)]);

	let snapshot = handle.snapshot();
	assert_eq!(snapshot.version.get(), 1);
	assert!(Rc::ptr_eq(&snapshot.value, &value));

	scope.publish(Rc::new(2));
	scope.publish(Rc::new(3));
	v.expect([(2, 2), (2, 2), (3, 3), (3, 3)]);
}

#[test]
fn subscriber_sees_cell_already_updated() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();
	let _key = handle.attach({
		let handle = handle.clone();
		let v = v.clone();
		EventCallback::new(move |snapshot: &Snapshot<i32>| {
			let stored = handle.snapshot();
			v.push(stored.version == snapshot.version && Rc::ptr_eq(&stored.value, &snapshot.value));
		})
	});

	scope.publish(Rc::new(1));
	v.expect([true]);
}

#[test]
fn same_value_is_still_a_broadcast() {
	let v = &Validator::new();

	let value = Rc::new(7);
	let scope = Scope::mount(Rc::clone(&value));
	let _key = scope.handle().attach(spy(v));

	scope.publish(Rc::clone(&value));
	scope.publish(value);
	v.expect([(1, 7), (2, 7)]);
}

#[test]
fn detached_subscribers_are_not_called() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();
	let key = handle.attach(spy(v));

	scope.publish(Rc::new(1));
	v.expect([(1, 1)]);

	assert!(handle.detach(key));
	scope.publish(Rc::new(2));
	scope.publish(Rc::new(3));
	v.expect([]);
	assert_eq!(handle.subscriber_count(), 0);
}

#[test]
fn detach_during_dispatch_skips_pending_subscriber() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();

	let victim = Rc::new(std::cell::Cell::new(None));
	let _first = handle.attach({
		let handle = handle.clone();
		let victim = Rc::clone(&victim);
		let v = v.clone();
		EventCallback::new(move |_: &Snapshot<i32>| {
			v.push("first");
			if let Some(key) = victim.take() {
				assert!(handle.detach(key));
			}
		})
	});
	victim.set(Some(handle.attach({
		let v = v.clone();
		EventCallback::new(move |_: &Snapshot<i32>| v.push("second"))
	})));

	scope.publish(Rc::new(1));
	v.expect(["first"]);

	scope.publish(Rc::new(2));
	v.expect(["first"]);
}

#[test]
fn self_detach_during_dispatch() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();
	let own_key = Rc::new(std::cell::Cell::new(None));
	let key = handle.attach({
		let handle = handle.clone();
		let own_key = Rc::clone(&own_key);
		let v = v.clone();
		EventCallback::new(move |snapshot: &Snapshot<i32>| {
			v.push(*snapshot.value);
			if let Some(key) = own_key.take() {
				handle.detach(key);
			}
		})
	});
	own_key.set(Some(key));

	scope.publish(Rc::new(1));
	scope.publish(Rc::new(2));
	v.expect([1]);
}

#[test]
fn attach_during_dispatch_waits_for_next_broadcast() {
	let v = &Validator::new();

	let scope = Scope::mount(Rc::new(0));
	let handle = scope.handle();
	let attached = Rc::new(std::cell::Cell::new(false));
	let _key = handle.attach({
		let handle = handle.clone();
		let attached = Rc::clone(&attached);
		let v = v.clone();
		EventCallback::new(move |snapshot: &Snapshot<i32>| {
			v.push(("outer", *snapshot.value));
			if !attached.replace(true) {
				let v = v.clone();
				let _ = handle.attach(EventCallback::new(move |snapshot: &Snapshot<i32>| {
					v.push(("inner", *snapshot.value));
				}));
			}
		})
	});

	scope.publish(Rc::new(1));
	v.expect([("outer", 1)]);

	scope.publish(Rc::new(2));
	v.expect([("outer", 2), ("inner", 2)]);
}

#[test]
fn handles_outlive_unmount() {
	let scope = Scope::mount(Rc::new("state"));
	let handle = scope.handle();
	scope.publish(Rc::new("newer"));
	drop(scope);

	let snapshot = handle.snapshot();
	assert_eq!(snapshot.version.get(), 1);
	assert_eq!(*snapshot.value, "newer");
}
