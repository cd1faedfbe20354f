use std::{rc::Rc, sync::Arc};

use rostra_core::{SameValue, Version};

#[test]
fn shared_values_compare_by_identity() {
	let a = Rc::new(vec![1, 2, 3]);
	let b = Rc::new(vec![1, 2, 3]);
	assert!(a.same_value(&Rc::clone(&a)));
	assert!(!a.same_value(&b));

	let c = Arc::new(String::from("x"));
	assert!(c.same_value(&Arc::clone(&c)));
	assert!(!c.same_value(&Arc::new(String::from("x"))));
}

#[test]
fn trait_objects_compare_by_address() {
	let f: Rc<dyn Fn() -> i32> = Rc::new(|| 1);
	let g: Rc<dyn Fn() -> i32> = Rc::new(|| 1);
	assert!(f.same_value(&Rc::clone(&f)));
	assert!(!f.same_value(&g));
}

#[test]
fn plain_data_compares_by_value() {
	assert!(1_i64.same_value(&1));
	assert!(!1_u8.same_value(&2));
	assert!(String::from("a").same_value(&String::from("a")));
	assert!(().same_value(&()));
	assert!(Version::INITIAL.same_value(&Version::INITIAL));
}

#[test]
fn floats() {
	assert!(f64::NAN.same_value(&f64::NAN));
	assert!(!0.0_f64.same_value(&-0.0));
	assert!(1.5_f32.same_value(&1.5));
}

#[test]
fn composites() {
	let a = Rc::new(1);
	assert!(Some(Rc::clone(&a)).same_value(&Some(Rc::clone(&a))));
	assert!(!Some(Rc::clone(&a)).same_value(&None));
	assert!((1, Rc::clone(&a)).same_value(&(1, Rc::clone(&a))));
	assert!(!(1, Rc::clone(&a)).same_value(&(1, Rc::new(1))));
}

#[test]
fn static_references_compare_by_address() {
	static A: [u8; 1] = [0];
	static B: [u8; 1] = [0];
	let a: &'static [u8; 1] = &A;
	assert!(a.same_value(&&A));
	assert!(!a.same_value(&&B));
}
