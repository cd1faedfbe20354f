//! Referential identity, the only equality used for change detection.
//!
//! Shared values compare by pointer, never structurally. Producers and selectors are
//! expected to hand out the *same* pointer for a slice that did not logically change,
//! for example by keeping action callbacks in long-lived [`Rc`]s.
//!
//! Plain data compares by value, as there is no meaningful identity to speak of.
//! Note that this includes [`String`], but *not* `&'static str`, which like any other
//! reference compares by address.

use std::{rc::Rc, sync::Arc};

use crate::Version;

/// Identity comparison used by selections to decide whether anything changed.
pub trait SameValue {
	/// Whether `self` and `other` are the same value (not merely equivalent ones).
	fn same_value(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SameValue for Rc<T> {
	fn same_value(&self, other: &Self) -> bool {
		Rc::ptr_eq(self, other)
	}
}

impl<T: ?Sized> SameValue for Arc<T> {
	fn same_value(&self, other: &Self) -> bool {
		Arc::ptr_eq(self, other)
	}
}

impl<T: ?Sized> SameValue for &'static T {
	fn same_value(&self, other: &Self) -> bool {
		std::ptr::addr_eq(*self as *const T, *other as *const T)
	}
}

macro_rules! by_value {
	($($t:ty),*$(,)?) => {$(
		impl SameValue for $t {
			fn same_value(&self, other: &Self) -> bool {
				self == other
			}
		}
	)*};
}

by_value!(
	(),
	bool,
	char,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	String,
	Version,
);

// All NaNs are the same value, but the zeroes are distinct.
macro_rules! by_bits {
	($($t:ty),*$(,)?) => {$(
		impl SameValue for $t {
			fn same_value(&self, other: &Self) -> bool {
				(self.is_nan() && other.is_nan()) || self.to_bits() == other.to_bits()
			}
		}
	)*};
}

by_bits!(f32, f64);

impl<T: SameValue> SameValue for Option<T> {
	fn same_value(&self, other: &Self) -> bool {
		match (self, other) {
			(Some(a), Some(b)) => a.same_value(b),
			(None, None) => true,
			_ => false,
		}
	}
}

macro_rules! tuples {
	($(($($name:ident $index:tt),+)),*$(,)?) => {$(
		impl<$($name: SameValue),+> SameValue for ($($name,)+) {
			fn same_value(&self, other: &Self) -> bool {
				$(self.$index.same_value(&other.$index))&&+
			}
		}
	)*};
}

tuples!(
	(A 0),
	(A 0, B 1),
	(A 0, B 1, C 2),
	(A 0, B 1, C 2, D 3),
);
