#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]
//!
//! # Threading Notes
//!
//! Everything in this crate is `!Send` and `!Sync`. A [`Scope`] and all of its
//! subscribers live on the single logical thread of their host tree.

pub mod callback;
pub mod registry;
pub mod same_value;
pub mod scope;
pub mod snapshot;
pub mod version;

pub use callback::EventCallback;
pub use registry::{Registry, SubscriberKey};
pub use same_value::SameValue;
pub use scope::{Reentrancy, Scope, ScopeHandle};
pub use snapshot::Snapshot;
pub use version::Version;

#[doc = include_str!("../README.md")]
mod readme {}
