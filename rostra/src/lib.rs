#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![warn(unreachable_pub)]
#![doc = include_str!("../README.md")]
//!
//! # Threading Notes
//!
//! Stores, mounts, contexts and selections are `!Send`. Broadcasts are delivered
//! synchronously on the thread that publishes them.

mod context;
mod error;
mod options;
mod selection;
mod store;

pub use context::Context;
pub use error::MissingScopeError;
pub use options::SelectOptions;
pub use selection::Selection;
pub use store::{Mount, Store, StoreId};

pub use rostra_core::{Reentrancy, SameValue, ScopeHandle, Snapshot, Version};

#[doc = include_str!("../README.md")]
mod readme {}
