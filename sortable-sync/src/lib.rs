//! A headless reconciliation engine for sortable drag-and-drop lists.
//!
//! For the lifecycle binding (engine attach/detach, option updates, attribute projection), see
//! the `sortable-sync-adapter` crate.
//!
//! External drag engines move DOM nodes directly and only then report what happened. This crate
//! turns those reports back into list state without letting the DOM and the list drift apart:
//!
//! - [`normalize`] converts a raw engine event (single move, swap, or multi-drag) into ordered
//!   [`MoveRecord`]s.
//! - [`reverse`] undoes the engine's DOM edits so the UI layer stays the sole owner of the tree.
//! - [`reconcile`] derives the next ordered list from the previous one and the move records.
//!
//! It is UI-agnostic. A host is expected to provide a [`Dom`] implementation over its node
//! handles; [`MemoryDom`] is an in-memory one for headless hosts and tests.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod dom;
mod error;
mod memory;
mod normalize;
mod reconcile;
mod reverse;
mod types;


pub use dom::{Dom, insert_node_at};
pub use error::{Error, MalformedEvent, Result};
pub use memory::{MemoryDom, NodeId};
pub use normalize::{MoveRecord, normalize};
pub use reconcile::{ClonePolicy, ListAction, check_initial_list, fresh_clone_id, reconcile};
pub use reverse::{Reversal, Step, plan, reverse};
pub use types::{
    EventKind, EventShape, Item, ItemId, MoveEvent, MoveResult, MultiDragEntry, MultiDragIndex,
    PullMode, SortableEvent,
};
