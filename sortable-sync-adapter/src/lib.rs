//! Lifecycle binding for the `sortable-sync` crate.
//!
//! `sortable-sync` owns the math: normalizing engine events, reversing the engine's DOM edits and
//! reconciling lists. This crate wires that into a component lifecycle:
//!
//! - [`Binding`] attaches a [`SortableEngine`] to a container, runs every engine callback through
//!   the reconcile pipeline and forwards it to user handlers afterwards.
//! - [`project`] stamps `data-id` and the chosen/selected marker classes onto rendered children.
//! - [`DragSession`] carries the in-flight drag between bindings that exchange items.
//!
//! Like the core crate, it is framework-agnostic: rendering goes through the [`Render`] trait,
//! and [`KeyedRender`] covers hosts that just want one element per item.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod binding;
mod engine;
mod options;
mod project;
mod render;
mod session;

#[cfg(test)]
mod tests;

pub use binding::Binding;
pub use engine::SortableEngine;
pub use options::{
    BindingOptions, ClassNames, CloneFn, EngineOptions, EventHandler, GroupOptions, GroupPull,
    ListChangeCallback, MoveHandler, OptionChange, OptionKey, OptionValue,
};
pub use project::{DATA_ID, project};
pub use render::{KeyedRender, Render};
pub use session::DragSession;
