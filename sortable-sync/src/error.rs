//! Error types for sortable-sync.

use crate::{EventShape, ItemId};
use thiserror::Error;

/// Why a raw engine event could not be normalized.
///
/// The interaction that produced it is dropped; the previous list stands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MalformedEvent {
    #[error("{shape} event is missing `{field}`")]
    MissingField {
        shape: EventShape,
        field: &'static str,
    },

    #[error("multi-drag event has {old} old indices but {new} new indices")]
    LengthMismatch { old: usize, new: usize },

    #[error("{shape} event repeats index {index}")]
    DuplicateIndex { shape: EventShape, index: usize },

    #[error("old index {index} is out of range for a list of {len} items")]
    SourceOutOfRange { index: usize, len: usize },

    #[error("clone pull mode is active but no clone node was supplied")]
    MissingClone,

    #[error("item arrived without an active drag in its group")]
    NoActiveDrag,
}

/// All errors raised by the reconciliation pipeline.
///
/// Every variant is an invariant violation detected synchronously, never a transient condition,
/// so nothing here is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("malformed engine event: {0}")]
    MalformedEvent(#[from] MalformedEvent),

    #[error("cannot insert at DOM index {index}: parent has {len} children")]
    InvalidDomIndex { index: usize, len: usize },

    #[error("{children} DOM children but {items} list items at projection time")]
    ProjectionMismatch { children: usize, items: usize },

    #[error("item `{id}` must start with chosen=false and selected=false")]
    ListPrecondition { id: ItemId },

    #[error("index {index} is out of range for a list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("duplicate item id `{0}`")]
    DuplicateId(ItemId),

    #[error("engine callback received while unbound")]
    NotBound,
}

/// Result type for reconciliation operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn error_display() {
        let err = Error::from(MalformedEvent::LengthMismatch { old: 2, new: 1 });
        assert_eq!(
            err.to_string(),
            "malformed engine event: multi-drag event has 2 old indices but 1 new indices"
        );

        let err = Error::MalformedEvent(MalformedEvent::MissingField {
            shape: EventShape::Swap,
            field: "swap_item",
        });
        assert_eq!(
            err.to_string(),
            "malformed engine event: swap event is missing `swap_item`"
        );

        let err = Error::InvalidDomIndex { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "cannot insert at DOM index 7: parent has 3 children"
        );

        let err = Error::ListPrecondition { id: "a".into() };
        assert_eq!(
            err.to_string(),
            "item `a` must start with chosen=false and selected=false"
        );
    }
}
