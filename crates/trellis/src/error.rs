use std::result::Result as StdResult;

use thiserror::Error;

use crate::id::NodeId;

/// Result type for trellis operations.
pub type Result<T> = StdResult<T, Error>;

/// Core error type.
#[derive(PartialEq, Eq, Error, Debug, Clone)]
pub enum Error {
    /// The node does not exist in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),
    /// A container operation was requested on a plain widget.
    #[error("not a container: {0:?}")]
    NotAContainer(NodeId),
    /// Parenting would make a node its own ancestor.
    #[error("would create cycle: parent {parent:?}, child {child:?}")]
    WouldCreateCycle {
        /// Requested parent.
        parent: NodeId,
        /// Requested child.
        child: NodeId,
    },
    /// The widget is already a member of the collection.
    #[error("duplicate child {child:?} in {parent:?}")]
    DuplicateChild {
        /// Owning container.
        parent: NodeId,
        /// Repeated child.
        child: NodeId,
    },
    /// A collection index was outside the valid range.
    #[error("index {index} out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Collection length.
        len: usize,
    },
    /// The container's layout is already checked out by an enclosing pass.
    #[error("reentrant layout pass on {0:?}")]
    ReentrantLayout(NodeId),
    /// The container's widget is already checked out by an enclosing call.
    #[error("reentrant widget borrow on {0:?}")]
    ReentrantWidget(NodeId),
    /// A layout failed to recompute.
    #[error("layout: {0}")]
    Layout(String),
    /// Saving or restoring persisted state failed.
    #[error("persist: {0}")]
    Persist(String),
    /// Moving values between a data source and bound widgets failed.
    #[error("binding: {0}")]
    Binding(String),
    /// A native window operation failed; the message names the operation.
    #[error("native: {0}")]
    Native(String),
    /// Settings could not be encoded or decoded.
    #[error("settings: {0}")]
    Settings(String),
    /// Invalid input.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Settings(e.to_string())
    }
}
