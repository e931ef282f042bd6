//! Error type shared by the element lifecycle and tree editing operations.
//!
//! Attribute access and layout never fail: unknown attributes fall through to
//! the raw store and the solver clamps bad geometry. Only structural
//! operations (create, map, tree insertion) report errors.

use thiserror::Error;

/// Errors returned by [`Toolkit`](crate::Toolkit) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A child was mapped before its parent.
    #[error("parent must be mapped before child can be mapped")]
    ParentNotMapped,

    /// `create` was called with a class name nobody registered.
    #[error("unknown class \"{0}\"")]
    UnknownClass(String),

    /// The element id is stale or was never allocated.
    #[error("no such element")]
    NoSuchElement,

    /// Tree insertion refused by the parent's child policy, because the child
    /// is already attached, or because it would create a cycle.
    #[error("child not accepted: {0}")]
    ChildNotAccepted(&'static str),

    /// The backend driver failed to create the native object.
    #[error("driver error: {0}")]
    Driver(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
