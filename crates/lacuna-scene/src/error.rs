//! Error types for lacuna-scene.

use thiserror::Error;

use crate::node::{NodeId, NodeKind};

/// Result type for scene graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while mutating a scene.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The id does not name a live node (never created, or already removed).
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The node kind cannot perform the requested operation.
    #[error("{kind} node does not support {operation}")]
    CapabilityMismatch {
        kind: NodeKind,
        operation: &'static str,
    },

    /// The root surface can be cleared but never removed.
    #[error("the root node cannot be removed")]
    RootRemoval,
}
