use thiserror::Error;

use crate::graph::{NodeId, SegmentId, WallId};

/// Top-level error type for the wall-graph kernel.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors raised by lookups and bookkeeping inside the [`WallGraph`](crate::graph::WallGraph).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    #[error("segment not found: {0:?}")]
    SegmentNotFound(SegmentId),

    #[error("wall not found: {0:?}")]
    WallNotFound(WallId),

    #[error("segment {segment:?} already belongs to wall {wall:?}")]
    SegmentOwned { segment: SegmentId, wall: WallId },

    /// A collection inside the graph holds an id that no longer resolves.
    /// Only a kernel bug can produce this.
    #[error("invariant violation: {0}")]
    InvalidReference(String),
}

/// Errors related to geometric computations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors related to kernel operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OperationError {
    #[error("incompatible operation: {0}")]
    Incompatible(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

impl KernelError {
    /// Returns `true` for the "id unknown" family of failures.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Graph(
                GraphError::NodeNotFound(_)
                    | GraphError::SegmentNotFound(_)
                    | GraphError::WallNotFound(_)
            )
        )
    }

    /// Returns `true` if the error reports zero-length or zero-area geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::Geometry(GeometryError::Degenerate(_)))
    }
}

/// Convenience type alias for results using [`KernelError`].
pub type Result<T> = std::result::Result<T, KernelError>;
