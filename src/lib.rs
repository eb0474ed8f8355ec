pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod math;
pub mod operations;

pub use config::KernelConfig;
pub use error::{GeometryError, GraphError, KernelError, OperationError, Result};
pub use graph::{NodeId, NodeKind, SegmentId, WallGraph, WallId, WallType};
