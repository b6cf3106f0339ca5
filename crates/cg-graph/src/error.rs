//! Graph-subsystem error type.

use thiserror::Error;

use cg_core::NodeId;

/// Errors produced by `cg-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path between {from} and {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;
