//! Graph-subsystem error type.

use thiserror::Error;

use sp_core::{NodeIdx, NodeKey};

/// Errors produced by `sp-graph`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0} not found in graph")]
    UnknownNode(NodeKey),

    #[error("{0} is out of range for this graph")]
    InvalidIndex(NodeIdx),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeKey, to: NodeKey },

    #[error("invalid weight {weight} on edge {u}-{v}: must be finite and non-negative")]
    InvalidWeight { u: NodeKey, v: NodeKey, weight: f64 },
}

pub type GraphResult<T> = Result<T, GraphError>;
