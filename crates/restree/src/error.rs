//! Request-level failures surfaced at the dispatch boundary.

use restree_graph::GraphError;
use thiserror::Error;

use crate::token::StreamError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("no such resource: /{0}")]
    NotFound(String),
    #[error("cannot merge into absent resource: /{0}")]
    AbsentMergeTarget(String),
    #[error("resource already populated: /{0}")]
    Conflict(String),
    #[error("malformed path segment: {0:?}")]
    MalformedSegment(String),
    #[error("cannot {0} the root resource")]
    RootSlot(&'static str),
    #[error("unknown verb: {0:?}")]
    UnknownVerb(String),
    #[error("invalid body: {0}")]
    Body(String),
    #[error(transparent)]
    Stream(#[from] StreamError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
