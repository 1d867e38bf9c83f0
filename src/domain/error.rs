//! Domain-level errors (no external dependencies)

use std::fmt::Debug;
use thiserror::Error;

use crate::domain::payload::BoxError;

/// Errors raised by genealogy operations.
///
/// Every variant is returned before any shared state is touched, so a caller
/// that receives one observes the genealogy exactly as it was before the call.
#[derive(Error, Debug)]
pub enum GenealogyError<I: Debug> {
    #[error("id already exists: {0:?}")]
    AlreadyExists(I),

    #[error("unknown id: {0:?}")]
    UnknownId(I),

    #[error("the stem cannot be removed: {0:?}")]
    ForbiddenRootRemoval(I),

    #[error("the stem cannot be given a parent: {0:?}")]
    ForbiddenStemParent(I),

    #[error("a node cannot be its own parent: {0:?}")]
    SelfEdge(I),

    #[error("no parents given for new node: {0:?}")]
    EmptyParents(I),

    #[error("payload construction failed for {id:?}")]
    Payload {
        id: I,
        #[source]
        source: BoxError,
    },
}

impl<I: Debug> GenealogyError<I> {
    /// Wrap a payload constructor failure.
    pub fn payload(id: I, source: BoxError) -> Self {
        Self::Payload { id, source }
    }
}

/// Result type for genealogy operations.
pub type GenealogyResult<T, I> = Result<T, GenealogyError<I>>;
