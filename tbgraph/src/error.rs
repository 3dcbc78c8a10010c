use thiserror::Error;

use crate::id::TokenId;

/// Graph processing error.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum GraphError {
    #[error("dependent {dependent:?} is out of bounds for graph with {node_count:?} vertices")]
    DependentOutOfBounds { dependent: usize, node_count: usize },

    #[error("head {head:?} is out of bounds for graph with {node_count:?} vertices")]
    HeadOutOfBounds { head: usize, node_count: usize },

    #[error("empty node {id} does not follow a word of a sentence with {word_count} words")]
    EmptyNodeOutOfBounds { id: TokenId, word_count: usize },

    #[error("multiword token {id} is out of bounds for a sentence with {word_count} words")]
    RangeOutOfBounds { id: TokenId, word_count: usize },

    #[error("duplicate identifier: {id}")]
    DuplicateId { id: TokenId },
}

/// Malformed token identifier.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("cannot parse token identifier: {value:?}")]
pub struct ParseIdError {
    pub value: String,
}
