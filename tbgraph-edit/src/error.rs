use tbgraph::{GraphError, TokenId};
use thiserror::Error;

/// Sentence editing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum EditError {
    /// The identifier is not in the sentence.
    #[error("token {id} not found in sentence")]
    NotFound { id: TokenId },

    /// The identifier has the wrong kind for the operation.
    #[error("{operation} does not support token identifier {id}")]
    UnsupportedId {
        id: TokenId,
        operation: &'static str,
    },

    /// The token has dependents and the children policy forbids deletion.
    #[error("token {id} has {children} dependents")]
    HasChildren { id: TokenId, children: usize },

    /// The identifier is already used by another token.
    #[error("token identifier {id} is already in use")]
    DuplicateId { id: TokenId },

    /// Enhanced dependency with a head that is not in the sentence.
    #[error("enhanced dependency of {id} has unknown head {head}")]
    UnknownHead { id: TokenId, head: TokenId },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Unknown children policy name.
#[derive(Debug, Error, Eq, PartialEq)]
#[error("unknown children policy: {value:?}")]
pub struct ParsePolicyError {
    pub value: String,
}
