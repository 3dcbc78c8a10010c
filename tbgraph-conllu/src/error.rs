use std::io;

use tbgraph::{GraphError, ParseIdError, TokenId};
use thiserror::Error;

/// CoNLL-U IO error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IOError {
    /// Error in file IO.
    #[error("error reading treebank")]
    IO(#[from] io::Error),

    /// CoNLL-U parsing error.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// CoNLL-U parsing errors.
#[derive(Debug, Error, Eq, PartialEq)]
#[non_exhaustive]
pub enum ParseError {
    /// Error constructing the graph.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// The form is missing in the CoNLL-U data.
    #[error("form field is missing")]
    MissingFormField,

    /// The feature field could not be parsed
    #[error("cannot parse feature field: {value:?}")]
    IncorrectFeatureField { value: String },

    /// The enhanced dependency field could not be parsed.
    #[error("cannot parse enhanced dependency field: {value:?}")]
    IncorrectDepsField { value: String },

    /// An integer field could not be parsed as an integer.
    #[error("cannot parse as integer field: {value:?}")]
    ParseIntField { value: String },

    /// The identifier field could not be parsed.
    #[error("cannot parse as identifier field: {value:?}")]
    ParseIdentifierField { value: String },

    /// Identifier that does not follow the previous line.
    #[error("expected identifier {expected}, found {found}")]
    UnexpectedIdentifier { expected: String, found: TokenId },

    /// Dependency relation without a head.
    #[error("dependency relation without a head: {token:?}")]
    RelationWithoutHead { token: String },

    /// Empty nodes cannot be part of the primary dependency tree.
    #[error("empty node with a head or dependency relation: {token:?}")]
    EmptyNodeWithHead { token: String },

    /// Enhanced dependency with a head that is not in the sentence.
    #[error("enhanced dependency of {dependent} has unknown head {head}")]
    UnknownDepsHead { dependent: TokenId, head: TokenId },

    /// The input does not contain any sentence.
    #[error("no sentence found")]
    NoSentence,
}

impl From<ParseIdError> for ParseError {
    fn from(err: ParseIdError) -> Self {
        ParseError::ParseIdentifierField { value: err.value }
    }
}
