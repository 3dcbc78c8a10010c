//! Dependency graphs for CoNLL-U treebanks.
//!
//! Besides the primary dependency tree, sentences store the parts of
//! the annotation that are needed for editing enhanced UD graphs:
//! multiword tokens, empty nodes and enhanced dependencies.

mod error;
pub use crate::error::{GraphError, ParseIdError};

pub mod graph;

mod id;
pub use crate::id::TokenId;

pub mod token;

#[cfg(test)]
mod tests;
