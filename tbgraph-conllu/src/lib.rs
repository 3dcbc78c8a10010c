//! CoNLL-U reading and writing.
//!
//! Sentences are read into `tbgraph` dependency graphs. Multiword
//! tokens, empty nodes and enhanced dependencies are preserved, so
//! that a sentence can be edited and written back.

mod error;
pub use crate::error::{IOError, ParseError};

pub mod io;
pub use crate::io::{parse_sentence, parse_str, read_treebank};

pub mod display;
