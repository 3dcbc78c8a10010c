//! Structural edits of dependency graphs.
//!
//! Every edit leaves its input untouched and returns the edited
//! sentence. Identifiers are renumbered where necessary, so that the
//! result is a consistent CoNLL-U sentence again.

mod deps;
pub use deps::{clear_deps, copy_deps};

mod empty;
pub use empty::{add_empty_node, delete_empty_node};

mod error;
pub use error::{EditError, ParsePolicyError};

mod node;
pub use node::{delete_node, ChildrenPolicy};
