//! Graphviz (DOT) rendering of dependency graphs.
//!
//! The primary dependency tree and the enhanced dependency graph of a
//! sentence are rendered as DOT digraphs. Word forms are colored by
//! their universal part-of-speech tag.

mod palette;
pub use palette::{Palette, DEFAULT_COLOR};

mod render;
pub use render::{render_primary_tree, render_secondary_graph, DotRenderer, NOT_AVAILABLE};
