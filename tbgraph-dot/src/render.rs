use std::fmt::{self, Display, Formatter};

use tbgraph::graph::{Entry, Sentence};
use tbgraph::token::Token;
use tbgraph::TokenId;
use tracing::debug;

use crate::palette::Palette;

/// Graph that is rendered when enhanced dependencies are incomplete.
pub const NOT_AVAILABLE: &str = "digraph {not -> available}";

/// Render the primary dependency tree with the default palette.
pub fn render_primary_tree(sentence: &Sentence) -> String {
    DotRenderer::default().render_primary(sentence)
}

/// Render the enhanced dependency graph with the default palette.
///
/// Returns [`NOT_AVAILABLE`] when a word or empty node has no enhanced
/// dependencies.
pub fn render_secondary_graph(sentence: &Sentence) -> String {
    DotRenderer::default().render_enhanced(sentence)
}

/// Renderer of dependency graphs in the Graphviz DOT language.
#[derive(Clone, Debug, Default)]
pub struct DotRenderer {
    palette: Palette,
}

impl DotRenderer {
    /// Construct a renderer that colors tokens using `palette`.
    pub fn new(palette: Palette) -> Self {
        DotRenderer { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render the primary dependency tree.
    ///
    /// Multiword tokens and empty nodes are not part of the tree. Words
    /// without a head are rendered without an incoming edge.
    pub fn render_primary(&self, sentence: &Sentence) -> String {
        Dot {
            palette: &self.palette,
            sentence,
            enhanced: false,
        }
        .to_string()
    }

    /// Render the enhanced dependency graph.
    ///
    /// The graph is only rendered when every word and empty node has
    /// enhanced dependencies, otherwise [`NOT_AVAILABLE`] is returned.
    pub fn render_enhanced(&self, sentence: &Sentence) -> String {
        if let Some(id) = first_without_deps(sentence) {
            debug!("token {} has no enhanced dependencies", id);
            return NOT_AVAILABLE.to_string();
        }

        Dot {
            palette: &self.palette,
            sentence,
            enhanced: true,
        }
        .to_string()
    }
}

fn first_without_deps(sentence: &Sentence) -> Option<TokenId> {
    sentence
        .entries()
        .filter_map(|entry| entry.token().map(|token| (entry.id(), token)))
        .find(|(_, token)| token.deps().map(|deps| deps.is_empty()).unwrap_or(true))
        .map(|(id, _)| id)
}

struct Dot<'a> {
    palette: &'a Palette,
    sentence: &'a Sentence,
    enhanced: bool,
}

impl<'a> Dot<'a> {
    fn write_node(&self, fmt: &mut Formatter, id: TokenId, token: &Token) -> fmt::Result {
        writeln!(
            fmt,
            "    \"{}\" [label=\"{}\" fontcolor=\"{}\"]",
            id,
            Escaped(token.form()),
            Escaped(self.palette.color(token.upos()))
        )
    }

    fn write_edge(
        &self,
        fmt: &mut Formatter,
        head: TokenId,
        dependent: TokenId,
        relation: &str,
    ) -> fmt::Result {
        writeln!(
            fmt,
            "    \"{}\" -> \"{}\" [label=\"{}\"]",
            head,
            dependent,
            Escaped(relation)
        )
    }
}

impl<'a> Display for Dot<'a> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        writeln!(fmt, "digraph G{{")?;
        writeln!(fmt, "    bgcolor=\"snow1\"")?;
        writeln!(
            fmt,
            "    edge [dir=forward color=\"gray56\" style=\"{}\"]",
            if self.enhanced { "dashed" } else { "solid" }
        )?;
        writeln!(fmt, "    node [shape=plaintext]")?;
        writeln!(fmt)?;
        writeln!(
            fmt,
            "    \"{}\" [label=\"Root (0)\" fontcolor=\"midnightblue\"]",
            TokenId::ROOT
        )?;

        for entry in self.sentence.entries() {
            match entry {
                Entry::Multiword(_) => (),
                Entry::Word(_, token) => self.write_node(fmt, entry.id(), token)?,
                Entry::Empty(node) if self.enhanced => {
                    self.write_node(fmt, node.id(), node.token())?
                }
                Entry::Empty(_) => (),
            }
        }

        if self.enhanced {
            for entry in self.sentence.entries() {
                let deps = match entry.token().and_then(Token::deps) {
                    Some(deps) => deps,
                    None => continue,
                };

                for dep in deps.iter() {
                    self.write_edge(fmt, dep.head(), entry.id(), dep.relation())?;
                }
            }
        } else {
            let dep_graph = self.sentence.dep_graph();
            for idx in 1..self.sentence.len() {
                if let Some(triple) = dep_graph.head(idx) {
                    self.write_edge(
                        fmt,
                        TokenId::Word(triple.head()),
                        TokenId::Word(idx),
                        triple.relation().unwrap_or("_"),
                    )?;
                }
            }
        }

        write!(fmt, "}}")
    }
}

/// Text in a quoted DOT string.
struct Escaped<'a>(&'a str);

impl<'a> Display for Escaped<'a> {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '"' | '\\' => write!(fmt, "\\{}", c)?,
                '\n' => fmt.write_str("\\n")?,
                c => write!(fmt, "{}", c)?,
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tbgraph::graph::{DepTriple, Sentence};
    use tbgraph::token::{EnhancedDep, EnhancedDeps, Token, TokenBuilder};
    use tbgraph::TokenId;

    use super::{render_primary_tree, render_secondary_graph, DotRenderer, NOT_AVAILABLE};
    use crate::palette::Palette;
    use crate::tests::TEST_SENTENCES;

    #[test]
    fn primary_tree() {
        assert_eq!(
            render_primary_tree(&TEST_SENTENCES[1]),
            r#"digraph G{
    bgcolor="snow1"
    edge [dir=forward color="gray56" style="solid"]
    node [shape=plaintext]

    "0" [label="Root (0)" fontcolor="midnightblue"]
    "1" [label="di" fontcolor="darkgreen"]
    "2" [label="la" fontcolor="darkturquoise"]
    "3" [label="casa" fontcolor="cyan4"]
    "3" -> "1" [label="case"]
    "3" -> "2" [label="det"]
    "0" -> "3" [label="root"]
}"#
        );
    }

    #[test]
    fn primary_tree_skips_empty_nodes() {
        let dot = render_primary_tree(&TEST_SENTENCES[0]);
        assert!(!dot.contains("\"5.1\""));
        assert!(dot.contains("\"5\" -> \"6\" [label=\"orphan\"]"));
        assert_eq!(dot.matches(" -> ").count(), 6);
    }

    #[test]
    fn secondary_graph() {
        assert_eq!(
            render_secondary_graph(&TEST_SENTENCES[0]),
            r#"digraph G{
    bgcolor="snow1"
    edge [dir=forward color="gray56" style="dashed"]
    node [shape=plaintext]

    "0" [label="Root (0)" fontcolor="midnightblue"]
    "1" [label="Bill" fontcolor="cornflowerblue"]
    "2" [label="saw" fontcolor="firebrick3"]
    "3" [label="Mary" fontcolor="cornflowerblue"]
    "4" [label="and" fontcolor="deeppink"]
    "5" [label="Tom" fontcolor="cornflowerblue"]
    "5.1" [label="saw" fontcolor="firebrick3"]
    "6" [label="Sue" fontcolor="cornflowerblue"]
    "2" -> "1" [label="nsubj"]
    "0" -> "2" [label="root"]
    "2" -> "3" [label="obj"]
    "5.1" -> "4" [label="cc"]
    "5.1" -> "5" [label="nsubj"]
    "2" -> "5.1" [label="conj:and"]
    "5.1" -> "6" [label="obj"]
}"#
        );
    }

    #[test]
    fn secondary_graph_requires_all_deps() {
        // Sentence without any enhanced dependencies.
        assert_eq!(render_secondary_graph(&TEST_SENTENCES[1]), NOT_AVAILABLE);

        // A single token without enhanced dependencies.
        let mut sentence = TEST_SENTENCES[0].clone();
        sentence[3].token_mut().unwrap().set_deps(None);
        assert_eq!(render_secondary_graph(&sentence), NOT_AVAILABLE);

        let mut sentence = TEST_SENTENCES[0].clone();
        sentence
            .token_mut(TokenId::Empty(5, 1))
            .unwrap()
            .set_deps(None);
        assert_eq!(render_secondary_graph(&sentence), NOT_AVAILABLE);
    }

    #[test]
    fn unattached_words_have_no_edge() {
        let mut sentence = Sentence::new();
        sentence.push(Token::new("Hello"));
        sentence.push(Token::new("world"));
        sentence
            .dep_graph_mut()
            .add_deprel(DepTriple::new(0, Some("root"), 1))
            .unwrap();

        let dot = render_primary_tree(&sentence);
        assert!(dot.contains("\"2\" [label=\"world\" fontcolor=\"gray16\"]"));
        assert!(dot.contains("\"0\" -> \"1\" [label=\"root\"]"));
        assert_eq!(dot.matches(" -> ").count(), 1);
    }

    #[test]
    fn labels_are_escaped() {
        let mut sentence = Sentence::new();
        sentence.push(
            TokenBuilder::new("\"quoted\\\"")
                .upos("PUNCT")
                .deps(EnhancedDeps::from(vec![EnhancedDep::new(0, "punct")]))
                .into(),
        );
        sentence
            .dep_graph_mut()
            .add_deprel(DepTriple::new(0, Some("punct"), 1))
            .unwrap();

        let expected_node = r#""1" [label="\"quoted\\\"" fontcolor="dimgray"]"#;
        assert!(render_primary_tree(&sentence).contains(expected_node));
        assert!(render_secondary_graph(&sentence).contains(expected_node));
    }

    #[test]
    fn custom_palette() {
        let renderer = DotRenderer::new(
            Palette::default()
                .with_color("PROPN", "red")
                .with_default_color("black"),
        );

        let dot = renderer.render_primary(&TEST_SENTENCES[0]);
        assert!(dot.contains("\"1\" [label=\"Bill\" fontcolor=\"red\"]"));
        assert!(dot.contains("\"2\" [label=\"saw\" fontcolor=\"firebrick3\"]"));

        let mut sentence = TEST_SENTENCES[1].clone();
        sentence[1].token_mut().unwrap().set_upos(None::<String>);
        let dot = renderer.render_primary(&sentence);
        assert!(dot.contains("\"1\" [label=\"di\" fontcolor=\"black\"]"));
    }
}
