//! Bulk edits of enhanced dependencies.

use tbgraph::graph::Sentence;
use tbgraph::token::{EnhancedDep, EnhancedDeps, Tokens, EMPTY_TOKEN};

/// Remove the enhanced dependencies of all words and empty nodes.
pub fn clear_deps(mut sentence: Sentence) -> Sentence {
    for token in sentence.tokens_mut() {
        token.set_deps(None);
    }

    for node in sentence.empty_nodes_mut() {
        node.token_mut().set_deps(None);
    }

    sentence
}

/// Copy primary relations to the enhanced dependencies.
///
/// Every word that has a head and no enhanced dependencies gets a
/// single enhanced relation that mirrors its primary relation. Existing
/// enhanced dependencies are kept as they are.
pub fn copy_deps(mut sentence: Sentence) -> Sentence {
    for idx in 1..sentence.len() {
        let dep = match sentence.dep_graph().head(idx) {
            Some(triple) => EnhancedDep::new(
                triple.head(),
                triple.relation().unwrap_or(EMPTY_TOKEN),
            ),
            None => continue,
        };

        if let Some(token) = sentence[idx].token_mut() {
            if token.deps().is_none() {
                token.set_deps(Some(EnhancedDeps::from(vec![dep])));
            }
        }
    }

    sentence
}

#[cfg(test)]
mod tests {
    use tbgraph::graph::{DepTriple, Sentence};
    use tbgraph::token::{EnhancedDep, Token, Tokens};
    use tbgraph::TokenId;

    use super::{clear_deps, copy_deps};
    use crate::tests::{heads, reparse, TEST_SENTENCES};

    fn all_deps(sentence: &Sentence) -> Vec<Option<Vec<EnhancedDep>>> {
        sentence
            .tokens()
            .chain(sentence.empty_nodes().iter().map(|node| node.token()))
            .map(|token| token.deps().map(|deps| deps.to_vec()))
            .collect()
    }

    #[test]
    fn clear_removes_all_enhanced_relations() {
        for sentence in TEST_SENTENCES.iter() {
            let cleared = clear_deps(sentence.clone());
            assert!(all_deps(&cleared).iter().all(Option::is_none));
            assert_eq!(heads(&cleared), heads(sentence));
            assert_eq!(reparse(&cleared), cleared);
        }
    }

    #[test]
    fn copy_after_clear_mirrors_primary_relations() {
        for sentence in TEST_SENTENCES.iter() {
            let copied = copy_deps(clear_deps(sentence.clone()));
            let dep_graph = copied.dep_graph();

            for (idx, token) in copied.tokens().enumerate() {
                let expected = dep_graph.head(idx + 1).map(|triple| {
                    vec![EnhancedDep::new(
                        triple.head(),
                        triple.relation().unwrap_or("_"),
                    )]
                });
                assert_eq!(token.deps().map(|deps| deps.to_vec()), expected);
            }

            // Empty nodes do not have a primary head.
            for node in copied.empty_nodes() {
                assert!(node.token().deps().is_none());
            }
        }
    }

    #[test]
    fn copy_is_idempotent() {
        for sentence in TEST_SENTENCES.iter() {
            let once = copy_deps(clear_deps(sentence.clone()));
            let twice = copy_deps(once.clone());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn copy_keeps_existing_relations() {
        let sentence = &TEST_SENTENCES[0];
        let copied = copy_deps(sentence.clone());
        assert_eq!(all_deps(&copied), all_deps(sentence));
        assert_eq!(
            copied.token(TokenId::Word(4)).unwrap().deps().unwrap()[0],
            EnhancedDep::new(TokenId::Empty(5, 1), "cc")
        );
    }

    #[test]
    fn copy_skips_headless_words() {
        let mut sentence = Sentence::new();
        sentence.push(Token::new("Hello"));
        sentence.push(Token::new("world"));
        sentence
            .dep_graph_mut()
            .add_deprel::<String>(DepTriple::new(1, None, 2))
            .unwrap();

        let copied = copy_deps(sentence);
        assert!(copied[1].token().unwrap().deps().is_none());
        assert_eq!(
            copied[2].token().unwrap().deps().unwrap().to_vec(),
            [EnhancedDep::new(1, "_")]
        );
    }
}
