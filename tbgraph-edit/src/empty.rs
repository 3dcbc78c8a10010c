//! Insertion and removal of empty nodes.

use tbgraph::graph::{EmptyNode, Sentence};
use tbgraph::token::{Token, Tokens};
use tbgraph::TokenId;
use tracing::debug;

use crate::error::EditError;

/// Add an empty node to a sentence.
///
/// The node gets the identifier `id`, which must be an empty node
/// identifier that follows an existing word (or the root) and is not
/// in use. The attributes of the node are taken from `token`. Empty
/// nodes do not have a primary head, but the enhanced dependencies of
/// `token` can refer to any token of the sentence or to the new node.
/// An empty list of enhanced dependencies is stored as absent.
pub fn add_empty_node(
    sentence: &Sentence,
    id: TokenId,
    mut token: Token,
) -> Result<Sentence, EditError> {
    let (word, sub) = match id {
        TokenId::Empty(word, sub) => (word, sub),
        _ => {
            return Err(EditError::UnsupportedId {
                id,
                operation: "add_empty_node",
            })
        }
    };

    if sentence.contains(id) {
        return Err(EditError::DuplicateId { id });
    }

    if token.deps().map(|deps| deps.is_empty()).unwrap_or(false) {
        token.set_deps(None);
    }

    if let Some(deps) = token.deps() {
        for dep in deps.iter() {
            let head = dep.head();
            if head.is_range() || (head != id && !sentence.contains(head)) {
                return Err(EditError::UnknownHead { id, head });
            }
        }
    }

    let mut edited = sentence.clone();
    edited.insert_empty_node(EmptyNode::new(word, sub, token))?;

    debug!("added empty node {}", id);

    Ok(edited)
}

/// Delete an empty node from a sentence.
///
/// Enhanced dependencies that have the node as their head are removed
/// from the remaining tokens. A token that loses all its enhanced
/// dependencies is left without enhanced annotation.
pub fn delete_empty_node(sentence: &Sentence, id: TokenId) -> Result<Sentence, EditError> {
    if !id.is_empty_node() {
        return Err(EditError::UnsupportedId {
            id,
            operation: "delete_empty_node",
        });
    }

    let mut edited = sentence.clone();
    if edited.remove_empty_node(id).is_none() {
        return Err(EditError::NotFound { id });
    }

    let mut n_removed = 0;
    for token in edited.tokens_mut() {
        n_removed += remove_relations_to(token, id);
    }
    for node in edited.empty_nodes_mut() {
        n_removed += remove_relations_to(node.token_mut(), id);
    }

    debug!(
        "deleted empty node {} and {} enhanced relation(s) to it",
        id, n_removed
    );

    Ok(edited)
}

/// Remove the enhanced relations with the given head.
fn remove_relations_to(token: &mut Token, head: TokenId) -> usize {
    let deps = match token.deps_mut() {
        Some(deps) => deps,
        None => return 0,
    };

    let len = deps.len();
    deps.retain(|dep| dep.head() != head);
    let n_removed = len - deps.len();

    if deps.is_empty() {
        token.set_deps(None);
    }

    n_removed
}

#[cfg(test)]
mod tests {
    use tbgraph::token::{EnhancedDep, EnhancedDeps, Token, TokenBuilder, Tokens};
    use tbgraph::{GraphError, TokenId};

    use super::{add_empty_node, delete_empty_node};
    use crate::error::EditError;
    use crate::tests::{reparse, TEST_SENTENCES};

    #[test]
    fn add_empty_node_after_last_word() {
        let sentence = &TEST_SENTENCES[1];
        let token = TokenBuilder::new("_")
            .upos("VERB")
            .deps(EnhancedDeps::from(vec![EnhancedDep::new(TokenId::ROOT, "root")]))
            .into();

        let edited = add_empty_node(sentence, TokenId::Empty(3, 1), token).unwrap();

        assert_eq!(sentence.empty_nodes().len(), 0);
        assert_eq!(edited.empty_nodes().len(), 1);
        assert_eq!(edited.word_count(), sentence.word_count());

        let node = edited.token(TokenId::Empty(3, 1)).unwrap();
        assert_eq!(node.form(), "_");
        assert_eq!(node.upos(), Some("VERB"));

        assert_eq!(reparse(&edited), edited);
    }

    #[test]
    fn add_empty_node_with_relation_to_itself() {
        let sentence = &TEST_SENTENCES[0];
        let token = TokenBuilder::new("saw")
            .deps(EnhancedDeps::from(vec![
                EnhancedDep::new(TokenId::Empty(5, 1), "conj"),
                EnhancedDep::new(TokenId::Empty(2, 1), "dep"),
            ]))
            .into();

        let edited = add_empty_node(sentence, TokenId::Empty(2, 1), token).unwrap();
        let ids = edited
            .empty_nodes()
            .iter()
            .map(|node| node.id())
            .collect::<Vec<_>>();
        assert_eq!(ids, [TokenId::Empty(2, 1), TokenId::Empty(5, 1)]);
        assert_eq!(reparse(&edited), edited);
    }

    #[test]
    fn add_empty_node_errors() {
        let sentence = &TEST_SENTENCES[0];

        assert_eq!(
            add_empty_node(sentence, TokenId::Empty(5, 1), TokenBuilder::new("_").into()),
            Err(EditError::DuplicateId {
                id: TokenId::Empty(5, 1)
            })
        );

        assert_eq!(
            add_empty_node(sentence, TokenId::Word(3), TokenBuilder::new("_").into()),
            Err(EditError::UnsupportedId {
                id: TokenId::Word(3),
                operation: "add_empty_node"
            })
        );

        assert_eq!(
            add_empty_node(sentence, TokenId::Empty(9, 1), TokenBuilder::new("_").into()),
            Err(EditError::Graph(GraphError::EmptyNodeOutOfBounds {
                id: TokenId::Empty(9, 1),
                word_count: 6
            }))
        );

        let token = TokenBuilder::new("_")
            .deps(EnhancedDeps::from(vec![EnhancedDep::new(
                TokenId::Empty(3, 1),
                "dep",
            )]))
            .into();
        assert_eq!(
            add_empty_node(sentence, TokenId::Empty(2, 1), token),
            Err(EditError::UnknownHead {
                id: TokenId::Empty(2, 1),
                head: TokenId::Empty(3, 1)
            })
        );
    }

    #[test]
    fn delete_empty_node_removes_relations() {
        let sentence = &TEST_SENTENCES[0];
        let edited = delete_empty_node(sentence, TokenId::Empty(5, 1)).unwrap();

        assert!(edited.empty_nodes().is_empty());
        assert_eq!(edited.word_count(), sentence.word_count());

        // 'and', 'Tom' and 'Sue' only had relations to the empty node.
        let deps = edited
            .tokens()
            .map(|token| token.deps().map(|deps| deps.len()))
            .collect::<Vec<_>>();
        assert_eq!(deps, [Some(1), Some(1), Some(1), None, None, None]);

        assert!(edited
            .tokens()
            .filter_map(|token| token.deps())
            .flat_map(|deps| deps.iter())
            .all(|dep| dep.head() != TokenId::Empty(5, 1)));

        assert_eq!(reparse(&edited), edited);
    }

    #[test]
    fn add_empty_node_without_relations() {
        let sentence = &TEST_SENTENCES[1];
        let token = TokenBuilder::new("_").deps(EnhancedDeps::new()).into();

        let edited = add_empty_node(sentence, TokenId::Empty(3, 1), token).unwrap();
        assert!(edited.token(TokenId::Empty(3, 1)).unwrap().deps().is_none());
        assert_eq!(reparse(&edited), edited);
    }

    #[test]
    fn delete_empty_node_updates_other_empty_nodes() {
        let conj = |head: TokenId| -> Token {
            TokenBuilder::new("saw")
                .deps(EnhancedDeps::from(vec![EnhancedDep::new(head, "conj")]))
                .into()
        };

        let sentence = add_empty_node(
            &TEST_SENTENCES[0],
            TokenId::Empty(5, 2),
            conj(TokenId::Empty(5, 1)),
        )
        .unwrap();
        let mut both = conj(TokenId::Empty(5, 1));
        both.deps_mut()
            .unwrap()
            .push(EnhancedDep::new(TokenId::Word(2), "conj"));
        let sentence = add_empty_node(&sentence, TokenId::Empty(5, 3), both).unwrap();

        let edited = delete_empty_node(&sentence, TokenId::Empty(5, 1)).unwrap();

        assert!(edited.token(TokenId::Empty(5, 2)).unwrap().deps().is_none());
        assert_eq!(
            edited
                .token(TokenId::Empty(5, 3))
                .unwrap()
                .deps()
                .map(|deps| deps.to_vec()),
            Some(vec![EnhancedDep::new(TokenId::Word(2), "conj")])
        );
        assert_eq!(reparse(&edited), edited);
    }

    #[test]
    fn delete_empty_node_errors() {
        let sentence = &TEST_SENTENCES[0];

        assert_eq!(
            delete_empty_node(sentence, TokenId::Empty(8, 1)),
            Err(EditError::NotFound {
                id: TokenId::Empty(8, 1)
            })
        );

        assert_eq!(
            delete_empty_node(sentence, TokenId::Word(5)),
            Err(EditError::UnsupportedId {
                id: TokenId::Word(5),
                operation: "delete_empty_node"
            })
        );
    }
}
