//! Deletion of words.

use std::cmp::max;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::iter;
use std::str::FromStr;

use itertools::{Itertools, MinMaxResult};
use petgraph::graph::node_index;
use petgraph::visit::Bfs;
use tbgraph::graph::{DepTriple, EmptyNode, Multiword, Sentence};
use tbgraph::token::{EnhancedDep, EnhancedDeps, Token};
use tbgraph::TokenId;
use tracing::warn;

use crate::error::{EditError, ParsePolicyError};

/// Treatment of the dependents of a deleted word.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChildrenPolicy {
    /// Attach the dependents to the head of the deleted word and log a
    /// warning.
    RehangWarn,

    /// Attach the dependents to the head of the deleted word.
    Rehang,

    /// Leave the dependents without a head.
    Detach,

    /// Refuse to delete a word that has dependents.
    Fail,

    /// Delete the dependents (and their dependents) as well.
    Delete,

    /// Delete the dependents as well and log a warning.
    DeleteWarn,
}

impl ChildrenPolicy {
    fn rehangs(self) -> bool {
        matches!(self, ChildrenPolicy::Rehang | ChildrenPolicy::RehangWarn)
    }

    fn deletes_subtree(self) -> bool {
        matches!(self, ChildrenPolicy::Delete | ChildrenPolicy::DeleteWarn)
    }
}

impl Default for ChildrenPolicy {
    fn default() -> Self {
        ChildrenPolicy::RehangWarn
    }
}

impl Display for ChildrenPolicy {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        let name = match self {
            ChildrenPolicy::RehangWarn => "rehang_warn",
            ChildrenPolicy::Rehang => "rehang",
            ChildrenPolicy::Detach => "detach",
            ChildrenPolicy::Fail => "fail",
            ChildrenPolicy::Delete => "delete",
            ChildrenPolicy::DeleteWarn => "delete_warn",
        };

        fmt.write_str(name)
    }
}

impl FromStr for ChildrenPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('-', "_").as_str() {
            "rehang_warn" => Ok(ChildrenPolicy::RehangWarn),
            "rehang" => Ok(ChildrenPolicy::Rehang),
            "detach" => Ok(ChildrenPolicy::Detach),
            "fail" => Ok(ChildrenPolicy::Fail),
            "delete" => Ok(ChildrenPolicy::Delete),
            "delete_warn" | "warn" => Ok(ChildrenPolicy::DeleteWarn),
            _ => Err(ParsePolicyError {
                value: s.to_owned(),
            }),
        }
    }
}

/// Delete a word from a sentence.
///
/// The dependents of the word are treated according to `children`.
/// Words, empty nodes and multiword tokens following the deleted
/// word(s) are renumbered. Enhanced dependencies on a deleted word are
/// moved to its head when the policy rehangs dependents and removed
/// otherwise.
///
/// Only words can be deleted, use
/// [`delete_empty_node`](crate::delete_empty_node) for empty nodes.
pub fn delete_node(
    sentence: &Sentence,
    id: TokenId,
    children: ChildrenPolicy,
) -> Result<Sentence, EditError> {
    let target = match id {
        TokenId::Word(idx) if idx > 0 => idx,
        _ => {
            return Err(EditError::UnsupportedId {
                id,
                operation: "delete_node",
            })
        }
    };

    if target >= sentence.len() {
        return Err(EditError::NotFound { id });
    }

    let dep_graph = sentence.dep_graph();
    let n_children = dep_graph.dependents(target).count();
    let head = dep_graph.head(target).map(|triple| triple.head());

    if n_children != 0 {
        match children {
            ChildrenPolicy::Fail => {
                return Err(EditError::HasChildren {
                    id,
                    children: n_children,
                })
            }
            ChildrenPolicy::RehangWarn => warn!(
                "rehanging {} dependent(s) of deleted token {} to {}",
                n_children,
                id,
                head.map(|head| head.to_string())
                    .unwrap_or_else(|| "nothing".to_string())
            ),
            ChildrenPolicy::DeleteWarn => {
                warn!("deleting {} dependent(s) of token {}", n_children, id)
            }
            _ => (),
        }
    }

    let removed = if children.deletes_subtree() {
        subtree(sentence, target)
    } else {
        iter::once(target).collect()
    };

    let new_head = if children.rehangs() {
        head.filter(|head| !removed.contains(head))
    } else {
        None
    };

    Renumbering { removed, new_head }.apply(sentence)
}

/// Get the word and its (transitive) dependents.
fn subtree(sentence: &Sentence, word: usize) -> BTreeSet<usize> {
    let graph = sentence.get_ref();
    let mut words = BTreeSet::new();
    let mut bfs = Bfs::new(graph, node_index(word));
    while let Some(node) = bfs.next(graph) {
        words.insert(node.index());
    }

    words
}

/// Copy of a sentence without the removed words.
struct Renumbering {
    removed: BTreeSet<usize>,

    /// Original index of the word that takes over the relations of the
    /// removed words.
    new_head: Option<usize>,
}

impl Renumbering {
    /// Index of a word after renumbering.
    ///
    /// A removed word is mapped to the closest kept word preceding it,
    /// which is where its empty nodes go.
    fn shift(&self, idx: usize) -> usize {
        idx - self.removed.range(..=idx).count()
    }

    fn word(&self, idx: usize) -> Option<usize> {
        if self.removed.contains(&idx) {
            None
        } else {
            Some(self.shift(idx))
        }
    }

    fn apply(&self, sentence: &Sentence) -> Result<Sentence, EditError> {
        let empty_ids = self.empty_node_ids(sentence);

        let mut edited = Sentence::new();
        edited.set_comments(sentence.comments().to_vec());

        for idx in 1..sentence.len() {
            let new_idx = match self.word(idx) {
                Some(new_idx) => new_idx,
                None => continue,
            };

            if let Some(token) = sentence[idx].token() {
                edited.push(self.renumber_token(token, TokenId::Word(new_idx), &empty_ids));
            }
        }

        for idx in 1..sentence.len() {
            let dependent = match self.word(idx) {
                Some(dependent) => dependent,
                None => continue,
            };

            let triple = match sentence.dep_graph().head(idx) {
                Some(triple) => triple,
                None => continue,
            };

            let head = if self.removed.contains(&triple.head()) {
                match self.new_head {
                    Some(head) => head,
                    None => continue,
                }
            } else {
                triple.head()
            };

            edited.dep_graph_mut().add_deprel(DepTriple::new(
                self.shift(head),
                triple.relation(),
                dependent,
            ))?;
        }

        for node in sentence.empty_nodes() {
            let (word, sub) = empty_ids[&node.id()];

            edited.insert_empty_node(EmptyNode::new(
                word,
                sub,
                self.renumber_token(node.token(), TokenId::Empty(word, sub), &empty_ids),
            ))?;
        }

        for multiword in sentence.multiwords() {
            if let MinMaxResult::MinMax(first, last) = (multiword.first()..=multiword.last())
                .filter_map(|idx| self.word(idx))
                .minmax()
            {
                let mut renumbered = Multiword::new(first, last, multiword.form());
                renumbered.set_misc(multiword.misc().clone());
                edited.push_multiword(renumbered)?;
            }
        }

        Ok(edited)
    }

    /// Assign new identifiers to empty nodes.
    ///
    /// Empty nodes of a removed word are appended to the empty nodes
    /// of the word that they are moved to.
    fn empty_node_ids(&self, sentence: &Sentence) -> BTreeMap<TokenId, (usize, usize)> {
        let mut ids = BTreeMap::new();
        let mut last_sub = BTreeMap::new();

        for node in sentence.empty_nodes() {
            let word = self.shift(node.word());
            let last = last_sub.entry(word).or_insert(0);
            let sub = if self.removed.contains(&node.word()) {
                *last + 1
            } else {
                node.sub()
            };
            *last = max(*last, sub);

            ids.insert(node.id(), (word, sub));
        }

        ids
    }

    fn renumber_token(
        &self,
        token: &Token,
        new_id: TokenId,
        empty_ids: &BTreeMap<TokenId, (usize, usize)>,
    ) -> Token {
        let mut token = token.clone();

        let deps = token.set_deps(None);
        if let Some(deps) = deps {
            let mut renumbered = EnhancedDeps::new();
            for dep in deps.iter() {
                let head = match dep.head() {
                    TokenId::Word(idx) if self.removed.contains(&idx) => match self.new_head {
                        Some(head) => TokenId::Word(self.shift(head)),
                        None => continue,
                    },
                    TokenId::Word(idx) => TokenId::Word(self.shift(idx)),
                    id => match empty_ids.get(&id) {
                        Some(&(word, sub)) => TokenId::Empty(word, sub),
                        None => continue,
                    },
                };

                let dep = EnhancedDep::new(head, dep.relation());
                if head != new_id && !renumbered.contains(&dep) {
                    renumbered.push(dep);
                }
            }

            if !renumbered.is_empty() {
                token.set_deps(Some(renumbered));
            }
        }

        token
    }
}
