//! Dependency graphs.

use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};
use std::iter::FromIterator;
use std::mem;
use std::ops::{Index, IndexMut};

use petgraph::graph::{node_index, DiGraph, NodeIndices, NodeWeightsMut};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::error::GraphError;
use crate::id::TokenId;
use crate::token::{Misc, Token};

/// Dependency graph node.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    /// Root node.
    Root,

    /// Token node.
    Token(Token),
}

impl Node {
    pub fn is_root(&self) -> bool {
        !self.is_token()
    }

    pub fn is_token(&self) -> bool {
        match self {
            Node::Root => false,
            Node::Token(_) => true,
        }
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Root => None,
            Node::Token(token) => Some(token),
        }
    }

    pub fn token_mut(&mut self) -> Option<&mut Token> {
        match self {
            Node::Root => None,
            Node::Token(token) => Some(token),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
/// Sentence comment.
pub enum Comment {
    /// Attribute-value pair
    AttrVal { attr: String, val: String },

    /// String comment
    String(String),
}

impl Display for Comment {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), fmt::Error> {
        match self {
            Comment::AttrVal { attr, val } => write!(fmt, "# {} = {}", attr, val),
            Comment::String(val) => write!(fmt, "# {}", val),
        }
    }
}

/// A dependency triple.
///
/// A dependency triple consists of: a head index; a dependent index; and
/// an optional dependency label.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub struct DepTriple<S> {
    head: usize,
    dependent: usize,
    relation: Option<S>,
}

impl<S> DepTriple<S> {
    /// Construct a new dependency triple.
    pub fn new(head: usize, relation: Option<S>, dependent: usize) -> Self {
        DepTriple {
            head,
            dependent,
            relation,
        }
    }

    /// Get the dependent.
    pub fn dependent(&self) -> usize {
        self.dependent
    }

    /// Get the head.
    pub fn head(&self) -> usize {
        self.head
    }
}

impl<S> DepTriple<S>
where
    S: Borrow<str>,
{
    pub fn relation(&self) -> Option<&str> {
        self.relation.as_ref().map(Borrow::borrow)
    }
}

/// Dependency edge, labelled with the dependency relation.
pub type Edge = Option<String>;

/// A multiword token.
///
/// A multiword token is an orthographic token that is split into
/// several syntactic words, e.g. Italian *della* = *di* + *la*. It
/// does not participate in the dependency graph.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Multiword {
    first: usize,
    last: usize,
    form: String,
    misc: Misc,
}

impl Multiword {
    /// Construct a multiword token spanning the words `first..=last`.
    pub fn new(first: usize, last: usize, form: impl Into<String>) -> Self {
        Multiword {
            first,
            last,
            form: form.into(),
            misc: Misc::new(),
        }
    }

    /// Get the identifier of the multiword token.
    pub fn id(&self) -> TokenId {
        TokenId::Range(self.first, self.last)
    }

    /// The first word of the multiword token.
    pub fn first(&self) -> usize {
        self.first
    }

    /// The last word of the multiword token.
    pub fn last(&self) -> usize {
        self.last
    }

    pub fn form(&self) -> &str {
        &self.form
    }

    pub fn misc(&self) -> &Misc {
        &self.misc
    }

    pub fn misc_mut(&mut self) -> &mut Misc {
        &mut self.misc
    }

    /// Set miscellaneous features.
    ///
    /// Returns the features that are replaced.
    pub fn set_misc(&mut self, misc: Misc) -> Misc {
        mem::replace(&mut self.misc, misc)
    }
}

/// An empty node.
///
/// Empty nodes represent elided material in enhanced dependency
/// graphs. They are not part of the primary dependency tree, but can
/// be the head or dependent of enhanced dependencies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EmptyNode {
    word: usize,
    sub: usize,
    token: Token,
}

impl EmptyNode {
    /// Construct the empty node `word.sub`.
    pub fn new(word: usize, sub: usize, token: Token) -> Self {
        EmptyNode { word, sub, token }
    }

    /// Get the identifier of the empty node.
    pub fn id(&self) -> TokenId {
        TokenId::Empty(self.word, self.sub)
    }

    /// The word that the empty node follows (0 if it precedes all words).
    pub fn word(&self) -> usize {
        self.word
    }

    pub fn sub(&self) -> usize {
        self.sub
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut Token {
        &mut self.token
    }

    /// Unwrap the token of the empty node.
    pub fn into_token(self) -> Token {
        self.token
    }
}

/// A line of a sentence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Entry<'a> {
    /// Multiword token.
    Multiword(&'a Multiword),

    /// Syntactic word with its index.
    Word(usize, &'a Token),

    /// Empty node.
    Empty(&'a EmptyNode),
}

impl<'a> Entry<'a> {
    pub fn id(&self) -> TokenId {
        match self {
            Entry::Multiword(multiword) => multiword.id(),
            Entry::Word(idx, _) => TokenId::Word(*idx),
            Entry::Empty(node) => node.id(),
        }
    }

    /// Get the token of a word or empty node.
    pub fn token(&self) -> Option<&'a Token> {
        match *self {
            Entry::Multiword(_) => None,
            Entry::Word(_, token) => Some(token),
            Entry::Empty(node) => Some(&node.token),
        }
    }

    /// Get the surface form.
    pub fn form(&self) -> &'a str {
        match *self {
            Entry::Multiword(multiword) => &multiword.form,
            Entry::Word(_, token) => token.form(),
            Entry::Empty(node) => node.token.form(),
        }
    }
}

/// A CoNLL-U dependency graph.
///
/// `Sentence` stores a dependency graph. The nodes in the graph
/// (except the special root node) are the syntactic words of the
/// sentence, with the fields of the CoNLL-U format. Dependency
/// relations are stored as edges in the graph.
///
/// Multiword tokens and empty nodes are not part of the dependency
/// tree and are stored alongside the graph. Both are kept in sentence
/// order.
///
/// The graph is a thin wrapper around the `petgraph` `DiGraph` data
/// structure that enforces invariants such as single-headedness.
/// `get_ref` gives access to the wrapped graph for traversals.
#[derive(Clone, Debug)]
pub struct Sentence {
    comments: Vec<Comment>,
    graph: DiGraph<Node, Edge>,
    multiwords: Vec<Multiword>,
    empty_nodes: Vec<EmptyNode>,
}

#[allow(clippy::len_without_is_empty)]
impl Sentence {
    /// Construct a new sentence.
    ///
    /// The sentence will be constructed such that the first token is
    /// the root of the dependency graph:
    ///
    /// ```
    /// use tbgraph::graph::{Node, Sentence};
    ///
    /// let sentence = Sentence::new();
    /// assert_eq!(sentence[0], Node::Root);
    /// ```
    pub fn new() -> Self {
        let mut graph = DiGraph::new();
        graph.add_node(Node::Root);
        Sentence {
            comments: Vec::new(),
            graph,
            multiwords: Vec::new(),
            empty_nodes: Vec::new(),
        }
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut Vec<Comment> {
        &mut self.comments
    }

    /// Get a reference to the `DiGraph` of the sentence.
    pub fn get_ref(&self) -> &DiGraph<Node, Edge> {
        &self.graph
    }

    /// Get an iterator over the nodes in the graph.
    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.graph.node_indices(),
            graph: &self.graph,
        }
    }

    /// Get a mutable iterator over the nodes in the graph.
    pub fn iter_mut(&mut self) -> IterMut {
        IterMut(self.graph.node_weights_mut())
    }

    /// Get an iterator over all lines of the sentence in sentence order.
    ///
    /// Multiword tokens precede their first word, empty nodes follow
    /// the word that they are numbered after.
    pub fn entries(&self) -> Entries {
        Entries {
            sentence: self,
            next_word: 1,
            multiword: 0,
            empty: 0,
        }
    }

    /// Add a new token to the graph.
    ///
    /// Tokens should always be pushed in sentence order.
    ///
    /// Returns the index of the token. The first pushed token has index 1,
    /// since index 0 is reserved by the root of the graph.
    pub fn push(&mut self, token: Token) -> usize {
        self.graph.add_node(Node::Token(token)).index()
    }

    /// Add a multiword token.
    ///
    /// Since multiword tokens precede their words, the range is not
    /// checked against the number of words in the sentence.
    pub fn push_multiword(&mut self, multiword: Multiword) -> Result<(), GraphError> {
        if multiword.first == 0 || multiword.first >= multiword.last {
            return Err(GraphError::RangeOutOfBounds {
                id: multiword.id(),
                word_count: self.word_count(),
            });
        }

        match self
            .multiwords
            .binary_search_by(|probe| probe.id().cmp(&multiword.id()))
        {
            Ok(_) => Err(GraphError::DuplicateId { id: multiword.id() }),
            Err(idx) => {
                self.multiwords.insert(idx, multiword);
                Ok(())
            }
        }
    }

    /// Get the multiword tokens of the sentence.
    pub fn multiwords(&self) -> &[Multiword] {
        &self.multiwords
    }

    /// Get the multiword tokens of the sentence mutably.
    pub fn multiwords_mut(&mut self) -> &mut [Multiword] {
        &mut self.multiwords
    }

    /// Insert an empty node.
    ///
    /// The node must follow an existing word (or the root) and its
    /// identifier must not be in use yet.
    pub fn insert_empty_node(&mut self, node: EmptyNode) -> Result<(), GraphError> {
        if node.sub == 0 || node.word > self.word_count() {
            return Err(GraphError::EmptyNodeOutOfBounds {
                id: node.id(),
                word_count: self.word_count(),
            });
        }

        match self
            .empty_nodes
            .binary_search_by(|probe| probe.id().cmp(&node.id()))
        {
            Ok(_) => Err(GraphError::DuplicateId { id: node.id() }),
            Err(idx) => {
                self.empty_nodes.insert(idx, node);
                Ok(())
            }
        }
    }

    /// Remove the empty node with the given identifier.
    ///
    /// Returns the removed node. Enhanced dependencies that refer to
    /// the node are not updated.
    pub fn remove_empty_node(&mut self, id: TokenId) -> Option<EmptyNode> {
        let idx = self.empty_nodes.iter().position(|node| node.id() == id)?;
        Some(self.empty_nodes.remove(idx))
    }

    /// Get the empty nodes of the sentence.
    pub fn empty_nodes(&self) -> &[EmptyNode] {
        &self.empty_nodes
    }

    /// Get the empty nodes of the sentence mutably.
    pub fn empty_nodes_mut(&mut self) -> &mut [EmptyNode] {
        &mut self.empty_nodes
    }

    /// Get the token of a word or empty node.
    ///
    /// Returns `None` for the root, multiword tokens and identifiers
    /// that are not in the sentence.
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        match id {
            TokenId::Word(idx) if idx < self.len() => self[idx].token(),
            TokenId::Empty(_, _) => self
                .empty_nodes
                .iter()
                .find(|node| node.id() == id)
                .map(EmptyNode::token),
            _ => None,
        }
    }

    /// Get the token of a word or empty node mutably.
    pub fn token_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        match id {
            TokenId::Word(idx) if idx < self.len() => self[idx].token_mut(),
            TokenId::Empty(_, _) => self
                .empty_nodes
                .iter_mut()
                .find(|node| node.id() == id)
                .map(EmptyNode::token_mut),
            _ => None,
        }
    }

    /// Check whether the sentence has a line (or root) with the given
    /// identifier.
    pub fn contains(&self, id: TokenId) -> bool {
        match id {
            TokenId::Word(idx) => idx < self.len(),
            TokenId::Range(_, _) => self.multiwords.iter().any(|mw| mw.id() == id),
            TokenId::Empty(_, _) => self.empty_nodes.iter().any(|node| node.id() == id),
        }
    }

    /// Get the dependency graph.
    pub fn dep_graph(&self) -> DepGraph {
        DepGraph { inner: &self.graph }
    }

    /// Get the graph mutably.
    pub fn dep_graph_mut(&mut self) -> DepGraphMut {
        DepGraphMut {
            inner: &mut self.graph,
        }
    }

    /// Get the number of nodes in the dependency graph.
    ///
    /// This is equal to the number of tokens, plus one root node.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Get the number of syntactic words.
    pub fn word_count(&self) -> usize {
        self.graph.node_count() - 1
    }

    /// Replace the comments by the given comments.
    ///
    /// Returns the old comments that are replaced.
    pub fn set_comments(&mut self, comments: impl Into<Vec<Comment>>) -> Vec<Comment> {
        mem::replace(&mut self.comments, comments.into())
    }
}

impl Default for Sentence {
    fn default() -> Self {
        Sentence::new()
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Token>,
    {
        let mut sentence = Sentence::new();
        for token in iter {
            sentence.push(token);
        }
        sentence
    }
}

/// Iterator over the lines of a sentence.
pub struct Entries<'a> {
    sentence: &'a Sentence,
    next_word: usize,
    multiword: usize,
    empty: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Empty nodes that follow the last emitted word.
        if let Some(node) = self.sentence.empty_nodes.get(self.empty) {
            if node.word < self.next_word {
                self.empty += 1;
                return Some(Entry::Empty(node));
            }
        }

        if self.next_word < self.sentence.len() {
            if let Some(multiword) = self.sentence.multiwords.get(self.multiword) {
                if multiword.first <= self.next_word {
                    self.multiword += 1;
                    return Some(Entry::Multiword(multiword));
                }
            }

            let idx = self.next_word;
            self.next_word += 1;
            return self.sentence[idx].token().map(|token| Entry::Word(idx, token));
        }

        None
    }
}

/// Iterator over the nodes in a dependency graph.
pub struct Iter<'a> {
    inner: NodeIndices,
    graph: &'a DiGraph<Node, Edge>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|idx| &self.graph[idx])
    }
}

impl<'a> IntoIterator for &'a Sentence {
    type Item = &'a Node;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mutable iterator over the nodes in a dependency graph.
pub struct IterMut<'a>(NodeWeightsMut<'a, Node>);

impl<'a> Iterator for IterMut<'a> {
    type Item = &'a mut Node;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

impl<'a> IntoIterator for &'a mut Sentence {
    type Item = &'a mut Node;
    type IntoIter = IterMut<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl Eq for Sentence {}

impl Index<usize> for Sentence {
    type Output = Node;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.graph[node_index(idx)]
    }
}

impl IndexMut<usize> for Sentence {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.graph[node_index(idx)]
    }
}

impl PartialEq for Sentence {
    fn eq(&self, other: &Self) -> bool {
        self.comments == other.comments
            && self.multiwords == other.multiwords
            && self.empty_nodes == other.empty_nodes
            && self.dep_graph() == other.dep_graph()
    }
}

/// A graph view.
///
/// This data structure provides a view of a CoNLL-U dependency graph. The
/// view can be used to retrieve the dependents of a head or the head of a
/// dependent.
pub struct DepGraph<'a> {
    inner: &'a DiGraph<Node, Edge>,
}

#[allow(clippy::len_without_is_empty)]
impl<'a> DepGraph<'a> {
    /// Return an iterator over the dependents of `head`.
    pub fn dependents(&self, head: usize) -> impl Iterator<Item = DepTriple<&'a str>> {
        dependents_impl(self.inner, head)
    }

    /// Return the head relation of `dependent`, if any.
    pub fn head(&self, dependent: usize) -> Option<DepTriple<&'a str>> {
        head_impl(self.inner, dependent)
    }

    /// Get the number of nodes in the dependency graph.
    ///
    /// This is equal to the number of tokens, plus one root node.
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }
}

impl<'a> Eq for DepGraph<'a> {}

impl<'a> Index<usize> for DepGraph<'a> {
    type Output = Node;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.inner[node_index(idx)]
    }
}

impl<'a, 'b> PartialEq<DepGraph<'b>> for DepGraph<'a> {
    fn eq(&self, other: &DepGraph<'b>) -> bool {
        // Cheap checks
        if self.inner.node_count() != other.inner.node_count()
            || self.inner.edge_count() != other.inner.edge_count()
        {
            return false;
        }

        for i in 0..self.len() {
            // Nodes should be equal.
            if self[i] != other[i] {
                return false;
            }

            // Relation to a token's head should be the same.
            if self.head(i) != other.head(i) {
                return false;
            }
        }

        true
    }
}

/// A mutable graph view.
///
/// This data structure provides a mutable view of a CoNLL-U dependency
/// graph. The view can be used to retrieve the dependents of a head or
/// the head of a dependent. In addition, the `add_deprel` method can be
/// used to add dependency relations to the graph.
pub struct DepGraphMut<'a> {
    inner: &'a mut DiGraph<Node, Edge>,
}

#[allow(clippy::len_without_is_empty)]
impl<'a> DepGraphMut<'a> {
    /// Add a dependency relation between `head` and `dependent`.
    ///
    /// If `dependent` already has a head relation, this relation is removed
    /// to ensure single-headedness.
    pub fn add_deprel<S>(&mut self, triple: DepTriple<S>) -> Result<(), GraphError>
    where
        S: Into<String>,
    {
        if triple.head() >= self.inner.node_count() {
            return Err(GraphError::HeadOutOfBounds {
                head: triple.head(),
                node_count: self.inner.node_count(),
            });
        }

        if triple.dependent() >= self.inner.node_count() {
            return Err(GraphError::DependentOutOfBounds {
                dependent: triple.dependent(),
                node_count: self.inner.node_count(),
            });
        }

        // Remove existing head relation (when present).
        self.remove_head_rel(triple.dependent());

        self.inner.add_edge(
            node_index(triple.head),
            node_index(triple.dependent),
            triple.relation.map(Into::into),
        );

        Ok(())
    }

    /// Return an iterator over the dependents of `head`.
    pub fn dependents(&self, head: usize) -> impl Iterator<Item = DepTriple<&str>> {
        dependents_impl(self.inner, head)
    }

    /// Return the head relation of `dependent`, if any.
    pub fn head(&self, dependent: usize) -> Option<DepTriple<&str>> {
        head_impl(self.inner, dependent)
    }

    /// Remove relation of a token to its head.
    ///
    /// Returns the index of the head iff a head was removed.
    pub fn remove_head_rel(&mut self, dependent: usize) -> Option<DepTriple<String>> {
        // match instead of map to avoid simultaneous mutable and
        // immutable borrow.
        match self
            .inner
            .edges_directed(node_index(dependent), Direction::Incoming)
            .next()
        {
            Some(edge) => {
                let head = edge.source().index();
                let edge_id = edge.id();
                let relation = self.inner.remove_edge(edge_id).flatten();
                Some(DepTriple::new(head, relation, dependent))
            }
            None => None,
        }
    }

    /// Get the number of nodes in the dependency graph.
    ///
    /// This is equal to the number of tokens, plus one root node.
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }
}

impl<'a> Index<usize> for DepGraphMut<'a> {
    type Output = Node;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.inner[node_index(idx)]
    }
}

impl<'a> IndexMut<usize> for DepGraphMut<'a> {
    fn index_mut(&mut self, idx: usize) -> &mut Self::Output {
        &mut self.inner[node_index(idx)]
    }
}

fn dependents_impl(
    graph: &DiGraph<Node, Edge>,
    head: usize,
) -> impl Iterator<Item = DepTriple<&str>> {
    graph
        .edges_directed(node_index(head), Direction::Outgoing)
        .map(|e| {
            DepTriple::new(
                e.source().index(),
                e.weight().as_deref(),
                e.target().index(),
            )
        })
}

fn head_impl(graph: &DiGraph<Node, Edge>, dependent: usize) -> Option<DepTriple<&str>> {
    graph
        .edges_directed(node_index(dependent), Direction::Incoming)
        .next()
        .map(|e| {
            DepTriple::new(
                e.source().index(),
                e.weight().as_deref(),
                e.target().index(),
            )
        })
}
