use lazy_static::lazy_static;

use crate::graph::{Comment, DepTriple, EmptyNode, Sentence};
use crate::id::TokenId;
use crate::token::{EnhancedDep, EnhancedDeps, TokenBuilder};

lazy_static! {
    pub static ref TEST_SENTENCES: Vec<Sentence> = {
        let mut sentences = Vec::new();

        // "Bill went, Mary [went]": the elided verb is empty node 3.1.
        let mut s1 = Sentence::new();
        s1.comments_mut().push(Comment::AttrVal {
            attr: "sent_id".to_string(),
            val: "1".to_string(),
        });
        s1.push(
            TokenBuilder::new("Bill")
                .upos("PROPN")
                .deps(vec![EnhancedDep::new(2, "nsubj")].into())
                .into(),
        );
        s1.push(
            TokenBuilder::new("went")
                .upos("VERB")
                .deps(vec![EnhancedDep::new(TokenId::ROOT, "root")].into())
                .into(),
        );
        s1.push(
            TokenBuilder::new("Mary")
                .upos("PROPN")
                .deps(vec![EnhancedDep::new(TokenId::Empty(3, 1), "nsubj")].into())
                .into(),
        );
        s1.dep_graph_mut()
            .add_deprel(DepTriple::new(2, Some("nsubj"), 1))
            .unwrap();
        s1.dep_graph_mut()
            .add_deprel(DepTriple::new(0, Some("root"), 2))
            .unwrap();
        s1.dep_graph_mut()
            .add_deprel(DepTriple::new(2, Some("orphan"), 3))
            .unwrap();
        s1.insert_empty_node(EmptyNode::new(
            3,
            1,
            TokenBuilder::new("went")
                .upos("VERB")
                .deps(EnhancedDeps::from(vec![EnhancedDep::new(2, "conj")]))
                .into(),
        ))
        .unwrap();

        sentences.push(s1);

        let mut s2 = Sentence::new();
        s2.push(TokenBuilder::new("Gilles").upos("PROPN").into());
        s2.push(TokenBuilder::new("Deleuze").upos("PROPN").into());
        s2.dep_graph_mut()
            .add_deprel(DepTriple::new(0, Some("root"), 1))
            .unwrap();
        s2.dep_graph_mut()
            .add_deprel(DepTriple::new(1, Some("flat"), 2))
            .unwrap();
        sentences.push(s2);

        sentences
    };
}
