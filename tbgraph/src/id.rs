//! Token identifiers.

use std::cmp::Ordering;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ParseIdError;

/// Identifier of a line in a CoNLL-U sentence.
///
/// CoNLL-U distinguishes three kinds of lines, each with its own
/// identifier syntax:
///
/// * syntactic words: `3`;
/// * multiword token ranges: `3-4`;
/// * empty nodes: `3.1`, a node between words 3 and 4.
///
/// Identifiers are ordered in sentence order: a range sorts before the
/// word that it starts at, empty nodes sort after the word that they
/// follow.
///
/// ```
/// use tbgraph::TokenId;
///
/// let id: TokenId = "8.1".parse().unwrap();
/// assert_eq!(id, TokenId::Empty(8, 1));
/// assert_eq!(id.to_string(), "8.1");
/// assert!(TokenId::Word(8) < id && id < TokenId::Range(9, 10));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TokenId {
    /// A syntactic word. `Word(0)` is the root when used as a head.
    Word(usize),

    /// A multiword token spanning the words `first..=last`.
    Range(usize, usize),

    /// An empty node following `word`, numbered from 1.
    Empty(usize, usize),
}

impl TokenId {
    /// The root of the dependency graph.
    pub const ROOT: TokenId = TokenId::Word(0);

    /// Returns `true` if this is the identifier of a word (or the root).
    pub fn is_word(&self) -> bool {
        matches!(self, TokenId::Word(_))
    }

    /// Returns `true` if this is a multiword token range.
    pub fn is_range(&self) -> bool {
        matches!(self, TokenId::Range(_, _))
    }

    /// Returns `true` if this is the identifier of an empty node.
    pub fn is_empty_node(&self) -> bool {
        matches!(self, TokenId::Empty(_, _))
    }

    /// Get the word index, if this is a word identifier.
    pub fn word(&self) -> Option<usize> {
        match *self {
            TokenId::Word(idx) => Some(idx),
            _ => None,
        }
    }

    fn sort_key(&self) -> (usize, u8, usize) {
        match *self {
            TokenId::Range(first, last) => (first, 0, last),
            TokenId::Word(idx) => (idx, 1, 0),
            TokenId::Empty(word, sub) => (word, 2, sub),
        }
    }
}

impl Ord for TokenId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for TokenId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for TokenId {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        match self {
            TokenId::Word(idx) => write!(fmt, "{}", idx),
            TokenId::Range(first, last) => write!(fmt, "{}-{}", first, last),
            TokenId::Empty(word, sub) => write!(fmt, "{}.{}", word, sub),
        }
    }
}

impl From<usize> for TokenId {
    fn from(idx: usize) -> Self {
        TokenId::Word(idx)
    }
}

impl FromStr for TokenId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_part = |part: &str| {
            // usize::from_str accepts a leading '+', CoNLL-U does not.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseIdError {
                    value: s.to_owned(),
                });
            }

            part.parse::<usize>().map_err(|_| ParseIdError {
                value: s.to_owned(),
            })
        };

        if let Some(idx) = s.find('-') {
            let first = parse_part(&s[..idx])?;
            let last = parse_part(&s[idx + 1..])?;
            if first == 0 || first >= last {
                return Err(ParseIdError {
                    value: s.to_owned(),
                });
            }

            Ok(TokenId::Range(first, last))
        } else if let Some(idx) = s.find('.') {
            let word = parse_part(&s[..idx])?;
            let sub = parse_part(&s[idx + 1..])?;
            if sub == 0 {
                return Err(ParseIdError {
                    value: s.to_owned(),
                });
            }

            Ok(TokenId::Empty(word, sub))
        } else {
            parse_part(s).map(TokenId::Word)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TokenId;

    #[test]
    fn parse_and_display() {
        for (text, id) in &[
            ("0", TokenId::ROOT),
            ("12", TokenId::Word(12)),
            ("3-4", TokenId::Range(3, 4)),
            ("8.1", TokenId::Empty(8, 1)),
            ("0.2", TokenId::Empty(0, 2)),
            ("8.10", TokenId::Empty(8, 10)),
        ] {
            assert_eq!(text.parse::<TokenId>().unwrap(), *id);
            assert_eq!(id.to_string(), *text);
        }
    }

    #[test]
    fn rejects_malformed_identifiers() {
        for text in &[
            "", "_", "a", "+1", "-1", "3-", "4-3", "3-3", "0-2", "8.", "8.0", ".1", "1.2.3",
        ] {
            assert!(
                text.parse::<TokenId>().is_err(),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn sentence_order() {
        let mut ids = vec![
            TokenId::Empty(2, 1),
            TokenId::Word(3),
            TokenId::Range(2, 3),
            TokenId::Word(2),
            TokenId::Empty(2, 10),
            TokenId::Word(1),
            TokenId::Empty(2, 2),
        ];
        ids.sort();

        assert_eq!(
            ids,
            vec![
                TokenId::Word(1),
                TokenId::Range(2, 3),
                TokenId::Word(2),
                TokenId::Empty(2, 1),
                TokenId::Empty(2, 2),
                TokenId::Empty(2, 10),
                TokenId::Word(3),
            ]
        );
    }

    #[test]
    fn kinds() {
        assert!(TokenId::Word(1).is_word());
        assert!(TokenId::Range(1, 2).is_range());
        assert!(TokenId::Empty(1, 1).is_empty_node());
        assert_eq!(TokenId::Word(4).word(), Some(4));
        assert_eq!(TokenId::Empty(4, 1).word(), None);
    }
}
