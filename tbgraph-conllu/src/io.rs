//! CoNLL-U format reader and writers.

use std::convert::TryFrom;
use std::fs;
use std::io;
use std::path::Path;

use tbgraph::graph::{Comment, DepTriple, EmptyNode, Multiword, Sentence};
use tbgraph::token::{Features, Misc, Token, EMPTY_TOKEN};
use tbgraph::{GraphError, TokenId};
use tracing::warn;

use crate::display::{ConlluDeps, ConlluFeatures, ConlluMisc, ConlluSentence};
use crate::error::{IOError, ParseError};

/// A trait for objects that can read CoNLL-U `Sentence`s
pub trait ReadSentence {
    /// Read a `Sentence` from this object.
    ///
    /// # Errors
    ///
    /// A call to `read_sentence` may generate an error to indicate that
    /// the operation could not be completed.
    fn read_sentence(&mut self) -> Result<Option<Sentence>, IOError>;

    /// Get an iterator over the sentences in this reader.
    fn sentences(self) -> Sentences<Self>
    where
        Self: Sized,
    {
        Sentences { reader: self }
    }
}

/// A reader for CoNLL-U sentences.
pub struct Reader<R> {
    read: R,
}

impl<R: io::BufRead> Reader<R> {
    /// Construct a new reader from an object that implements the
    /// `io::BufRead` trait.
    pub fn new(read: R) -> Reader<R> {
        Reader { read }
    }
}

impl<R: io::BufRead> IntoIterator for Reader<R> {
    type Item = Result<Sentence, IOError>;
    type IntoIter = Sentences<Reader<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences()
    }
}

impl<R: io::BufRead> ReadSentence for Reader<R> {
    fn read_sentence(&mut self) -> Result<Option<Sentence>, IOError> {
        let mut line = String::new();
        let mut sentence = Sentence::new();
        let mut edges = Vec::new();

        loop {
            line.clear();

            // End of reader.
            if self.read.read_line(&mut line)? == 0 {
                if sentence.len() == 1 {
                    return Ok(None);
                }

                finish_sentence(&mut sentence, edges)?;

                return Ok(Some(sentence));
            }

            // The blank line is a sentence separator. We want to be robust
            // in the case a CoNLL file is malformed and has two newlines as
            // a separator.
            if line.trim().is_empty() {
                if sentence.len() == 1 {
                    continue;
                }

                finish_sentence(&mut sentence, edges)?;

                return Ok(Some(sentence));
            }

            if let Some(stripped) = line.strip_prefix('#') {
                sentence.comments_mut().push(parse_comment(stripped));
                continue;
            }

            let mut iter = line.trim().split_terminator('\t');

            match parse_identifier_field(iter.next())? {
                TokenId::Range(first, last) => {
                    if first != sentence.len() {
                        return Err(ParseError::UnexpectedIdentifier {
                            expected: format!("{}-N", sentence.len()),
                            found: TokenId::Range(first, last),
                        }
                        .into());
                    }

                    let mut multiword = Multiword::new(first, last, parse_form_field(iter.next())?);

                    // Only the form and misc fields are used by multiword tokens.
                    multiword.set_misc(parse_misc_field(iter.nth(7)));

                    sentence.push_multiword(multiword).map_err(ParseError::from)?;
                }
                TokenId::Empty(word, sub) => {
                    if word != sentence.word_count() {
                        return Err(ParseError::UnexpectedIdentifier {
                            expected: format!("{}.N", sentence.word_count()),
                            found: TokenId::Empty(word, sub),
                        }
                        .into());
                    }

                    let mut token = parse_token_fields(&mut iter)?;

                    if parse_string_field(iter.next()).is_some()
                        || parse_string_field(iter.next()).is_some()
                    {
                        return Err(ParseError::EmptyNodeWithHead {
                            token: line.trim().to_owned(),
                        }
                        .into());
                    }

                    parse_deps_misc_fields(&mut token, &mut iter)?;

                    sentence
                        .insert_empty_node(EmptyNode::new(word, sub, token))
                        .map_err(ParseError::from)?;
                }
                TokenId::Word(idx) => {
                    if idx != sentence.len() {
                        return Err(ParseError::UnexpectedIdentifier {
                            expected: sentence.len().to_string(),
                            found: TokenId::Word(idx),
                        }
                        .into());
                    }

                    let mut token = parse_token_fields(&mut iter)?;

                    // Head relation.
                    if let Some(head) = parse_numeric_field(iter.next())? {
                        let head_rel = parse_string_field(iter.next());
                        edges.push(DepTriple::new(head, head_rel, sentence.len()));
                    } else {
                        // Skip the head releation if we don't have a dependency relation field.
                        if parse_string_field(iter.next()).is_some() {
                            return Err(ParseError::RelationWithoutHead {
                                token: line.trim().to_owned(),
                            }
                            .into());
                        }
                    }

                    parse_deps_misc_fields(&mut token, &mut iter)?;

                    sentence.push(token);
                }
            }
        }
    }
}

/// Parse the form, lemma, tags and features of a token line.
fn parse_token_fields<'a>(
    iter: &mut impl Iterator<Item = &'a str>,
) -> Result<Token, ParseError> {
    let mut token = Token::new(parse_form_field(iter.next())?);
    token.set_lemma(parse_string_field(iter.next()));
    token.set_upos(parse_string_field(iter.next()));
    token.set_xpos(parse_string_field(iter.next()));
    token.set_features(
        parse_string_field(iter.next())
            .map(|s| ConlluFeatures::try_from(s.as_str()))
            .transpose()?
            .map(ConlluFeatures::into_owned)
            .unwrap_or_else(Features::new),
    );

    Ok(token)
}

fn parse_deps_misc_fields<'a>(
    token: &mut Token,
    iter: &mut impl Iterator<Item = &'a str>,
) -> Result<(), ParseError> {
    token.set_deps(
        parse_string_field(iter.next())
            .map(|s| ConlluDeps::try_from(s.as_str()))
            .transpose()?
            .map(ConlluDeps::into_owned),
    );
    token.set_misc(parse_misc_field(iter.next()));

    Ok(())
}

/// Add the primary dependency relations and check the references that
/// can only be verified once the whole sentence is read.
fn finish_sentence(
    sentence: &mut Sentence,
    edges: Vec<DepTriple<String>>,
) -> Result<(), ParseError> {
    for edge in edges {
        sentence.dep_graph_mut().add_deprel(edge)?;
    }

    let word_count = sentence.word_count();
    if let Some(multiword) = sentence.multiwords().iter().find(|mw| mw.last() > word_count) {
        return Err(GraphError::RangeOutOfBounds {
            id: multiword.id(),
            word_count,
        }
        .into());
    }

    for entry in sentence.entries() {
        let deps = match entry.token().and_then(Token::deps) {
            Some(deps) => deps,
            None => continue,
        };

        if let Some(dep) = deps.iter().find(|dep| !sentence.contains(dep.head())) {
            return Err(ParseError::UnknownDepsHead {
                dependent: entry.id(),
                head: dep.head(),
            });
        }
    }

    Ok(())
}

/// An iterator over the sentences in a `Reader`.
pub struct Sentences<R>
where
    R: ReadSentence,
{
    reader: R,
}

impl<R> Iterator for Sentences<R>
where
    R: ReadSentence,
{
    type Item = Result<Sentence, IOError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.read_sentence() {
            Ok(None) => None,
            Ok(Some(sent)) => Some(Ok(sent)),
            Err(e) => Some(Err(e)),
        }
    }
}

fn parse_comment(comment: &str) -> Comment {
    let comment = comment.trim();

    match comment.find(" = ") {
        Some(idx) => Comment::AttrVal {
            attr: comment[..idx].to_string(),
            val: comment[idx + 3..].to_string(),
        },
        None => Comment::String(comment.to_string()),
    }
}

fn parse_form_field(field: Option<&str>) -> Result<String, ParseError> {
    field.map(str::to_owned).ok_or(ParseError::MissingFormField)
}

fn parse_string_field(field: Option<&str>) -> Option<String> {
    field.and_then(|s| {
        if s == EMPTY_TOKEN {
            None
        } else {
            Some(s.to_string())
        }
    })
}

fn parse_misc_field(field: Option<&str>) -> Misc {
    parse_string_field(field)
        .map(|s| ConlluMisc::from(s.as_str()))
        .map(ConlluMisc::into_owned)
        .unwrap_or_else(Misc::new)
}

fn parse_identifier_field(field: Option<&str>) -> Result<TokenId, ParseError> {
    match field {
        None => Err(ParseError::ParseIdentifierField {
            value: "A token identifier should be present".to_owned(),
        }),
        Some(s) => Ok(s.parse::<TokenId>()?),
    }
}

fn parse_numeric_field(field: Option<&str>) -> Result<Option<usize>, ParseError> {
    match field {
        None => Ok(None),
        Some(s) => {
            if s == EMPTY_TOKEN {
                Ok(None)
            } else {
                Ok(Some(s.parse::<usize>().map_err(|_| {
                    ParseError::ParseIntField {
                        value: s.to_owned(),
                    }
                })?))
            }
        }
    }
}

/// A trait for objects that can write CoNLL-U `Sentence`s.
pub trait WriteSentence {
    /// Write a sentence into this object.
    ///
    /// # Errors
    ///
    /// A call to `write_sentence` may generate an error to indicate that
    /// the operation could not be completed.
    fn write_sentence(&mut self, sentence: &Sentence) -> Result<(), IOError>;
}

/// A writer for CoNLL-U sentences.
///
/// This writer will write sentences to the embedded writer in CoNLL-U
/// tabular format.
pub struct Writer<W> {
    write: W,
    first: bool,
}

impl<W: io::Write> Writer<W> {
    /// Construct a new writer from an object that implements the `io::Write`
    /// trait.
    pub fn new(write: W) -> Writer<W> {
        Writer { write, first: true }
    }

    /// Borrow the embedded writer. Getting the underlying writer is often
    /// useful when the writer writes to a memory object.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::str;
    ///
    /// use tbgraph::graph::Sentence;
    /// use tbgraph::token::Token;
    /// use tbgraph_conllu::io::{Writer, WriteSentence};
    ///
    /// let output = Vec::new();
    /// let mut writer = Writer::new(output);
    /// let mut sent = Sentence::new();
    /// sent.push(Token::new("hello"));
    /// sent.push(Token::new("world"));
    ///
    /// writer.write_sentence(&sent).unwrap();
    ///
    /// println!("Output:\n{}", str::from_utf8(writer.get_ref()).unwrap());
    /// ```
    pub fn get_ref(&self) -> &W {
        &self.write
    }
}

impl<W: io::Write> WriteSentence for Writer<W> {
    fn write_sentence(&mut self, sentence: &Sentence) -> Result<(), IOError> {
        if self.first {
            self.first = false;
            write!(self.write, "{}", ConlluSentence::borrowed(sentence))?
        } else {
            write!(self.write, "\n{}", ConlluSentence::borrowed(sentence))?
        }

        Ok(())
    }
}

/// Run of spaces that some treebank files use instead of a tab.
const SPACE_SEPARATOR: &str = "    ";

/// Parse all sentences in a CoNLL-U string.
///
/// Some CoNLL-U files are indented with four spaces rather than tabs.
/// When parsing fails, every run of four spaces is replaced by a tab and
/// parsing is retried once. If the retry fails as well, its error is
/// returned.
pub fn parse_str(text: &str) -> Result<Vec<Sentence>, IOError> {
    match read_all(text) {
        Ok(sentences) => Ok(sentences),
        Err(err) if text.contains(SPACE_SEPARATOR) => {
            warn!("cannot parse CoNLL-U ({}), retrying with tab separators", err);
            read_all(&text.replace(SPACE_SEPARATOR, "\t"))
        }
        Err(err) => Err(err),
    }
}

/// Parse the first sentence of a CoNLL-U string.
///
/// The same repair as in [`parse_str`] is applied.
pub fn parse_sentence(text: &str) -> Result<Sentence, IOError> {
    parse_str(text)?
        .into_iter()
        .next()
        .ok_or_else(|| ParseError::NoSentence.into())
}

/// Read all sentences of a CoNLL-U file.
///
/// The same repair as in [`parse_str`] is applied.
pub fn read_treebank(path: impl AsRef<Path>) -> Result<Vec<Sentence>, IOError> {
    let text = fs::read_to_string(path)?;
    parse_str(&text)
}

fn read_all(text: &str) -> Result<Vec<Sentence>, IOError> {
    Reader::new(text.as_bytes()).sentences().collect()
}
