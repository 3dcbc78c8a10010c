use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use tbgraph::graph::Sentence;
use tbgraph_conllu::io::{WriteSentence, Writer};
use tbgraph_conllu::read_treebank;
use tracing::debug;

/// Sentences of a CoNLL-U file.
pub struct Treebank {
    sentences: Vec<Sentence>,
}

impl Treebank {
    pub fn read(path: &Path) -> Result<Self> {
        let sentences = read_treebank(path)
            .with_context(|| format!("cannot read treebank {}", path.display()))?;
        debug!("read {} sentence(s) from {}", sentences.len(), path.display());

        Ok(Treebank { sentences })
    }

    /// Get a sentence by its 1-based position.
    pub fn sentence(&self, position: usize) -> Result<&Sentence> {
        if position == 0 || position > self.sentences.len() {
            bail!(
                "sentence {} does not exist, the treebank has {} sentence(s)",
                position,
                self.sentences.len()
            );
        }

        Ok(&self.sentences[position - 1])
    }

    /// Replace the sentence at a 1-based position by an edited copy.
    pub fn edit<F>(&mut self, position: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&Sentence) -> Result<Sentence>,
    {
        let edited = edit(self.sentence(position)?)
            .with_context(|| format!("cannot edit sentence {}", position))?;
        self.sentences[position - 1] = edited;

        Ok(())
    }

    /// Apply an edit to every sentence.
    pub fn map<F>(&mut self, edit: F)
    where
        F: Fn(Sentence) -> Sentence,
    {
        self.sentences = self.sentences.drain(..).map(edit).collect();
    }

    /// Write the treebank in CoNLL-U format.
    ///
    /// The treebank is written to standard output when no path is
    /// given.
    pub fn write(&self, path: Option<&Path>) -> Result<()> {
        let mut writer = Writer::new(Vec::new());
        for sentence in &self.sentences {
            writer.write_sentence(sentence)?;
        }

        write_output(path, writer.get_ref())
    }
}

/// Write output to a file, or to standard output when no path is given.
pub fn write_output(path: Option<&Path>, output: &[u8]) -> Result<()> {
    let mut write: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(io::stdout()),
    };

    write.write_all(output)?;
    write.flush()?;

    Ok(())
}
