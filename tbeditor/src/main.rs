//! tbeditor - structural edits and rendering of CoNLL-U treebanks.

mod palette;
mod treebank;

use std::convert::TryFrom;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tbgraph::token::{Token, TokenBuilder};
use tbgraph::TokenId;
use tbgraph_conllu::display::{ConlluDeps, ConlluFeatures, ConlluMisc};
use tbgraph_dot::DotRenderer;
use tbgraph_edit::{
    add_empty_node, clear_deps, copy_deps, delete_empty_node, delete_node, ChildrenPolicy,
};
use tracing::debug;

use crate::treebank::Treebank;

#[derive(Parser)]
#[command(name = "tbeditor")]
#[command(about = "Edit and render CoNLL-U treebanks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct Files {
    /// Input treebank in CoNLL-U format
    input: PathBuf,

    /// Output file (default: standard output)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct Selection {
    /// Sentence to edit or render, counting from 1
    #[arg(short, long, default_value = "1")]
    sentence: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete a word
    DeleteNode {
        #[command(flatten)]
        files: Files,

        #[command(flatten)]
        selection: Selection,

        /// Identifier of the word
        id: TokenId,

        /// Treatment of dependents: rehang_warn, rehang, detach, fail,
        /// delete or delete_warn
        #[arg(short, long, default_value = "rehang_warn")]
        children: ChildrenPolicy,
    },

    /// Add an empty node
    AddEmptyNode {
        #[command(flatten)]
        files: Files,

        #[command(flatten)]
        selection: Selection,

        /// Identifier of the empty node (e.g. 8.1)
        id: TokenId,

        #[command(flatten)]
        attributes: Attributes,
    },

    /// Delete an empty node and the enhanced relations to it
    DeleteEmptyNode {
        #[command(flatten)]
        files: Files,

        #[command(flatten)]
        selection: Selection,

        /// Identifier of the empty node (e.g. 8.1)
        id: TokenId,
    },

    /// Remove all enhanced dependencies
    ClearDeps {
        #[command(flatten)]
        files: Files,
    },

    /// Copy primary relations to words without enhanced dependencies
    CopyDeps {
        #[command(flatten)]
        files: Files,
    },

    /// Render a sentence as a Graphviz graph
    Render {
        #[command(flatten)]
        files: Files,

        #[command(flatten)]
        selection: Selection,

        /// Render the enhanced dependency graph
        #[arg(short, long)]
        enhanced: bool,

        /// JSON file with part-of-speech colors
        #[arg(short, long)]
        palette: Option<PathBuf>,
    },
}

/// Attributes of an added empty node.
#[derive(Args)]
struct Attributes {
    /// Word form
    #[arg(long, default_value = "_")]
    form: String,

    /// Lemma
    #[arg(long)]
    lemma: Option<String>,

    /// Universal part-of-speech tag
    #[arg(long)]
    upos: Option<String>,

    /// Language-specific part-of-speech tag
    #[arg(long)]
    xpos: Option<String>,

    /// Features (e.g. Tense=Past|VerbForm=Fin)
    #[arg(long)]
    feats: Option<String>,

    /// Enhanced dependencies (e.g. 2:conj|5.1:nsubj)
    #[arg(long)]
    deps: Option<String>,

    /// Miscellaneous annotation
    #[arg(long)]
    misc: Option<String>,
}

impl TryFrom<Attributes> for Token {
    type Error = anyhow::Error;

    fn try_from(attributes: Attributes) -> Result<Self> {
        let mut builder = TokenBuilder::new(attributes.form);

        if let Some(lemma) = attributes.lemma {
            builder = builder.lemma(lemma);
        }
        if let Some(upos) = attributes.upos {
            builder = builder.upos(upos);
        }
        if let Some(xpos) = attributes.xpos {
            builder = builder.xpos(xpos);
        }
        if let Some(feats) = attributes.feats {
            let features = ConlluFeatures::try_from(feats.as_str())
                .with_context(|| format!("invalid features: {}", feats))?;
            builder = builder.features(features.into_owned());
        }
        if let Some(deps) = attributes.deps {
            let deps = ConlluDeps::try_from(deps.as_str())
                .with_context(|| format!("invalid enhanced dependencies: {}", deps))?
                .into_owned();
            if !deps.is_empty() {
                builder = builder.deps(deps);
            }
        }
        if let Some(misc) = attributes.misc {
            builder = builder.misc(ConlluMisc::from(misc.as_str()).into_owned());
        }

        Ok(builder.into())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::DeleteNode {
            files,
            selection,
            id,
            children,
        } => {
            let mut treebank = Treebank::read(&files.input)?;
            treebank.edit(selection.sentence, |sentence| {
                delete_node(sentence, id, children)
                    .with_context(|| format!("cannot delete token {}", id))
            })?;
            treebank.write(files.output.as_deref())?;
        }

        Commands::AddEmptyNode {
            files,
            selection,
            id,
            attributes,
        } => {
            let token = Token::try_from(attributes)?;
            let mut treebank = Treebank::read(&files.input)?;
            treebank.edit(selection.sentence, |sentence| {
                add_empty_node(sentence, id, token)
                    .with_context(|| format!("cannot add empty node {}", id))
            })?;
            treebank.write(files.output.as_deref())?;
        }

        Commands::DeleteEmptyNode {
            files,
            selection,
            id,
        } => {
            let mut treebank = Treebank::read(&files.input)?;
            treebank.edit(selection.sentence, |sentence| {
                delete_empty_node(sentence, id)
                    .with_context(|| format!("cannot delete empty node {}", id))
            })?;
            treebank.write(files.output.as_deref())?;
        }

        Commands::ClearDeps { files } => {
            let mut treebank = Treebank::read(&files.input)?;
            treebank.map(clear_deps);
            treebank.write(files.output.as_deref())?;
        }

        Commands::CopyDeps { files } => {
            let mut treebank = Treebank::read(&files.input)?;
            treebank.map(copy_deps);
            treebank.write(files.output.as_deref())?;
        }

        Commands::Render {
            files,
            selection,
            enhanced,
            palette: palette_file,
        } => {
            let renderer = match palette_file {
                Some(path) => DotRenderer::new(palette::read_palette(&path)?),
                None => DotRenderer::default(),
            };

            let treebank = Treebank::read(&files.input)?;
            let sentence = treebank.sentence(selection.sentence)?;

            debug!(
                "rendering {} graph of sentence {}",
                if enhanced { "enhanced" } else { "primary" },
                selection.sentence
            );

            let dot = if enhanced {
                renderer.render_enhanced(sentence)
            } else {
                renderer.render_primary(sentence)
            };

            treebank::write_output(files.output.as_deref(), format!("{}\n", dot).as_bytes())?;
        }
    }

    Ok(())
}
