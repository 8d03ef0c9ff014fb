//! ragprimer CLI - load, chunk, embed, store, search and ask
//!
//! # Commands
//!
//! ```bash
//! # Chunk a document and show results
//! ragprimer chunk --strategy fixed --size 1000 --overlap 20 article.txt
//!
//! # Embed text and show vector stats
//! ragprimer embed "how are you?"
//!
//! # Ingest ./data/new_articles/*.txt into the persistent collection
//! ragprimer ingest --dir ./data/new_articles
//!
//! # Nearest chunks, then a retrieval-augmented answer
//! ragprimer query "how much did microsoft raise?" -k 3
//! ragprimer ask "how much did microsoft raise?"
//! ```

mod config;

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ragprimer_lib::{
    chat::{OpenAiChat, OpenAiChatConfig},
    chunk::{Chunker, Document, FixedSizeChunker, RecursiveChunker},
    embed::{Embedder, LocalEmbedder, OpenAiEmbedder, OpenAiEmbedderConfig},
    loader::load_documents,
    search::SearchEngine,
    store::{PersistentStore, SearchResult, VectorStore},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{EmbedderKind, Settings};

#[derive(Parser)]
#[command(name = "ragprimer")]
#[command(about = "Basic retrieval-augmented generation over a local vector store")]
#[command(version)]
struct Cli {
    /// Settings file (defaults to ./ragprimer.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Embedding backend
    #[arg(long, global = true, value_enum)]
    embedder: Option<EmbedderKind>,

    /// Directory holding persisted collections
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Collection name
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Strategy {
    /// Fixed character windows with overlap
    Fixed,
    /// Paragraphs, then lines, then fixed windows
    Recursive,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a document using specified strategy
    Chunk {
        /// Input file to chunk
        input: PathBuf,

        #[arg(short, long, value_enum, default_value = "fixed")]
        strategy: Strategy,

        /// Maximum characters per chunk
        #[arg(long)]
        size: Option<usize>,

        /// Characters repeated at the start of the next chunk
        #[arg(long)]
        overlap: Option<usize>,
    },

    /// Embed text and show vector info
    Embed {
        /// Text to embed
        text: String,

        /// Treat as query (uses query prompt prefix)
        #[arg(short, long)]
        query: bool,
    },

    /// Load a directory, chunk, embed and upsert into the collection
    Ingest {
        /// Directory of documents
        #[arg(long)]
        dir: Option<PathBuf>,

        /// File extension to pick up
        #[arg(long)]
        extension: Option<String>,

        #[arg(short, long, value_enum, default_value = "fixed")]
        strategy: Strategy,
    },

    /// Show the chunks nearest to a query
    Query {
        text: String,

        /// Number of results to return
        #[arg(short)]
        k: Option<usize>,
    },

    /// Answer a question from retrieved chunks with the chat model
    Ask {
        question: String,

        /// Number of chunks given as context
        #[arg(short)]
        k: Option<usize>,
    },
}

fn build_chunker(strategy: Strategy, size: usize, overlap: usize) -> Result<Box<dyn Chunker>> {
    let chunker: Box<dyn Chunker> = match strategy {
        Strategy::Fixed => Box::new(FixedSizeChunker::new(size, overlap)?),
        Strategy::Recursive => Box::new(RecursiveChunker::with_default_separators(size, overlap)?),
    };
    Ok(chunker)
}

fn require_api_key(settings: &Settings) -> Result<String> {
    match &settings.openai_api_key {
        Some(key) if !key.is_empty() => Ok(key.clone()),
        _ => bail!("OPENAI_API_KEY is not set (or set openai_api_key in ragprimer.toml)"),
    }
}

fn build_embedder(settings: &Settings) -> Result<Box<dyn Embedder>> {
    let embedder: Box<dyn Embedder> = match settings.embedder {
        EmbedderKind::Local => {
            println!("Loading local embedding model (first run downloads it)...");
            Box::new(LocalEmbedder::new()?)
        }
        EmbedderKind::Openai => Box::new(OpenAiEmbedder::new(OpenAiEmbedderConfig {
            base_url: settings.openai_base_url.clone(),
            api_key: Some(require_api_key(settings)?),
            model: settings.embedding_model.clone(),
            ..Default::default()
        })?),
    };
    Ok(embedder)
}

fn open_store(settings: &Settings) -> Result<PersistentStore> {
    PersistentStore::open(&settings.store_dir, &settings.collection)
        .with_context(|| format!("failed to open collection '{}'", settings.collection))
}

fn build_engine(settings: &Settings) -> Result<SearchEngine<Box<dyn Embedder>, PersistentStore>> {
    let store = open_store(settings)?;
    Ok(SearchEngine::new(build_embedder(settings)?, store))
}

fn preview(text: &str, max: usize) -> String {
    let head: String = text.chars().take(max).collect();
    let ellipsis = if text.chars().count() > max { "..." } else { "" };
    format!("{head}{ellipsis}")
}

fn print_results(results: &[SearchResult]) {
    for (i, result) in results.iter().enumerate() {
        println!(
            "#{} {} (distance: {:.4})",
            i + 1,
            result.chunk.id,
            result.distance()
        );
        println!("---");
        println!("{}\n", preview(&result.chunk.text, 300));
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(embedder) = cli.embedder {
        settings.embedder = embedder;
    }
    if let Some(store_dir) = cli.store_dir {
        settings.store_dir = store_dir;
    }
    if let Some(collection) = cli.collection {
        settings.collection = collection;
    }

    match cli.command {
        Commands::Chunk {
            input,
            strategy,
            size,
            overlap,
        } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let id = input
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| input.display().to_string());
            let chunker = build_chunker(
                strategy,
                size.unwrap_or(settings.chunk_size),
                overlap.unwrap_or(settings.chunk_overlap),
            )?;
            let chunks = chunker.chunk(&Document::new(id, text))?;

            println!(
                "Chunked '{}' into {} chunks using {} strategy:\n",
                input.display(),
                chunks.len(),
                chunker.name()
            );
            for chunk in &chunks {
                println!("--- {} ({} chars) ---", chunk.id, chunk.text.chars().count());
                println!("{}\n", preview(&chunk.text, 200));
            }
        }

        Commands::Embed { text, query } => {
            let mut embedder = build_embedder(&settings)?;

            let embedding = if query {
                println!("Embedding as query: {text}");
                embedder.embed_query(&text)?
            } else {
                println!("Embedding as document: {text}");
                embedder
                    .embed_documents(&[text.as_str()])?
                    .into_iter()
                    .next()
                    .context("embedder returned no embedding")?
            };

            println!("\nEmbedding stats ({}):", embedder.model_name());
            println!("  Dimensions: {}", embedding.len());
            println!("  First 5 values: {:?}", &embedding[..embedding.len().min(5)]);
            println!("  Min: {:.4}", embedding.iter().cloned().fold(f32::INFINITY, f32::min));
            println!("  Max: {:.4}", embedding.iter().cloned().fold(f32::NEG_INFINITY, f32::max));
        }

        Commands::Ingest {
            dir,
            extension,
            strategy,
        } => {
            let dir = dir.unwrap_or_else(|| settings.data_dir.clone());
            let extension = extension.unwrap_or_else(|| settings.extension.clone());
            let chunker = build_chunker(strategy, settings.chunk_size, settings.chunk_overlap)?;

            let documents = load_documents(&dir, &extension)?;
            if documents.is_empty() {
                bail!("no .{extension} files found in {}", dir.display());
            }

            let mut engine = build_engine(&settings)?;
            let report = engine.ingest(&documents, chunker.as_ref())?;
            info!(collection = %settings.collection, "ingest complete");

            println!(
                "Ingested {} documents as {} chunks; collection '{}' now holds {} chunks",
                report.documents,
                report.chunks,
                settings.collection,
                engine.len()
            );
        }

        Commands::Query { text, k } => {
            let store = open_store(&settings)?;
            if store.is_empty() {
                bail!(
                    "collection '{}' is empty, run `ragprimer ingest` first",
                    settings.collection
                );
            }
            let mut engine = SearchEngine::new(build_embedder(&settings)?, store);

            let k = k.unwrap_or(settings.top_k);
            println!("Searching: '{text}' (k={k})\n");
            print_results(&engine.search(&text, k)?);
        }

        Commands::Ask { question, k } => {
            let mut chat = OpenAiChat::new(OpenAiChatConfig {
                base_url: settings.openai_base_url.clone(),
                api_key: Some(require_api_key(&settings)?),
                model: settings.chat_model.clone(),
                temperature: settings.temperature,
                ..Default::default()
            })?;
            let mut engine = build_engine(&settings)?;

            let answer = engine.ask(&mut chat, &question, k.unwrap_or(settings.top_k))?;

            println!("=== Answer ===\n\n{}\n", answer.text);
            println!("=== Sources ===\n");
            print_results(&answer.sources);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ragprimer",
            "query",
            "what is the LLM",
            "-k",
            "2",
            "--embedder",
            "openai",
            "--collection",
            "my_story",
        ])
        .unwrap();

        assert_eq!(cli.embedder, Some(EmbedderKind::Openai));
        assert_eq!(cli.collection.as_deref(), Some("my_story"));
        match cli.command {
            Commands::Query { text, k } => {
                assert_eq!(text, "what is the LLM");
                assert_eq!(k, Some(2));
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_build_chunker_validates() {
        assert!(build_chunker(Strategy::Fixed, 10, 10).is_err());
        assert_eq!(build_chunker(Strategy::Recursive, 10, 2).unwrap().name(), "recursive");
    }

    #[test]
    fn test_preview_counts_chars() {
        assert_eq!(preview("héllo", 3), "hél...");
        assert_eq!(preview("hi", 3), "hi");
    }
}
