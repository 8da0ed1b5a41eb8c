//! CLI argument definitions and subcommand implementations.

use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::info;

use askdocs_rag::{Document, QaResult};

use crate::config::{AppConfig, StoreBackend};
use crate::setup;

/// Retrieval-augmented question answering over your own documents.
#[derive(Debug, Parser)]
#[command(name = "askdocs", version, about)]
pub struct Cli {
    /// Enable debug logging.
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Index documents from a directory.
    Index {
        /// Directory containing .txt and .md documents.
        #[arg(long, default_value = "data")]
        source: PathBuf,
        /// Clear the existing index before indexing.
        #[arg(long)]
        clear: bool,
    },
    /// Ask a single question.
    Query {
        /// The question to answer.
        question: String,
        /// Number of matches to retrieve.
        #[arg(long)]
        top_k: Option<usize>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Start an interactive chat session.
    Chat,
    /// Answer multiple questions and print a JSON array.
    Batch {
        /// Questions given directly on the command line.
        questions: Vec<String>,
        /// File with one question per line.
        #[arg(long)]
        file: Option<PathBuf>,
        /// Write results to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration.
    Info,
    /// Delete the index and everything in it.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

/// Recursively collect `.txt` and `.md` files under `dir` as documents.
///
/// Sources are named by their path relative to `dir`. Unreadable files are
/// fatal: indexing assumes a consistent corpus.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<Document>) -> Result<()> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("cannot read directory {}", dir.display()))?;
        let mut paths: Vec<PathBuf> = entries
            .collect::<std::io::Result<Vec<_>>>()
            .with_context(|| format!("cannot list {}", dir.display()))?
            .into_iter()
            .map(|e| e.path())
            .collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                walk(root, &path, out)?;
            } else if matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("txt") | Some("md")
            ) {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                let source = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .replace('\\', "/");
                out.push(Document::new(source, text));
            }
        }
        Ok(())
    }

    let mut documents = Vec::new();
    walk(dir, dir, &mut documents)?;
    Ok(documents)
}

fn print_result(result: &QaResult) {
    println!("\n{}", "=".repeat(72));
    println!("Q: {}", result.question);
    println!("{}", "=".repeat(72));
    println!("\nA: {}\n", result.answer);
    println!("Confidence: {:.1}%", result.confidence * 100.0);
    if !result.sources.is_empty() {
        println!("\nSources:");
        for m in &result.sources {
            println!(
                "  {}. {} (chunk {}, similarity {:.4})",
                m.rank + 1,
                m.chunk.source,
                m.chunk.chunk_index,
                m.score,
            );
        }
    }
    println!();
}

pub async fn run_index(config: &AppConfig, source: &Path, clear: bool) -> Result<()> {
    let pipeline = setup::build_pipeline(config).await?;

    if clear {
        println!("Clearing existing index...");
        pipeline.store().clear().await?;
    }

    let documents = load_documents(source)?;
    if documents.is_empty() {
        println!("No .txt or .md documents found in {}", source.display());
        return Ok(());
    }

    println!("Indexing {} documents from {}...", documents.len(), source.display());
    let report = pipeline
        .index_documents(&documents)
        .await
        .context("indexing aborted; documents stored before the failure are kept")?;
    println!("Indexed {} chunks from {} documents", report.chunks, report.documents);
    Ok(())
}

pub async fn run_query(
    config: &AppConfig,
    question: &str,
    top_k: Option<usize>,
    json: bool,
) -> Result<()> {
    let agent = setup::build_agent(config).await?;
    let result = agent.answer_with(question, top_k, None).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

pub async fn run_chat(config: &AppConfig) -> Result<()> {
    let mut agent = setup::build_agent(config).await?;
    let mut editor = DefaultEditor::new()?;

    println!("askdocs interactive session. Type 'quit' to exit, 'clear' to reset history.\n");

    loop {
        match editor.readline("you> ") {
            Ok(line) => {
                let question = line.trim();
                if question.is_empty() {
                    continue;
                }
                match question {
                    "quit" | "exit" => break,
                    "clear" => {
                        agent.reset();
                        println!("History cleared.\n");
                        continue;
                    }
                    _ => {}
                }
                editor.add_history_entry(question)?;
                let result = agent.chat(question).await;
                print_result(&result);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

pub async fn run_batch(
    config: &AppConfig,
    questions: &[String],
    file: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let mut all: Vec<String> = questions.to_vec();
    if let Some(path) = file {
        let content =
            fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
        all.extend(content.lines().map(str::trim).filter(|l| !l.is_empty()).map(String::from));
    }
    if all.is_empty() {
        anyhow::bail!("no questions provided (pass them as arguments or via --file)");
    }

    info!(count = all.len(), "processing batch");
    let agent = setup::build_agent(config).await?;
    let results = agent.batch(&all).await;
    let json = serde_json::to_string_pretty(&results)?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("cannot write {}", path.display()))?;
            println!("Wrote {} results to {}", results.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub fn run_info(config: &AppConfig) -> Result<()> {
    println!("Vector store:");
    match config.store.backend {
        StoreBackend::Remote => {
            println!("  backend:    remote");
            println!("  base url:   {}", config.store.base_url);
            println!("  index:      {}", config.store.index);
        }
        StoreBackend::Memory => println!("  backend:    memory"),
    }
    println!("  dimension:  {}", config.store.dimension);
    println!("  space type: {}", config.store.space_type);
    println!("\nEmbeddings:");
    println!("  backend:    {}", config.embedding.backend);
    println!("  model:      {}", config.embedding.model);
    println!("\nGeneration:");
    println!("  provider:    {}", config.generator.provider);
    println!("  model:       {}", config.generator.model);
    println!("  temperature: {}", config.generator.temperature);
    println!("\nRetrieval:");
    println!("  chunker:              {}", config.chunker);
    println!("  chunk size / overlap: {} / {}", config.rag.chunk_size, config.rag.chunk_overlap);
    println!("  top k:                {}", config.rag.top_k);
    println!("  similarity threshold: {}", config.rag.similarity_threshold);
    Ok(())
}

pub async fn run_clear(config: &AppConfig, yes: bool) -> Result<()> {
    if !yes {
        print!("Delete index '{}'? This cannot be undone. [y/N] ", config.store.index);
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Aborted");
            return Ok(());
        }
    }

    let store = setup::build_store(config).await?;
    store.clear().await?;
    println!("Index cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_documents_picks_up_txt_and_md_only() {
        let dir = std::env::temp_dir().join(format!("askdocs-test-{}", std::process::id()));
        let sub = dir.join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(dir.join("a.txt"), "alpha").unwrap();
        fs::write(dir.join("b.md"), "beta").unwrap();
        fs::write(dir.join("c.pdf"), "ignored").unwrap();
        fs::write(sub.join("d.txt"), "delta").unwrap();

        let documents = load_documents(&dir).unwrap();
        let mut sources: Vec<&str> = documents.iter().map(|d| d.source.as_str()).collect();
        sources.sort();
        assert_eq!(sources, vec!["a.txt", "b.md", "sub/d.txt"]);

        fs::remove_dir_all(&dir).unwrap();
    }
}
