// src/cli.rs
use crate::browser::ChromiumLauncher;
use crate::config::CrawlerConfig;
use crate::core::{seed_from_file, DocumentFilter, JobStore, SqliteJobStore, DEFAULT_COLLECTION};
use crate::experience;
use crate::pipeline::{CrawlOrchestrator, PageMerger};
use crate::types::RunParams;
use crate::utils::merged_dataset_path;
use crate::web::{start_web_server, DEFAULT_PORT};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "job-crawler")]
#[command(about = "Crawl job listings, merge them, and load them into the job store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl a page range of search results and merge them
    Crawl {
        #[arg(long)]
        query: Option<String>,
        #[arg(long)]
        start: Option<u32>,
        #[arg(long)]
        end: Option<u32>,
    },
    /// Merge already persisted pages
    Merge {
        #[arg(long)]
        start: u32,
        #[arg(long)]
        end: u32,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Replace a store collection with a merged dataset
    Seed {
        #[arg(long)]
        file: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,
    },
    /// Query a store collection with a JSON filter
    Query {
        #[arg(long, default_value = DEFAULT_COLLECTION)]
        collection: String,
        #[arg(long)]
        filter: Option<String>,
    },
    /// Normalize an experience string
    Normalize { text: String },
    /// Start the HTTP server
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
}

/// Run parameters for `crawl`, falling back to the defaults for anything
/// not given.
pub fn crawl_params(query: Option<String>, start: Option<u32>, end: Option<u32>) -> RunParams {
    let defaults = RunParams::default();
    RunParams {
        search_query: query.unwrap_or(defaults.search_query),
        start_page: start.unwrap_or(defaults.start_page),
        end_page: end.unwrap_or(defaults.end_page),
    }
}

pub async fn handle_command(cli: Cli, config: CrawlerConfig) -> Result<()> {
    match cli.command {
        Command::Crawl { query, start, end } => {
            config.ensure_directories().await?;
            let params = crawl_params(query, start, end);
            let launcher = Arc::new(ChromiumLauncher::new(&config));
            let crawler = CrawlOrchestrator::new(config, launcher)?;
            let report = crawler.run(&params).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Merge { start, end, prefix } => {
            let prefix = prefix.unwrap_or_else(|| config.output_prefix.clone());
            let merged = PageMerger::new(config.data_dir.clone())
                .merge(&prefix, start, end)
                .await?;
            println!(
                "Merged {} records into {}",
                merged.records.len(),
                merged.path.display()
            );
        }

        Command::Seed { file, collection } => {
            let file = file
                .unwrap_or_else(|| merged_dataset_path(&config.data_dir, &config.output_prefix));
            let store = SqliteJobStore::open(&config.database_path).await?;
            let inserted = seed_from_file(&store, &collection, &file).await?;
            println!("Seeded {} documents into {}", inserted, collection);
        }

        Command::Query { collection, filter } => {
            let filter = match filter {
                Some(raw) => {
                    let value = serde_json::from_str(&raw).context("--filter is not valid JSON")?;
                    DocumentFilter::from_value(&value)?
                }
                None => DocumentFilter::all(),
            };
            let store = SqliteJobStore::open(&config.database_path).await?;
            let documents = store.query(&collection, &filter).await?;
            info!("{} documents matched in {}", documents.len(), collection);
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }

        Command::Normalize { text } => {
            let normalized = experience::normalize(&text);
            println!("{}", serde_json::to_string_pretty(&normalized)?);
        }

        Command::Serve { port } => {
            start_web_server(config, port).await?;
        }
    }

    Ok(())
}
