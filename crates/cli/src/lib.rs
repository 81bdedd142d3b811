//! CLI for ModelBench.
//!
//! This crate provides the command-line interface for the benchmark
//! tracker: submitting runs, reading stored history, and inspecting the
//! GPU inventory snapshot.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod report;

use anyhow::Context;
use clap::{Parser, Subcommand};
use modelbench_adapters::{EnvCommitLookup, StaticCommitLookup, StaticResourceInventory};
use modelbench_core::external::{CommitLookup, GpuNodeResources, ResourceInventory};
use modelbench_core::TrackerConfig;
use modelbench_runner::{SimulatedExecutor, Tracker};
use modelbench_storage::{ResultStore, SqliteResultStore};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Fallback revision stamped onto results when no commit source is
/// available.
const UNTRACKED_COMMIT: &str = "untracked";

/// Corpus used when neither a dataset file nor inline prompts are given.
const DEFAULT_PROMPTS: &[&str] = &[
    "Hello, how are you?",
    "Explain quantum computing in simple terms.",
    "What are the benefits of renewable energy?",
];

/// ModelBench CLI.
#[derive(Parser, Debug)]
#[command(name = "modelbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file (json or toml).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run benchmarks for one or more models and wait for completion.
    Run {
        /// Model to benchmark; repeat the flag for several models.
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// JSON file holding the test corpus (an array of strings).
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Inline corpus item; repeatable. Ignored when --dataset is set.
        #[arg(short, long = "prompt")]
        prompts: Vec<String>,

        /// Number of workers (defaults to the configured worker_count).
        #[arg(short, long)]
        workers: Option<usize>,

        /// Fixed commit reference to stamp onto results.
        #[arg(long)]
        commit_sha: Option<String>,
    },

    /// Show stored history for a model, newest first.
    History {
        /// Model to query.
        #[arg(short, long)]
        model: String,

        /// Maximum number of results.
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Emit a markdown table instead of plain rows.
        #[arg(long)]
        markdown: bool,
    },

    /// Show the best stored throughput across all models.
    Leaderboard {
        /// Maximum number of results.
        #[arg(short, long, default_value_t = 10)]
        limit: u32,

        /// Emit a markdown table instead of plain rows.
        #[arg(long)]
        markdown: bool,
    },

    /// Print the GPU inventory snapshot.
    Gpu {
        /// JSON file mapping node names to GPU counts.
        #[arg(short, long)]
        nodes: Option<PathBuf>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            models,
            dataset,
            prompts,
            workers,
            commit_sha,
        } => {
            run_benchmarks(
                &config,
                models,
                dataset.as_deref(),
                prompts,
                workers,
                commit_sha,
            )
            .await
        }
        Commands::History {
            model,
            limit,
            markdown,
        } => show_history(&config, &model, limit, markdown).await,
        Commands::Leaderboard { limit, markdown } => {
            show_leaderboard(&config, limit, markdown).await
        }
        Commands::Gpu { nodes } => show_gpu(nodes.as_deref()).await,
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Layer configuration: file (when given), then `MODELBENCH_*` env
/// overrides, then defaults for everything left unset.
fn load_config(path: Option<&Path>) -> anyhow::Result<TrackerConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path));
    }
    let settings = builder
        .add_source(config::Environment::with_prefix("MODELBENCH").try_parsing(true))
        .build()
        .context("failed to load configuration")?;
    settings
        .try_deserialize()
        .context("invalid configuration values")
}

fn load_dataset(dataset: Option<&Path>, prompts: Vec<String>) -> anyhow::Result<Vec<String>> {
    if let Some(path) = dataset {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read dataset file {}", path.display()))?;
        let corpus: Vec<String> = serde_json::from_str(&text)
            .with_context(|| format!("{} is not a JSON array of strings", path.display()))?;
        return Ok(corpus);
    }
    if !prompts.is_empty() {
        return Ok(prompts);
    }
    Ok(DEFAULT_PROMPTS.iter().map(|s| s.to_string()).collect())
}

/// Pick the commit source: explicit flag, then the CI environment, then
/// a fixed marker so results remain queryable by revision.
fn commit_lookup(commit_sha: Option<String>) -> Arc<dyn CommitLookup> {
    match commit_sha {
        Some(sha) => Arc::new(StaticCommitLookup::new(sha)),
        None => {
            if std::env::var(modelbench_adapters::commit::DEFAULT_COMMIT_ENV_VAR).is_ok() {
                Arc::new(EnvCommitLookup::default())
            } else {
                Arc::new(StaticCommitLookup::new(UNTRACKED_COMMIT))
            }
        }
    }
}

async fn connect_store(config: &TrackerConfig) -> anyhow::Result<Arc<SqliteResultStore>> {
    let store = SqliteResultStore::connect(&config.database_url)
        .await
        .with_context(|| format!("failed to open result store at {}", config.database_url))?;
    Ok(Arc::new(store))
}

async fn run_benchmarks(
    config: &TrackerConfig,
    models: Vec<String>,
    dataset: Option<&Path>,
    prompts: Vec<String>,
    workers: Option<usize>,
    commit_sha: Option<String>,
) -> anyhow::Result<()> {
    let corpus = load_dataset(dataset, prompts)?;
    anyhow::ensure!(!corpus.is_empty(), "test corpus must not be empty");
    let worker_count = workers.unwrap_or(config.worker_count);
    anyhow::ensure!(worker_count > 0, "worker count must be positive");

    let store = connect_store(config).await?;
    let tracker = Tracker::new(
        config,
        store,
        commit_lookup(commit_sha),
        Arc::new(SimulatedExecutor::default()),
    )
    .await?;

    tracker.start(worker_count).await;
    tracing::info!(
        models = models.len(),
        corpus_items = corpus.len(),
        worker_count,
        "submitting benchmark tasks"
    );
    for model in &models {
        tracker.submit_task(model.clone(), corpus.clone()).await?;
    }
    while tracker.pending_tasks() > 0 {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // In-flight tasks finish during stop.
    tracker.stop().await;

    for model in &models {
        match tracker.history(model, 1).await?.first() {
            Some(result) => println!(
                "{}: {:.2} tokens/sec, {:.2} ms latency, {:.1} GB ({})",
                result.model_name,
                result.throughput_tokens_per_sec,
                result.latency_ms,
                result.memory_usage_gb,
                result.commit_reference,
            ),
            None => println!("{model}: no result recorded (see logs for the failure)"),
        }
    }
    Ok(())
}

async fn show_history(
    config: &TrackerConfig,
    model: &str,
    limit: u32,
    markdown: bool,
) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    store.ensure_indexes().await?;
    let results = store.history(model, limit).await?;

    if markdown {
        print!("{}", report::history_markdown(model, &results));
        return Ok(());
    }
    if results.is_empty() {
        println!("No results recorded for {model}");
        return Ok(());
    }
    for result in &results {
        println!(
            "{}  {:>10.2} tokens/sec  {:>8.2} ms  {}",
            result.timestamp.format("%Y-%m-%d %H:%M:%S"),
            result.throughput_tokens_per_sec,
            result.latency_ms,
            result.commit_reference,
        );
    }
    Ok(())
}

async fn show_leaderboard(
    config: &TrackerConfig,
    limit: u32,
    markdown: bool,
) -> anyhow::Result<()> {
    let store = connect_store(config).await?;
    store.ensure_indexes().await?;
    let results = store.leaderboard(limit).await?;

    if markdown {
        print!("{}", report::leaderboard_markdown(&results));
        return Ok(());
    }
    if results.is_empty() {
        println!("No results recorded yet");
        return Ok(());
    }
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{:>2}. {}  {:.2} tokens/sec ({})",
            rank + 1,
            result.model_name,
            result.throughput_tokens_per_sec,
            result.commit_reference,
        );
    }
    Ok(())
}

async fn show_gpu(nodes: Option<&Path>) -> anyhow::Result<()> {
    let inventory = match nodes {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read node file {}", path.display()))?;
            let table: HashMap<String, GpuNodeResources> = serde_json::from_str(&text)
                .with_context(|| format!("{} is not a valid node table", path.display()))?;
            StaticResourceInventory::new(table)
        }
        None => StaticResourceInventory::default(),
    };

    let snapshot = inventory.snapshot().await?;
    if snapshot.is_empty() {
        println!("No GPU nodes configured");
        return Ok(());
    }
    let mut nodes: Vec<_> = snapshot.into_iter().collect();
    nodes.sort_by(|a, b| a.0.cmp(&b.0));
    for (name, gpus) in nodes {
        println!(
            "{name}: {} GPUs total, {} allocatable",
            gpus.total_gpus, gpus.allocatable_gpus
        );
    }
    Ok(())
}
