use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// Import from our modular crates
use tabrag_core::{EventBus, UploadEvent, VectorStore, UPLOADS_CHANNEL};
use tabrag_ollama::OllamaClient;
use tabrag_pipeline::{
    IngestPipeline, MemoryBus, MemoryCache, PipelineConfig, QueryPipeline, UploadWorker,
};
use tabrag_qdrant::{QdrantConfig, QdrantStore};

#[derive(Parser)]
#[command(name = "tabrag")]
#[command(about = "Question answering over tabular files, grounded in their own rows", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a CSV file, embed its rows and store them in the vector collection
    Ingest {
        /// Path to the CSV file
        file: PathBuf,
    },
    /// Answer a question against the rows of one ingested file
    Query {
        /// The question to answer
        text: String,
        /// Source file the answer must draw from
        #[arg(short, long)]
        file: String,
    },
    /// Watch a directory and ingest CSV files as they appear
    Watch {
        /// Directory to poll for new files
        dir: PathBuf,
        /// Poll interval in seconds
        #[arg(long, default_value_t = 2)]
        interval: u64,
    },
    /// Report reachability of the model server and the vector collection
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { file } => ingest(&file).await,
        Commands::Query { text, file } => query(&text, &file).await,
        Commands::Watch { dir, interval } => watch(&dir, interval).await,
        Commands::Status => status().await,
    }
}

fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn development_mode() -> bool {
    std::env::var("APP_ENV")
        .map(|v| v == "development")
        .unwrap_or(false)
}

/// Bad input is always reported verbatim; internal failures only show their
/// detail when APP_ENV=development.
fn render_error(error: tabrag_core::Error, action: &str) -> anyhow::Error {
    if error.is_input_error() || development_mode() {
        anyhow::Error::from(error)
    } else {
        anyhow::anyhow!("{} failed (set APP_ENV=development for detail)", action)
    }
}

async fn ingest(file: &Path) -> Result<()> {
    let ollama = Arc::new(OllamaClient::from_env()?);
    let qdrant_config = QdrantConfig::from_env()?;
    let dimension = qdrant_config.dimension as usize;
    let store = Arc::new(QdrantStore::new(qdrant_config)?);
    let bus = Arc::new(MemoryBus::new());
    let config = PipelineConfig::from_env()?;

    let pipeline = IngestPipeline::new(ollama, store, bus, config.embed_fan_out, dimension);

    let report = pipeline
        .ingest(file)
        .await
        .map_err(|e| render_error(e, "ingestion"))?;

    println!(
        "{} Ingested {} rows from {}",
        "✅".green(),
        report.rows,
        report.filename.bold()
    );
    Ok(())
}

async fn query(text: &str, file: &str) -> Result<()> {
    let ollama = Arc::new(OllamaClient::from_env()?);
    let store = Arc::new(QdrantStore::from_env()?);
    let cache = Arc::new(MemoryCache::new());
    let config = PipelineConfig::from_env()?;

    let pipeline = QueryPipeline::new(ollama.clone(), store, cache, ollama, &config);

    let answer = pipeline
        .answer(text, file)
        .await
        .map_err(|e| render_error(e, "query"))?;

    println!("{}", answer);
    Ok(())
}

async fn watch(dir: &Path, interval: u64) -> Result<()> {
    let ollama = Arc::new(OllamaClient::from_env()?);
    let qdrant_config = QdrantConfig::from_env()?;
    let dimension = qdrant_config.dimension as usize;
    let store = Arc::new(QdrantStore::new(qdrant_config)?);
    let bus = Arc::new(MemoryBus::new());
    let config = PipelineConfig::from_env()?;

    // The collection must exist before the first upload event arrives
    store.ensure_collection().await?;

    let pipeline = Arc::new(IngestPipeline::new(
        ollama,
        store,
        bus.clone(),
        config.embed_fan_out,
        dimension,
    ));
    let worker = Arc::new(UploadWorker::new(pipeline, bus.clone()));
    let subscription = worker.subscribe().await?;

    let runner = {
        let worker = worker.clone();
        tokio::spawn(async move { worker.run(subscription).await })
    };

    println!(
        "{} Watching {} for CSV files (Ctrl-C to stop)",
        "👀",
        dir.display().to_string().bold()
    );

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                for path in csv_files(dir, &mut seen)? {
                    let filename = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    tracing::info!(file = %filename, "publishing upload event");
                    let event = UploadEvent::new(filename, path.display().to_string());
                    bus.publish(UPLOADS_CHANNEL, &event.to_message()?).await?;
                }
            }
        }
    }

    runner.abort();
    println!("{}", "👋 Stopped watching".green());
    Ok(())
}

/// Files in `dir` with a .csv extension that have not been seen before.
fn csv_files(dir: &Path, seen: &mut HashSet<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut fresh = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if path.is_file() && is_csv && seen.insert(path.clone()) {
            fresh.push(path);
        }
    }
    fresh.sort();
    Ok(fresh)
}

async fn status() -> Result<()> {
    let ollama = OllamaClient::from_env()?;
    let store = QdrantStore::from_env()?;

    match ollama.version().await {
        Ok(version) => println!("{} Ollama reachable (version {})", "✅".green(), version),
        Err(e) => println!("{} Ollama unreachable: {}", "❌".red(), e),
    }

    match store.point_count().await {
        Ok(count) => println!(
            "{} Collection {} holds {} points",
            "✅".green(),
            store.collection().bold(),
            count
        ),
        Err(e) => println!(
            "{} Collection {} unavailable: {}",
            "❌".red(),
            store.collection().bold(),
            e
        ),
    }

    Ok(())
}
