use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use hwcheck::config::{Config, SUPPORTED_HOMEWORK_TYPES};
use hwcheck::corpus::loader::{discover_submissions, load_corpus};
use hwcheck::models::RunOutcome;
use hwcheck::output::{self, terminal};
use hwcheck::pipeline::ComparisonEngine;

/// hwcheck: Similarity checking for homework reports.
///
/// Compares every pair of submitted Markdown reports on prose, code, shell
/// commands and document structure, and flags pairs that look too alike.
#[derive(Parser)]
#[command(name = "hwcheck", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare all submissions of one homework type
    Check {
        /// Homework type (H3, H4, H5, chap0x03, chap0x04, chap0x05, ...)
        #[arg(short = 't', long, default_value = "H3")]
        homework_type: String,

        /// Flag pairs at or above this overall score (default: 0.7)
        #[arg(long)]
        threshold: Option<f64>,

        /// Directory with one folder per student
        #[arg(long)]
        base_path: Option<PathBuf>,

        /// Directory for the JSON results file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worker threads for extraction and comparison (default: 4)
        #[arg(long)]
        max_workers: Option<usize>,
    },

    /// Compare two report files directly
    Compare {
        /// First Markdown report
        a: PathBuf,
        /// Second Markdown report
        b: PathBuf,
    },

    /// Show the active command pattern table
    Patterns,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hwcheck=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            homework_type,
            threshold,
            base_path,
            output,
            max_workers,
        } => {
            let mut config = Config::load()?;
            if let Some(threshold) = threshold {
                config.similarity_threshold = threshold;
            }
            if let Some(base_path) = base_path {
                config.homework_dir = base_path;
            }
            if let Some(output) = output {
                config.output_dir = output;
            }
            if let Some(max_workers) = max_workers {
                config.max_workers = max_workers;
            }

            if !SUPPORTED_HOMEWORK_TYPES.contains(&homework_type.as_str()) {
                warn!(
                    homework_type = %homework_type,
                    "Not a known homework type, continuing anyway"
                );
            }

            run_check(&config, &homework_type).await?;
        }

        Commands::Compare { a, b } => {
            let config = Config::load()?;
            let checker = config.checker()?;
            let engine = ComparisonEngine::new(&checker)?;

            let text_a = read_report(&a).await?;
            let text_b = read_report(&b).await?;
            let vector = engine.compare_texts(&text_a, &text_b);

            terminal::display_vector(
                &a.display().to_string(),
                &b.display().to_string(),
                &vector,
                engine.aggregator(),
            );
        }

        Commands::Patterns => {
            let config = Config::load()?;
            let checker = config.checker()?;
            terminal::display_patterns(&checker.command_patterns);
        }
    }

    Ok(())
}

async fn run_check(config: &Config, homework_type: &str) -> Result<()> {
    let checker = config.checker()?;

    println!(
        "Checking {} submissions in {}...",
        homework_type.bold(),
        config.homework_dir.display()
    );
    let files = discover_submissions(&config.homework_dir, homework_type)?;
    let corpus = load_corpus(&files, checker.max_workers).await;
    info!(students = corpus.len(), "Corpus loaded");

    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::with_template("  Comparing [{bar:30}] {pos}/{len} ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let engine = ComparisonEngine::new(&checker)?
        .with_span(info_span!("check", homework_type))
        .with_progress(progress);

    // Ctrl-C stops the batch between pairs and keeps what was scored
    let cancel = engine.cancel_token();
    let signal = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let outcome = tokio::task::spawn_blocking(move || engine.run(&corpus))
        .await
        .context("Comparison worker panicked")?;
    signal.abort();

    let result = match outcome {
        RunOutcome::InsufficientCorpus { documents } => {
            println!(
                "{}",
                format!("Only {documents} usable submission(s) found; nothing to compare.").yellow()
            );
            return Ok(());
        }
        RunOutcome::Cancelled(result) => {
            println!(
                "{}",
                "Interrupted. Showing the pairs scored so far.".yellow()
            );
            result
        }
        RunOutcome::Completed(result) => result,
    };

    terminal::display_run(&result);

    let path = config
        .output_dir
        .join(format!("{homework_type}_similarity_results.json"));
    output::save_results(&result, &path)?;
    println!("\nResults saved to: {}", path.display());

    Ok(())
}

async fn read_report(path: &Path) -> Result<String> {
    if !path.is_file() {
        bail!("Report not found: {}", path.display());
    }
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(hwcheck::corpus::decode::decode_text(&bytes).0)
}
