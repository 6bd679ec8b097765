//! RateCart CLI — rate ingestion and top-product pipeline commands.
//!
//! Commands:
//! - `ingest` — fetch exchange rates and persist date partitions
//! - `run` — full pipeline: ingest, join with the product catalog, rank,
//!   print the top products, optionally export CSV
//! - `partitions status` — report on-disk partition dates and record counts

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use ratecart_core::{
    ingest_rates, run_pipeline, write_results, EtlConfig, FakeStoreClient, FrankfurterClient,
    IngestSummary, RankedRow, RateStore,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "ratecart",
    about = "RateCart CLI — exchange rate ETL and product ranking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch exchange rates and persist them as date partitions.
    Ingest {
        /// Dates to ingest (YYYY-MM-DD). Repeatable.
        #[arg(long = "date", required = true)]
        dates: Vec<String>,

        /// Path to a TOML config file (currency catalog, endpoints).
        #[arg(long)]
        config: Option<PathBuf>,

        /// Partition root directory. Defaults to data/exchange_rates.
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Run the full pipeline and print the top products per date.
    Run {
        /// Dates to ingest and join on (YYYY-MM-DD). Repeatable.
        #[arg(long = "date", required = true)]
        dates: Vec<String>,

        /// Path to a TOML config file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Partition root directory. Defaults to data/exchange_rates.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Per-date top-N cutoff.
        #[arg(long)]
        top: Option<usize>,

        /// Write the final result table to this CSV file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Partition store commands.
    Partitions {
        #[command(subcommand)]
        action: PartitionAction,
    },
}

#[derive(Subcommand)]
enum PartitionAction {
    /// List partition dates and their record counts.
    Status {
        /// Partition root directory. Defaults to data/exchange_rates.
        #[arg(long, default_value = "data/exchange_rates")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest {
            dates,
            config,
            root,
        } => run_ingest(dates, config, root),
        Commands::Run {
            dates,
            config,
            root,
            top,
            out,
        } => run_full(dates, config, root, top, out),
        Commands::Partitions { action } => match action {
            PartitionAction::Status { root } => run_status(&root),
        },
    }
}

fn build_config(
    dates: Vec<String>,
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
    top: Option<usize>,
) -> Result<EtlConfig> {
    let mut config = match config_path {
        Some(path) => EtlConfig::from_file(&path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => EtlConfig::default(),
    };

    if !dates.is_empty() {
        config.dates = dates
            .iter()
            .map(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .collect::<Result<_, _>>()
            .context("dates must be YYYY-MM-DD")?;
    }
    if let Some(root) = root {
        config.rates_root = root;
    }
    if let Some(top) = top {
        config.top_n = top;
    }

    config.validate()?;
    Ok(config)
}

fn run_ingest(
    dates: Vec<String>,
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
) -> Result<()> {
    let config = build_config(dates, config_path, root, None)?;
    let store = RateStore::new(&config.rates_root);
    let source = FrankfurterClient::new(config.rates_api_root.clone());

    let summary = ingest_rates(&source, &store, &config);
    print_ingest_summary(&summary);

    if summary.succeeded == 0 && summary.attempted > 0 {
        bail!("ingestion failed for every (date, currency) pair");
    }
    Ok(())
}

fn run_full(
    dates: Vec<String>,
    config_path: Option<PathBuf>,
    root: Option<PathBuf>,
    top: Option<usize>,
    out: Option<PathBuf>,
) -> Result<()> {
    let config = build_config(dates, config_path, root, top)?;
    let store = RateStore::new(&config.rates_root);
    let rate_source = FrankfurterClient::new(config.rates_api_root.clone());
    let catalog_source = FakeStoreClient::new(config.catalog_endpoint.clone());

    let result = run_pipeline(&rate_source, &catalog_source, &store, &config)?;

    print_ingest_summary(&result.ingest);
    print_top_products(&result.top_products);

    if let Some(path) = out {
        write_results(&result.top_products, &path)?;
        println!("Results written to: {}", path.display());
    }
    Ok(())
}

fn run_status(root: &Path) -> Result<()> {
    let store = RateStore::new(root);
    let statuses = store.status()?;

    if statuses.is_empty() {
        println!("No partitions under: {}", root.display());
        return Ok(());
    }

    println!("Partitions: {}", root.display());
    println!("{:<12} {:>8}", "Date", "Records");
    println!("{}", "-".repeat(21));
    for status in &statuses {
        println!("{:<12} {:>8}", status.date, status.record_count);
    }
    Ok(())
}

fn print_ingest_summary(summary: &IngestSummary) {
    println!(
        "Ingestion: {}/{} succeeded, {} failed",
        summary.succeeded, summary.attempted, summary.failed
    );
    for failure in &summary.failures {
        eprintln!(
            "  SKIPPED {} on {}: {}",
            failure.currency, failure.date, failure.error
        );
    }
}

fn print_top_products(rows: &[RankedRow]) {
    println!();
    println!("=== Top Products ===");
    if rows.is_empty() {
        println!("(no rows)");
        return;
    }

    println!(
        "{:<12} {:>4} {:>5} {:<40} {:>9} {:>9} {:>8}",
        "Date", "Rank", "Id", "Title", "USD", "EUR", "Rating"
    );
    println!("{}", "-".repeat(93));
    for ranked in rows {
        let r = &ranked.row;
        let title = if r.title.chars().count() > 40 {
            let mut t: String = r.title.chars().take(37).collect();
            t.push_str("...");
            t
        } else {
            r.title.clone()
        };
        println!(
            "{:<12} {:>4} {:>5} {:<40} {:>9.2} {:>9.2} {:>8.1}",
            r.exchange_rate_date, ranked.rank, r.id, title, r.price_usd, r.price_eur, r.rating_rate
        );
    }
}
