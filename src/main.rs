//! Cardstock main entry point

use anyhow::Result;
use cardstock::config::load_config;
use cardstock::crawler::run_crawl;
use cardstock::storage::{CardStore, SqliteCardStore};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Cardstock: a polite card-catalog crawler
///
/// Cardstock crawls a card catalog site product by product, caching every
/// fetched page on disk so repeated runs are cheap, and stores newly
/// discovered cards in SQLite. The `serve` mode runs the companion image
/// cache proxy.
#[derive(Parser, Debug)]
#[command(name = "cardstock")]
#[command(version = "1.0.0")]
#[command(about = "A polite card-catalog crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl all cards of one product into the database
    Crawl {
        /// Product number to crawl (e.g. "WXDi-P01")
        product_no: String,
    },

    /// Run the image cache proxy server
    Serve,

    /// Show card counts from the database and exit
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl { product_no } => handle_crawl(&product_no, config).await?,
        Command::Serve => handle_serve(config).await?,
        Command::Stats => handle_stats(&config)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("cardstock=info,warn"),
            1 => EnvFilter::new("cardstock=debug,info"),
            2 => EnvFilter::new("cardstock=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the crawl subcommand
async fn handle_crawl(
    product_no: &str,
    config: cardstock::config::Config,
) -> Result<()> {
    tracing::info!(
        "Crawling product {} (cache: {}, delay: {}ms)",
        product_no,
        config.output.text_cache_dir,
        config.crawler.delay_ms
    );

    let mut store = SqliteCardStore::new(Path::new(&config.output.database_path))?;

    match run_crawl(product_no, &config, &mut store).await {
        Ok(()) => {
            tracing::info!("Crawl completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the serve subcommand: runs the image proxy
async fn handle_serve(
    config: cardstock::config::Config,
) -> Result<()> {
    let store = SqliteCardStore::new(Path::new(&config.output.database_path))?;
    cardstock::proxy::serve(&config, store).await?;
    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &cardstock::config::Config) -> Result<()> {
    let store = SqliteCardStore::new(Path::new(&config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);
    println!("Total cards: {}", store.count_cards()?);

    let counts = store.count_by_product()?;
    if !counts.is_empty() {
        println!("\nBy product:");
        for (product_no, count) in counts {
            println!("  {} : {}", product_no, count);
        }
    }

    Ok(())
}
