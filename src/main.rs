//! Contact-Scout main entry point
//!
//! This is the command-line interface for the contact email discovery
//! pipeline.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use contact_scout::config::{load_config_with_hash, load_default_config, Config};
use contact_scout::output::{print_statistics, write_results, CrawlStatistics};
use contact_scout::extract::extract_emails_from_bytes;
use contact_scout::Pipeline;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Contact-Scout: find contact emails on a website and who they belong to
///
/// Contact-Scout crawls a site breadth-first while respecting robots.txt,
/// extracts email addresses with their surrounding text, and asks an
/// inference service to name the owner of each address.
#[derive(Parser, Debug)]
#[command(name = "contact-scout")]
#[command(version)]
#[command(about = "Contact email discovery for websites", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults plus environment when omitted)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site and resolve the owner of every email found
    Crawl {
        /// Absolute http(s) URL to start from
        #[arg(value_name = "URL")]
        url: String,

        /// Print crawl statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Resolve owners for email contexts given on the command line
    Resolve {
        /// Text snippets, each containing one email address
        #[arg(value_name = "CONTEXT", required = true)]
        contexts: Vec<String>,
    },

    /// Extract emails and their contexts from a local file, without resolving
    Extract {
        /// File to scan (HTML or plain text)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Validate the configuration and print it
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl { url, stats } => handle_crawl(config, &url, stats).await,
        Command::Resolve { contexts } => handle_resolve(config, &contexts).await,
        Command::Extract { file } => handle_extract(&file),
        Command::ShowConfig => handle_show_config(&config),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_scout=info,warn"),
            1 => EnvFilter::new("contact_scout=debug,info"),
            2 => EnvFilter::new("contact_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads and validates configuration from a file, or from defaults
fn load(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            load_default_config().context("invalid default configuration")
        }
    }
}

/// Handles the crawl subcommand
async fn handle_crawl(config: Config, seed: &str, show_stats: bool) -> Result<()> {
    let pipeline = Pipeline::new(config)?;

    let (owners, report) = pipeline
        .crawl_with_report(seed)
        .await
        .with_context(|| format!("crawl of {} failed", seed))?;

    if show_stats {
        let resolved = owners.iter().filter(|o| o.owner_name.is_some()).count();
        let stats = CrawlStatistics::from_report(&report).with_results(owners.len(), resolved);
        print_statistics(&stats)?;
    }

    write_results(&mut io::stdout().lock(), &owners)?;
    Ok(())
}

/// Handles the resolve subcommand
async fn handle_resolve(config: Config, contexts: &[String]) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let results = pipeline.resolve_owners(contexts).await;

    write_results(&mut io::stdout().lock(), &results)?;
    Ok(())
}

/// Handles the extract subcommand
fn handle_extract(file: &Path) -> Result<()> {
    let content =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let found = extract_emails_from_bytes(&content);
    tracing::info!("Found {} email occurrences in {}", found.len(), file.display());

    write_results(&mut io::stdout().lock(), &found)?;
    Ok(())
}

/// Handles the show-config subcommand
fn handle_show_config(config: &Config) -> Result<()> {
    println!("=== Contact-Scout Configuration ===\n");

    println!("Crawler:");
    println!("  Crawl budget: {}s", config.crawler.crawl_budget_secs);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    match config.crawler.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }
    println!("  Same origin only: {}", config.crawler.same_origin_only);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nResolver:");
    println!("  Endpoint: {}", config.resolver.endpoint);
    println!("  Batch size: {}", config.resolver.batch_size);
    println!("  Timeout: {}s", config.resolver.timeout_secs);
    println!(
        "  API key: {}",
        if config.resolver.credential().is_some() {
            "set"
        } else {
            "not set"
        }
    );

    println!("\n✓ Configuration is valid");

    Ok(())
}
