//! Site-Crawler main entry point
//!
//! This is the command-line interface for the Site-Crawler same-domain crawler.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use site_crawler::config::{build_config, load_file_config, FileConfig, Overrides};
use site_crawler::crawler::run_crawl;
use site_crawler::ddev::find_ddev_primary_url_from_cwd;
use site_crawler::output::{
    generate_markdown_summary, print_progress, print_summary, CrawlSummary,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a same-domain breadth-first site crawler
///
/// Crawls a website starting on a URL, following links on the same host until the
/// request limit is reached, and reports status and timing for every request.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version)]
#[command(about = "A same-domain breadth-first site crawler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl an entire website starting on URL
    Crawl {
        /// Absolute http(s) URL to start from
        #[arg(value_name = "URL")]
        url: String,

        #[command(flatten)]
        options: CrawlOptions,
    },

    /// Find DDEV_PRIMARY_URL in .ddev/.ddev-docker-compose-full.yaml and crawl it
    CrawlDdev {
        #[command(flatten)]
        options: CrawlOptions,
    },
}

#[derive(Args, Debug)]
struct CrawlOptions {
    /// Only crawl a certain amount of URLs [default: 250]
    #[arg(short, long)]
    limit: Option<usize>,

    /// Exclude URLs whose path contains any of these strings, separated by comma
    #[arg(short, long)]
    exclude: Option<String>,

    /// Basic auth credentials (the user must not contain a colon)
    #[arg(long, value_name = "USER:PASSWORD")]
    basic_auth: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the summary as markdown to FILE
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl { url, options } => handle_crawl(url, options, cli.quiet).await,
        Command::CrawlDdev { options } => {
            let url = find_ddev_primary_url_from_cwd()
                .context("Could not determine the DDEV primary URL")?;
            tracing::info!("Using DDEV primary URL: {}", url);
            handle_crawl(url, options, cli.quiet).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the main crawl operation
async fn handle_crawl(seed: String, options: CrawlOptions, quiet: bool) -> anyhow::Result<()> {
    let file_config = match &options.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_file_config(path)
                .with_context(|| format!("Failed to load {}", path.display()))?
        }
        None => FileConfig::default(),
    };

    let overrides = Overrides {
        limit: options.limit,
        exclude: options.exclude,
        basic_auth: options.basic_auth,
    };
    let config = build_config(&seed, file_config, overrides)?;

    tracing::info!(
        "Limit: {}, excluded paths: {:?}, basic auth: {}",
        config.limit,
        config.exclude,
        if config.basic_auth.is_some() { "yes" } else { "no" }
    );

    let (events, printer) = if quiet {
        (None, None)
    } else {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Some(tx), Some(tokio::spawn(print_progress(rx))))
    };

    let report = run_crawl(config, events).await?;

    if let Some(printer) = printer {
        printer.await.context("Progress printer stopped unexpectedly")?;
    }

    let summary = CrawlSummary::from_report(&report);
    println!();
    print_summary(&summary, &mut std::io::stdout().lock())?;

    if let Some(path) = &options.summary {
        generate_markdown_summary(&summary, path)?;
        println!("✓ Summary exported to: {}", path.display());
    }

    Ok(())
}
