//! Shopify-Sync main entry point
//!
//! This is the command-line interface for the Shopify order and customer sync.

use anyhow::Context;
use clap::Parser;
use shopify_sync::config::{load_config_with_hash, Config};
use shopify_sync::output::{EventSink, PosthogSink, TracingSink};
use shopify_sync::storage::{open_storage, MemoryCache};
use shopify_sync::sync::{build_http_client, bootstrap, ReqwestTransport};
use shopify_sync::{Collaborators, RunOutcome, ShopifySync};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Shopify-Sync: incremental Shopify order and customer sync
///
/// Shopify-Sync pages through a store's orders, reports every order and
/// customer to PostHog as created or updated, and resumes interrupted runs
/// from the last page it persisted.
#[derive(Parser, Debug)]
#[command(name = "shopify-sync")]
#[command(version = "1.0.0")]
#[command(about = "Incremental Shopify order and customer sync", long_about = None)]
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

    /// Run a single invocation and exit
    #[arg(long)]
    once: bool,

    /// Discard any in-progress run before syncing
    #[arg(long)]
    fresh: bool,

    /// Validate config and probe the store credentials, then exit
    #[arg(long, conflicts_with_all = ["status", "once", "fresh"])]
    check: bool,

    /// Log events instead of sending them to PostHog
    #[arg(long, conflicts_with = "status")]
    dry_run: bool,

    /// Show sync progress from the database and exit
    #[arg(long, conflicts_with_all = ["check", "once", "fresh"])]
    status: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.status {
        handle_status(&config).await
    } else if cli.check {
        handle_check(&config).await
    } else {
        handle_sync(config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shopify_sync=info,warn"),
            1 => EnvFilter::new("shopify_sync=debug,info"),
            2 => EnvFilter::new("shopify_sync=trace,debug"),
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

/// Handles the --status mode: shows sync progress from the database
async fn handle_status(config: &Config) -> anyhow::Result<()> {
    use shopify_sync::output::{load_statistics, print_statistics};

    println!("Database: {}\n", config.storage.database_path);

    let store = open_storage(Path::new(&config.storage.database_path))
        .context("Failed to open database")?;
    let stats = load_statistics(&store).await?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --check mode: probes the store without syncing
async fn handle_check(config: &Config) -> anyhow::Result<()> {
    let client = build_http_client(config.shopify.request_timeout())?;
    let transport = ReqwestTransport::new(client);

    let endpoint = bootstrap(&config.shopify, &transport).await?;

    println!("✓ Configuration is valid");
    println!("✓ Connected to {}", endpoint.probe_url());
    Ok(())
}

/// Handles the main sync operation
async fn handle_sync(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let client = build_http_client(config.shopify.request_timeout())?;
    let store = open_storage(Path::new(&config.storage.database_path))
        .context("Failed to open database")?;

    let sink: Arc<dyn EventSink> = if cli.dry_run {
        tracing::info!("Dry run: events are logged, not sent");
        Arc::new(TracingSink)
    } else {
        Arc::new(PosthogSink::new(client.clone(), &config.posthog))
    };

    let collaborators = Collaborators {
        storage: Arc::new(store),
        cache: Arc::new(MemoryCache::new()),
        sink,
        transport: Arc::new(ReqwestTransport::new(client)),
    };

    let sync = ShopifySync::setup(&config.shopify, &config.sync, collaborators).await?;

    if cli.fresh {
        tracing::info!("Starting fresh sync (ignoring previous cursor)");
        sync.reset_cursor().await?;
    }

    if cli.once {
        let report = sync.run_periodic().await?;
        let verb = match report.outcome {
            RunOutcome::Completed => "completed",
            RunOutcome::Paused => "paused",
        };
        println!(
            "✓ Sync {}: {} pages, {} orders, {} events",
            verb,
            report.pages_fetched,
            report.orders_seen,
            report.emitted.events()
        );
        return Ok(());
    }

    tracing::info!(
        "Syncing every {}s, press Ctrl-C to stop",
        config.sync.interval_secs
    );
    let summary = sync
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    tracing::info!(
        "Stopped after {} invocations ({} completed, {} paused, {} failed)",
        summary.invocations,
        summary.completed,
        summary.paused,
        summary.failed
    );
    Ok(())
}
