//! Ratewatch binary
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - SLACK_BOT_TOKEN / SLACK_CHANNEL_ID: enable the Slack alert channel
//! - DISCORD_BOT_TOKEN / DISCORD_CHANNEL_ID: enable the Discord alert channel
//! - RUST_LOG: Log level (default: info)
//!
//! With no command flags the monitor loop runs until interrupted; the target
//! set is managed with --add-api / --remove-api / --list.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use ratewatch::config::{self, ChannelSettings};
use ratewatch::monitor::RateLimitMonitor;
use ratewatch::notify::Notifier;
use ratewatch::registry::{MonitoredTarget, TargetRegistry, DEFAULT_THRESHOLD};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ratewatch", about = "API rate limit monitor", version)]
struct Cli {
    /// Register an API target under this name (requires --endpoint)
    #[arg(long = "add-api", value_name = "NAME")]
    add_api: Option<String>,

    /// Endpoint URL for --add-api
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Request header in KEY:VALUE form (repeatable)
    #[arg(long = "header", value_name = "KEY:VALUE")]
    headers: Vec<String>,

    /// Alert threshold in [0, 1] for --add-api
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Deregister an API target
    #[arg(long = "remove-api", value_name = "NAME")]
    remove_api: Option<String>,

    /// List all monitored targets
    #[arg(long)]
    list: bool,

    /// Check interval in seconds
    #[arg(long, default_value_t = config::DEFAULT_INTERVAL_SECS)]
    interval: u64,

    /// Path of the persisted target document
    #[arg(long, value_name = "PATH", default_value = config::DEFAULT_STATE_FILE)]
    state_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ratewatch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // A corrupt state document is fatal: starting with an empty target set
    // would silently drop everything being monitored.
    let mut registry = TargetRegistry::load(&cli.state_file)?;

    if let Some(name) = cli.add_api {
        let endpoint = cli
            .endpoint
            .ok_or("--add-api requires --endpoint")?;
        let headers = parse_headers(&cli.headers)?;
        let target = MonitoredTarget::new(name.clone(), endpoint)
            .with_headers(headers)
            .with_threshold(cli.threshold);
        registry.add(target)?;
        println!("Added API: {}", name);
    } else if let Some(name) = cli.remove_api {
        if registry.remove(&name)? {
            println!("Removed API: {}", name);
        } else {
            eprintln!("API '{}' not found", name);
        }
    } else if cli.list {
        if registry.is_empty() {
            println!("No APIs configured");
        } else {
            println!("Monitored APIs:");
            for target in registry.list() {
                println!(
                    "  - {}: {} (threshold: {:.0}%)",
                    target.name,
                    target.endpoint,
                    target.threshold * 100.0
                );
            }
        }
    } else {
        run_monitor(registry, cli.interval).await;
    }

    Ok(())
}

async fn run_monitor(registry: TargetRegistry, interval_secs: u64) {
    let settings = ChannelSettings::from_env();
    let channels = settings.channels();

    tracing::info!(
        interval_secs,
        targets = registry.len(),
        state_file = %registry.path().display(),
        "Starting API rate limit monitor"
    );
    if channels.is_empty() {
        tracing::info!("No alert channels configured, alerts will only be logged");
    } else {
        for channel in &channels {
            tracing::info!(channel = channel.name(), "Alert channel enabled");
        }
    }

    let monitor = RateLimitMonitor::new(registry, Notifier::new(channels));

    let (shutdown_tx, shutdown_rx) = tokio::sync::mpsc::channel(1);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(()).await;
        }
    });

    monitor.run(Duration::from_secs(interval_secs), shutdown_rx).await;
}

fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>, String> {
    let mut headers = HashMap::new();
    for entry in raw {
        let Some((key, value)) = entry.split_once(':') else {
            return Err(format!("Invalid header '{}', expected KEY:VALUE", entry));
        };
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}
