//! statusboard - Server Status Dashboard
//!
//! Renders current server health, recent status changes and a 90-day
//! availability chart from the JSON documents written by the server checker.

mod availability;
mod checker;
mod config;
mod dashboard;
mod data;
mod notify;
mod render;
mod source;
mod web;

use checker::Checker;
use config::ServerConfig;
use dashboard::Dashboard;
use notify::{parse_changes, SlackNotifier};
use web::Server;

use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "statusboard")]
#[command(about = "Server status dashboard with a daily availability chart")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the dashboard over HTTP (default)
    Serve,
    /// Render the dashboard once as a static HTML document
    Render {
        /// Output file; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Check every configured server once and update the data documents.
    /// Exits with status 1 when any server is down.
    Check,
    /// Post status changes from a JSON list file to Slack
    Notify {
        /// File containing a JSON list of status changes
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env()
            .add_directive("statusboard=info".parse()?))
        .init();

    let args = Args::parse();
    let cfg = ServerConfig::load();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg).await,
        Command::Check => check(cfg).await,
        Command::Render { out } => render(cfg, out).await,
        Command::Notify { file } => notify(cfg, file).await,
    }
}

async fn serve(cfg: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("Starting statusboard on port {}...", cfg.http_port);
    tracing::info!("Current status from {}", cfg.status_url);
    tracing::info!("Status changes from {}", cfg.changes_url);

    let dashboard = Arc::new(Dashboard::from_config(&cfg));
    let server = Server::new(cfg, dashboard);
    server.start().await?;

    Ok(())
}

async fn check(cfg: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::info!("Checking servers from {}", cfg.servers_file);

    let mut checker =
        Checker::load(Path::new(&cfg.servers_file), Path::new(&cfg.data_dir)).await?;
    let report = checker.run().await?;

    if report.any_down() {
        tracing::warn!(
            "{} of {} servers are down",
            report.down_count(),
            report.results.servers.len()
        );
        std::process::exit(1);
    }

    Ok(())
}

async fn render(
    cfg: ServerConfig,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let dashboard = Dashboard::from_config(&cfg);
    let html = web::render_document(&dashboard, cfg.window_days, Utc::now()).await;

    match out {
        Some(path) => {
            tokio::fs::write(&path, html).await?;
            tracing::info!("Dashboard written to {}", path.display());
        }
        None => println!("{}", html),
    }

    Ok(())
}

async fn notify(
    cfg: ServerConfig,
    file: PathBuf,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let webhook_url = cfg
        .slack_webhook_url
        .ok_or("SLACK_WEBHOOK_URL is not set")?;

    let input = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| format!("failed to read {}: {}", file.display(), e))?;
    let changes = parse_changes(&input)?;

    let notifier = SlackNotifier::new(webhook_url)?;
    let summary = notifier.notify_all(&changes).await;
    tracing::info!(
        "Notifications: {} sent, {} failed",
        summary.sent,
        summary.failed
    );

    Ok(())
}
