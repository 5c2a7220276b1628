//! clampcache - offline companion for the clamping admin tool.
//!
//! Provides a service-worker-style offline asset cache (precache, version
//! purge, network-first/cache-first routing) and a presentation bridge
//! that mirrors rendered content onto a secondary display surface.

mod cache;
mod config;
mod fetch;
mod presentation;
mod worker;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cache::CacheStorage;
use config::Config;
use fetch::{Fetcher, HttpFetcher};
use presentation::{PresentationBridge, PresentationMessage};
use worker::OfflineWorker;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Set up logging with environment-based filter
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("clampcache starting");

    let config = Config::load()?;

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--status" {
        return status(&config);
    }
    if args.len() > 2 && args[1] == "--present" {
        let id: i64 = args[2].parse()?;
        return present(&config, id).await;
    }

    sync(&config).await
}

/// Register the offline worker: precache the asset list and purge stale
/// cache versions.
async fn sync(config: &Config) -> Result<()> {
    let storage = CacheStorage::new(config.cache_dir()?)?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
    let mut worker = OfflineWorker::new(storage, fetcher, config.origin());

    if worker.register().await {
        println!("Offline cache ready ({}).", worker.cache_name());
    } else {
        eprintln!("Offline cache registration failed; previous version (if any) still serves.");
    }

    status(config)
}

/// List stored cache versions and their entry counts.
fn status(config: &Config) -> Result<()> {
    let storage = CacheStorage::new(config.cache_dir()?)?;
    let names = storage.version_names()?;
    if names.is_empty() {
        println!("No cache versions stored.");
        return Ok(());
    }

    for name in names {
        let cache = storage.open(&name)?;
        let marker = if name == worker::CACHE_NAME {
            " (current)"
        } else {
            ""
        };
        println!(
            "{}{}: {} entries, updated {}",
            name,
            marker,
            cache.len(),
            cache.age_display()
        );
    }
    Ok(())
}

/// Open a presentation for an invoice and push a render message to it.
async fn present(config: &Config, id: i64) -> Result<()> {
    let bridge = PresentationBridge::new(config.page_url(), config.target_origin());

    let session = bridge.present_invoice(id).await;
    println!("Opened presentation at {}", session.url());

    let message = PresentationMessage::render(
        format!("<h1>Invoice #{}</h1>", id),
        Some(format!("Invoice #{}", id)),
    );
    if session.send(&message) {
        println!("Render message delivered.");
    } else {
        println!("Render message not delivered (presentation closed?).");
    }
    Ok(())
}
