mod cli;
mod config;
mod logging;
mod render;

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use watcher_core::EpochMillis;
use watcher_engine::{
    JsonDirRepository, ListingEndpoint, RefreshEngine, ReqwestFetcher, WatchStore, Watcher,
};
use watcher_logging::{parse_level, watcher_debug, watcher_info};

use crate::cli::{Command, USAGE};
use crate::config::AppConfig;

fn main() -> Result<()> {
    let invocation = cli::parse_args(std::env::args().skip(1))?;
    if invocation.command == Command::Help {
        print!("{USAGE}");
        return Ok(());
    }

    let config = AppConfig::load(invocation.config.as_deref())?;
    logging::initialize(config.log_destination, parse_level(&config.log_level));
    match &config.source {
        Some(path) => watcher_debug!("Loaded configuration from {:?}", path),
        None => watcher_debug!("No {} found; using defaults", config::CONFIG_FILENAME),
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    runtime.block_on(run(&config, invocation.command))
}

async fn run(config: &AppConfig, command: Command) -> Result<()> {
    let endpoint = ListingEndpoint::new(&config.base_url)?;
    let watcher = build_watcher(config, endpoint.clone())?;

    match command {
        Command::Check => {
            if watcher.refresh_if_due().await?.is_none() {
                watcher_info!("Skipping refresh; last check is recent");
            }
        }
        Command::List | Command::Help => {}
        Command::Add(username) => {
            if watcher.add_favorite(&username)? {
                watcher.refresh_all().await?;
            } else {
                println!("Already watching {username}.");
            }
        }
        Command::Remove(username) => {
            if !watcher.remove_favorite(&username)? {
                println!("Not watching {username}.");
            }
        }
        Command::Refresh => {
            watcher.refresh_all().await?;
        }
    }

    print!("{}", render::render_view(&watcher.view()?, &endpoint));
    Ok(())
}

fn build_watcher(
    config: &AppConfig,
    endpoint: ListingEndpoint,
) -> Result<Watcher<JsonDirRepository>> {
    let store = WatchStore::open(JsonDirRepository::new(config.state_dir.clone()))
        .with_context(|| format!("opening watch state in {}", config.state_dir.display()))?;
    let fetcher = Arc::new(ReqwestFetcher::new(config.fetch_settings()));
    let clock = Arc::new(|| -> EpochMillis { Utc::now().timestamp_millis() });
    let engine = RefreshEngine::new(fetcher, endpoint, clock);
    Ok(Watcher::new(store, engine, config.refresh_policy()))
}
