//! Default command: the live feed panel.

use anyhow::{Context, Result};
use feedline_core::config::{Config, paths};
use feedline_core::credentials::Credentials;
use feedline_core::interrupt::InterruptedError;
use feedline_core::logging;
use feedline_core::providers::TwitterClient;
use feedline_tui::ViewOptions;

pub async fn run(config: &Config, debug: bool) -> Result<()> {
    let logs_dir = paths::logs_dir();
    let _log_guard = logging::init(&logs_dir, debug).context("init logging")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "feedline starting");

    let client = TwitterClient::new(&config.twitter, Credentials::from_env()).context("create API client")?;
    let options = ViewOptions {
        title: config.title.clone(),
        backfill: config.backfill,
    };

    let result = feedline_tui::run_feed(options, client).await;
    match &result {
        Ok(()) => tracing::info!("feedline exiting"),
        Err(err) if err.is::<InterruptedError>() => tracing::info!("feedline interrupted"),
        Err(err) => tracing::error!("feedline failed: {err:#}"),
    }
    result
}
