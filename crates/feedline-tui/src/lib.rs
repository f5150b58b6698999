//! Full-screen terminal panel for the live feed.
//!
//! Elm-style layout: `state` holds the data, `update` is the reducer,
//! `render` draws, and `runtime` owns the terminal and the event loop.

mod events;
mod render;
mod runtime;
mod state;
mod terminal;
mod update;

use std::future::Future;
use std::io::{IsTerminal, stdout};

use anyhow::{Result, bail};
use feedline_core::feed::{FeedDriver, FeedSource};
use tokio_util::sync::CancellationToken;

pub use crate::runtime::FeedRuntime;

/// Viewer options resolved from config and flags.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub title: String,
    pub backfill: bool,
}

/// Runs the viewer until the user quits.
///
/// Backfills the panel (unless disabled), spawns live ingestion, then runs
/// the UI loop on this thread. Needs a multi-threaded tokio runtime.
///
/// Input is handled while the backfill is in flight, so quitting works even
/// if the timeline request hangs.
///
/// # Errors
/// Returns an error if stdout is not a terminal, terminal setup fails, the
/// backfill fails, or the UI loop fails. A Ctrl+C signal yields
/// `InterruptedError`. The terminal is restored first.
pub async fn run_feed<F>(options: ViewOptions, source: F) -> Result<()>
where
    F: FeedSource + Send + Sync + 'static,
{
    if !stdout().is_terminal() {
        bail!("feedline needs an interactive terminal");
    }

    let mut runtime = FeedRuntime::new(options.title)?;
    let driver = FeedDriver::new(runtime.buffer(), runtime.sink());

    runtime.draw()?;
    if options.backfill {
        let backfill = driver.backfill(&source);
        if until_quit(backfill, || runtime.pump_input()).await?.is_none() {
            tracing::info!("quit during backfill");
            return Ok(());
        }
    }

    let cancel = CancellationToken::new();
    let live = tokio::spawn({
        let cancel = cancel.clone();
        async move { driver.stream(&source, cancel).await }
    });

    let result = tokio::task::block_in_place(|| runtime.run());

    cancel.cancel();
    match live.await {
        Ok(outcome) => tracing::debug!(%outcome, "live task joined"),
        Err(err) => tracing::warn!("live task failed: {err}"),
    }
    drop(runtime);

    result
}

/// Drives `work` to completion, checking `quit_requested` between input polls.
///
/// Returns `None` if a quit was requested first; `work` is dropped then.
async fn until_quit<T>(
    work: impl Future<Output = Result<T>>,
    mut quit_requested: impl FnMut() -> Result<bool>,
) -> Result<Option<T>> {
    tokio::pin!(work);
    loop {
        tokio::select! {
            result = &mut work => return result.map(Some),
            () = tokio::time::sleep(runtime::POLL_DURATION) => {
                if quit_requested()? {
                    return Ok(None);
                }
            }
        }
    }
}
