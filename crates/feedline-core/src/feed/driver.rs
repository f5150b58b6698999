//! Feed driver: backfill and live ingestion.
//!
//! The driver is the only writer of the [`SharedBuffer`]. Every insertion is
//! followed by a redraw request on the [`DisplaySink`], sent after the buffer
//! lock has been released.

use std::fmt;
use std::future::Future;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use super::buffer::SharedBuffer;
use super::format::format_message;
use super::model::{EventStream, Message, StreamEvent};

/// Where messages come from.
pub trait FeedSource {
    /// Returns up to `limit` recent messages, newest first.
    fn recent(&self, limit: usize) -> impl Future<Output = Result<Vec<Message>>> + Send;

    /// Opens the live event stream.
    fn open_stream(&self) -> impl Future<Output = Result<EventStream>> + Send;
}

/// Receives redraw requests from the driver.
pub trait DisplaySink: Send + Sync {
    /// Called after each insertion into the buffer.
    fn request_redraw(&self);

    /// Called once when live ingestion stops.
    fn stream_ended(&self, _outcome: &LiveOutcome) {}
}

/// Why live ingestion stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiveOutcome {
    /// Shutdown was requested.
    Cancelled,
    /// The stream ended.
    Closed,
    /// The transport failed (or could not be opened).
    Failed(String),
}

impl fmt::Display for LiveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiveOutcome::Cancelled => write!(f, "stopped"),
            LiveOutcome::Closed => write!(f, "stream closed"),
            LiveOutcome::Failed(reason) => write!(f, "stream failed: {reason}"),
        }
    }
}

pub struct FeedDriver<S> {
    buffer: SharedBuffer,
    sink: S,
}

impl<S: DisplaySink> FeedDriver<S> {
    pub fn new(buffer: SharedBuffer, sink: S) -> Self {
        Self { buffer, sink }
    }

    pub fn buffer(&self) -> &SharedBuffer {
        &self.buffer
    }

    /// Loads the most recent messages so the panel starts full.
    ///
    /// Requests one message per buffer slot and pushes them oldest first, so
    /// the buffer ends up newest first. Returns the number of messages pushed.
    ///
    /// # Errors
    /// Returns an error if the historical query fails.
    pub async fn backfill<F: FeedSource>(&self, source: &F) -> Result<usize> {
        let capacity = self.buffer.capacity();
        let mut recent = source
            .recent(capacity)
            .await
            .context("Failed to load recent messages")?;
        recent.truncate(capacity);

        for msg in recent.iter().rev() {
            self.buffer.push(format_message(msg));
        }
        tracing::info!(count = recent.len(), capacity, "backfill complete");
        self.sink.request_redraw();

        Ok(recent.len())
    }

    /// Formats one message, pushes it and requests a redraw.
    pub fn ingest(&self, msg: &Message) {
        self.buffer.push(format_message(msg));
        self.sink.request_redraw();
    }

    /// Opens the live stream and ingests it until it ends or `cancel` fires.
    pub async fn stream<F: FeedSource>(&self, source: &F, cancel: CancellationToken) -> LiveOutcome {
        let opened = tokio::select! {
            biased;
            () = cancel.cancelled() => {
                let outcome = LiveOutcome::Cancelled;
                self.sink.stream_ended(&outcome);
                return outcome;
            }
            opened = source.open_stream() => opened,
        };

        match opened {
            Ok(events) => self.run_live(events, cancel).await,
            Err(err) => {
                tracing::error!("failed to open stream: {err:#}");
                let outcome = LiveOutcome::Failed(format!("{err:#}"));
                self.sink.stream_ended(&outcome);
                outcome
            }
        }
    }

    /// Ingests `events` until the stream ends, fails, or `cancel` fires.
    ///
    /// Non-message events are skipped. The stream is dropped before returning.
    pub async fn run_live(&self, mut events: EventStream, cancel: CancellationToken) -> LiveOutcome {
        let mut ingested = 0usize;
        let outcome = loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break LiveOutcome::Cancelled,
                next = events.next() => match next {
                    Some(Ok(StreamEvent::Message(msg))) => {
                        self.ingest(&msg);
                        ingested += 1;
                    }
                    Some(Ok(StreamEvent::KeepAlive)) => {}
                    Some(Ok(StreamEvent::Other(kind))) => {
                        tracing::debug!(%kind, "skipping non-message event");
                    }
                    Some(Err(err)) => {
                        tracing::warn!("stream error: {err:#}");
                        break LiveOutcome::Failed(format!("{err:#}"));
                    }
                    None => break LiveOutcome::Closed,
                },
            }
        };
        drop(events);

        tracing::info!(ingested, %outcome, "live ingestion ended");
        self.sink.stream_ended(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use futures_util::stream;

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingSink {
        redraws: Arc<AtomicUsize>,
        ended: Arc<Mutex<Vec<LiveOutcome>>>,
    }

    impl DisplaySink for RecordingSink {
        fn request_redraw(&self) {
            self.redraws.fetch_add(1, Ordering::SeqCst);
        }

        fn stream_ended(&self, outcome: &LiveOutcome) {
            self.ended.lock().unwrap().push(outcome.clone());
        }
    }

    struct FakeSource {
        recent: Vec<Message>,
        events: Mutex<Option<Vec<anyhow::Result<StreamEvent>>>>,
    }

    impl FakeSource {
        fn new(recent: Vec<Message>, events: Vec<anyhow::Result<StreamEvent>>) -> Self {
            Self {
                recent,
                events: Mutex::new(Some(events)),
            }
        }
    }

    impl FeedSource for FakeSource {
        async fn recent(&self, limit: usize) -> Result<Vec<Message>> {
            Ok(self.recent.iter().take(limit).cloned().collect())
        }

        async fn open_stream(&self) -> Result<EventStream> {
            let events = self.events.lock().unwrap().take().unwrap_or_default();
            Ok(stream::iter(events).boxed())
        }
    }

    struct FailingSource;

    impl FeedSource for FailingSource {
        async fn recent(&self, _limit: usize) -> Result<Vec<Message>> {
            anyhow::bail!("401 Unauthorized")
        }

        async fn open_stream(&self) -> Result<EventStream> {
            anyhow::bail!("connection refused")
        }
    }

    fn msg(author: &str, body: &str) -> Message {
        Message {
            created_at: "Mon Jan 02 19:38:05 +0000 2006".to_string(),
            body: body.to_string(),
            author: author.to_string(),
            ..Message::default()
        }
    }

    fn bodies(buffer: &SharedBuffer) -> Vec<String> {
        buffer.snapshot().into_iter().map(|l| l.body).collect()
    }

    #[tokio::test]
    async fn test_backfill_orders_newest_first() {
        let sink = RecordingSink::default();
        let driver = FeedDriver::new(SharedBuffer::new(4), sink.clone());
        // Historical query answers newest first.
        let source = FakeSource::new(vec![msg("a", "3"), msg("a", "2"), msg("a", "1")], vec![]);

        let count = driver.backfill(&source).await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(bodies(driver.buffer()), vec!["3", "2", "1", ""]);
        assert_eq!(sink.redraws.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_backfill_requests_one_per_slot() {
        let driver = FeedDriver::new(SharedBuffer::new(2), RecordingSink::default());
        let source = FakeSource::new(vec![msg("a", "3"), msg("a", "2"), msg("a", "1")], vec![]);

        driver.backfill(&source).await.unwrap();

        assert_eq!(bodies(driver.buffer()), vec!["3", "2"]);
    }

    #[tokio::test]
    async fn test_backfill_failure_is_error() {
        let driver = FeedDriver::new(SharedBuffer::new(2), RecordingSink::default());
        let err = driver.backfill(&FailingSource).await.unwrap_err();
        assert!(format!("{err:#}").contains("401 Unauthorized"));
    }

    #[tokio::test]
    async fn test_live_skips_non_messages_and_redraws_per_message() {
        let sink = RecordingSink::default();
        let driver = FeedDriver::new(SharedBuffer::new(3), sink.clone());
        let source = FakeSource::new(
            vec![],
            vec![
                Ok(StreamEvent::Other("friends".to_string())),
                Ok(StreamEvent::Message(Box::new(msg("jogbert", "first")))),
                Ok(StreamEvent::KeepAlive),
                Ok(StreamEvent::Other("invalid".to_string())),
                Ok(StreamEvent::Message(Box::new(msg("vaelen", "second")))),
            ],
        );

        let outcome = driver.stream(&source, CancellationToken::new()).await;

        assert_eq!(outcome, LiveOutcome::Closed);
        assert_eq!(bodies(driver.buffer()), vec!["second", "first", ""]);
        assert_eq!(sink.redraws.load(Ordering::SeqCst), 2);
        assert_eq!(*sink.ended.lock().unwrap(), vec![LiveOutcome::Closed]);
    }

    #[tokio::test]
    async fn test_backfill_then_live_appends_on_top() {
        let driver = FeedDriver::new(SharedBuffer::new(3), RecordingSink::default());
        let source = FakeSource::new(
            vec![msg("a", "old2"), msg("a", "old1")],
            vec![Ok(StreamEvent::Message(Box::new(msg("b", "live"))))],
        );

        driver.backfill(&source).await.unwrap();
        driver.stream(&source, CancellationToken::new()).await;

        assert_eq!(bodies(driver.buffer()), vec!["live", "old2", "old1"]);
    }

    #[tokio::test]
    async fn test_transport_error_ends_ingestion() {
        let sink = RecordingSink::default();
        let driver = FeedDriver::new(SharedBuffer::new(2), sink.clone());
        let events: Vec<anyhow::Result<StreamEvent>> = vec![
            Ok(StreamEvent::Message(Box::new(msg("a", "kept")))),
            Err(anyhow::anyhow!("connection reset")),
            Ok(StreamEvent::Message(Box::new(msg("a", "never")))),
        ];

        let outcome = driver
            .run_live(stream::iter(events).boxed(), CancellationToken::new())
            .await;

        assert_eq!(outcome, LiveOutcome::Failed("connection reset".to_string()));
        assert_eq!(bodies(driver.buffer()), vec!["kept", ""]);
    }

    #[tokio::test]
    async fn test_cancel_stops_pending_stream() {
        let sink = RecordingSink::default();
        let driver = FeedDriver::new(SharedBuffer::new(2), sink.clone());
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = driver
            .run_live(stream::pending::<anyhow::Result<StreamEvent>>().boxed(), cancel)
            .await;

        assert_eq!(outcome, LiveOutcome::Cancelled);
        assert_eq!(sink.redraws.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_open_failure_is_reported() {
        let sink = RecordingSink::default();
        let driver = FeedDriver::new(SharedBuffer::new(2), sink.clone());

        let outcome = driver.stream(&FailingSource, CancellationToken::new()).await;

        assert_eq!(
            outcome,
            LiveOutcome::Failed("connection refused".to_string())
        );
        assert_eq!(sink.ended.lock().unwrap().len(), 1);
    }
}
