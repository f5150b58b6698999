use feedline_core::feed::{DisplaySink, LiveOutcome};
use tokio::sync::mpsc;

use crate::events::UiEvent;

/// Sender for the runtime's event inbox.
pub type UiEventSender = mpsc::UnboundedSender<UiEvent>;

/// Receiver for the runtime's event inbox.
pub type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Display sink that posts driver notifications to the runtime inbox.
///
/// Sends fail only once the runtime is gone, which is shutdown.
#[derive(Debug, Clone)]
pub struct InboxSink {
    tx: UiEventSender,
}

impl InboxSink {
    pub fn new(tx: UiEventSender) -> Self {
        Self { tx }
    }
}

impl DisplaySink for InboxSink {
    fn request_redraw(&self) {
        let _ = self.tx.send(UiEvent::FeedUpdated);
    }

    fn stream_ended(&self, outcome: &LiveOutcome) {
        let _ = self.tx.send(UiEvent::StreamEnded(outcome.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_posts_events() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = InboxSink::new(tx);

        sink.request_redraw();
        sink.stream_ended(&LiveOutcome::Closed);

        assert!(matches!(rx.try_recv(), Ok(UiEvent::FeedUpdated)));
        assert!(matches!(
            rx.try_recv(),
            Ok(UiEvent::StreamEnded(LiveOutcome::Closed))
        ));
    }

    #[test]
    fn test_sink_ignores_closed_inbox() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        InboxSink::new(tx).request_redraw();
    }
}
