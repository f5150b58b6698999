//! Application state for the feed panel.

use feedline_core::feed::{LiveOutcome, SharedBuffer};

pub struct AppState {
    /// Panel label from config.
    pub title: String,
    /// Lines shown in the panel; written by the feed driver.
    pub buffer: SharedBuffer,
    /// Set once live ingestion stops.
    pub stream_status: Option<LiveOutcome>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(title: impl Into<String>, buffer: SharedBuffer) -> Self {
        Self {
            title: title.into(),
            buffer,
            stream_status: None,
            should_quit: false,
        }
    }

    /// Border label, suffixed with the stream state once ingestion has ended.
    pub fn panel_title(&self) -> String {
        match &self.stream_status {
            None => self.title.clone(),
            Some(outcome) => format!("{} ({outcome})", self.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_title_shows_stream_state() {
        let mut state = AppState::new("Tweets", SharedBuffer::new(1));
        assert_eq!(state.panel_title(), "Tweets");

        state.stream_status = Some(LiveOutcome::Closed);
        assert_eq!(state.panel_title(), "Tweets (stream closed)");
    }
}
