//! UI event types.
//!
//! Everything the reducer reacts to arrives as a `UiEvent`: terminal input
//! from crossterm, and feed notifications posted to the inbox by the driver.

use crossterm::event::Event;
use feedline_core::feed::LiveOutcome;

#[derive(Debug, Clone)]
pub enum UiEvent {
    /// Raw terminal input (keys, resize).
    Terminal(Event),
    /// The buffer changed; redraw.
    FeedUpdated,
    /// Live ingestion stopped.
    StreamEnded(LiveOutcome),
}
