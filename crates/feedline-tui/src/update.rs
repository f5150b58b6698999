//! TUI reducer (update function).
//!
//! All state mutations happen here. Returns whether the panel must be redrawn.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::events::UiEvent;
use crate::state::AppState;

pub fn update(app: &mut AppState, event: UiEvent) -> bool {
    match event {
        UiEvent::FeedUpdated => true,
        UiEvent::StreamEnded(outcome) => {
            tracing::info!(%outcome, "feed stopped");
            app.stream_status = Some(outcome);
            true
        }
        UiEvent::Terminal(Event::Key(key)) => {
            if is_quit_key(&key) {
                app.should_quit = true;
            }
            false
        }
        UiEvent::Terminal(Event::Resize(..)) => true,
        UiEvent::Terminal(_) => false,
    }
}

fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
