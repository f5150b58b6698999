//! Pure view/render functions for the TUI.
//!
//! Takes `&AppState`, draws to a ratatui Frame, never mutates state.

use feedline_core::feed::DisplayLine;
use ratatui::Frame;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};

use crate::state::AppState;

const TIMESTAMP_STYLE: Style = Style::new().fg(Color::Green);
const AUTHOR_STYLE: Style = Style::new().fg(Color::Red);

/// Renders the feed panel over the whole frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let lines: Vec<Line<'static>> = app.buffer.snapshot().iter().map(styled_line).collect();

    let panel = Paragraph::new(lines)
        .block(Block::bordered().title(app.panel_title()))
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, frame.area());
}

/// Styles a display line: green timestamp, red author handles.
pub fn styled_line(line: &DisplayLine) -> Line<'static> {
    if line.is_blank() {
        return Line::default();
    }

    let mut spans = vec![
        Span::styled(line.timestamp.clone(), TIMESTAMP_STYLE),
        Span::raw(" "),
        Span::styled(line.author.clone(), AUTHOR_STYLE),
    ];
    if let Some(via) = &line.via {
        spans.push(Span::raw(" (via "));
        spans.push(Span::styled(via.clone(), AUTHOR_STYLE));
        spans.push(Span::raw(")"));
    }
    spans.push(Span::raw(": "));
    spans.push(Span::raw(line.body.clone()));
    Line::from(spans)
}
