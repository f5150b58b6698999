//! TUI runtime: owns the terminal and runs the event loop.
//!
//! The feed driver runs on its own task and never touches the terminal. It
//! posts `UiEvent`s to the inbox; the loop drains the inbox each frame along
//! with terminal input, feeds everything through the reducer, and draws only
//! when something changed.

mod inbox;

use std::io::Stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event;
use feedline_core::feed::SharedBuffer;
use feedline_core::interrupt::{self, InterruptedError};
pub use inbox::{InboxSink, UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// How long to wait for terminal input before draining the inbox again.
pub const POLL_DURATION: Duration = Duration::from_millis(50);

/// Rows taken by the panel border.
const BORDER_ROWS: u16 = 2;

/// Full-screen feed runtime.
///
/// Terminal state is restored on drop, panic, or a second Ctrl+C.
pub struct FeedRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
}

impl FeedRuntime {
    /// Enters the alternate screen and sizes the buffer to the panel.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up or measured.
    pub fn new(title: impl Into<String>) -> Result<Self> {
        // Panic hook goes in before the alternate screen.
        terminal::install_panic_hook();
        interrupt::set_restore_hook(|| {
            let _ = terminal::restore_terminal();
        });
        interrupt::reset();

        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;
        let size = terminal.size().context("Failed to read terminal size")?;
        let buffer = SharedBuffer::new(panel_capacity(size.height));
        tracing::debug!(
            width = size.width,
            height = size.height,
            capacity = buffer.capacity(),
            "terminal ready"
        );

        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            state: AppState::new(title, buffer),
            inbox_tx,
            inbox_rx,
        })
    }

    /// Sink for the feed driver, wired to this runtime's inbox.
    pub fn sink(&self) -> InboxSink {
        InboxSink::new(self.inbox_tx.clone())
    }

    pub fn buffer(&self) -> SharedBuffer {
        self.state.buffer.clone()
    }

    /// Draws the panel once, outside the event loop.
    ///
    /// # Errors
    /// Returns an error if drawing fails.
    pub fn draw(&mut self) -> Result<()> {
        self.terminal
            .draw(|frame| render::render(&self.state, frame))
            .context("Failed to draw")?;
        Ok(())
    }

    /// Handles pending terminal input without blocking or drawing.
    ///
    /// Returns `true` once the user has asked to quit.
    ///
    /// # Errors
    /// Returns [`InterruptedError`] after a Ctrl+C signal, or an error if
    /// terminal input fails.
    pub fn pump_input(&mut self) -> Result<bool> {
        check_interrupt()?;
        while event::poll(Duration::ZERO).context("Failed to poll terminal")? {
            let event = event::read().context("Failed to read terminal event")?;
            update::update(&mut self.state, UiEvent::Terminal(event));
        }
        Ok(self.state.should_quit)
    }

    /// Runs the event loop until the user quits.
    ///
    /// # Errors
    /// Returns [`InterruptedError`] after a Ctrl+C signal, or an error if
    /// terminal input or drawing fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.should_quit {
            // In raw mode Ctrl+C arrives as a key, but a signal from outside
            // still sets the flag.
            check_interrupt()?;

            for event in self.collect_events()? {
                dirty |= update::update(&mut self.state, event);
            }

            if dirty {
                self.draw()?;
                dirty = false;
            }
        }

        Ok(())
    }

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        if event::poll(POLL_DURATION).context("Failed to poll terminal")? {
            events.push(UiEvent::Terminal(
                event::read().context("Failed to read terminal event")?,
            ));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        Ok(events)
    }
}

impl Drop for FeedRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}

fn check_interrupt() -> Result<()> {
    if interrupt::is_interrupted() {
        tracing::info!("interrupted by signal");
        return Err(InterruptedError.into());
    }
    Ok(())
}

/// Buffer capacity for a terminal `height` rows tall.
fn panel_capacity(height: u16) -> usize {
    usize::from(height.saturating_sub(BORDER_ROWS)).max(1)
}
