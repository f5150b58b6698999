//! Feed module: UI-agnostic message handling.
//!
//! This module contains:
//! - `model`: Decoded message and stream event types
//! - `links`: Short-link expansion
//! - `format`: Message -> display line formatting
//! - `buffer`: Fixed-capacity newest-first line buffer
//! - `driver`: Backfill and live ingestion loop

pub mod buffer;
pub mod driver;
pub mod format;
pub mod links;
pub mod model;

pub use buffer::{ScrollingBuffer, SharedBuffer};
pub use driver::{DisplaySink, FeedDriver, FeedSource, LiveOutcome};
pub use format::{DisplayLine, format_message};
pub use links::resolve;
pub use model::{EventStream, Link, LinkKind, Message, StreamEvent};
