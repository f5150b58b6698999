//! Message formatting.
//!
//! A message becomes a single [`DisplayLine`]: the time it was posted, the
//! author of the effective message, a "via" annotation for reposts and the
//! body with short links expanded.

use std::fmt;

use super::links::resolve;
use super::model::{LinkKind, Message};

/// Rendered when the platform timestamp cannot be parsed (zero time).
pub const UNKNOWN_TIMESTAMP: &str = "00:00";

/// One formatted feed entry.
///
/// The default value is the blank line used to fill empty buffer slots.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayLine {
    /// `HH:MM` in the message's own offset.
    pub timestamp: String,
    /// Author of the effective (original, for reposts) message.
    pub author: String,
    /// Author of the repost wrapper, if any.
    pub via: Option<String>,
    pub body: String,
}

impl DisplayLine {
    pub fn is_blank(&self) -> bool {
        self.timestamp.is_empty() && self.author.is_empty() && self.body.is_empty()
    }
}

impl fmt::Display for DisplayLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return Ok(());
        }
        write!(f, "{} {}", self.timestamp, self.author)?;
        if let Some(via) = &self.via {
            write!(f, " (via {via})")?;
        }
        write!(f, ": {}", self.body)
    }
}

/// Formats a message for display.
///
/// Never fails: a malformed timestamp renders as [`UNKNOWN_TIMESTAMP`].
pub fn format_message(msg: &Message) -> DisplayLine {
    let timestamp = msg.created_time().map_or_else(
        || {
            tracing::debug!(created_at = %msg.created_at, "unparseable timestamp");
            UNKNOWN_TIMESTAMP.to_string()
        },
        |time| time.format("%H:%M").to_string(),
    );

    let (effective, via) = match msg.original.as_deref() {
        Some(original) => (original, Some(msg.author.clone())),
        None => (msg, None),
    };

    // Hyperlinks first, then media.
    let body = resolve(&effective.body, effective.links_of(LinkKind::Hyperlink));
    let body = resolve(&body, effective.links_of(LinkKind::Media));

    DisplayLine {
        timestamp,
        author: effective.author.clone(),
        via,
        body,
    }
}
