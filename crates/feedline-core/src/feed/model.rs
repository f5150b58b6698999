//! Decoded feed types shared by providers, the driver and the TUI.

use chrono::{DateTime, FixedOffset};
use futures_util::stream::BoxStream;

/// Platform timestamp layout, e.g. `Wed Aug 27 13:08:45 +0000 2008`.
pub const CREATED_AT_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Kind of link annotation attached to a message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Plain URL entity.
    Hyperlink,
    /// Photo/video entity.
    Media,
}

/// A shortened URL appearing in a message body and what it expands to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub short: String,
    pub expanded: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(short: impl Into<String>, expanded: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            short: short.into(),
            expanded: expanded.into(),
            kind,
        }
    }

    pub fn hyperlink(short: impl Into<String>, expanded: impl Into<String>) -> Self {
        Self::new(short, expanded, LinkKind::Hyperlink)
    }

    pub fn media(short: impl Into<String>, expanded: impl Into<String>) -> Self {
        Self::new(short, expanded, LinkKind::Media)
    }
}

/// A decoded post.
///
/// `original` is set when this message is a repost of another one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    /// Raw creation timestamp as reported by the platform.
    pub created_at: String,
    pub body: String,
    pub author: String,
    pub links: Vec<Link>,
    pub original: Option<Box<Message>>,
}

impl Message {
    /// Parses `created_at`, keeping the offset the platform reported.
    pub fn created_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_str(self.created_at.trim(), CREATED_AT_FORMAT).ok()
    }

    pub fn is_repost(&self) -> bool {
        self.original.is_some()
    }

    /// Links of the given kind, in the order the platform listed them.
    pub fn links_of(&self, kind: LinkKind) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |link| link.kind == kind)
    }
}

/// One item read from the live stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A well-formed post.
    Message(Box<Message>),
    /// Blank keep-alive line.
    KeepAlive,
    /// Anything else (friend lists, deletes, limits, unparseable lines).
    Other(String),
}

/// Live event stream. An `Err` item is a transport failure and ends ingestion.
pub type EventStream = BoxStream<'static, anyhow::Result<StreamEvent>>;
