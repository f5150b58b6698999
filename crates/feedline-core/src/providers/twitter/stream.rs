//! Newline-delimited JSON stream decoding.
//!
//! The streaming endpoint sends one JSON object per line (`\r\n` separated)
//! and blank lines as keep-alives. Lines are split at the byte level and each
//! one is classified independently: a bad line (not UTF-8, not JSON, too long)
//! becomes [`StreamEvent::Other`] and never ends the stream. Only I/O failures
//! of the underlying body surface as `Err` items.

use std::io;

use bytes::{Bytes, BytesMut};
use futures_util::{Stream, StreamExt};
use serde_json::{Map, Value};
use tokio_util::codec::{Decoder, FramedRead};
use tokio_util::io::StreamReader;

use super::types::RawTweet;
use crate::feed::model::{EventStream, Message, StreamEvent};

/// Longest line accepted before it is discarded.
pub const MAX_LINE_BYTES: usize = 1024 * 1024;

/// Decodes a body byte stream into classified events.
pub fn decode_lines<S, E>(body: S) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    decode_lines_with_max(body, MAX_LINE_BYTES)
}

fn decode_lines_with_max<S, E>(body: S, max_length: usize) -> EventStream
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let reader = StreamReader::new(body.map(|chunk| chunk.map_err(io::Error::other)));
    FramedRead::new(reader, LineSplitter::new(max_length))
        .map(|frame| match frame {
            Ok(Frame::Line(line)) => Ok(match std::str::from_utf8(&line) {
                Ok(text) => classify_line(text),
                Err(err) => {
                    tracing::debug!("stream line is not UTF-8: {err}");
                    StreamEvent::Other("invalid".to_string())
                }
            }),
            Ok(Frame::Oversized) => Ok(StreamEvent::Other("oversized".to_string())),
            Err(err) => Err(anyhow::Error::new(err).context("Stream read failed")),
        })
        .boxed()
}

/// One `\n`-terminated chunk of the body.
#[derive(Debug, PartialEq, Eq)]
enum Frame {
    Line(BytesMut),
    /// A line longer than the limit; its bytes were dropped.
    Oversized,
}

/// Splits bytes on `\n` without interpreting them.
///
/// Content problems are reported as frames, never as decoder errors:
/// `FramedRead` ends the stream after the first error.
#[derive(Debug)]
struct LineSplitter {
    max_length: usize,
    /// Bytes before this index are known to contain no `\n`.
    next_index: usize,
    /// Dropping the rest of an oversized line.
    discarding: bool,
}

impl LineSplitter {
    fn new(max_length: usize) -> Self {
        Self {
            max_length,
            next_index: 0,
            discarding: false,
        }
    }
}

impl Decoder for LineSplitter {
    type Item = Frame;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> io::Result<Option<Frame>> {
        let newline = buf[self.next_index..]
            .iter()
            .position(|b| *b == b'\n')
            .map(|offset| self.next_index + offset);

        let Some(end) = newline else {
            if buf.len() > self.max_length {
                buf.clear();
                self.discarding = true;
            }
            self.next_index = buf.len();
            return Ok(None);
        };

        let mut line = buf.split_to(end + 1);
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) || end > self.max_length {
            return Ok(Some(Frame::Oversized));
        }
        line.truncate(end);
        Ok(Some(Frame::Line(line)))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> io::Result<Option<Frame>> {
        if let Some(frame) = self.decode(buf)? {
            return Ok(Some(frame));
        }
        self.next_index = 0;
        if std::mem::take(&mut self.discarding) {
            buf.clear();
            return Ok(Some(Frame::Oversized));
        }
        if buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(Frame::Line(buf.split())))
    }
}

/// Classifies one line of the stream.
pub fn classify_line(line: &str) -> StreamEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return StreamEvent::KeepAlive;
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => classify_value(value),
        Err(err) => {
            tracing::debug!("invalid stream line: {err}");
            StreamEvent::Other("invalid".to_string())
        }
    }
}

/// Classifies one decoded JSON value.
///
/// Posts are recognised by shape (`created_at`, `user` and a body field);
/// anything else is reported by its `event` name, or else by the smallest key
/// (map keys iterate in sorted order).
pub fn classify_value(value: Value) -> StreamEvent {
    let other_kind = match value.as_object() {
        None => Some("invalid".to_string()),
        Some(obj) if looks_like_post(obj) => None,
        Some(obj) => Some(
            obj.get("event")
                .and_then(Value::as_str)
                .or_else(|| obj.keys().next().map(String::as_str))
                .unwrap_or("empty")
                .to_string(),
        ),
    };
    if let Some(kind) = other_kind {
        return StreamEvent::Other(kind);
    }

    match serde_json::from_value::<RawTweet>(value) {
        Ok(raw) => StreamEvent::Message(Box::new(Message::from(raw))),
        Err(err) => {
            tracing::debug!("malformed post: {err}");
            StreamEvent::Other("malformed".to_string())
        }
    }
}

fn looks_like_post(obj: &Map<String, Value>) -> bool {
    obj.contains_key("created_at")
        && obj.contains_key("user")
        && ["full_text", "text", "extended_tweet"]
            .iter()
            .any(|key| obj.contains_key(*key))
}
