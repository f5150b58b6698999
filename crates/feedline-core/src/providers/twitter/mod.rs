//! Twitter v1.1 provider.
//!
//! - `client`: HTTP client (timeline backfill, user stream)
//! - `oauth`: OAuth 1.0a request signing
//! - `stream`: newline-delimited JSON decoding and event classification
//! - `types`: wire types

mod client;
pub mod oauth;
pub mod stream;
pub mod types;

pub use client::{API_BASE_URL_ENV, MAX_TIMELINE_COUNT, STREAM_URL_ENV, TwitterClient};
