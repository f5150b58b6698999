use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

use super::oauth::{self, Nonce};
use super::stream::{classify_value, decode_lines};
use crate::config::TwitterConfig;
use crate::credentials::Credentials;
use crate::feed::driver::FeedSource;
use crate::feed::model::{EventStream, Message, StreamEvent};
use crate::providers::{ApiError, USER_AGENT, resolve_base_url};

pub const API_BASE_URL_ENV: &str = "FEEDLINE_API_BASE_URL";
pub const STREAM_URL_ENV: &str = "FEEDLINE_STREAM_URL";

/// The timeline endpoint never returns more than this many posts.
pub const MAX_TIMELINE_COUNT: usize = 200;

/// Twitter v1.1 client: home timeline for backfill, user stream for live.
pub struct TwitterClient {
    http: reqwest::Client,
    credentials: Credentials,
    api_base_url: String,
    stream_url: Url,
    stream_with: String,
    request_timeout: Option<Duration>,
}

impl TwitterClient {
    /// Creates a client from config, applying env overrides for both URLs.
    ///
    /// # Errors
    /// Returns an error if a URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &TwitterConfig, credentials: Credentials) -> Result<Self> {
        let api_base_url = resolve_base_url(
            Some(&config.api_base_url),
            API_BASE_URL_ENV,
            TwitterConfig::DEFAULT_API_BASE_URL,
            "API base",
        )?;
        let stream_url = resolve_base_url(
            Some(&config.stream_url),
            STREAM_URL_ENV,
            TwitterConfig::DEFAULT_STREAM_URL,
            "stream",
        )?;

        Self::build(
            &api_base_url,
            &stream_url,
            &config.stream_with,
            config.request_timeout(),
            credentials,
        )
    }

    /// Creates a client against explicit endpoints (no env lookup).
    ///
    /// # Errors
    /// Returns an error if a URL is invalid or the HTTP client cannot be built.
    pub fn with_urls(api_base_url: &str, stream_url: &str, credentials: Credentials) -> Result<Self> {
        let defaults = TwitterConfig::default();
        Self::build(
            api_base_url,
            stream_url,
            &defaults.stream_with,
            defaults.request_timeout(),
            credentials,
        )
    }

    fn build(
        api_base_url: &str,
        stream_url: &str,
        stream_with: &str,
        request_timeout: Option<Duration>,
        credentials: Credentials,
    ) -> Result<Self> {
        let stream_url =
            Url::parse(stream_url).with_context(|| format!("Invalid stream URL: {stream_url}"))?;
        Url::parse(api_base_url)
            .with_context(|| format!("Invalid API base URL: {api_base_url}"))?;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            credentials,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            stream_url,
            stream_with: stream_with.to_string(),
            request_timeout,
        })
    }

    /// Fetches up to `count` recent home timeline posts, newest first.
    ///
    /// Entries that are not well-formed posts are skipped.
    ///
    /// # Errors
    /// Returns an error on transport failure, non-success status, or a body
    /// that is not a JSON array.
    pub async fn home_timeline(&self, count: usize) -> Result<Vec<Message>> {
        let count = count.clamp(1, MAX_TIMELINE_COUNT);
        let mut url = Url::parse(&format!(
            "{}/statuses/home_timeline.json",
            self.api_base_url
        ))
        .context("Invalid timeline URL")?;
        url.query_pairs_mut()
            .append_pair("count", &count.to_string())
            .append_pair("tweet_mode", "extended");

        let response = self.get(&url, self.request_timeout).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        let entries: Vec<Value> = serde_json::from_str(&body)
            .map_err(|err| ApiError::parse(format!("Failed to parse timeline: {err}")))?;

        let total = entries.len();
        let messages: Vec<Message> = entries
            .into_iter()
            .filter_map(|entry| match classify_value(entry) {
                StreamEvent::Message(msg) => Some(*msg),
                _ => None,
            })
            .collect();
        if messages.len() < total {
            tracing::debug!(
                skipped = total - messages.len(),
                "timeline entries were not posts"
            );
        }
        Ok(messages)
    }

    /// Opens the user stream.
    ///
    /// # Errors
    /// Returns an error if the connection fails or the status is not success.
    pub async fn user_stream(&self) -> Result<EventStream> {
        let mut url = self.stream_url.clone();
        url.query_pairs_mut()
            .append_pair("tweet_mode", "extended")
            .append_pair("with", &self.stream_with);

        let response = self.get(&url, None).await?;
        tracing::info!(url = %self.stream_url, "stream connected");
        Ok(decode_lines(response.bytes_stream()))
    }

    async fn get(&self, url: &Url, timeout: Option<Duration>) -> Result<reqwest::Response> {
        let auth = oauth::authorization_header(&self.credentials, "GET", url, &[], &Nonce::generate())?;
        let mut request = self
            .http
            .get(url.clone())
            .header(reqwest::header::AUTHORIZATION, auth);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = ApiError::http_status(status.as_u16(), &body);
            tracing::warn!(kind = %err.kind, "request to {} failed: {err}", url.path());
            return Err(err.into());
        }
        Ok(response)
    }
}

impl FeedSource for TwitterClient {
    async fn recent(&self, limit: usize) -> Result<Vec<Message>> {
        self.home_timeline(limit).await
    }

    async fn open_stream(&self) -> Result<EventStream> {
        self.user_stream().await
    }
}
