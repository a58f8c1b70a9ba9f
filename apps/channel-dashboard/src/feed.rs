use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use url::Url;

use crate::config::FeedConfig;
use crate::error::FetchError;

/// One feed entry exactly as the remote API sent it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub created_at: Option<JsonValue>,
    /// Humidity.
    #[serde(default)]
    pub field1: Option<JsonValue>,
    /// Temperature.
    #[serde(default)]
    pub field2: Option<JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPayload {
    pub channel_name: Option<String>,
    pub records: Vec<RawRecord>,
}

/// Only the document shape is checked here. Entries and the channel block
/// are read leniently so a bad row or title never fails the fetch.
#[derive(Debug, Deserialize)]
struct FeedResponse {
    #[serde(default)]
    channel: Option<JsonValue>,
    #[serde(default)]
    feeds: Option<Vec<JsonValue>>,
}

impl FeedResponse {
    fn channel_name(&self) -> Option<String> {
        self.channel
            .as_ref()
            .and_then(|channel| channel.get("name"))
            .and_then(JsonValue::as_str)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
    }

    /// Entries that are not objects become empty records, which `normalize`
    /// drops for lack of a timestamp.
    fn into_records(self) -> Vec<RawRecord> {
        self.feeds
            .unwrap_or_default()
            .into_iter()
            .map(|entry| serde_json::from_value::<RawRecord>(entry).unwrap_or_default())
            .collect()
    }
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self) -> Result<FeedPayload, FetchError>;
}

pub struct FeedClient {
    http: Client,
    config: FeedConfig,
}

impl FeedClient {
    pub fn new(http: Client, config: FeedConfig) -> Self {
        Self { http, config }
    }

    fn feed_url(&self) -> Result<Url, FetchError> {
        let mut url = Url::parse(&self.config.base_url).map_err(|err| {
            FetchError::transport(format!("invalid feed base URL {}: {err}", self.config.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| FetchError::transport("feed base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(["channels", self.config.channel_id.as_str(), "feeds.json"]);
        Ok(url)
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("results", self.config.results.to_string())];
        if let Some(key) = self.config.api_key.as_deref().filter(|key| !key.is_empty()) {
            params.push(("api_key", key.to_string()));
        }
        params
    }
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch(&self) -> Result<FeedPayload, FetchError> {
        let url = self.feed_url()?;
        tracing::debug!(
            channel_id = %self.config.channel_id,
            results = self.config.results,
            private = self.config.api_key.is_some(),
            "fetching channel feed"
        );

        let response = self
            .http
            .get(url)
            .query(&self.query())
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(FetchError::from)?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                channel_id = %self.config.channel_id,
                status = status.as_u16(),
                "feed API returned a non-success status"
            );
            return Err(FetchError::bad_status(
                status.as_u16(),
                status.canonical_reason().unwrap_or("unexpected status"),
            ));
        }

        let body = response.bytes().await.map_err(FetchError::from)?;
        let payload: FeedResponse = serde_json::from_slice(&body).map_err(|err| {
            FetchError::transport(format!("feed body is not a valid feed document: {err}"))
        })?;

        let channel_name = payload.channel_name();
        let records = payload.into_records();
        tracing::debug!(
            channel_id = %self.config.channel_id,
            records = records.len(),
            "channel feed fetched"
        );
        Ok(FeedPayload {
            channel_name,
            records,
        })
    }
}
