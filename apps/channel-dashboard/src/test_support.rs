use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::config::{DashboardConfig, FeedConfig};
use crate::error::FetchError;
use crate::feed::{FeedPayload, FeedSource, RawRecord};
use crate::state::AppState;

/// Canned feed source that counts how often it was asked.
pub struct StubFeed {
    result: Result<FeedPayload, (u16, String)>,
    calls: AtomicUsize,
}

impl StubFeed {
    pub fn ok(records: Vec<RawRecord>) -> Self {
        Self {
            result: Ok(FeedPayload {
                channel_name: Some("Greenhouse".to_string()),
                records,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Status 0 stands for a transport failure.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            result: Err((status, message.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StubFeed {
    async fn fetch(&self) -> Result<FeedPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.result {
            Ok(payload) => Ok(payload.clone()),
            Err((0, message)) => Err(FetchError::transport(message.clone())),
            Err((status, message)) => Err(FetchError::bad_status(*status, message.clone())),
        }
    }
}

pub fn scenario_records() -> Vec<RawRecord> {
    vec![
        RawRecord {
            created_at: Some(json!("2024-01-01T00:00:00Z")),
            field1: Some(json!("55")),
            field2: Some(json!("21.5")),
        },
        RawRecord {
            created_at: Some(json!("bad")),
            field1: Some(json!("60")),
            field2: Some(json!("22")),
        },
    ]
}

pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        feed: FeedConfig::new("12345").expect("feed config"),
        viewer_name: "Operator".to_string(),
    }
}

pub fn test_state(feed: Arc<StubFeed>) -> AppState {
    AppState {
        config: test_config(),
        feed,
    }
}
