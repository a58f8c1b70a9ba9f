use crate::config::DashboardConfig;
use crate::feed::FeedSource;
use std::sync::Arc;

/// Shared per-process state. Nothing in here changes after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: DashboardConfig,
    pub feed: Arc<dyn FeedSource>,
}
