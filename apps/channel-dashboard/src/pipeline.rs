use chrono::{DateTime, Utc};

use crate::chart::{to_chart_series, ChartSeries};
use crate::error::FetchError;
use crate::feed::FeedSource;
use crate::series::normalize;
use crate::stats::{summarize, Statistics};

/// Everything one dashboard render needs, built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub channel_name: Option<String>,
    pub sample_count: usize,
    pub statistics: Statistics,
    pub chart: ChartSeries,
}

/// Fetch, normalize, summarize. A fetch failure ends the run before any
/// normalization happens.
pub async fn run(
    source: &dyn FeedSource,
    now: DateTime<Utc>,
) -> Result<DashboardData, FetchError> {
    let payload = source.fetch().await?;
    let series = normalize(&payload.records);
    let statistics = summarize(&series);
    let chart = to_chart_series(&series, now);

    tracing::debug!(
        records = payload.records.len(),
        samples = series.len(),
        no_data = statistics.is_no_data(),
        "dashboard data built"
    );

    Ok(DashboardData {
        channel_name: payload.channel_name,
        sample_count: series.len(),
        statistics,
        chart,
    })
}
