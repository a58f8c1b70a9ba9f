use chrono::{DateTime, Utc};

use crate::series::{Metric, Series};

pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NOT_AVAILABLE: &str = "N/A";
pub const NEVER: &str = "never";

/// Summary of one metric. `None` means "not available".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricStats {
    pub last: Option<f64>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    pub temperature: MetricStats,
    pub humidity: MetricStats,
    /// `None` until the feed has produced at least one usable sample.
    pub last_update: Option<DateTime<Utc>>,
}

impl Statistics {
    pub fn no_data() -> Self {
        Self::default()
    }

    pub fn is_no_data(&self) -> bool {
        *self == Self::no_data()
    }

    pub fn last_update_label(&self) -> String {
        self.last_update
            .map(|ts| ts.format(LAST_UPDATE_FORMAT).to_string())
            .unwrap_or_else(|| NEVER.to_string())
    }
}

pub fn summarize(series: &Series) -> Statistics {
    if !series.has_metric_data() {
        return Statistics::no_data();
    }
    Statistics {
        temperature: metric_stats(series, Metric::Temperature),
        humidity: metric_stats(series, Metric::Humidity),
        last_update: series.latest().map(|sample| sample.timestamp),
    }
}

fn metric_stats(series: &Series, metric: Metric) -> MetricStats {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut last = None;
    for value in series.values(metric) {
        count += 1;
        sum += value;
        min = min.min(value);
        max = max.max(value);
        last = Some(value);
    }
    if count == 0 {
        return MetricStats::default();
    }
    MetricStats {
        last: last.map(round2),
        avg: Some(round2(sum / count as f64)),
        min: Some(round2(min)),
        max: Some(round2(max)),
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal text, or `N/A`.
pub fn format_stat(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
