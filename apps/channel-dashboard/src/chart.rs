use chrono::{DateTime, Utc};
use serde_json::{json, Value as JsonValue};

use crate::series::{Metric, Series};

/// Aligned columns ready for plotting. `None` renders as a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub timestamps: Vec<DateTime<Utc>>,
    pub humidity: Vec<Option<f64>>,
    pub temperature: Vec<Option<f64>>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn values(&self, metric: Metric) -> &[Option<f64>] {
        match metric {
            Metric::Humidity => &self.humidity,
            Metric::Temperature => &self.temperature,
        }
    }
}

/// `now` is only used for the single placeholder point of an empty or
/// value-less series.
pub fn to_chart_series(series: &Series, now: DateTime<Utc>) -> ChartSeries {
    if !series.has_metric_data() {
        return ChartSeries {
            timestamps: vec![now],
            humidity: vec![None],
            temperature: vec![None],
        };
    }

    let samples = series.samples();
    ChartSeries {
        timestamps: samples.iter().map(|sample| sample.timestamp).collect(),
        humidity: samples.iter().map(|sample| sample.humidity).collect(),
        temperature: samples.iter().map(|sample| sample.temperature).collect(),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub title: &'static str,
    pub trace_name: &'static str,
    pub y_axis: &'static str,
}

pub const TEMPERATURE_CHART: ChartStyle = ChartStyle {
    title: "Temperature",
    trace_name: "Temperature (°C)",
    y_axis: "°C",
};

pub const HUMIDITY_CHART: ChartStyle = ChartStyle {
    title: "Humidity",
    trace_name: "Humidity (%)",
    y_axis: "%",
};

/// Plotly figure (`data` + `layout`) for one metric.
pub fn chart_payload(chart: &ChartSeries, metric: Metric) -> JsonValue {
    let style = match metric {
        Metric::Temperature => TEMPERATURE_CHART,
        Metric::Humidity => HUMIDITY_CHART,
    };
    let x: Vec<String> = chart
        .timestamps
        .iter()
        .map(|ts| ts.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .collect();

    json!({
        "data": [{
            "type": "scatter",
            "mode": "lines+markers",
            "name": style.trace_name,
            "x": x,
            "y": chart.values(metric),
        }],
        "layout": {
            "title": { "text": style.title },
            "margin": { "l": 20, "r": 20, "t": 30, "b": 20 },
            "xaxis": { "title": { "text": "Date" } },
            "yaxis": { "title": { "text": style.y_axis } },
            "template": "plotly_white",
            "height": 360,
        },
    })
}
