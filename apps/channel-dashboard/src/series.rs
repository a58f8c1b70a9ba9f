use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value as JsonValue;

use crate::feed::RawRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub humidity: Option<f64>,
    pub temperature: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Humidity,
    Temperature,
}

impl Sample {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Humidity => self.humidity,
            Metric::Temperature => self.temperature,
        }
    }
}

/// Samples of one fetch, ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    samples: Vec<Sample>,
}

impl Series {
    /// Sorts the samples; equal timestamps keep their input order.
    pub fn from_samples(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|sample| sample.timestamp);
        Self { samples }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.last()
    }

    pub fn values(&self, metric: Metric) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().filter_map(move |sample| sample.value(metric))
    }

    /// False when the series is empty or neither metric has a single value.
    pub fn has_metric_data(&self) -> bool {
        self.samples
            .iter()
            .any(|sample| sample.humidity.is_some() || sample.temperature.is_some())
    }
}

/// Turns raw feed records into a sorted series. Only an unparseable
/// timestamp drops a record; bad metric values become `None`.
pub fn normalize(records: &[RawRecord]) -> Series {
    let mut dropped = 0usize;
    let samples: Vec<Sample> = records
        .iter()
        .filter_map(|record| {
            let sample = coerce_record(record);
            if sample.is_none() {
                dropped += 1;
            }
            sample
        })
        .collect();

    if dropped > 0 {
        tracing::debug!(
            dropped,
            kept = samples.len(),
            "dropped feed records with invalid timestamps"
        );
    }
    Series::from_samples(samples)
}

fn coerce_record(record: &RawRecord) -> Option<Sample> {
    let humidity = record.field1.as_ref().and_then(parse_metric);
    let temperature = record.field2.as_ref().and_then(parse_metric);
    let timestamp = record.created_at.as_ref().and_then(parse_timestamp)?;
    Some(Sample {
        timestamp,
        humidity,
        temperature,
    })
}

pub fn parse_metric(value: &JsonValue) -> Option<f64> {
    let parsed = match value {
        JsonValue::Number(num) => num.as_f64(),
        JsonValue::String(raw) => raw.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

pub fn parse_timestamp(value: &JsonValue) -> Option<DateTime<Utc>> {
    let JsonValue::String(raw) = value else {
        return None;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S %z") {
        return Some(ts.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn record(created_at: JsonValue, field1: JsonValue, field2: JsonValue) -> RawRecord {
        RawRecord {
            created_at: Some(created_at),
            field1: Some(field1),
            field2: Some(field2),
        }
    }

    #[test]
    fn drops_only_invalid_timestamps() {
        let records = vec![
            record(json!("2024-01-01T00:00:00Z"), json!("55"), json!("21.5")),
            record(json!("bad"), json!("60"), json!("22")),
        ];
        let series = normalize(&records);
        assert_eq!(series.len(), 1);
        let sample = series.samples()[0];
        assert_eq!(sample.humidity, Some(55.0));
        assert_eq!(sample.temperature, Some(21.5));
    }

    #[test]
    fn bad_metric_values_keep_the_row() {
        let records = vec![
            record(json!("2024-01-01T00:00:00Z"), json!("abc"), json!("21")),
            record(json!("2024-01-01T00:01:00Z"), json!(null), json!("")),
            record(json!("2024-01-01T00:02:00Z"), json!(true), json!("NaN")),
            RawRecord {
                created_at: Some(json!("2024-01-01T00:03:00Z")),
                ..RawRecord::default()
            },
        ];
        let series = normalize(&records);
        assert_eq!(series.len(), 4);
        assert_eq!(series.samples()[0].humidity, None);
        assert_eq!(series.samples()[0].temperature, Some(21.0));
        assert!(series.samples()[1..]
            .iter()
            .all(|s| s.humidity.is_none() && s.temperature.is_none()));
    }

    #[test]
    fn missing_or_non_string_timestamps_are_dropped() {
        let records = vec![
            RawRecord {
                field1: Some(json!("1")),
                ..RawRecord::default()
            },
            record(json!(1704067200), json!("1"), json!("1")),
            record(json!("   "), json!("1"), json!("1")),
        ];
        assert!(normalize(&records).is_empty());
    }

    #[test]
    fn empty_input_is_an_empty_series() {
        let series = normalize(&[]);
        assert!(series.is_empty());
        assert!(!series.has_metric_data());
    }

    #[test]
    fn output_is_sorted_ascending() {
        let records = vec![
            record(json!("2024-01-03T00:00:00Z"), json!("3"), json!("3")),
            record(json!("2024-01-01T00:00:00Z"), json!("1"), json!("1")),
            record(json!("2024-01-02 00:00:00"), json!("2"), json!("2")),
        ];
        let series = normalize(&records);
        let humidity: Vec<f64> = series.values(Metric::Humidity).collect();
        assert_eq!(humidity, vec![1.0, 2.0, 3.0]);
        assert!(series
            .samples()
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn numbers_and_padded_strings_are_accepted() {
        assert_eq!(parse_metric(&json!(21)), Some(21.0));
        assert_eq!(parse_metric(&json!(" 21.25 ")), Some(21.25));
        assert_eq!(parse_metric(&json!("-3e1")), Some(-30.0));
        assert_eq!(parse_metric(&json!("inf")), None);
        assert_eq!(parse_metric(&json!([1])), None);
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        for raw in [
            "2024-01-01T12:30:00Z",
            "2024-01-01T14:30:00+02:00",
            "2024-01-01 12:30:00",
            "2024-01-01 12:30:00 UTC",
            "2024-01-01T12:30:00",
            "2024-01-01 12:30",
        ] {
            assert_eq!(parse_timestamp(&json!(raw)), Some(expected), "{raw}");
        }
        assert_eq!(
            parse_timestamp(&json!("2024-01-01")),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single()
        );
        assert_eq!(parse_timestamp(&json!("2024-13-01")), None);
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
    }
}
