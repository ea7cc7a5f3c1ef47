//! Core data types for the outbreak dashboard
//!
//! This module defines the shape of the remote data document and the
//! shared dashboard state derived from it:
//! - `DataSnapshot`: One fetched document, replaced wholesale per fetch
//! - `DayRecord` / `PrefectureRecord`: The per-day and per-region entries
//! - `DashboardData`: Snapshot-derived state consumed by render operations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::totals::{Totals, TotalsDiff};

/// One dated entry in the daily time series
///
/// Metric values (confirmed, recovered, deceased, ...) are kept as a
/// flattened map so new metrics published by the source pass through
/// unchanged, with no rounding or conversion.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayRecord {
    /// Calendar date of this entry
    pub date: NaiveDate,
    /// Per-metric numeric values
    #[serde(flatten)]
    pub metrics: BTreeMap<String, f64>,
}

impl DayRecord {
    /// Create a record with no metric values
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            metrics: BTreeMap::new(),
        }
    }

    /// Builder method: set a metric value
    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    /// Look up a metric value, defaulting to zero when absent
    pub fn value(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }
}

/// One per-region record in the remote document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrefectureRecord {
    /// Region name in the source's primary language
    pub name: String,
    /// Localized region name, when the source publishes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_ja: Option<String>,
    /// Per-metric numeric values
    #[serde(flatten)]
    pub metrics: BTreeMap<String, f64>,
}

impl PrefectureRecord {
    /// Create a record with no metric values
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_ja: None,
            metrics: BTreeMap::new(),
        }
    }

    /// Builder method: set a metric value
    pub fn metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

/// The remote data document
///
/// Immutable per fetch: a successful fetch replaces the previous snapshot
/// wholesale, it is never partially mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataSnapshot {
    /// Per-region records
    #[serde(default)]
    pub prefectures: Vec<PrefectureRecord>,
    /// Daily time series, ordered chronologically by the source
    #[serde(default)]
    pub daily: Vec<DayRecord>,
    /// Last-updated timestamp, passed through as published
    pub updated: String,
}

/// One country entry in the travel-restriction table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryEntry {
    /// Country message key, resolved through the localizer
    pub name: String,
    /// Flag emoji shown next to the name
    #[serde(default)]
    pub emoji: String,
    /// Link to the official source for the restriction
    #[serde(default)]
    pub link: String,
}

/// Static travel-restriction table merged into the dashboard state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TravelRestrictions {
    /// Countries refusing entry
    #[serde(default)]
    pub banned: Vec<CountryEntry>,
    /// Countries requiring a visa
    #[serde(default)]
    pub visa_required: Vec<CountryEntry>,
    /// Countries requiring self-quarantine on arrival
    #[serde(default)]
    pub self_quarantine: Vec<CountryEntry>,
    /// Countries with other restrictions
    #[serde(default)]
    pub other: Vec<CountryEntry>,
}

/// Snapshot-derived state shared with all render operations
///
/// Owned exclusively by the render coordinator; replaced (not patched)
/// on every successful refresh.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    /// Per-region records from the latest snapshot
    pub prefectures: Vec<PrefectureRecord>,
    /// Daily series from the latest snapshot
    pub trend: Vec<DayRecord>,
    /// Current totals, derived from the latest day record
    pub totals: Totals,
    /// Day-over-day deltas
    pub totals_diff: TotalsDiff,
    /// Last-updated timestamp from the latest snapshot
    pub last_updated: Option<String>,
    /// Travel-restriction table, when configured
    pub travel_restrictions: Option<TravelRestrictions>,
}

impl DashboardData {
    /// Current confirmed-case total, for the page title counter
    pub fn confirmed(&self) -> f64 {
        self.totals.get("confirmed").copied().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_day_record_deserialize_flattened_metrics() {
        let json = r#"{"date": "2020-03-23", "confirmed": 1128.0, "recovered": 235.0, "deceased": 42.0}"#;
        let record: DayRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, date("2020-03-23"));
        assert_eq!(record.value("confirmed"), 1128.0);
        assert_eq!(record.value("recovered"), 235.0);
        assert_eq!(record.value("deceased"), 42.0);
        assert_eq!(record.value("critical"), 0.0);
    }

    #[test]
    fn test_snapshot_deserialize_document() {
        let json = r#"{
            "prefectures": [
                {"name": "Tokyo", "name_ja": "東京都", "confirmed": 138.0},
                {"name": "Osaka", "confirmed": 120.0}
            ],
            "daily": [
                {"date": "2020-03-22", "confirmed": 1086.0},
                {"date": "2020-03-23", "confirmed": 1128.0}
            ],
            "updated": "2020-03-23T09:00:00+09:00"
        }"#;
        let snapshot: DataSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.prefectures.len(), 2);
        assert_eq!(snapshot.prefectures[0].name_ja.as_deref(), Some("東京都"));
        assert!(snapshot.prefectures[1].name_ja.is_none());
        assert_eq!(snapshot.daily.len(), 2);
        assert_eq!(snapshot.updated, "2020-03-23T09:00:00+09:00");
    }

    #[test]
    fn test_snapshot_missing_sections_default_empty() {
        let json = r#"{"updated": "2020-03-23T09:00:00+09:00"}"#;
        let snapshot: DataSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.prefectures.is_empty());
        assert!(snapshot.daily.is_empty());
    }

    #[test]
    fn test_dashboard_data_confirmed_default_zero() {
        let data = DashboardData::default();
        assert_eq!(data.confirmed(), 0.0);
    }
}
