//! Totals Aggregation
//!
//! Reduces the daily time series into current totals and day-over-day
//! deltas. Pure and deterministic: values pass through with no rounding.

use std::collections::BTreeMap;

use super::snapshot::DayRecord;

/// Current totals: metric name to value, from the latest day record
pub type Totals = BTreeMap<String, f64>;

/// Day-over-day deltas: latest minus second-latest, per metric
pub type TotalsDiff = BTreeMap<String, f64>;

/// Compute totals and deltas from the chronologically ordered daily series
///
/// Totals are the latest record's metric values. The diff is the latest
/// value minus the second-latest, per metric of the latest record; a metric
/// absent from the second-latest record is treated as a zero baseline.
///
/// A series with fewer than two entries has an empty diff. The empty series
/// is a precondition violation by the source; it yields empty totals and an
/// empty diff rather than an error.
pub fn compute_totals(daily: &[DayRecord]) -> (Totals, TotalsDiff) {
    let Some(latest) = daily.last() else {
        return (Totals::new(), TotalsDiff::new());
    };

    let totals = latest.metrics.clone();

    let mut diff = TotalsDiff::new();
    if daily.len() >= 2 {
        let previous = &daily[daily.len() - 2];
        for (metric, value) in &latest.metrics {
            let baseline = previous.metrics.get(metric).copied().unwrap_or(0.0);
            diff.insert(metric.clone(), value - baseline);
        }
    }

    (totals, diff)
}
