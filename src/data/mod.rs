//! Outbreak Data Model
//!
//! This module provides the data layer of the dashboard core:
//!
//! - **snapshot**: The remote document and its per-region / per-day records
//! - **totals**: Reduction of the daily series into current totals and
//!   day-over-day deltas

pub mod snapshot;
pub mod totals;

// Re-export commonly used types
pub use snapshot::{
    CountryEntry, DashboardData, DataSnapshot, DayRecord, PrefectureRecord, TravelRestrictions,
};
pub use totals::{compute_totals, Totals, TotalsDiff};
