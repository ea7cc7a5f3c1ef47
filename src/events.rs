//! Dashboard Events
//!
//! Discrete events consumed by the dashboard loop. Every state change in
//! the engine arrives here: fresh data from the scheduler, map readiness
//! from the map engine, and language requests from the picker.

use crate::data::DataSnapshot;

/// Events consumed by the dashboard event loop
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    /// A fresh document arrived
    ///
    /// `draw` is the scheduler's draw counter at fetch time; zero for the
    /// initial fetch.
    DataRefreshed { snapshot: DataSnapshot, draw: u64 },

    /// The map engine finished loading its style
    MapStyleLoaded,

    /// The user requested a language change (raw picker value)
    LanguageRequested(String),

    /// Drain and exit the loop (single-shot runs and tests)
    Shutdown,
}
