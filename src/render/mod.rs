//! Render Layer
//!
//! This module provides the rendering side of the dashboard core:
//!
//! - **surface contracts** (this file): the host-provided drawing routines
//!   behind the `RenderSurface` trait, and the opaque instance handles they
//!   exchange
//! - **coordinator**: lifecycle and sequencing of all redraws
//!
//! Drawing routines are external collaborators. Every instance-producing
//! operation receives the prior handle for its slot by value (taking
//! ownership is the destruction contract) and returns the replacement
//! handle, so no two live instances for one slot ever coexist.

pub mod coordinator;

#[cfg(test)]
pub(crate) mod testing;

pub use coordinator::{RenderCoordinator, RenderOptions, RenderState};

use std::collections::HashMap;
use uuid::Uuid;

use crate::data::{DashboardData, DayRecord, PrefectureRecord, Totals, TotalsDiff};
use crate::map::MapStyle;

/// Opaque handle to a live chart or tooltip instance
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceHandle(Uuid);

impl InstanceHandle {
    /// Mint a fresh handle for a newly created instance
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-region chart handles, keyed by region name
pub type RegionCharts = HashMap<String, InstanceHandle>;

/// Host-provided drawing routines
///
/// Implementations must be safe to call repeatedly and must clean up an
/// instance's internal subscriptions when its handle is consumed.
pub trait RenderSurface: Send {
    /// Redraw the summary KPI cards
    fn draw_kpis(&mut self, totals: &Totals, diff: &TotalsDiff);

    /// Redraw the last-updated indicator
    fn draw_last_updated(&mut self, updated: &str, lang: &str);

    /// Update the page title case counter
    fn draw_page_title_count(&mut self, confirmed: f64);

    /// Redraw the regional table with its embedded per-region trend charts
    ///
    /// Receives the previous per-region handles, destroys the ones whose
    /// regions are stale, and returns the handles now live.
    fn draw_prefecture_table(
        &mut self,
        prefectures: &[PrefectureRecord],
        totals: &Totals,
        prev: RegionCharts,
    ) -> RegionCharts;

    /// Redraw the travel-restriction panel
    fn draw_travel_restrictions(&mut self, data: &DashboardData, lang: &str);

    /// Redraw the cumulative trend chart (linear scale)
    fn draw_trend_chart(
        &mut self,
        trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle;

    /// Redraw the cumulative trend chart (logarithmic scale)
    fn draw_trend_chart_log(
        &mut self,
        trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle;

    /// Redraw the daily-increase chart
    fn draw_daily_increase_chart(
        &mut self,
        trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle;

    /// Redraw the regional trajectory chart
    fn draw_trajectory_chart(
        &mut self,
        prefectures: &[PrefectureRecord],
        prev: Option<InstanceHandle>,
        lang: &str,
    ) -> InstanceHandle;

    /// Draw the regional map overlay
    ///
    /// `draw` is the refresh cycle counter; zero means first draw.
    fn draw_map_prefectures(&mut self, draw: u64, data: &DashboardData, map: &mut dyn MapStyle);

    /// Reflect the active language in the visible language picker
    fn toggle_lang_picker(&mut self, lang: &str);

    /// Recreate tooltip instances so they pick up new language strings
    fn update_tooltip_lang(&mut self, prev: Vec<InstanceHandle>) -> Vec<InstanceHandle>;

    /// Whether the host page carries the travel-restriction panel
    fn has_travel_restrictions_panel(&self) -> bool {
        true
    }
}
