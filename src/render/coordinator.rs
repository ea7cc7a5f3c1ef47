//! Render Coordinator
//!
//! Owns the lifecycle of every chart/table instance, decides what to
//! redraw on each data refresh or language change, and gates map-dependent
//! rendering on the join of two asynchronous readiness signals: the map
//! style load and the first data snapshot.

use crate::data::{compute_totals, DashboardData, DataSnapshot, TravelRestrictions};
use crate::map::{self, MapStyle};
use crate::render::{InstanceHandle, RegionCharts, RenderSurface};

/// Rendering options captured from the host context at startup
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Reduced-surface mode: suppress all non-map, non-KPI components
    pub embed_mode: bool,
    /// Static travel-restriction table merged into the dashboard state
    pub travel_restrictions: Option<TravelRestrictions>,
}

/// Live instance handles, one slot per logical chart
///
/// Invariant: redrawing a slot consumes (destroys) the prior handle before
/// the replacement is stored, so duplicate overlapping instances never
/// coexist.
#[derive(Debug, Default)]
pub struct RenderState {
    pub trend_chart: Option<InstanceHandle>,
    pub trend_chart_log: Option<InstanceHandle>,
    pub daily_increase_chart: Option<InstanceHandle>,
    pub trajectory_chart: Option<InstanceHandle>,
    pub prefecture_trend_charts: RegionCharts,
    pub tooltips: Vec<InstanceHandle>,
}

/// Coordinates all redraws against the render surface and the map
pub struct RenderCoordinator {
    surface: Box<dyn RenderSurface>,
    map: Box<dyn MapStyle>,
    state: RenderState,
    data: DashboardData,
    data_loaded: bool,
    style_loaded: bool,
    draw_count: u64,
    embed_mode: bool,
}

impl RenderCoordinator {
    /// Create a coordinator over the given surface and map
    pub fn new(
        surface: Box<dyn RenderSurface>,
        map: Box<dyn MapStyle>,
        options: RenderOptions,
    ) -> Self {
        let data = DashboardData {
            travel_restrictions: options.travel_restrictions,
            ..DashboardData::default()
        };

        Self {
            surface,
            map,
            state: RenderState::default(),
            data,
            data_loaded: false,
            style_loaded: false,
            draw_count: 0,
            embed_mode: options.embed_mode,
        }
    }

    /// Snapshot-derived state currently on screen
    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    /// Live instance handles
    pub fn state(&self) -> &RenderState {
        &self.state
    }

    /// Whether at least one snapshot has been received
    pub fn data_loaded(&self) -> bool {
        self.data_loaded
    }

    /// Whether the map style has finished loading
    pub fn style_loaded(&self) -> bool {
        self.style_loaded
    }

    /// Apply a fresh snapshot and redraw everything it affects
    ///
    /// `draw` is the scheduler's draw counter at fetch time; `lang` the
    /// active language. Redraws run synchronously in a fixed sequence:
    /// KPIs, last-updated/title, regional table, travel restrictions,
    /// trend charts, daily increase, trajectory, then the map overlay
    /// (readiness permitting).
    pub fn on_data_refresh(&mut self, snapshot: DataSnapshot, draw: u64, lang: &str) {
        self.draw_count = draw;

        let (totals, totals_diff) = compute_totals(&snapshot.daily);
        let data = DashboardData {
            prefectures: snapshot.prefectures,
            trend: snapshot.daily,
            totals,
            totals_diff,
            last_updated: Some(snapshot.updated),
            travel_restrictions: self.data.travel_restrictions.take(),
        };

        self.surface.draw_kpis(&data.totals, &data.totals_diff);

        if !self.embed_mode {
            if let Some(updated) = &data.last_updated {
                self.surface.draw_last_updated(updated, lang);
            }
            self.surface.draw_page_title_count(data.confirmed());

            let prev = std::mem::take(&mut self.state.prefecture_trend_charts);
            self.state.prefecture_trend_charts =
                self.surface
                    .draw_prefecture_table(&data.prefectures, &data.totals, prev);

            if self.surface.has_travel_restrictions_panel() {
                self.surface.draw_travel_restrictions(&data, lang);
            }

            let prev = self.state.trend_chart.take();
            self.state.trend_chart = Some(self.surface.draw_trend_chart(&data.trend, prev));

            let prev = self.state.trend_chart_log.take();
            self.state.trend_chart_log =
                Some(self.surface.draw_trend_chart_log(&data.trend, prev));

            let prev = self.state.daily_increase_chart.take();
            self.state.daily_increase_chart =
                Some(self.surface.draw_daily_increase_chart(&data.trend, prev));

            let prev = self.state.trajectory_chart.take();
            self.state.trajectory_chart =
                Some(self.surface.draw_trajectory_chart(&data.prefectures, prev, lang));
        }

        self.data = data;
        self.data_loaded = true;

        self.try_draw_map_prefectures();
    }

    /// Record map-style readiness and apply current-language labels
    pub fn on_map_style_loaded(&mut self, lang: &str) {
        self.style_loaded = true;
        map::apply_language_labels(self.map.as_mut(), lang);
        self.try_draw_map_prefectures();
    }

    /// Redraw the language-sensitive components after a language switch
    ///
    /// Sequenced after the localizer has completed, so every component
    /// reads translated strings.
    pub fn on_language_applied(&mut self, lang: &str) {
        self.surface.toggle_lang_picker(lang);

        if self.style_loaded {
            map::apply_language_labels(self.map.as_mut(), lang);
        }

        if !self.embed_mode {
            if self.surface.has_travel_restrictions_panel() {
                self.surface.draw_travel_restrictions(&self.data, lang);
            }

            let prev = self.state.trajectory_chart.take();
            self.state.trajectory_chart =
                Some(self.surface.draw_trajectory_chart(&self.data.prefectures, prev, lang));
        }

        let prev = std::mem::take(&mut self.state.tooltips);
        self.state.tooltips = self.surface.update_tooltip_lang(prev);
    }

    /// Draw the regional map overlay once both readiness signals hold
    ///
    /// No-op until the style has loaded and a snapshot has been received,
    /// regardless of which signal arrives first. Not an error path: a
    /// premature request is simply deferred to the next trigger.
    pub fn try_draw_map_prefectures(&mut self) {
        if !self.style_loaded || !self.data_loaded {
            return;
        }
        self.surface
            .draw_map_prefectures(self.draw_count, &self.data, self.map.as_mut());
    }
}
