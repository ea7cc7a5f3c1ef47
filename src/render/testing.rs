//! Recording fakes shared by coordinator and dashboard tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::data::{DashboardData, DayRecord, PrefectureRecord, Totals, TotalsDiff};
use crate::map::{MapStyle, StyleLayer};
use crate::render::{InstanceHandle, RegionCharts, RenderSurface};

/// One recorded call against the fake render surface.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SurfaceCall {
    Kpis,
    LastUpdated { lang: String },
    PageTitle { confirmed: f64 },
    Table,
    TableDestroyed { region: String },
    Travel { lang: String },
    ChartDestroyed { slot: &'static str },
    ChartCreated { slot: &'static str },
    MapOverlay { draw: u64 },
    LangPicker { lang: String },
    Tooltips { refreshed: usize },
}

impl SurfaceCall {
    pub(crate) fn kind(&self) -> String {
        match self {
            SurfaceCall::Kpis => "kpis".into(),
            SurfaceCall::LastUpdated { .. } => "last_updated".into(),
            SurfaceCall::PageTitle { .. } => "page_title".into(),
            SurfaceCall::Table => "table".into(),
            SurfaceCall::TableDestroyed { .. } => "table:destroy".into(),
            SurfaceCall::Travel { .. } => "travel".into(),
            SurfaceCall::ChartDestroyed { slot } => format!("{slot}:destroy"),
            SurfaceCall::ChartCreated { slot } => format!("{slot}:create"),
            SurfaceCall::MapOverlay { .. } => "map_overlay".into(),
            SurfaceCall::LangPicker { .. } => "lang_picker".into(),
            SurfaceCall::Tooltips { .. } => "tooltips".into(),
        }
    }
}

/// Render surface that records every call into a shared log.
pub(crate) struct RecordingSurface {
    log: Arc<Mutex<Vec<SurfaceCall>>>,
    travel_panel: bool,
}

impl RecordingSurface {
    pub(crate) fn new(log: Arc<Mutex<Vec<SurfaceCall>>>) -> Self {
        Self {
            log,
            travel_panel: true,
        }
    }

    pub(crate) fn without_travel_panel(mut self) -> Self {
        self.travel_panel = false;
        self
    }

    fn push(&self, call: SurfaceCall) {
        self.log.lock().unwrap().push(call);
    }

    fn chart(&mut self, slot: &'static str, prev: Option<InstanceHandle>) -> InstanceHandle {
        if prev.is_some() {
            self.push(SurfaceCall::ChartDestroyed { slot });
        }
        self.push(SurfaceCall::ChartCreated { slot });
        InstanceHandle::new()
    }
}

impl RenderSurface for RecordingSurface {
    fn draw_kpis(&mut self, _totals: &Totals, _diff: &TotalsDiff) {
        self.push(SurfaceCall::Kpis);
    }

    fn draw_last_updated(&mut self, _updated: &str, lang: &str) {
        self.push(SurfaceCall::LastUpdated { lang: lang.into() });
    }

    fn draw_page_title_count(&mut self, confirmed: f64) {
        self.push(SurfaceCall::PageTitle { confirmed });
    }

    fn draw_prefecture_table(
        &mut self,
        prefectures: &[PrefectureRecord],
        _totals: &Totals,
        mut prev: RegionCharts,
    ) -> RegionCharts {
        let current: HashSet<&str> = prefectures.iter().map(|p| p.name.as_str()).collect();
        let stale: Vec<String> = prev
            .keys()
            .filter(|region| !current.contains(region.as_str()))
            .cloned()
            .collect();
        for region in stale {
            prev.remove(&region);
            self.push(SurfaceCall::TableDestroyed { region });
        }
        for prefecture in prefectures {
            prev.entry(prefecture.name.clone())
                .or_insert_with(InstanceHandle::new);
        }
        self.push(SurfaceCall::Table);
        prev
    }

    fn draw_travel_restrictions(&mut self, _data: &DashboardData, lang: &str) {
        self.push(SurfaceCall::Travel { lang: lang.into() });
    }

    fn draw_trend_chart(
        &mut self,
        _trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        self.chart("trend", prev)
    }

    fn draw_trend_chart_log(
        &mut self,
        _trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        self.chart("trend_log", prev)
    }

    fn draw_daily_increase_chart(
        &mut self,
        _trend: &[DayRecord],
        prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        self.chart("daily_increase", prev)
    }

    fn draw_trajectory_chart(
        &mut self,
        _prefectures: &[PrefectureRecord],
        prev: Option<InstanceHandle>,
        _lang: &str,
    ) -> InstanceHandle {
        self.chart("trajectory", prev)
    }

    fn draw_map_prefectures(
        &mut self,
        draw: u64,
        _data: &DashboardData,
        _map: &mut dyn MapStyle,
    ) {
        self.push(SurfaceCall::MapOverlay { draw });
    }

    fn toggle_lang_picker(&mut self, lang: &str) {
        self.push(SurfaceCall::LangPicker { lang: lang.into() });
    }

    fn update_tooltip_lang(&mut self, prev: Vec<InstanceHandle>) -> Vec<InstanceHandle> {
        self.push(SurfaceCall::Tooltips {
            refreshed: prev.len(),
        });
        vec![InstanceHandle::new()]
    }

    fn has_travel_restrictions_panel(&self) -> bool {
        self.travel_panel
    }
}

/// Map fake exposing its layout-property updates through a shared log.
pub(crate) struct FakeMap {
    layers: Vec<StyleLayer>,
    updates: Arc<Mutex<Vec<(String, String, Value)>>>,
}

impl FakeMap {
    pub(crate) fn with_symbol_layers(ids: &[&str]) -> Self {
        Self {
            layers: ids.iter().map(|id| StyleLayer::symbol(*id)).collect(),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn updates(&self) -> Arc<Mutex<Vec<(String, String, Value)>>> {
        Arc::clone(&self.updates)
    }
}

impl MapStyle for FakeMap {
    fn style_layers(&self) -> Vec<StyleLayer> {
        self.layers.clone()
    }

    fn set_layout_property(&mut self, layer_id: &str, name: &str, expression: Value) {
        self.updates
            .lock()
            .unwrap()
            .push((layer_id.to_string(), name.to_string(), expression));
    }
}
