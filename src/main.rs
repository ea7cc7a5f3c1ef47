//! Epiwatch CLI
//!
//! Runs the dashboard engine headless: fetches the remote document on the
//! refresh schedule and renders through a console surface. The real host
//! page supplies its own `RenderSurface` and `MapStyle`; this binary is
//! the reference wiring.

use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epiwatch::app::Dashboard;
use epiwatch::config::Config;
use epiwatch::data::{DashboardData, DayRecord, PrefectureRecord, Totals, TotalsDiff};
use epiwatch::events::DashboardEvent;
use epiwatch::fetch::{DataFetcher, HttpDataSource};
use epiwatch::lang::{detect_initial, LanguageController, Localizer, StaticCatalog};
use epiwatch::map::{MapStyle, StyleLayer};
use epiwatch::render::{
    InstanceHandle, RegionCharts, RenderCoordinator, RenderOptions, RenderSurface,
};
use epiwatch::scheduler::RefreshScheduler;

#[derive(Parser, Debug)]
#[command(name = "epiwatch", version, about = "Outbreak dashboard core")]
struct Args {
    /// Path to a config file (defaults to the standard locations)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Override the remote data document URL
    #[arg(long)]
    url: Option<String>,

    /// Startup language (two-letter code)
    #[arg(long)]
    lang: Option<String>,

    /// Reduced-surface rendering: KPIs and map only
    #[arg(long)]
    embed: bool,

    /// Run one refresh cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = args.url {
        config.fetch.data_url = url;
    }
    if args.embed {
        config.render.embed_mode = true;
    }

    init_logging(&config);

    tracing::info!("Epiwatch Dashboard Core v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(url = %config.fetch.data_url, "Data source");

    let env_lang = std::env::var("LANG").ok();
    let initial_lang = detect_initial(
        args.lang.as_deref(),
        env_lang.as_deref(),
        &config.language.supported,
        &config.language.default,
    );
    tracing::info!(lang = %initial_lang, "Startup language");

    let localizer: Arc<dyn Localizer> = Arc::new(StaticCatalog::new(initial_lang.as_str()));

    let (events_tx, events_rx) = mpsc::channel(64);

    let surface = ConsoleSurface {
        localizer: Arc::clone(&localizer),
    };
    let coordinator = RenderCoordinator::new(
        Box::new(surface),
        Box::new(HeadlessMap),
        RenderOptions {
            embed_mode: config.render.embed_mode,
            travel_restrictions: None,
        },
    );
    let language =
        LanguageController::new(config.language.supported.clone(), initial_lang.clone());
    let dashboard = Dashboard::new(coordinator, language, Arc::clone(&localizer), events_rx);

    // No real map engine behind the console surface, so its "style" is
    // ready immediately. The startup language is applied as the first
    // event, mirroring page init before the initial data draw.
    events_tx.send(DashboardEvent::MapStyleLoaded).await?;
    events_tx
        .send(DashboardEvent::LanguageRequested(initial_lang))
        .await?;

    let source = HttpDataSource::new(
        config.fetch.data_url.as_str(),
        Duration::from_millis(config.fetch.request_timeout_ms),
    );
    let fetcher = DataFetcher::with_base_delay(
        source,
        Duration::from_millis(config.fetch.base_retry_delay_ms),
    );

    if args.once {
        let snapshot = fetcher.fetch().await;
        events_tx
            .send(DashboardEvent::DataRefreshed { snapshot, draw: 0 })
            .await?;
        events_tx.send(DashboardEvent::Shutdown).await?;
    } else {
        let scheduler = Arc::new(RefreshScheduler::with_interval(
            fetcher,
            events_tx.clone(),
            Duration::from_millis(config.refresh.interval_ms),
        ));
        let _refresh_task = scheduler.start();
    }

    dashboard.run().await;

    tracing::info!("Epiwatch shutdown complete");
    Ok(())
}

/// Initialize tracing from the logging config
fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(format!("epiwatch={}", config.logging.level))
        });

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Render surface that reports every draw to the log
struct ConsoleSurface {
    localizer: Arc<dyn Localizer>,
}

impl RenderSurface for ConsoleSurface {
    fn draw_kpis(&mut self, totals: &Totals, diff: &TotalsDiff) {
        for (metric, value) in totals {
            let delta = diff.get(metric).copied().unwrap_or(0.0);
            tracing::info!(metric = %metric, value, delta, "KPI");
        }
    }

    fn draw_last_updated(&mut self, updated: &str, _lang: &str) {
        tracing::info!("{}: {}", self.localizer.text("updated.label"), updated);
    }

    fn draw_page_title_count(&mut self, confirmed: f64) {
        tracing::info!(confirmed, "Page title counter");
    }

    fn draw_prefecture_table(
        &mut self,
        prefectures: &[PrefectureRecord],
        _totals: &Totals,
        mut prev: RegionCharts,
    ) -> RegionCharts {
        prev.retain(|region, _| prefectures.iter().any(|p| &p.name == region));
        for prefecture in prefectures {
            prev.entry(prefecture.name.clone())
                .or_insert_with(InstanceHandle::new);
        }
        tracing::info!(regions = prefectures.len(), "Prefecture table");
        prev
    }

    fn draw_travel_restrictions(&mut self, data: &DashboardData, _lang: &str) {
        if let Some(restrictions) = &data.travel_restrictions {
            tracing::info!(
                banned = restrictions.banned.len(),
                visa_required = restrictions.visa_required.len(),
                "{}",
                self.localizer.text("travel.banned")
            );
        }
    }

    fn draw_trend_chart(
        &mut self,
        trend: &[DayRecord],
        _prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        tracing::info!(days = trend.len(), "Trend chart");
        InstanceHandle::new()
    }

    fn draw_trend_chart_log(
        &mut self,
        trend: &[DayRecord],
        _prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        tracing::info!(days = trend.len(), "Trend chart (log scale)");
        InstanceHandle::new()
    }

    fn draw_daily_increase_chart(
        &mut self,
        trend: &[DayRecord],
        _prev: Option<InstanceHandle>,
    ) -> InstanceHandle {
        tracing::info!(days = trend.len(), "Daily increase chart");
        InstanceHandle::new()
    }

    fn draw_trajectory_chart(
        &mut self,
        prefectures: &[PrefectureRecord],
        _prev: Option<InstanceHandle>,
        lang: &str,
    ) -> InstanceHandle {
        tracing::info!(regions = prefectures.len(), lang = %lang, "Trajectory chart");
        InstanceHandle::new()
    }

    fn draw_map_prefectures(&mut self, draw: u64, data: &DashboardData, _map: &mut dyn MapStyle) {
        tracing::info!(draw, regions = data.prefectures.len(), "Map overlay");
    }

    fn toggle_lang_picker(&mut self, lang: &str) {
        tracing::info!(lang = %lang, "Language picker");
    }

    fn update_tooltip_lang(&mut self, _prev: Vec<InstanceHandle>) -> Vec<InstanceHandle> {
        // No tooltips on the console surface.
        Vec::new()
    }
}

/// Map adapter with no layers behind it
struct HeadlessMap;

impl MapStyle for HeadlessMap {
    fn style_layers(&self) -> Vec<StyleLayer> {
        Vec::new()
    }

    fn set_layout_property(&mut self, layer_id: &str, name: &str, expression: serde_json::Value) {
        tracing::debug!(layer = %layer_id, property = %name, value = %expression, "Layout property");
    }
}
