//! # Epiwatch
//!
//! Outbreak Dashboard Core - refresh, localization, and render orchestration
//! for epidemiological time-series dashboards.
//!
//! ## Features
//!
//! - **Resilient fetching**: Exponential-backoff retry around the remote
//!   data document; failures degrade to stale data, never to a crash
//! - **Derived totals**: Current totals and day-over-day deltas from the
//!   daily series
//! - **Coordinated rendering**: One live instance per chart slot, with
//!   destroy-before-create replacement on every redraw
//! - **Readiness gating**: The regional map overlay waits for both the map
//!   style and the first data snapshot, in either arrival order
//! - **Serialized localization**: Language changes applied one at a time,
//!   coalesced to the latest request
//!
//! ## Modules
//!
//! - [`data`]: The remote document, shared dashboard state, and totals
//! - [`fetch`]: Backoff fetch loop over a pluggable data source
//! - [`lang`]: Language controller and localizer seam
//! - [`render`]: Render surface contracts and the render coordinator
//! - [`scheduler`]: Periodic refresh driver
//! - [`app`]: The dashboard event loop tying everything together
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use epiwatch::data::compute_totals;
//! use epiwatch::fetch::{DataFetcher, HttpDataSource};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Fetch the remote document, retrying with backoff until it parses.
//!     let source = HttpDataSource::new(
//!         "https://data.covid19japan.com/summary/latest.json",
//!         Duration::from_secs(30),
//!     );
//!     let snapshot = DataFetcher::new(source).fetch().await;
//!
//!     let (totals, diff) = compute_totals(&snapshot.daily);
//!     println!(
//!         "confirmed: {:?} (+{:?})",
//!         totals.get("confirmed"),
//!         diff.get("confirmed")
//!     );
//! }
//! ```
//!
//! Wiring the full engine (surface, map, language controller, scheduler,
//! and the dashboard loop) is shown in `src/main.rs`.

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod fetch;
pub mod lang;
pub mod map;
pub mod render;
pub mod scheduler;

// Re-export top-level types for convenience
pub use data::{
    compute_totals, DashboardData, DataSnapshot, DayRecord, PrefectureRecord, Totals, TotalsDiff,
    TravelRestrictions,
};

pub use fetch::{DataFetcher, DataSource, FetchError, HttpDataSource, BASE_RETRY_DELAY};

pub use lang::{
    detect_initial, LangPhase, LanguageController, Localizer, StaticCatalog,
    DEFAULT_SUPPORTED_LANGS,
};

pub use map::{apply_language_labels, label_expression, LayerKind, MapStyle, StyleLayer};

pub use render::{
    InstanceHandle, RegionCharts, RenderCoordinator, RenderOptions, RenderState, RenderSurface,
};

pub use scheduler::{RefreshScheduler, REFRESH_INTERVAL};

pub use events::DashboardEvent;

pub use app::Dashboard;

pub use config::{
    Config, ConfigError, FetchConfig, LanguageConfig, LoggingConfig, RefreshConfig, RenderConfig,
};
