//! Dashboard Runtime
//!
//! Wires the language controller and render coordinator into a single
//! event loop with single-writer discipline over all shared state. Every
//! trigger (fresh data, map readiness, a language request) arrives as a
//! `DashboardEvent` and is handled to completion before the next one, so
//! redraws from two refreshes can never interleave and language changes
//! are applied strictly one at a time.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::events::DashboardEvent;
use crate::lang::{LanguageController, Localizer};
use crate::render::RenderCoordinator;

/// The dashboard event loop
pub struct Dashboard {
    coordinator: RenderCoordinator,
    language: LanguageController,
    localizer: Arc<dyn Localizer>,
    events: mpsc::Receiver<DashboardEvent>,
}

impl Dashboard {
    /// Create a dashboard consuming events from the given channel
    pub fn new(
        coordinator: RenderCoordinator,
        language: LanguageController,
        localizer: Arc<dyn Localizer>,
        events: mpsc::Receiver<DashboardEvent>,
    ) -> Self {
        Self {
            coordinator,
            language,
            localizer,
            events,
        }
    }

    /// Consume events until the channel closes or `Shutdown` arrives
    pub async fn run(mut self) {
        tracing::info!(lang = %self.language.current(), "Dashboard loop started");

        let mut next = self.events.recv().await;
        while let Some(event) = next.take() {
            match event {
                DashboardEvent::Shutdown => {
                    tracing::info!("Dashboard loop shutting down");
                    break;
                }
                DashboardEvent::DataRefreshed { snapshot, draw } => {
                    tracing::debug!(draw, updated = %snapshot.updated, "Applying data refresh");
                    self.coordinator
                        .on_data_refresh(snapshot, draw, self.language.current());
                }
                DashboardEvent::MapStyleLoaded => {
                    tracing::debug!("Map style loaded");
                    self.coordinator
                        .on_map_style_loaded(self.language.current());
                }
                DashboardEvent::LanguageRequested(mut candidate) => {
                    // Coalesce a burst of picker clicks to the latest
                    // request; any other event found while draining is
                    // carried into the next loop iteration.
                    loop {
                        match self.events.try_recv() {
                            Ok(DashboardEvent::LanguageRequested(newer)) => candidate = newer,
                            Ok(other) => {
                                next = Some(other);
                                break;
                            }
                            Err(_) => break,
                        }
                    }
                    self.apply_language(&candidate).await;
                }
            }

            if next.is_none() {
                next = self.events.recv().await;
            }
        }
    }

    /// Resolve and apply one language request end to end
    ///
    /// Dependent redraws run only after the localizer has switched, so the
    /// surface reads translated strings.
    async fn apply_language(&mut self, candidate: &str) {
        let lang = self.language.resolve(candidate);
        tracing::debug!(candidate = %candidate, lang = %lang, "Applying language");

        self.language.begin_apply();
        self.localizer.change_language(&lang).await;
        self.coordinator.on_language_applied(&lang);
        self.language.finish_apply();
    }
}
