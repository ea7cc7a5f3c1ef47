//! Refresh Scheduler
//!
//! Drives periodic re-fetching of the remote document: one fetch
//! immediately on start, then one per interval, incrementing the draw
//! counter before each scheduled fetch. There is no pause or cancel
//! operation; the task runs for the lifetime of the process.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::DashboardEvent;
use crate::fetch::{DataFetcher, DataSource};

/// Time between scheduled refreshes
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(300_000);

/// Periodic refresh driver
pub struct RefreshScheduler<S> {
    fetcher: DataFetcher<S>,
    events: mpsc::Sender<DashboardEvent>,
    interval: Duration,
    draws: AtomicU64,
}

impl<S: DataSource + 'static> RefreshScheduler<S> {
    /// Create a scheduler with the standard five-minute interval
    pub fn new(fetcher: DataFetcher<S>, events: mpsc::Sender<DashboardEvent>) -> Self {
        Self::with_interval(fetcher, events, REFRESH_INTERVAL)
    }

    /// Create a scheduler with a custom interval
    pub fn with_interval(
        fetcher: DataFetcher<S>,
        events: mpsc::Sender<DashboardEvent>,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            events,
            interval,
            draws: AtomicU64::new(0),
        }
    }

    /// Number of scheduled refresh cycles completed so far
    pub fn draw_count(&self) -> u64 {
        self.draws.load(Ordering::SeqCst)
    }

    /// Start the refresh task
    ///
    /// Fetches once immediately (draw counter 0), then once per interval,
    /// incrementing the draw counter before each scheduled fetch. The task
    /// ends only when the event channel closes.
    pub fn start(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            tracing::info!(
                interval_ms = self.interval.as_millis() as u64,
                "Starting refresh scheduler"
            );

            let mut ticker = tokio::time::interval(self.interval);

            // First tick completes immediately: the initial fetch.
            ticker.tick().await;
            if !self.refresh_once().await {
                return;
            }

            loop {
                ticker.tick().await;
                self.draws.fetch_add(1, Ordering::SeqCst);
                if !self.refresh_once().await {
                    return;
                }
            }
        })
    }

    /// Fetch one document and post it to the dashboard loop
    ///
    /// Returns false when the dashboard side has gone away.
    async fn refresh_once(&self) -> bool {
        let snapshot = self.fetcher.fetch().await;
        let draw = self.draw_count();

        if self
            .events
            .send(DashboardEvent::DataRefreshed { snapshot, draw })
            .await
            .is_err()
        {
            tracing::debug!("Dashboard event channel closed, stopping refresh");
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use tokio::time::{advance, Instant};

    use crate::data::{DataSnapshot, DayRecord};
    use crate::fetch::FetchError;

    struct InstantSource;

    #[async_trait]
    impl DataSource for InstantSource {
        async fn fetch_once(&self) -> Result<DataSnapshot, FetchError> {
            Ok(DataSnapshot {
                prefectures: Vec::new(),
                daily: vec![DayRecord::new(
                    "2020-03-23".parse::<NaiveDate>().unwrap(),
                )
                .metric("confirmed", 1128.0)],
                updated: "2020-03-23T09:00:00+09:00".to_string(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_immediately_then_on_interval() {
        let (tx, mut rx) = mpsc::channel(8);
        let fetcher = DataFetcher::new(InstantSource);
        let scheduler = Arc::new(RefreshScheduler::new(fetcher, tx));
        let start = Instant::now();

        let handle = Arc::clone(&scheduler).start();

        // Initial fetch at t=0 with draw counter 0.
        let event = rx.recv().await.unwrap();
        match event {
            DashboardEvent::DataRefreshed { draw, .. } => assert_eq!(draw, 0),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(Instant::now() - start, Duration::ZERO);

        // Scheduled fetch at t=300000 with draw counter 1.
        advance(REFRESH_INTERVAL).await;
        let event = rx.recv().await.unwrap();
        match event {
            DashboardEvent::DataRefreshed { draw, .. } => assert_eq!(draw, 1),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(Instant::now() - start >= REFRESH_INTERVAL);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_draw_counter_increments_per_cycle() {
        let (tx, mut rx) = mpsc::channel(8);
        let fetcher = DataFetcher::new(InstantSource);
        let scheduler = Arc::new(RefreshScheduler::with_interval(
            fetcher,
            tx,
            Duration::from_secs(60),
        ));

        let handle = Arc::clone(&scheduler).start();

        let mut draws = Vec::new();
        for cycle in 0..3 {
            if let Some(DashboardEvent::DataRefreshed { draw, .. }) = rx.recv().await {
                draws.push(draw);
            }
            if cycle < 2 {
                advance(Duration::from_secs(60)).await;
            }
        }

        assert_eq!(draws, vec![0, 1, 2]);
        assert_eq!(scheduler.draw_count(), 2);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_dashboard_channel_closes() {
        let (tx, rx) = mpsc::channel(8);
        let fetcher = DataFetcher::new(InstantSource);
        let scheduler = Arc::new(RefreshScheduler::with_interval(
            fetcher,
            tx,
            Duration::from_secs(60),
        ));

        drop(rx);
        let handle = Arc::clone(&scheduler).start();

        // The task must end on its own once the channel is closed.
        handle.await.unwrap();
    }
}
