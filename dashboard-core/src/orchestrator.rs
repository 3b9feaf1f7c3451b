//! Drives a city search through the provider and publishes its state.
//!
//! A search fetches current weather first, then air quality (keyed by the
//! snapshot's coordinates) and the forecast together. Every search takes a
//! new sequence number; only the search holding the latest number may
//! publish, so a slow superseded search cannot overwrite a newer result.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use crate::{
    error::FailureReason,
    forecast,
    model::Report,
    provider::WeatherProvider,
    state::{RequestState, SearchEvent},
};

#[derive(Debug, Default)]
struct Selection {
    seq: u64,
    city: Option<String>,
}

#[derive(Debug)]
pub struct SearchOrchestrator {
    provider: Arc<dyn WeatherProvider>,
    selection: Mutex<Selection>,
    state: watch::Sender<RequestState>,
}

impl SearchOrchestrator {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        Self { provider, selection: Mutex::new(Selection::default()), state }
    }

    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// The city of the latest accepted search.
    pub fn current_city(&self) -> Option<String> {
        self.selection().city.clone()
    }

    /// Run a search for `city`. Blank input is ignored.
    ///
    /// Resolves once this search has published its final state, or as soon
    /// as it learns it was superseded. Dropping the future early puts the
    /// state back to `Idle` unless a newer search has started.
    pub async fn search(&self, city: &str) {
        let city = city.trim();
        if city.is_empty() {
            return;
        }

        let seq = {
            let mut selection = self.selection();
            selection.seq += 1;
            selection.city = Some(city.to_string());
            self.state.send_modify(|s| *s = std::mem::take(s).apply(SearchEvent::Started));
            selection.seq
        };

        let mut guard = SettleGuard { orchestrator: self, seq, settled: false };
        self.run(seq, city).await;
        guard.settled = true;
    }

    /// Search again for the current city; does nothing before the first search.
    pub async fn refresh(&self) {
        let Some(city) = self.current_city() else {
            return;
        };
        self.search(&city).await;
    }

    async fn run(&self, seq: u64, city: &str) {
        tracing::info!(seq, city, "searching");

        let weather = match self.provider.current_weather(city).await {
            Ok(weather) => weather,
            Err(e) => {
                let reason = FailureReason::from(&e);
                tracing::warn!(seq, city, error = %e, "weather lookup failed");
                self.publish(seq, SearchEvent::WeatherFailed(reason));
                return;
            }
        };

        if !self.is_current(seq) {
            tracing::debug!(seq, city, "search superseded before follow-up calls");
            return;
        }

        let (air, series) = tokio::join!(
            self.provider.air_quality(weather.coordinates),
            self.provider.forecast(city),
        );

        let air_quality = air
            .inspect_err(|e| tracing::warn!(seq, city, error = %e, "air quality unavailable"))
            .ok();
        let forecast = series
            .map(|points| forecast::reduce(&points))
            .inspect_err(|e| tracing::warn!(seq, city, error = %e, "forecast unavailable"))
            .ok();

        tracing::info!(
            seq,
            city,
            air_quality = air_quality.is_some(),
            forecast = forecast.is_some(),
            "search settled"
        );
        self.publish(seq, SearchEvent::Settled(Report { weather, air_quality, forecast }));
    }

    fn publish(&self, seq: u64, event: SearchEvent) {
        let selection = self.selection();
        if selection.seq != seq {
            tracing::debug!(seq, current = selection.seq, "dropping stale search result");
            return;
        }
        self.state.send_modify(|s| *s = std::mem::take(s).apply(event));
    }

    fn is_current(&self, seq: u64) -> bool {
        self.selection().seq == seq
    }

    fn selection(&self) -> MutexGuard<'_, Selection> {
        self.selection.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Ends a search that was dropped mid-flight so `Loading` cannot outlive it.
struct SettleGuard<'a> {
    orchestrator: &'a SearchOrchestrator,
    seq: u64,
    settled: bool,
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::debug!(seq = self.seq, "search dropped before settling");
            self.orchestrator.publish(self.seq, SearchEvent::Abandoned);
        }
    }
}
