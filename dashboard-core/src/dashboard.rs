use std::sync::Arc;

use crate::{
    config::DisplayMode,
    history::RecentSearchStore,
    orchestrator::SearchOrchestrator,
    provider::WeatherProvider,
    state::RequestState,
    storage::KeyValueStore,
};

/// What the rendering layer talks to: searches, recent cities and the
/// display mode.
#[derive(Debug)]
pub struct Dashboard<S: KeyValueStore> {
    orchestrator: SearchOrchestrator,
    history: RecentSearchStore<S>,
    display_mode: DisplayMode,
}

impl<S: KeyValueStore> Dashboard<S> {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: S, display_mode: DisplayMode) -> Self {
        Self {
            orchestrator: SearchOrchestrator::new(provider),
            history: RecentSearchStore::load(store),
            display_mode,
        }
    }

    pub fn orchestrator(&self) -> &SearchOrchestrator {
        &self.orchestrator
    }

    pub fn state(&self) -> RequestState {
        self.orchestrator.state()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.display_mode = self.display_mode.toggled();
        self.display_mode
    }

    /// Record `city` as a recent search, then run it.
    pub async fn search(&mut self, city: &str) {
        if city.trim().is_empty() {
            return;
        }
        self.history.record(city);
        self.orchestrator.search(city).await;
    }

    /// Search again for the recent city at `index`. Returns false if there is none.
    pub async fn select_history(&mut self, index: usize) -> bool {
        let Some(city) = self.history.get(index).map(str::to_owned) else {
            return false;
        };
        self.search(&city).await;
        true
    }

    pub async fn refresh(&self) {
        self.orchestrator.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::FetchError,
        model::{AirQuality, Coordinates, TimePoint, WeatherSnapshot},
        storage::MemoryStore,
    };
    use async_trait::async_trait;

    /// Knows no cities at all.
    #[derive(Debug)]
    struct EmptyProvider;

    #[async_trait]
    impl WeatherProvider for EmptyProvider {
        async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
            Err(FetchError::NotFound { query: city.to_string() })
        }

        async fn forecast(&self, city: &str) -> Result<Vec<TimePoint>, FetchError> {
            Err(FetchError::NotFound { query: city.to_string() })
        }

        async fn air_quality(&self, _at: Coordinates) -> Result<AirQuality, FetchError> {
            Err(FetchError::NotFound { query: "air".into() })
        }
    }

    fn dashboard() -> Dashboard<MemoryStore> {
        Dashboard::new(Arc::new(EmptyProvider), MemoryStore::new(), DisplayMode::Dark)
    }

    #[tokio::test]
    async fn search_records_even_when_lookup_fails() {
        let mut dash = dashboard();

        dash.search("Atlantis").await;

        assert_eq!(dash.history(), ["Atlantis"]);
        assert!(dash.state().failure().is_some());
    }

    #[tokio::test]
    async fn blank_search_is_not_recorded() {
        let mut dash = dashboard();

        dash.search("  ").await;

        assert!(dash.history().is_empty());
        assert_eq!(dash.state(), RequestState::Idle);
    }

    #[tokio::test]
    async fn selecting_history_moves_entry_to_front() {
        let mut dash = dashboard();
        dash.search("Oslo").await;
        dash.search("Lima").await;

        assert!(dash.select_history(1).await);
        assert_eq!(dash.history(), ["Oslo", "Lima"]);
        assert_eq!(dash.orchestrator().current_city().as_deref(), Some("Oslo"));

        assert!(!dash.select_history(7).await);
    }

    #[test]
    fn display_mode_toggle_is_independent_of_data() {
        let mut dash = dashboard();
        assert_eq!(dash.toggle_display_mode(), DisplayMode::Light);
        assert_eq!(dash.toggle_display_mode(), DisplayMode::Dark);
        assert_eq!(dash.state(), RequestState::Idle);
    }
}
