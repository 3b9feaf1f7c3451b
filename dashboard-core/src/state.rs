use serde::{Deserialize, Serialize};

use crate::{
    error::FailureReason,
    model::{AirQuality, ForecastEntry, Report, WeatherSnapshot},
};

/// The single live state of the dashboard's search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
    Success(Box<Report>),
    Failed(FailureReason),
}

/// What happened to the current search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Started,
    WeatherFailed(FailureReason),
    /// Weather succeeded and both follow-up calls have settled.
    Settled(Report),
    /// The search was dropped before it settled.
    Abandoned,
}

impl RequestState {
    /// Pure transition function.
    pub fn apply(self, event: SearchEvent) -> RequestState {
        match event {
            SearchEvent::Started => RequestState::Loading,
            SearchEvent::WeatherFailed(reason) => RequestState::Failed(reason),
            SearchEvent::Settled(report) => RequestState::Success(Box::new(report)),
            SearchEvent::Abandoned => RequestState::Idle,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }

    pub fn report(&self) -> Option<&Report> {
        match self {
            RequestState::Success(report) => Some(&**report),
            _ => None,
        }
    }

    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.report().map(|r| &r.weather)
    }

    pub fn air_quality(&self) -> Option<&AirQuality> {
        self.report().and_then(|r| r.air_quality.as_ref())
    }

    pub fn forecast(&self) -> Option<&[ForecastEntry]> {
        self.report().and_then(|r| r.forecast.as_deref())
    }

    pub fn failure(&self) -> Option<FailureReason> {
        match self {
            RequestState::Failed(reason) => Some(*reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinates;
    use chrono::Utc;

    fn report() -> Report {
        let now = Utc::now();
        Report {
            weather: WeatherSnapshot {
                city: "Lisbon".into(),
                country: Some("PT".into()),
                coordinates: Coordinates { lat: 38.7, lon: -9.1 },
                temperature: 21.0,
                feels_like: 20.5,
                humidity_pct: 60,
                pressure_hpa: 1016,
                wind_speed: 4.1,
                visibility_m: Some(10_000),
                description: "few clouds".into(),
                icon: "02d".into(),
                observed_at: now,
                sunrise: now,
                sunset: now,
                timezone_offset_secs: 0,
            },
            air_quality: None,
            forecast: Some(Vec::new()),
        }
    }

    #[test]
    fn start_clears_previous_failure() {
        let state = RequestState::Failed(FailureReason::NotFound).apply(SearchEvent::Started);
        assert!(state.is_loading());
        assert_eq!(state.failure(), None);
    }

    #[test]
    fn weather_failure_drops_previous_data() {
        let state = RequestState::Idle
            .apply(SearchEvent::Settled(report()))
            .apply(SearchEvent::Started)
            .apply(SearchEvent::WeatherFailed(FailureReason::NotFound));

        assert_eq!(state.failure(), Some(FailureReason::NotFound));
        assert!(state.weather().is_none());
        assert!(state.air_quality().is_none());
        assert!(state.forecast().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn abandoned_search_returns_to_idle() {
        let state = RequestState::Loading.apply(SearchEvent::Abandoned);
        assert_eq!(state, RequestState::Idle);
        assert!(!state.is_loading());
    }

    #[test]
    fn settled_exposes_partial_report() {
        let state = RequestState::Loading.apply(SearchEvent::Settled(report()));

        assert_eq!(state.weather().map(|w| w.city.as_str()), Some("Lisbon"));
        assert!(state.air_quality().is_none());
        assert_eq!(state.forecast().map(<[_]>::len), Some(0));
        assert!(!state.is_loading());
    }
}
