//! Core library for the `weather-dashboard` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider abstraction and the OpenWeather client
//! - Search orchestration with loading/error state
//! - Forecast reduction and recent-search persistence
//!
//! Rendering is left to the caller, which subscribes to [`RequestState`].

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod state;
pub mod storage;

pub use config::{Config, DisplayMode, Units};
pub use dashboard::Dashboard;
pub use error::{FailureReason, FetchError};
pub use history::RecentSearchStore;
pub use model::{
    AirQuality, AqiLevel, Coordinates, ForecastEntry, Report, TimePoint, WeatherSnapshot,
};
pub use orchestrator::SearchOrchestrator;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use state::RequestState;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
