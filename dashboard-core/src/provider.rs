use crate::{
    Config,
    error::FetchError,
    model::{AirQuality, Coordinates, TimePoint, WeatherSnapshot},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The three calls the dashboard makes against a weather service.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError>;

    /// Raw forecast series for the next few days, unreduced.
    async fn forecast(&self, city: &str) -> Result<Vec<TimePoint>, FetchError>;

    async fn air_quality(&self, at: Coordinates) -> Result<AirQuality, FetchError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weather-dashboard configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let mut provider = OpenWeatherProvider::new(api_key.to_owned()).with_units(config.units);
    if let Some(base) = &config.base_url {
        provider = provider.with_base_url(base.clone());
    }

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("weather-dashboard configure"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
