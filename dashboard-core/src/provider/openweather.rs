use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::Units,
    error::FetchError,
    model::{AirQuality, AqiLevel, Coordinates, Pollutants, TimePoint, WeatherSnapshot},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        subject: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/data/2.5/{}", self.base_url, endpoint);
        tracing::debug!(endpoint, subject, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound { query: subject.to_string() });
        }

        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

impl From<OwCoord> for Coordinates {
    fn from(c: OwCoord) -> Self {
        Coordinates { lat: c.lat, lon: c.lon }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    sys: OwSys,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAqiMain {
    aqi: AqiLevel,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: OwAqiMain,
    components: Pollutants,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    list: Vec<OwAirEntry>,
}

fn describe(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                city,
                &[("q", city.to_string()), ("units", self.units.as_str().to_string())],
            )
            .await?;

        let (description, icon) = describe(&parsed.weather);

        Ok(WeatherSnapshot {
            city: parsed.name,
            country: parsed.sys.country,
            coordinates: parsed.coord.into(),
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            visibility_m: parsed.visibility,
            description,
            icon,
            observed_at: unix_to_utc(parsed.dt).unwrap_or_else(Utc::now),
            sunrise: unix_to_utc(parsed.sys.sunrise).unwrap_or_default(),
            sunset: unix_to_utc(parsed.sys.sunset).unwrap_or_default(),
            timezone_offset_secs: parsed.timezone,
        })
    }

    async fn forecast(&self, city: &str) -> Result<Vec<TimePoint>, FetchError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                city,
                &[("q", city.to_string()), ("units", self.units.as_str().to_string())],
            )
            .await?;

        let mut points = Vec::with_capacity(parsed.list.len());
        for entry in parsed.list {
            let Ok(time) = NaiveDateTime::parse_from_str(&entry.dt_txt, DT_TXT_FORMAT) else {
                tracing::debug!(
                    dt_txt = %entry.dt_txt,
                    "skipping forecast point with unreadable time"
                );
                continue;
            };
            let (description, icon) = describe(&entry.weather);
            points.push(TimePoint { time, temperature: entry.main.temp, description, icon });
        }

        Ok(points)
    }

    async fn air_quality(&self, at: Coordinates) -> Result<AirQuality, FetchError> {
        let subject = format!("{},{}", at.lat, at.lon);
        let parsed: OwAirResponse = self
            .get_json(
                "air_pollution",
                &subject,
                &[("lat", at.lat.to_string()), ("lon", at.lon.to_string())],
            )
            .await?;

        let entry = parsed
            .list
            .into_iter()
            .next()
            .ok_or(FetchError::NotFound { query: subject })?;

        Ok(AirQuality { coordinates: at, aqi: entry.main.aqi, pollutants: entry.components })
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
