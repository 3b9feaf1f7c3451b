use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions for a city, as returned by the primary weather call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub country: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed: f64,
    /// Metres; the provider caps this at 10 km.
    pub visibility_m: Option<u32>,
    pub description: String,
    pub icon: String,
    pub observed_at: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Seconds east of UTC for the city.
    pub timezone_offset_secs: i32,
}

impl WeatherSnapshot {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.timezone_offset_secs).unwrap_or_else(|| Utc.fix())
    }

    pub fn local_sunrise(&self) -> DateTime<FixedOffset> {
        self.sunrise.with_timezone(&self.offset())
    }

    pub fn local_sunset(&self) -> DateTime<FixedOffset> {
        self.sunset.with_timezone(&self.offset())
    }
}

/// Categorical air quality index reported by the provider (1 = best, 5 = worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AqiLevel {
    Good = 1,
    Fair = 2,
    Moderate = 3,
    Poor = 4,
    VeryPoor = 5,
}

impl AqiLevel {
    pub fn label(&self) -> &'static str {
        match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
        }
    }

    pub fn index(&self) -> u8 {
        *self as u8
    }
}

impl std::fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<u8> for AqiLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AqiLevel::Good),
            2 => Ok(AqiLevel::Fair),
            3 => Ok(AqiLevel::Moderate),
            4 => Ok(AqiLevel::Poor),
            5 => Ok(AqiLevel::VeryPoor),
            other => Err(format!("air quality index {other} is outside 1..=5")),
        }
    }
}

impl From<AqiLevel> for u8 {
    fn from(level: AqiLevel) -> Self {
        level.index()
    }
}

/// Pollutant concentrations in µg/m³.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Pollutants {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub coordinates: Coordinates,
    pub aqi: AqiLevel,
    pub pollutants: Pollutants,
}

/// One step of the provider's forecast time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePoint {
    /// Clock time as reported by the provider.
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// A day's representative forecast reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
}

/// Everything a successful search produced.
///
/// Air quality and forecast are fetched after the snapshot and may be absent
/// when their calls failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub weather: WeatherSnapshot,
    pub air_quality: Option<AirQuality>,
    pub forecast: Option<Vec<ForecastEntry>>,
}
