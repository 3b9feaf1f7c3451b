//! Plain-text cards for the dashboard state.

use std::fmt::Write;

use chrono::{DateTime, NaiveDate, TimeZone};
use dashboard_core::{
    AirQuality, DisplayMode, ForecastEntry, RequestState, Units, WeatherSnapshot,
};

struct Palette {
    title: &'static str,
    error: &'static str,
    dim: &'static str,
    reset: &'static str,
}

fn palette(mode: DisplayMode) -> Palette {
    match mode {
        DisplayMode::Dark => Palette {
            title: "\x1b[1;97m",
            error: "\x1b[1;91m",
            dim: "\x1b[37m",
            reset: "\x1b[0m",
        },
        DisplayMode::Light => Palette {
            title: "\x1b[1;34m",
            error: "\x1b[1;31m",
            dim: "\x1b[90m",
            reset: "\x1b[0m",
        },
    }
}

pub fn state(state: &RequestState, units: Units, mode: DisplayMode) -> String {
    let p = palette(mode);
    let mut out = String::new();

    match state {
        RequestState::Idle => {
            let _ = writeln!(out, "{}Search for a city to get started.{}", p.dim, p.reset);
        }
        RequestState::Loading => {
            let _ = writeln!(out, "{}Fetching weather data...{}", p.dim, p.reset);
        }
        RequestState::Failed(reason) => {
            let _ = writeln!(out, "{}{}{}", p.error, reason.message(), p.reset);
        }
        RequestState::Success(report) => {
            main_card(&mut out, &p, &report.weather, units);
            out.push('\n');
            forecast_card(&mut out, &p, report.forecast.as_deref(), units);
            out.push('\n');
            highlights_card(&mut out, &p, &report.weather, report.air_quality.as_ref(), units);
        }
    }

    out
}

pub fn history(entries: &[String], mode: DisplayMode) -> String {
    let p = palette(mode);
    if entries.is_empty() {
        return format!("{}No recent searches.{}\n", p.dim, p.reset);
    }

    let mut out = format!("{}Recent{}\n", p.title, p.reset);
    for (i, city) in entries.iter().enumerate() {
        let _ = writeln!(out, "  {}. {city}", i + 1);
    }
    out
}

fn main_card(out: &mut String, p: &Palette, weather: &WeatherSnapshot, units: Units) {
    let place = match &weather.country {
        Some(country) => format!("{}, {}", weather.city, country),
        None => weather.city.clone(),
    };
    let local = weather.observed_at.with_timezone(&weather.offset());

    let _ = writeln!(out, "{}{place}{}", p.title, p.reset);
    let _ = writeln!(
        out,
        "  {}{}  {}",
        weather.temperature.round(),
        units.temperature_suffix(),
        weather.description
    );
    let _ = writeln!(out, "  {}{}{}", p.dim, short_date(local.date_naive()), p.reset);
}

fn forecast_card(out: &mut String, p: &Palette, days: Option<&[ForecastEntry]>, units: Units) {
    let _ = writeln!(out, "{}5 Days Forecast{}", p.title, p.reset);

    let Some(days) = days else {
        let _ = writeln!(out, "  {}Forecast unavailable.{}", p.dim, p.reset);
        return;
    };

    for day in days {
        let _ = writeln!(
            out,
            "  {:>4}{}  {}  {}",
            day.temperature.round(),
            units.temperature_suffix(),
            short_date(day.date),
            day.description
        );
    }
}

fn highlights_card(
    out: &mut String,
    p: &Palette,
    weather: &WeatherSnapshot,
    air: Option<&AirQuality>,
    units: Units,
) {
    let _ = writeln!(out, "{}Today's Highlights{}", p.title, p.reset);

    match air {
        Some(air) => {
            let _ = writeln!(out, "  {:<18}{} ({})", "Air Quality Index", air.aqi, air.aqi.index());
            let c = &air.pollutants;
            let _ = writeln!(
                out,
                "  {}PM2.5 {}  PM10 {}  SO2 {}  NO2 {}  O3 {}  CO {}{}",
                p.dim, c.pm2_5, c.pm10, c.so2, c.no2, c.o3, c.co, p.reset
            );
        }
        None => {
            let _ = writeln!(out, "  {}Air quality unavailable.{}", p.dim, p.reset);
        }
    }

    let _ = writeln!(
        out,
        "  {:<18}{} / {}",
        "Sunrise / Sunset",
        clock(weather.local_sunrise()),
        clock(weather.local_sunset())
    );
    let _ = writeln!(out, "  {:<18}{}%", "Humidity", weather.humidity_pct);
    let _ = writeln!(out, "  {:<18}{} hPa", "Pressure", weather.pressure_hpa);
    if let Some(m) = weather.visibility_m {
        let _ = writeln!(out, "  {:<18}{:.1} km", "Visibility", f64::from(m) / 1000.0);
    }
    let _ = writeln!(out, "  {:<18}{} {}", "Wind Speed", weather.wind_speed, units.speed_suffix());
    let _ = writeln!(
        out,
        "  {:<18}{}{}",
        "Feels Like",
        weather.feels_like,
        units.temperature_suffix()
    );
}

fn short_date(date: NaiveDate) -> String {
    date.format("%a, %d %b").to_string()
}

fn clock<Tz: TimeZone>(t: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    t.format("%H:%M").to_string()
}
