//! Reduction of the provider's 3-hourly forecast series into one reading per day.

use chrono::NaiveTime;

use crate::model::{ForecastEntry, TimePoint};

/// Number of days shown in the forecast card.
pub const FORECAST_DAYS: usize = 5;

fn midday() -> NaiveTime {
    NaiveTime::MIN + chrono::Duration::hours(12)
}

/// Keep the midday points of `series`, oldest first, up to [`FORECAST_DAYS`].
///
/// Days without a 12:00:00 point are skipped; the result is never padded.
pub fn reduce(series: &[TimePoint]) -> Vec<ForecastEntry> {
    let noon = midday();

    let mut middays: Vec<&TimePoint> = series.iter().filter(|p| p.time.time() == noon).collect();
    middays.sort_by_key(|p| p.time);

    middays
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|p| ForecastEntry {
            date: p.time.date(),
            time: p.time,
            temperature: p.temperature,
            description: p.description.clone(),
            icon: p.icon.clone(),
        })
        .collect()
}
