//! Reduces the provider's 3-hour forecast series to one point per day.

use chrono::NaiveDateTime;

use crate::{
    error::WeatherError,
    model::{FORECAST_DAYS, ForecastEntry, ForecastSample},
};

const NOON: &str = "12:00:00";
const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Keep the samples taken at local noon, first [`FORECAST_DAYS`] of them,
/// in the order the provider sent them.
///
/// Fails if any kept sample has an unparseable timestamp; the caller then
/// keeps its previous forecast untouched.
pub fn daily_noon(samples: &[ForecastSample]) -> Result<Vec<ForecastEntry>, WeatherError> {
    samples
        .iter()
        .filter(|s| s.dt_txt.contains(NOON))
        .take(FORECAST_DAYS)
        .map(|s| -> Result<ForecastEntry, WeatherError> {
            let timestamp = NaiveDateTime::parse_from_str(&s.dt_txt, DT_TXT_FORMAT).map_err(
                |source| WeatherError::InvalidTimestamp {
                    value: s.dt_txt.clone(),
                    source,
                },
            )?;

            Ok(ForecastEntry {
                timestamp,
                temperature_c: s.temperature_c,
            })
        })
        .collect()
}
