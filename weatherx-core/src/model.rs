use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// City looked up when the widget is first mounted.
pub const DEFAULT_CITY: &str = "London";

/// Maximum number of days kept in the forecast panel.
pub const FORECAST_DAYS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub temperature_c: f64,
    pub description: String,
    /// Provider icon identifier, e.g. `"04d"`.
    pub icon: Option<String>,
    pub wind_speed: f64,
    pub humidity_pct: u8,
}

/// One raw point of the provider's 3-hour forecast series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Local date and time as sent by the provider, `"2024-05-01 12:00:00"`.
    pub dt_txt: String,
    pub temperature_c: f64,
}

/// One day of the forecast panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
}

/// Everything the rendering layer reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherState {
    pub query: String,
    pub current: Option<CurrentWeather>,
    pub forecast: Vec<ForecastEntry>,
    pub error: Option<String>,
    /// Transient cue that the last lookup was rejected.
    pub shake: bool,
}

impl WeatherState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}
