use thiserror::Error;

/// Everything that can go wrong while refreshing the widget.
///
/// The `Display` text is what ends up in the error banner, so the variants
/// the user is expected to act on carry their final wording.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("⚠️ Please enter a city name")]
    EmptyQuery,

    /// The current-weather endpoint answered with a non-success `cod`.
    #[error("⚠️ City not found. Please enter a valid city.")]
    CityNotFound {
        code: Option<String>,
        message: Option<String>,
    },

    /// The forecast endpoint answered with a non-success `cod`.
    #[error("OpenWeather {endpoint} request failed with code {code}: {message}")]
    Api {
        endpoint: &'static str,
        code: String,
        message: String,
    },

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeather {endpoint} response (status {status}): {source}; body: {body}")]
    Parse {
        endpoint: &'static str,
        status: u16,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid forecast timestamp '{value}': {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl WeatherError {
    pub fn is_city_not_found(&self) -> bool {
        matches!(self, WeatherError::CityNotFound { .. })
    }
}
