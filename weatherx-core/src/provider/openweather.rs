use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    config::Config,
    error::WeatherError,
    model::{CurrentWeather, ForecastSample},
};

use super::WeatherProvider;

const SUCCESS_CODE: i64 = 200;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();

        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::new(api_key, config.api_base_url(), http))
    }

    /// GET `{base_url}/{endpoint}` and decode the body regardless of HTTP
    /// status; OpenWeather reports lookup failures in the body's `cod`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &str,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());
        tracing::debug!(%url, query, "requesting OpenWeather {}", endpoint.path());

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", query),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        let parse_err = |source| WeatherError::Parse {
            endpoint: endpoint.path(),
            status,
            body: truncate_body(&body),
            source,
        };

        let envelope: StatusEnvelope = serde_json::from_str(&body).map_err(parse_err)?;
        if !envelope.accepted_by(endpoint) {
            return Err(envelope.into_error(endpoint));
        }

        serde_json::from_str(&body).map_err(parse_err)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, query: &str) -> Result<CurrentWeather, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json(Endpoint::Current, query).await?;
        Ok(parsed.into())
    }

    async fn forecast(&self, query: &str) -> Result<Vec<ForecastSample>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json(Endpoint::Forecast, query).await?;

        Ok(parsed
            .list
            .into_iter()
            .map(|e| ForecastSample {
                dt_txt: e.dt_txt,
                temperature_c: e.main.temp,
            })
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Current,
    Forecast,
}

impl Endpoint {
    fn path(self) -> &'static str {
        match self {
            Endpoint::Current => "weather",
            Endpoint::Forecast => "forecast",
        }
    }
}

/// `cod` arrives as `200` from `/weather` and `"200"` from `/forecast`, and
/// as `"404"` on unknown cities.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
enum StatusCode {
    Number(i64),
    Text(String),
}

impl StatusCode {
    fn as_number(&self) -> Option<i64> {
        match self {
            StatusCode::Number(n) => Some(*n),
            StatusCode::Text(s) => s.trim().parse().ok(),
        }
    }

    fn is_success(&self) -> bool {
        self.as_number() == Some(SUCCESS_CODE)
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusCode::Number(n) => write!(f, "{n}"),
            StatusCode::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    cod: Option<StatusCode>,
    /// A string on errors, a number on successful forecasts.
    #[serde(default)]
    message: Option<serde_json::Value>,
}

impl StatusEnvelope {
    fn is_success(&self) -> bool {
        self.cod.as_ref().is_some_and(StatusCode::is_success)
    }

    fn message_text(&self) -> Option<String> {
        match &self.message {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        }
    }

    /// `/weather` must carry a success `cod`; `/forecast` is only rejected
    /// when it carries a failing one.
    fn accepted_by(&self, endpoint: Endpoint) -> bool {
        match (endpoint, &self.cod) {
            (Endpoint::Current, None) => false,
            (Endpoint::Forecast, None) => true,
            (_, Some(_)) => self.is_success(),
        }
    }

    fn into_error(self, endpoint: Endpoint) -> WeatherError {
        let code = self.cod.as_ref().map(ToString::to_string);
        let message = self.message_text();

        match endpoint {
            Endpoint::Current => WeatherError::CityNotFound { code, message },
            Endpoint::Forecast => WeatherError::Api {
                endpoint: endpoint.path(),
                code: code.unwrap_or_else(|| "unknown".to_string()),
                message: message.unwrap_or_else(|| "no message".to_string()),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
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
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl From<OwCurrentResponse> for CurrentWeather {
    fn from(parsed: OwCurrentResponse) -> Self {
        let (description, icon) = match parsed.weather.into_iter().next() {
            Some(w) => (w.description, Some(w.icon)),
            None => ("Unknown".to_string(), None),
        };

        CurrentWeather {
            name: parsed.name,
            temperature_c: parsed.main.temp,
            description,
            icon,
            wind_speed: parsed.wind.speed,
            humidity_pct: parsed.main.humidity,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
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
