use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{CurrentWeather, ForecastSample},
};

pub mod openweather;

/// The two lookups the widget performs for a city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, query: &str) -> Result<CurrentWeather, WeatherError>;

    /// Raw 3-hour series, oldest first.
    async fn forecast(&self, query: &str) -> Result<Vec<ForecastSample>, WeatherError>;
}
