//! Core library for the WeatherX widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind a small provider trait
//! - The widget state machine and its text rendering
//!
//! It is used by `weatherx-cli`, but can also be embedded in other front-ends.

pub mod client;
pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod view;

pub use client::{ResetTimings, WeatherClient};
pub use config::Config;
pub use error::WeatherError;
pub use model::{CurrentWeather, DEFAULT_CITY, ForecastEntry, ForecastSample, WeatherState};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use view::WeatherView;
