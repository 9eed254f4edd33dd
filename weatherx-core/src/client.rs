//! The widget's state machine.
//!
//! Each [`WeatherClient::refresh`] takes a fresh generation number. Responses
//! and delayed resets only touch the shared state while their generation is
//! still the newest one, so a slow response or a late timer from an older
//! lookup can never clobber what a newer lookup produced.

use parking_lot::Mutex;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use crate::{
    error::WeatherError,
    forecast,
    model::{CurrentWeather, ForecastEntry, WeatherState},
    provider::WeatherProvider,
};

/// Delays of the two self-clearing cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetTimings {
    /// Shake-only reset after the provider rejects the city.
    pub shake: Duration,
    /// Combined shake and error banner reset on any failed lookup.
    pub error: Duration,
}

impl Default for ResetTimings {
    fn default() -> Self {
        Self {
            shake: Duration::from_millis(500),
            error: Duration::from_millis(3000),
        }
    }
}

#[derive(Debug)]
struct Shared {
    state: Mutex<WeatherState>,
    generation: AtomicU64,
}

impl Shared {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Run `f` against the state if `generation` is still the newest.
    fn apply(&self, generation: u64, f: impl FnOnce(&mut WeatherState)) -> bool {
        let mut state = self.state.lock();
        if !self.is_current(generation) {
            tracing::debug!(generation, "dropping stale update");
            return false;
        }
        f(&mut state);
        true
    }
}

#[derive(Debug, Clone)]
pub struct WeatherClient {
    provider: Arc<dyn WeatherProvider>,
    shared: Arc<Shared>,
    timings: ResetTimings,
}

impl WeatherClient {
    pub fn new(provider: Arc<dyn WeatherProvider>, initial_query: impl Into<String>) -> Self {
        Self {
            provider,
            shared: Arc::new(Shared {
                state: Mutex::new(WeatherState::new(initial_query)),
                generation: AtomicU64::new(0),
            }),
            timings: ResetTimings::default(),
        }
    }

    pub fn with_timings(mut self, timings: ResetTimings) -> Self {
        self.timings = timings;
        self
    }

    pub fn snapshot(&self) -> WeatherState {
        self.shared.state.lock().clone()
    }

    pub fn query(&self) -> String {
        self.shared.state.lock().query.clone()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        self.shared.state.lock().query = query.into();
    }

    /// First lookup when the widget is shown.
    pub async fn mount(&self) {
        self.search().await;
    }

    /// Look up whatever is currently typed into the query.
    pub async fn search(&self) {
        let query = self.query();
        self.refresh(&query).await;
    }

    /// Fetch current weather, then the forecast, for `query`.
    ///
    /// Must be called from within a Tokio runtime; the self-clearing cues
    /// are spawned as tasks.
    pub async fn refresh(&self, query: &str) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        self.shared.apply(generation, |state| {
            state.error = None;
            state.shake = false;
        });

        if query.trim().is_empty() {
            self.shared.apply(generation, |state| {
                state.error = Some(WeatherError::EmptyQuery.to_string());
            });
            return;
        }

        if let Err(err) = self.fetch(generation, query).await {
            tracing::warn!(query, error = %err, "weather lookup failed");
            self.fail(generation, &err);
        }
    }

    async fn fetch(&self, generation: u64, query: &str) -> Result<(), WeatherError> {
        let current = match self.provider.current_weather(query).await {
            Ok(current) => current,
            Err(err) => {
                if err.is_city_not_found() {
                    self.shake_briefly(generation);
                }
                return Err(err);
            }
        };

        if !self.apply_current(generation, current) {
            return Ok(());
        }

        // Only reached once the current-weather lookup succeeded.
        let samples = self.provider.forecast(query).await?;
        let days = forecast::daily_noon(&samples)?;
        self.apply_forecast(generation, days);

        Ok(())
    }

    fn apply_current(&self, generation: u64, current: CurrentWeather) -> bool {
        let city = current.name.clone();
        let applied = self
            .shared
            .apply(generation, move |state| state.current = Some(current));
        if applied {
            tracing::info!(%city, "current weather updated");
        }
        applied
    }

    fn apply_forecast(&self, generation: u64, days: Vec<ForecastEntry>) {
        let count = days.len();
        if self.shared.apply(generation, move |state| state.forecast = days) {
            tracing::info!(days = count, "forecast updated");
        }
    }

    fn shake_briefly(&self, generation: u64) {
        self.shared.apply(generation, |state| state.shake = true);
        self.schedule(generation, self.timings.shake, |state| state.shake = false);
    }

    fn fail(&self, generation: u64, err: &WeatherError) {
        let message = err.to_string();
        self.shared.apply(generation, move |state| {
            state.error = Some(message);
            state.shake = true;
        });
        self.schedule(generation, self.timings.error, |state| {
            state.shake = false;
            state.error = None;
        });
    }

    fn schedule<F>(&self, generation: u64, delay: Duration, reset: F)
    where
        F: FnOnce(&mut WeatherState) + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.apply(generation, reset);
        });
    }
}
