use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Text};
use weatherx_core::{
    Config, OpenWeatherProvider, WeatherClient, WeatherProvider, WeatherView, view,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherx", version, about = "Current weather and a 5-day forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default city.
    Configure,

    /// Show weather for a city once and exit.
    Show {
        /// City name; the configured default when absent.
        city: Option<String>,
    },

    /// Keep prompting for cities until cancelled (default).
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure().await,
            Some(Command::Show { city }) => show(city).await,
            Some(Command::Search) | None => search().await,
        }
    }
}

fn widget(config: &Config, initial_query: &str) -> anyhow::Result<WeatherClient> {
    let provider: Arc<dyn WeatherProvider> = Arc::new(OpenWeatherProvider::from_config(config)?);
    Ok(WeatherClient::new(provider, initial_query))
}

fn render(client: &WeatherClient, config: &Config) {
    let state = client.snapshot();
    println!("{}", WeatherView::new(&state, config.icon_base_url()).render());
}

async fn show(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let query = city.unwrap_or_else(|| config.default_city().to_string());

    let client = widget(&config, &query)?;
    client.mount().await;
    render(&client, &config);

    Ok(())
}

async fn search() -> anyhow::Result<()> {
    let config = Config::load()?;
    let client = widget(&config, config.default_city())?;

    client.mount().await;
    render(&client, &config);

    loop {
        let initial = client.query();
        // The prompt blocks; reset timers keep running on the runtime meanwhile.
        let answer = tokio::task::spawn_blocking(move || {
            Text::new("City:")
                .with_placeholder(view::SEARCH_PLACEHOLDER)
                .with_initial_value(&initial)
                .prompt()
        })
        .await
        .context("Search prompt task failed")?;

        let query = match answer {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        client.set_query(query);
        client.search().await;
        render(&client, &config);
    }

    Ok(())
}

async fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let (api_key, city) = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let api_key = Password::new("OpenWeather API key:")
            .without_confirmation()
            .prompt()
            .context("Failed to read API key")?;
        let city = Text::new("Default city (blank for London):")
            .prompt()
            .context("Failed to read default city")?;
        Ok((api_key, city))
    })
    .await
    .context("Configuration prompt task failed")??;

    config.set_api_key(api_key.trim().to_string());
    config.set_default_city(&city);
    config.save_to(&path)?;

    tracing::info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());
    Ok(())
}
