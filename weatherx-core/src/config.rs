use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::DEFAULT_CITY;

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "WEATHERX_API_KEY";

pub const DEFAULT_API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_city = "Lisbon"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// OpenWeather API key.
    pub api_key: Option<String>,

    /// City shown when the widget starts.
    pub default_city: Option<String>,

    pub api_base_url: Option<String>,
    pub icon_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl Config {
    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let cfg = Self::load_from(&path)?;
        Ok(cfg.with_env_overrides(|name| std::env::var(name).ok()))
    }

    /// Load config from `path`, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherx", "weatherx")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// A non-empty value from `lookup(API_KEY_ENV)` replaces the stored key.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weatherx configure` or set {API_KEY_ENV}."
                )
            })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Blank input clears the stored city.
    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        self.default_city = (!city.is_empty()).then(|| city.to_string());
    }

    pub fn default_city(&self) -> &str {
        self.default_city.as_deref().unwrap_or(DEFAULT_CITY)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn icon_base_url(&self) -> &str {
        self.icon_base_url
            .as_deref()
            .unwrap_or(DEFAULT_ICON_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No OpenWeather API key configured"));
        assert!(msg.contains("weatherx configure"));
        assert!(msg.contains(API_KEY_ENV));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.require_api_key().is_err());
    }

    #[test]
    fn env_key_overrides_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_overrides(|name| {
            assert_eq!(name, API_KEY_ENV);
            Some("ENV_KEY".into())
        });

        assert_eq!(cfg.require_api_key().unwrap(), "ENV_KEY");
    }

    #[test]
    fn empty_env_key_keeps_file_key() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());

        let cfg = cfg.with_env_overrides(|_| Some(String::new()));
        assert_eq!(cfg.require_api_key().unwrap(), "FILE_KEY");
    }

    #[test]
    fn defaults_point_at_openweather() {
        let cfg = Config::default();

        assert_eq!(cfg.default_city(), "London");
        assert_eq!(cfg.api_base_url(), DEFAULT_API_BASE_URL);
        assert_eq!(cfg.icon_base_url(), DEFAULT_ICON_BASE_URL);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn base_urls_drop_trailing_slash() {
        let cfg = Config {
            api_base_url: Some("http://localhost:9000/".into()),
            ..Config::default()
        };
        assert_eq!(cfg.api_base_url(), "http://localhost:9000");
    }

    #[test]
    fn blank_default_city_falls_back_to_london() {
        let mut cfg = Config::default();
        cfg.set_default_city("Oslo ");
        assert_eq!(cfg.default_city(), "Oslo");

        cfg.set_default_city("  ");
        assert_eq!(cfg.default_city(), "London");
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.set_default_city("Lisbon");
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
