//! Plain-text rendering of a [`WeatherState`].

use std::fmt::Write;

use crate::model::{ForecastEntry, WeatherState};

pub const LOGO: &str = "WeatherX";
pub const SEARCH_PLACEHOLDER: &str = "Search city...";

/// Rounds half-way values up, like the browser widget's `Math.round`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temperature(value: f64) -> String {
    format!("{}°C", round_half_up(value))
}

pub fn icon_url(icon_base: &str, icon: &str) -> String {
    format!("{}/{icon}@4x.png", icon_base.trim_end_matches('/'))
}

/// Full English weekday name, e.g. `"Wednesday"`.
pub fn weekday_name(entry: &ForecastEntry) -> String {
    entry.timestamp.format("%A").to_string()
}

#[derive(Debug, Clone)]
pub struct WeatherView<'a> {
    state: &'a WeatherState,
    icon_base: &'a str,
}

impl<'a> WeatherView<'a> {
    pub fn new(state: &'a WeatherState, icon_base: &'a str) -> Self {
        Self { state, icon_base }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) -> std::fmt::Result {
        let state = self.state;
        // Nudge the panels sideways while the shake cue is active.
        let pad = if state.shake { "    " } else { "" };

        writeln!(out, "{LOGO}")?;
        if let Some(error) = &state.error {
            writeln!(out, "[ {error} ]")?;
        }

        if let Some(current) = &state.current {
            writeln!(out)?;
            writeln!(out, "{pad}{}", current.name)?;
            writeln!(out, "{pad}{}", format_temperature(current.temperature_c))?;
            writeln!(out, "{pad}{}", current.description)?;
            writeln!(out, "{pad}💨 Wind: {} m/s", current.wind_speed)?;
            writeln!(out, "{pad}💧 Humidity: {}%", current.humidity_pct)?;
            if let Some(icon) = &current.icon {
                writeln!(out, "{pad}Icon: {}", icon_url(self.icon_base, icon))?;
            }
        }

        if !state.forecast.is_empty() {
            writeln!(out)?;
            writeln!(out, "{pad}Forecast")?;
            for entry in &state.forecast {
                writeln!(
                    out,
                    "{pad}  {:<10} {}",
                    weekday_name(entry),
                    format_temperature(entry.temperature_c)
                )?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurrentWeather;
    use chrono::NaiveDate;

    const ICONS: &str = "https://openweathermap.org/img/wn";

    fn entry(day: u32, temp: f64) -> ForecastEntry {
        ForecastEntry {
            timestamp: NaiveDate::from_ymd_opt(2024, 5, day)
                .and_then(|d| d.and_hms_opt(12, 0, 0))
                .unwrap(),
            temperature_c: temp,
        }
    }

    fn london() -> CurrentWeather {
        CurrentWeather {
            name: "London".into(),
            temperature_c: 15.6,
            description: "broken clouds".into(),
            icon: Some("04d".into()),
            wind_speed: 4.12,
            humidity_pct: 72,
        }
    }

    #[test]
    fn temperatures_round_like_math_round() {
        assert_eq!(format_temperature(15.6), "16°C");
        assert_eq!(format_temperature(15.4), "15°C");
        assert_eq!(format_temperature(2.5), "3°C");
        assert_eq!(format_temperature(-2.5), "-2°C");
        assert_eq!(format_temperature(-0.4), "0°C");
    }

    #[test]
    fn icon_url_uses_large_variant() {
        assert_eq!(
            icon_url(ICONS, "04d"),
            "https://openweathermap.org/img/wn/04d@4x.png"
        );
        assert_eq!(icon_url("http://x/", "01n"), "http://x/01n@4x.png");
    }

    #[test]
    fn weekday_comes_from_timestamp() {
        // 2024-05-01 was a Wednesday.
        assert_eq!(weekday_name(&entry(1, 0.0)), "Wednesday");
        assert_eq!(weekday_name(&entry(5, 0.0)), "Sunday");
    }

    #[test]
    fn renders_panels_and_banner() {
        let state = WeatherState {
            query: "London".into(),
            current: Some(london()),
            forecast: vec![entry(1, 14.5), entry(2, 11.2)],
            error: Some("⚠️ City not found. Please enter a valid city.".into()),
            shake: false,
        };

        let text = WeatherView::new(&state, ICONS).render();

        assert!(text.starts_with("WeatherX\n"));
        assert!(text.contains("[ ⚠️ City not found. Please enter a valid city. ]"));
        assert!(text.contains("London\n16°C\nbroken clouds\n"));
        assert!(text.contains("Wind: 4.12 m/s"));
        assert!(text.contains("Humidity: 72%"));
        assert!(text.contains("04d@4x.png"));
        assert!(text.contains("Wednesday"));
        assert!(text.contains("15°C"));
        assert!(text.contains("Thursday"));
        assert!(text.contains("11°C"));
    }

    #[test]
    fn empty_state_renders_only_logo() {
        let state = WeatherState::new("London");
        assert_eq!(WeatherView::new(&state, ICONS).render(), "WeatherX\n");
    }

    #[test]
    fn shake_offsets_panels() {
        let state = WeatherState {
            current: Some(london()),
            shake: true,
            ..WeatherState::new("London")
        };

        let text = WeatherView::new(&state, ICONS).render();
        assert!(text.contains("\n    London\n"));
    }
}
