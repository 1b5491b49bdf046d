use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use owm_core::{ApiRequest, Config, RequestExecutor};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "OpenWeatherMap CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "London" or "London,GB".
        city: String,

        /// Measurement units for temperature and wind speed.
        #[arg(long, value_enum, default_value_t = Units::Metric)]
        units: Units,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Units {
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    fn temp_symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => show(&city, units).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key from prompt")?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(city: &str, units: Units) -> anyhow::Result<()> {
    let config = Config::load()?;
    let executor = RequestExecutor::from_config(&config)?;

    let request = ApiRequest::get("/data/2.5/weather")
        .query("q", city)
        .query("units", units.as_str());

    let response = executor.execute(&request).await?;
    println!("{}", format_weather(&response.body, units));
    Ok(())
}

/// Render the raw weather payload as a short human-readable summary.
fn format_weather(body: &Value, units: Units) -> String {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("Unknown location");

    let mut lines = vec![name.to_string()];

    if let Some(temp) = body.pointer("/main/temp").and_then(Value::as_f64) {
        lines.push(format!("  temperature: {:.1}{}", temp, units.temp_symbol()));
    }
    if let Some(condition) = body.pointer("/weather/0/description").and_then(Value::as_str) {
        lines.push(format!("  condition:   {condition}"));
    }
    if let Some(humidity) = body.pointer("/main/humidity").and_then(Value::as_u64) {
        lines.push(format!("  humidity:    {humidity}%"));
    }
    if let Some(ts) = body.get("dt").and_then(Value::as_i64)
        && let Some(observed) = DateTime::<Utc>::from_timestamp(ts, 0)
    {
        lines.push(format!("  observed:    {}", observed.format("%Y-%m-%d %H:%M UTC")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formats_full_payload() {
        let body = json!({
            "name": "London",
            "dt": 1_700_000_000,
            "main": { "temp": 15.3, "humidity": 72 },
            "weather": [ { "description": "light rain" } ],
        });

        let out = format_weather(&body, Units::Metric);

        assert!(out.starts_with("London"));
        assert!(out.contains("15.3°C"));
        assert!(out.contains("light rain"));
        assert!(out.contains("72%"));
        assert!(out.contains("2023-11-14"));
    }

    #[test]
    fn tolerates_missing_fields() {
        let out = format_weather(&json!({}), Units::Standard);
        assert_eq!(out, "Unknown location");
    }

    #[test]
    fn units_map_to_api_values() {
        assert_eq!(Units::Metric.as_str(), "metric");
        assert_eq!(Units::Imperial.as_str(), "imperial");
        assert_eq!(Units::Standard.as_str(), "standard");
    }
}
