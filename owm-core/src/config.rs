use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Default API host, encrypted transport only.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// OpenWeatherMap API key, injected into every request as `appid`.
    pub api_key: Option<String>,

    /// Override for the API base URL; `DEFAULT_BASE_URL` when absent.
    pub base_url: Option<String>,
}

impl Config {
    /// Return the configured API key, with a hint when it is missing.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No API key configured.\n\
                 Hint: run `owm configure` and enter your OpenWeatherMap API key."
            )
        })
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Base URL to use, falling back to the default host.
    pub fn resolved_base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "owm", "owm-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `owm configure`"));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn set_api_key_makes_config_usable() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert_eq!(cfg.api_key().expect("key must exist"), "KEY");
        assert!(cfg.is_configured());
    }

    #[test]
    fn base_url_defaults_to_encrypted_host() {
        let cfg = Config::default();
        assert_eq!(cfg.resolved_base_url(), "https://api.openweathermap.org");
    }

    #[test]
    fn base_url_override_is_respected() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: Some("http://127.0.0.1:8080".into()),
        };
        assert_eq!(cfg.resolved_base_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            base_url: None,
        };

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");

        assert_eq!(parsed.api_key.as_deref(), Some("KEY"));
        assert!(parsed.base_url.is_none());
    }
}
