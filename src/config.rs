//! Configuration module for the station poller
//!
//! Reads/writes configuration from ~/.config/station-wind/config.toml

use crate::poller::PollSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Coast Dairies station
pub const DEFAULT_STATION: &str = "XCDC1";
/// Every 2 minutes
pub const DEFAULT_REFRESH_MS: u64 = 2 * 60 * 1000;
pub const DEFAULT_API_BASE: &str = "https://api.weather.gov";

/// Poller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// NWS station identifier
    pub station: String,
    /// Milliseconds between cycles
    pub refresh_ms: u64,
    /// Base URL of the weather API
    pub api_base: String,
    /// Sent as `User-Agent`; the API asks for a contact address
    pub user_agent: String,
    /// Where to write the HTML page, if anywhere
    pub html_output: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            station: DEFAULT_STATION.to_string(),
            refresh_ms: DEFAULT_REFRESH_MS,
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: default_user_agent(),
            html_output: None,
        }
    }
}

fn default_user_agent() -> String {
    format!(
        "{}/{} (you@example.com)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )
}

impl Config {
    /// Get the config file path
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("station-wind").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::error!("Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Parse TOML contents; missing keys take their defaults
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save config to file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_ms.max(1))
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            station: self.station.clone(),
            api_base: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            interval: self.refresh_interval(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.station, "XCDC1");
        assert_eq!(config.refresh_ms, 120_000);
        assert_eq!(config.api_base, "https://api.weather.gov");
        assert!(config.html_output.is_none());
        assert!(config.user_agent.starts_with("station-wind/"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("station = \"KBOS\"\n").unwrap();
        assert_eq!(config.station, "KBOS");
        assert_eq!(config.refresh_ms, DEFAULT_REFRESH_MS);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(Config::parse("refresh_ms = \"soon\"").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config {
            html_output: Some(PathBuf::from("/tmp/wind.html")),
            refresh_ms: 30_000,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }

    #[test]
    fn test_poll_settings() {
        let settings = Config::default().poll_settings();
        assert_eq!(settings.interval, Duration::from_secs(120));
        assert_eq!(settings.station, DEFAULT_STATION);

        let zero = Config {
            refresh_ms: 0,
            ..Config::default()
        };
        assert_eq!(zero.refresh_interval(), Duration::from_millis(1));
    }
}
