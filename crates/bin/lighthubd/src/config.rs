//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lighthub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;

use serde::Deserialize;

/// Longest pairing window a coordinator accepts.
const MAX_OPEN_NETWORK_SECONDS: u32 = 254;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Runtime data persistence.
    pub storage: StorageConfig,
    /// Device network settings.
    pub network: NetworkConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Integration toggles.
    pub integrations: IntegrationsConfig,
}

/// Where routes, schedules and option values are kept.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON data file.
    pub data_path: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// How long the network stays open for pairing when requested.
    pub open_network_seconds: u32,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Per-integration toggles.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Enable the virtual/demo device bus.
    pub virtual_enabled: bool,
}

impl Config {
    /// Load configuration from `lighthub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if a
    /// value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lighthub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LIGHTHUB_DATA_PATH") {
            self.storage.data_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("LIGHTHUB_OPEN_NETWORK_SECONDS") {
            if let Ok(seconds) = val.parse() {
                self.network.open_network_seconds = seconds;
            }
        }
        if let Ok(val) = std::env::var("LIGHTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_OPEN_NETWORK_SECONDS).contains(&self.network.open_network_seconds) {
            return Err(ConfigError::Validation(format!(
                "open_network_seconds must be between 1 and {MAX_OPEN_NETWORK_SECONDS}"
            )));
        }
        if self.storage.data_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("data_path must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("lighthub-data.json"),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            open_network_seconds: MAX_OPEN_NETWORK_SECONDS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lighthubd=info,lighthub=info".to_string(),
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.data_path, PathBuf::from("lighthub-data.json"));
        assert_eq!(config.network.open_network_seconds, 254);
        assert!(config.integrations.virtual_enabled);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.network.open_network_seconds, 254);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [storage]
            data_path = '/var/lib/lighthub/data.json'

            [network]
            open_network_seconds = 60

            [logging]
            filter = 'debug'

            [integrations]
            virtual_enabled = false
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.storage.data_path,
            PathBuf::from("/var/lib/lighthub/data.json")
        );
        assert_eq!(config.network.open_network_seconds, 60);
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.integrations.virtual_enabled);
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [network]
            open_network_seconds = 120
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.network.open_network_seconds, 120);
        assert_eq!(config.storage.data_path, PathBuf::from("lighthub-data.json"));
        assert!(config.integrations.virtual_enabled);
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.network.open_network_seconds, 254);
    }

    #[test]
    fn should_reject_zero_open_network_seconds() {
        let mut config = Config::default();
        config.network.open_network_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_reject_open_network_seconds_above_limit() {
        let mut config = Config::default();
        config.network.open_network_seconds = 255;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_data_path() {
        let mut config = Config::default();
        config.storage.data_path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
