//! Settings file
//!
//! Optional defaults read from `<config_dir>/oraplan/config.toml`. The file is
//! never written by oraplan and never holds a password.

use crate::{ConnectionConfig, OraplanError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "config.toml";

/// Connection defaults offered by the connection form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionDefaults {
    pub host: String,
    pub port: u16,
    pub service_name: String,
    pub user: String,
}

impl Default for ConnectionDefaults {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1521,
            service_name: "ORCL".to_string(),
            user: "system".to_string(),
        }
    }
}

impl ConnectionDefaults {
    /// Build a descriptor from the defaults, without credentials
    pub fn to_config(&self) -> ConnectionConfig {
        let mut config = ConnectionConfig::new(&self.host, self.port, &self.service_name);
        config.username = Some(self.user.clone());
        config
    }

    /// Default value for a connection form field, by field id
    pub fn value_for(&self, field_id: &str) -> Option<String> {
        match field_id {
            "host" => Some(self.host.clone()),
            "port" => Some(self.port.to_string()),
            "service_name" => Some(self.service_name.clone()),
            "user" => Some(self.user.clone()),
            _ => None,
        }
    }
}

/// Logging options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Write JSON logs to a daily rolling file in the data directory
    pub json_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "warn,oraplan_cli=info".to_string(),
            json_file: false,
        }
    }
}

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Report rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Render the plan table when rows were retrieved
    pub show_plan: bool,
    /// Default output format for one-shot commands
    pub format: OutputFormat,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            show_plan: true,
            format: OutputFormat::Text,
        }
    }
}

/// All settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub connection: ConnectionDefaults,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from the default location, falling back to defaults when
    /// the file does not exist
    pub fn load() -> Result<Self> {
        match settings_file() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config directory available, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from a specific file, falling back to defaults when the
    /// file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "settings file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let settings = Self::parse(&contents).map_err(|e| match e {
            OraplanError::Configuration(msg) => {
                OraplanError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| OraplanError::Configuration(e.to_string()))
    }
}

/// oraplan config directory
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("oraplan"))
}

/// oraplan data directory (log files)
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("oraplan"))
}

/// Path of the settings file
pub fn settings_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join(SETTINGS_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.connection.host, "localhost");
        assert_eq!(settings.connection.port, 1521);
        assert_eq!(settings.connection.service_name, "ORCL");
        assert_eq!(settings.connection.user, "system");
        assert!(settings.output.show_plan);
        assert_eq!(settings.output.format, OutputFormat::Text);
        assert!(!settings.logging.json_file);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = Settings::parse(
            r#"
            [connection]
            host = "db.example.com"

            [output]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(settings.connection.host, "db.example.com");
        assert_eq!(settings.connection.port, 1521);
        assert_eq!(settings.output.format, OutputFormat::Json);
        assert!(settings.output.show_plan);
    }

    #[test]
    fn test_malformed_file_is_configuration_error() {
        let err = Settings::parse("[connection\nhost = 1").unwrap_err();
        assert!(matches!(err, OraplanError::Configuration(_)));
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join(SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[connection]\nport = 1522\nservice_name = \"XEPDB1\"").unwrap();

        let settings = Settings::load_from(&path).unwrap();
        assert_eq!(settings.connection.port, 1522);
        assert_eq!(settings.connection.service_name, "XEPDB1");
    }

    #[test]
    fn test_connection_defaults_to_config() {
        let defaults = ConnectionDefaults::default();
        let config = defaults.to_config();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 1521);
        assert_eq!(config.username.as_deref(), Some("system"));
        assert!(config.password.is_none());
        assert_eq!(defaults.value_for("port").as_deref(), Some("1521"));
        assert_eq!(defaults.value_for("password"), None);
    }
}
