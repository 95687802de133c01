//! CLI configuration

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server used when neither flags, environment nor config name one
pub const DEFAULT_SERVER: &str = "http://localhost/zabbix";

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Zabbix frontend URL
    pub server: Option<String>,

    /// Zabbix API user
    pub username: Option<String>,

    /// Zabbix API password
    pub password: Option<String>,

    /// Request timeout in seconds
    pub timeout_seconds: Option<u64>,

    /// Report defaults
    #[serde(default)]
    pub report: ReportDefaults,
}

/// Defaults for the `report` command
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportDefaults {
    /// Root services to report
    #[serde(default)]
    pub services: Vec<String>,

    /// Depth ceiling
    pub depth: Option<i32>,

    /// Keep only parent services
    #[serde(default)]
    pub parents_only: bool,

    /// Show the configured service times column
    #[serde(default)]
    pub service_times: bool,

    /// Resolve sibling services concurrently
    #[serde(default)]
    pub concurrent: bool,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("svcreport").join("config.toml"))
    }

    /// Layer command-line and environment values over the file values
    pub fn with_overrides(
        mut self,
        server: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        if server.is_some() {
            self.server = server;
        }
        if username.is_some() {
            self.username = username;
        }
        if password.is_some() {
            self.password = password;
        }
        self
    }

    /// Copy with the password replaced, for display
    pub fn masked(&self) -> Self {
        let mut config = self.clone();
        if config.password.is_some() {
            config.password = Some("********".into());
        }
        config
    }
}
