use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::LevelFilter;
use notifier_core::{ProxyMode, StatusStrings};
use notifier_engine::{NotifierSettings, ProxySettings, WorkerId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;
use super::persist::{AtomicFileWriter, PersistError};

const CONFIG_ENV: &str = "NOTIFIER_CONFIG";
const DEFAULT_CONFIG_FILENAME: &str = "notifier.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config: {0}")]
    Parse(String),
    #[error("could not serialize config: {0}")]
    Serialize(String),
    #[error("could not write config: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProxyModeConfig {
    #[default]
    Direct,
    Proxy,
    Pac,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemProxyConfig {
    pub mode: ProxyModeConfig,
    pub address: Option<String>,
}

/// Overrides for the localized tooltip fragments; unset entries keep the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StringsConfig {
    pub idle_description: Option<String>,
    pub servers_running: Option<String>,
    pub current_system_proxy: Option<String>,
    pub no_response: Option<String>,
}

/// One simulated proxy server connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub id: WorkerId,
    pub text: String,
    /// How long the worker takes to produce its notification text.
    pub delay_ms: u64,
    pub running: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub quiet_interval_ms: u64,
    pub fetch_timeout_ms: u64,
    pub icon_size: u32,
    pub log_destination: LogDestination,
    pub log_level: String,
    pub output_dir: PathBuf,
    /// How long the headless shell runs before shutting down.
    pub run_for_secs: u64,
    /// Period of the simulated worker state churn.
    pub churn_interval_ms: u64,
    pub system_proxy: SystemProxyConfig,
    pub strings: StringsConfig,
    pub workers: Vec<WorkerConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            quiet_interval_ms: 1000,
            fetch_timeout_ms: 5000,
            icon_size: 32,
            log_destination: LogDestination::Terminal,
            log_level: "info".to_string(),
            output_dir: PathBuf::from("output"),
            run_for_secs: 30,
            churn_interval_ms: 2500,
            system_proxy: SystemProxyConfig::default(),
            strings: StringsConfig::default(),
            workers: vec![
                WorkerConfig {
                    id: 1,
                    text: "[tokyo] socks 127.0.0.1:1080".to_string(),
                    delay_ms: 40,
                    running: true,
                },
                WorkerConfig {
                    id: 2,
                    text: "[frankfurt] http 127.0.0.1:8118".to_string(),
                    delay_ms: 120,
                    running: false,
                },
                WorkerConfig {
                    id: 3,
                    text: "[oregon] socks 127.0.0.1:1081".to_string(),
                    delay_ms: 80,
                    running: false,
                },
            ],
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> LevelFilter {
        notifier_logging::parse_level(&self.log_level).unwrap_or(LevelFilter::Info)
    }

    pub fn status_strings(&self) -> StatusStrings {
        let defaults = StatusStrings::default();
        let overrides = self.strings.clone();
        StatusStrings {
            idle_description: overrides
                .idle_description
                .unwrap_or(defaults.idle_description),
            servers_running: overrides
                .servers_running
                .unwrap_or(defaults.servers_running),
            current_system_proxy: overrides
                .current_system_proxy
                .unwrap_or(defaults.current_system_proxy),
            no_response: overrides.no_response.unwrap_or(defaults.no_response),
        }
    }

    pub fn notifier_settings(&self) -> NotifierSettings {
        NotifierSettings {
            quiet_interval: Duration::from_millis(self.quiet_interval_ms),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            strings: self.status_strings(),
        }
    }

    pub fn proxy_settings(&self) -> ProxySettings {
        ProxySettings {
            mode: match self.system_proxy.mode {
                ProxyModeConfig::Direct => ProxyMode::Direct,
                ProxyModeConfig::Proxy => ProxyMode::Proxy,
                ProxyModeConfig::Pac => ProxyMode::Pac,
            },
            address: self.system_proxy.address.clone(),
        }
    }
}

/// How the configuration was obtained; reported once logging is up.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded,
    Created,
    CreateFailed(ConfigError),
    Invalid(ConfigError),
}

/// `$NOTIFIER_CONFIG`, or `./notifier.ron`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME))
}

/// Returns `Ok(None)` if no file exists at `path`.
pub fn load_config(path: &Path) -> Result<Option<AppConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty)
        .map_err(|err| ConfigError::Serialize(err.to_string()))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_CONFIG_FILENAME);
    AtomicFileWriter::new(dir).write(filename, content.as_bytes())?;
    Ok(())
}

/// Loads the configuration, writing the defaults on first run. Never fails.
pub fn load_or_create(path: &Path) -> (AppConfig, LoadOutcome) {
    match load_config(path) {
        Ok(Some(config)) => (config, LoadOutcome::Loaded),
        Ok(None) => {
            let config = AppConfig::default();
            match save_config(path, &config) {
                Ok(()) => (config, LoadOutcome::Created),
                Err(err) => (config, LoadOutcome::CreateFailed(err)),
            }
        }
        Err(err) => (AppConfig::default(), LoadOutcome::Invalid(err)),
    }
}
