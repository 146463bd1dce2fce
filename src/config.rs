use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::{DiscoveryPolicy, MatchExclusion};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    pub database: DatabaseSettings,
    #[serde(default)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub notifier: NotifierSettings,
    #[serde(default)]
    pub scheduler: SchedulerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DiscoverySettings {
    #[serde(default = "default_free_daily_swipe_quota")]
    pub free_daily_swipe_quota: usize,
    #[serde(default = "default_free_page_size")]
    pub free_page_size: usize,
    #[serde(default = "default_premium_page_size")]
    pub premium_page_size: usize,
    #[serde(default)]
    pub match_exclusion: MatchExclusion,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            free_daily_swipe_quota: default_free_daily_swipe_quota(),
            free_page_size: default_free_page_size(),
            premium_page_size: default_premium_page_size(),
            match_exclusion: MatchExclusion::default(),
        }
    }
}

impl From<&DiscoverySettings> for DiscoveryPolicy {
    fn from(settings: &DiscoverySettings) -> Self {
        DiscoveryPolicy {
            free_daily_swipe_quota: settings.free_daily_swipe_quota,
            free_page_size: settings.free_page_size,
            premium_page_size: settings.premium_page_size,
            match_exclusion: settings.match_exclusion,
        }
    }
}

fn default_free_daily_swipe_quota() -> usize { 10 }
fn default_free_page_size() -> usize { 10 }
fn default_premium_page_size() -> usize { 50 }

/// Webhook used for real-time message fan-out. Disabled when `endpoint` is unset.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierSettings {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_notifier_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotifierSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_notifier_timeout_secs(),
        }
    }
}

fn default_notifier_timeout_secs() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSettings {
    #[serde(default = "default_premium_sweep_interval_secs")]
    pub premium_sweep_interval_secs: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            premium_sweep_interval_secs: default_premium_sweep_interval_secs(),
        }
    }
}

fn default_premium_sweep_interval_secs() -> u64 { 24 * 60 * 60 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCHMAKER_)
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCHMAKER__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MATCHMAKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MATCHMAKER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()?.validated()
    }

    /// Reject values that would only fail later at runtime
    fn validated(self) -> Result<Self, ConfigError> {
        if self.scheduler.premium_sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "scheduler.premium_sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn discovery_policy(&self) -> DiscoveryPolicy {
        DiscoveryPolicy::from(&self.discovery)
    }
}

/// Apply the conventional `DATABASE_URL` override when it is set
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    match std::env::var("DATABASE_URL") {
        Ok(database_url) => Config::builder()
            .add_source(settings)
            .set_override("database.url", database_url)?
            .build(),
        Err(_) => Ok(settings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_discovery_settings() {
        let policy = DiscoveryPolicy::from(&DiscoverySettings::default());
        assert_eq!(policy, DiscoveryPolicy::default());
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let path = std::env::temp_dir().join(format!("matchmaker-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[database]
url = "postgres://localhost/test"

[scheduler]
premium_sweep_interval_secs = 0
"#,
        )
        .unwrap();

        let result = Settings::load_from(&path);
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("premium_sweep_interval_secs"));
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("matchmaker-{}.toml", uuid::Uuid::new_v4()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
host = "127.0.0.1"
port = 9000

[storage]
backend = "memory"

[database]
url = "postgres://localhost/test"

[discovery]
free_daily_swipe_quota = 5
match_exclusion = "today"
"#
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        let policy = settings.discovery_policy();
        assert_eq!(policy.free_daily_swipe_quota, 5);
        assert_eq!(policy.free_page_size, 10);
        assert_eq!(policy.match_exclusion, MatchExclusion::Today);
        assert!(settings.notifier.endpoint.is_none());
        assert_eq!(settings.scheduler.premium_sweep_interval_secs, 86_400);
    }
}
