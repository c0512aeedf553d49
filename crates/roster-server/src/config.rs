//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, used when no `DB_*` environment
    /// variables are present.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// Driver token used when assembling a DSN from `DB_*` environment
    /// variables.
    #[serde(default = "default_db_driver")]
    pub driver: String,

    /// Busy timeout for SQLite connections, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled SQLite connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "roster_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    5000
}

fn default_db_path() -> String {
    "roster.db".to_string()
}

fn default_db_driver() -> String {
    "mysql".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_pool_max_size() -> u32 {
    8
}

fn default_log_level() -> String {
    "debug".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            driver: default_db_driver(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Database connection parts read from the environment.
///
/// These are the five conventional variables (`DB_USER`, `DB_PASSWORD`,
/// `DB_HOST`, `DB_PORT`, `DB_NAME`). None has a default and none is
/// validated: an absent variable interpolates into the DSN as the literal
/// `None`, and the resulting malformed DSN is only rejected when a
/// connection is attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbCredentials {
    /// `DB_USER`.
    pub user: Option<String>,
    /// `DB_PASSWORD`.
    pub password: Option<String>,
    /// `DB_HOST`.
    pub host: Option<String>,
    /// `DB_PORT`.
    pub port: Option<String>,
    /// `DB_NAME`.
    pub name: Option<String>,
}

impl DbCredentials {
    /// Reads the five `DB_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            user: std::env::var("DB_USER").ok(),
            password: std::env::var("DB_PASSWORD").ok(),
            host: std::env::var("DB_HOST").ok(),
            port: std::env::var("DB_PORT").ok(),
            name: std::env::var("DB_NAME").ok(),
        }
    }

    /// Whether any of the `DB_*` variables is set.
    pub fn is_configured(&self) -> bool {
        self.user.is_some()
            || self.password.is_some()
            || self.host.is_some()
            || self.port.is_some()
            || self.name.is_some()
    }

    /// Assembles `<driver>://<user>:<password>@<host>:<port>/<name>` by
    /// direct interpolation. No escaping is applied to the parts.
    pub fn url(&self, driver: &str) -> String {
        fn part(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or("None")
        }

        format!(
            "{}://{}:{}@{}:{}/{}",
            driver,
            part(&self.user),
            part(&self.password),
            part(&self.host),
            part(&self.port),
            part(&self.name),
        )
    }
}

/// Resolves where the database lives.
///
/// If any `DB_*` environment variable is set, a DSN is assembled from them
/// with the configured driver token. Otherwise the configured SQLite path is
/// used. Whether the resolved location is actually connectable is decided by
/// `roster_db::create_pool`.
pub fn database_location(config: &Config) -> String {
    let creds = DbCredentials::from_env();
    if creds.is_configured() {
        creds.url(&config.database.driver)
    } else {
        config.database.path.clone()
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `ROSTER_HOST` overrides `server.host`
/// - `ROSTER_PORT` overrides `server.port`
/// - `ROSTER_DB_PATH` overrides `database.path`
/// - `ROSTER_LOG_LEVEL` overrides `logging.level`
/// - `ROSTER_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("ROSTER_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("ROSTER_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(db_path) = std::env::var("ROSTER_DB_PATH") {
        config.database.path = db_path;
    }
    if let Ok(level) = std::env::var("ROSTER_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("ROSTER_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_serve_on_all_interfaces() {
        let config = Config::default();
        assert_eq!(config.server.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.database.path, "roster.db");
    }

    #[test]
    fn dsn_assembly_interpolates_all_parts() {
        let creds = DbCredentials {
            user: Some("u".to_string()),
            password: Some("p".to_string()),
            host: Some("h".to_string()),
            port: Some("3306".to_string()),
            name: Some("d".to_string()),
        };

        assert_eq!(
            creds.url("mysql+mysqlconnector"),
            "mysql+mysqlconnector://u:p@h:3306/d"
        );
    }

    #[test]
    fn dsn_assembly_renders_missing_parts_as_none() {
        let creds = DbCredentials {
            user: Some("u".to_string()),
            password: None,
            host: Some("h".to_string()),
            port: Some("3306".to_string()),
            name: Some("d".to_string()),
        };

        let url = creds.url("mysql");
        assert_eq!(url, "mysql://u:None@h:3306/d");
        assert!(url.contains("None"));
    }

    #[test]
    fn empty_credentials_are_not_configured() {
        assert!(!DbCredentials::default().is_configured());
        assert!(DbCredentials {
            host: Some("h".to_string()),
            ..DbCredentials::default()
        }
        .is_configured());
    }

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("should create temp file");
        write!(
            file,
            "[server]\nport = 8080\n\n[database]\npath = \"/tmp/test.db\"\n"
        )
        .expect("should write config");

        let config = load_config(file.path().to_str()).expect("should load config");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, "/tmp/test.db");
        // Unspecified sections keep their defaults
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn load_config_missing_file_uses_defaults() {
        let config = load_config(Some("/nonexistent/roster.toml")).expect("should fall back");
        assert_eq!(config.server.port, 5000);
    }
}
