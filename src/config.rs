use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, UserDbError};

/// Name of the project-local config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "userdb.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("USERDB_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                UserDbError::MissingConfig(format!("config file {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_patch(&project_root.join(PROJECT_CONFIG_FILE))? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match dirs::config_dir() {
            Some(dir) => Self::load_patch(&dir.join("userdb/config.toml")),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| UserDbError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| UserDbError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.database {
            self.database.merge(patch);
        }
        if let Some(patch) = patch.server {
            self.server.merge(patch);
        }
        if let Some(patch) = patch.logging {
            self.logging.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("USERDB_DATABASE_PATH") {
            self.database.path = PathBuf::from(value);
        }
        if let Some(value) = env_parse::<u32>("USERDB_POOL_SIZE")? {
            self.database.pool_size = value;
        }
        if let Some(value) = env_parse::<u64>("USERDB_BUSY_TIMEOUT_MS")? {
            self.database.busy_timeout_ms = value;
        }
        if let Some(value) = env_parse::<u64>("USERDB_ACQUIRE_TIMEOUT_MS")? {
            self.database.acquire_timeout_ms = value;
        }

        if let Some(value) = env_string("USERDB_HOST") {
            self.server.host = value;
        }
        if let Some(value) = env_parse::<u16>("USERDB_PORT")? {
            self.server.port = value;
        }

        if let Some(value) = env_string("USERDB_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = env_string("USERDB_LOG_FORMAT") {
            self.logging.format = parse_log_format(&value)?;
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.database.pool_size == 0 {
            return Err(UserDbError::Config(
                "database.pool_size must be at least 1".to_string(),
            ));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(UserDbError::MissingConfig("database.path".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: u32,
    pub busy_timeout_ms: u64,
    pub acquire_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("userdb.sqlite3"),
            pool_size: 4,
            busy_timeout_ms: 5_000,
            acquire_timeout_ms: 30_000,
        }
    }
}

impl DatabaseConfig {
    /// Defaults pointed at a specific database file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    fn merge(&mut self, patch: DatabasePatch) {
        if let Some(value) = patch.path {
            self.path = value;
        }
        if let Some(value) = patch.pool_size {
            self.pool_size = value;
        }
        if let Some(value) = patch.busy_timeout_ms {
            self.busy_timeout_ms = value;
        }
        if let Some(value) = patch.acquire_timeout_ms {
            self.acquire_timeout_ms = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn merge(&mut self, patch: ServerPatch) {
        if let Some(value) = patch.host {
            self.host = value;
        }
        if let Some(value) = patch.port {
            self.port = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    fn merge(&mut self, patch: LoggingPatch) {
        if let Some(value) = patch.level {
            self.level = value;
        }
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub database: Option<DatabasePatch>,
    pub server: Option<ServerPatch>,
    pub logging: Option<LoggingPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DatabasePatch {
    pub path: Option<PathBuf>,
    pub pool_size: Option<u32>,
    pub busy_timeout_ms: Option<u64>,
    pub acquire_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ServerPatch {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct LoggingPatch {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
}

fn parse_log_format(value: &str) -> Result<LogFormat> {
    match value.to_lowercase().as_str() {
        "pretty" | "text" | "human" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        _ => Err(UserDbError::Config(format!(
            "invalid log format {value} (expected pretty|json)"
        ))),
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)
        .map(|value| {
            value.parse::<T>().map_err(|err| {
                UserDbError::Config(format!("invalid {key} value {value}: {err}"))
            })
        })
        .transpose()
}
