//! Server configuration.
//!
//! Values are resolved from the process environment, then from an optional
//! dotenv-style settings file, then from compiled-in defaults. Keys are matched
//! case-insensitively, so `PORT=9999` and `port=9999` are equivalent.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: i64 = 50051;
pub const DEFAULT_MAX_WORKERS: usize = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ENV_FILE: &str = ".env";

const KEY_HOST: &str = "host";
const KEY_PORT: &str = "port";
const KEY_MAX_WORKERS: &str = "max_workers";
const KEY_LOG_LEVEL: &str = "log_level";
const KEY_LOG_FILE: &str = "log_file";

/// Settings the server reads once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (hostname or IP literal).
    pub host: String,
    /// TCP port. `0` asks the OS for an ephemeral port. Any integer is accepted
    /// here; values outside `0..=65535` fail when the listener is bound.
    pub port: i64,
    /// Number of worker threads handling inbound calls.
    pub max_workers: usize,
    /// Default tracing filter directive, used when `RUST_LOG` is unset.
    pub log_level: String,
    /// Optional log file, rotated daily inside its parent directory.
    pub log_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_workers: DEFAULT_MAX_WORKERS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl ServerConfig {
    /// Loads the configuration from `./.env` and the current process environment.
    pub fn load() -> ConfigResult<Self> {
        ConfigLoader::new().load()
    }

    /// The `host:port` string handed to the listener.
    pub fn bind_target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Builder that resolves a [`ServerConfig`] from explicit sources.
///
/// The loader takes a snapshot of the environment and never writes to it.
/// `${VAR}` references inside the settings file are still expanded by dotenvy
/// against the real process environment, not against the snapshot.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    env_file: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// A loader reading `.env` from the working directory and the real process environment.
    pub fn new() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        ConfigLoader {
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
            vars: normalize(vars),
        }
    }

    /// Reads settings from `path` instead of `.env`.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Skips the settings file entirely.
    pub fn no_env_file(mut self) -> Self {
        self.env_file = None;
        self
    }

    /// Replaces the environment snapshot with `vars`.
    pub fn vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars = normalize(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn load(&self) -> ConfigResult<ServerConfig> {
        let file_values = match &self.env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };
        let get = |key| lookup(&self.vars, &file_values, key);

        let mut config = ServerConfig::default();

        if let Some(host) = get(KEY_HOST) {
            config.host = host.to_string();
        }
        if let Some(port) = get(KEY_PORT) {
            config.port = port.parse().map_err(|_| ConfigError::InvalidPort {
                value: port.to_string(),
            })?;
        }
        if let Some(workers) = get(KEY_MAX_WORKERS) {
            config.max_workers = match workers.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidWorkers {
                        value: workers.to_string(),
                    })
                }
            };
        }
        if let Some(level) = get(KEY_LOG_LEVEL).filter(|v| !v.is_empty()) {
            config.log_level = level.to_string();
        }
        if let Some(file) = get(KEY_LOG_FILE).filter(|v| !v.is_empty()) {
            config.log_file = Some(PathBuf::from(file));
        }

        debug!(?config, "Resolved server configuration");
        Ok(config)
    }
}

/// The environment value for `key`, else the settings file value.
fn lookup<'a>(
    vars: &'a HashMap<String, String>,
    file_values: &'a HashMap<String, String>,
    key: &str,
) -> Option<&'a str> {
    vars.get(key)
        .or_else(|| file_values.get(key))
        .map(|v| v.trim())
}

/// Lowercases keys. An exact lowercase spelling wins over other casings of the same key.
fn normalize(vars: impl Iterator<Item = (String, String)>) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for (key, value) in vars {
        let lower = key.to_ascii_lowercase();
        if key == lower || !out.contains_key(&lower) {
            out.insert(lower, value);
        }
    }
    out
}

fn read_env_file(path: &Path) -> ConfigResult<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!(path = ?path, "No settings file found, using environment and defaults");
            return Ok(HashMap::new());
        }
        Err(source) => {
            return Err(ConfigError::EnvFile {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut entries = Vec::new();
    for item in iter {
        match item {
            Ok(entry) => entries.push(entry),
            Err(dotenvy::Error::LineParse(line, index)) => {
                warn!(path = ?path, line = %line, index, "Skipping unparseable line in settings file");
            }
            Err(source) => {
                return Err(ConfigError::EnvFile {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }
    Ok(normalize(entries.into_iter()))
}
