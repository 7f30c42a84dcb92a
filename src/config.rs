//! Configuration loading.
//!
//! The listening port comes from the environment (`SERVER_PORT`) and has no
//! default: a missing or non-numeric value fails the load. Routes and logging
//! settings come from an optional TOML file.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::resolver::{Route, RouteTable};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Listening port, `SERVER_PORT` in the environment. Required.
    pub port: u16,
    /// Ordered route table; first matching prefix wins.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// One route rule as declared in the config file
#[derive(Debug, Deserialize, Clone)]
pub struct RouteConfig {
    /// URL prefix; the empty string is the catch-all and belongs last.
    #[serde(default)]
    pub prefix: String,
    /// Directory served under this prefix.
    pub root: PathBuf,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_access_log")]
    pub access_log: bool,
    /// Access log format (`common` or `combined`)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

fn default_access_log() -> bool {
    true
}

fn default_access_log_format() -> String {
    "common".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            access_log: default_access_log(),
            access_log_format: default_access_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from `config.toml` (optional) plus the environment.
    pub fn load() -> Result<Self, Error> {
        Self::load_from("config")
    }

    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `SERVER_*` environment variables layer on top
    /// of it, so the port requirement is satisfied by `SERVER_PORT`.
    pub fn load_from(config_path: &str) -> Result<Self, Error> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.routes.is_empty() {
            return Err(Error::Config(
                "route table is empty; declare at least one [[routes]] entry".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert the declared routes into the resolver's table, with each root
    /// made absolute against the current working directory.
    pub fn route_table(&self) -> Result<RouteTable, Error> {
        let mut routes = Vec::with_capacity(self.routes.len());
        for rule in &self.routes {
            routes.push(Route::new(&rule.prefix, absolutize(&rule.root)?));
        }
        Ok(RouteTable::new(routes))
    }
}

fn absolutize(root: &Path) -> Result<PathBuf, Error> {
    if root.is_absolute() {
        return Ok(root.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(root))
        .map_err(|e| Error::Config(format!("cannot resolve route root '{}': {e}", root.display())))
}
