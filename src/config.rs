//! Configuration for the console
//!
//! Centralized configuration with sensible defaults.
//!
//! Sources, lowest precedence first:
//! 1. [`Config::default`]
//! 2. An optional settings file (`KEY=value` lines, see [`load_env_file`])
//! 3. Process environment (`KV_*` variables, see [`Config::from_env`])
//! 4. Command-line flags, applied by the binary through [`ConfigBuilder`]

use std::path::Path;

use crate::error::{ConsoleError, Result};

/// Comma-separated `host:port` list
pub const ENV_ENDPOINTS: &str = "KV_ENDPOINTS";
pub const ENV_USERNAME: &str = "KV_USERNAME";
pub const ENV_PASSWORD: &str = "KV_PASSWORD";
pub const ENV_DIAL_TIMEOUT_MS: &str = "KV_DIAL_TIMEOUT_MS";
pub const ENV_REQUEST_TIMEOUT_MS: &str = "KV_REQUEST_TIMEOUT_MS";

/// Session configuration
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Endpoint Configuration
    // -------------------------------------------------------------------------
    /// Store endpoints (host:port), tried in order until one accepts
    pub endpoints: Vec<String>,

    // -------------------------------------------------------------------------
    // Credentials
    // -------------------------------------------------------------------------
    /// Username passed through to the store; `None` connects anonymously
    pub username: Option<String>,

    /// Password passed through to the store
    pub password: Option<String>,

    // -------------------------------------------------------------------------
    // Timeouts
    // -------------------------------------------------------------------------
    /// TCP connect timeout per endpoint (milliseconds)
    pub dial_timeout_ms: u64,

    /// Upper bound on each store call (milliseconds)
    pub request_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: vec!["127.0.0.1:6379".to_string()],
            username: None,
            password: None,
            dial_timeout_ms: 5000,
            request_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build a config from the process environment on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup
    ///
    /// Unset and empty variables leave the default in place.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut builder = Config::builder();

        if let Some(endpoints) = get(ENV_ENDPOINTS) {
            builder = builder.endpoints(split_endpoints(&endpoints));
        }
        if let Some(username) = get(ENV_USERNAME) {
            builder = builder.username(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            builder = builder.password(password);
        }
        if let Some(ms) = get(ENV_DIAL_TIMEOUT_MS) {
            builder = builder.dial_timeout_ms(parse_millis(ENV_DIAL_TIMEOUT_MS, &ms)?);
        }
        if let Some(ms) = get(ENV_REQUEST_TIMEOUT_MS) {
            builder = builder.request_timeout_ms(parse_millis(ENV_REQUEST_TIMEOUT_MS, &ms)?);
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a session relies on
    pub fn validate(&self) -> Result<()> {
        if self.endpoints.is_empty() {
            return Err(ConsoleError::Config("no endpoints configured".to_string()));
        }
        if self.dial_timeout_ms == 0 {
            return Err(ConsoleError::Config("dial timeout must be positive".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConsoleError::Config("request timeout must be positive".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Replace the endpoint list
    pub fn endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Use a single endpoint
    pub fn endpoint(self, endpoint: impl Into<String>) -> Self {
        self.endpoints([endpoint.into()])
    }

    /// Set the username
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.config.username = Some(username.into());
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = Some(password.into());
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn dial_timeout_ms(mut self, ms: u64) -> Self {
        self.config.dial_timeout_ms = ms;
        self
    }

    /// Set the per-call timeout (in milliseconds)
    pub fn request_timeout_ms(mut self, ms: u64) -> Self {
        self.config.request_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl From<Config> for ConfigBuilder {
    fn from(config: Config) -> Self {
        Self { config }
    }
}

/// Load a `KEY=value` settings file into the process environment
///
/// Variables already set in the environment win. Returns `Ok(false)` when
/// the file does not exist.
pub fn load_env_file(path: &Path) -> Result<bool> {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded settings from {}", path.display());
            Ok(true)
        }
        Err(e) if e.not_found() => {
            tracing::debug!("No settings file at {}", path.display());
            Ok(false)
        }
        Err(e) => Err(ConsoleError::Config(format!(
            "failed to load {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Split a comma-separated endpoint list, dropping blanks
pub fn split_endpoints(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_millis(name: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .map_err(|_| ConsoleError::Config(format!("{} must be a number of milliseconds, got '{}'", name, raw)))
}
