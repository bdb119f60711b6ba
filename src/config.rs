use anyhow::{Context, Result};
use std::{env, path::PathBuf, time::Duration};

/// Default API prefix for entity paths.
pub const DEFAULT_PREFIX: &str = "/api/2/";

/// Environment variable names for the remote host and credentials.
pub mod env_keys {
    pub const HOSTNAME: &str = "TX_HOSTNAME";
    pub const USERNAME: &str = "TX_USERNAME";
    pub const PASSWORD: &str = "TX_PASSWORD";
    pub const API_PREFIX: &str = "TX_API_PREFIX";
    pub const TIMEOUT_SECS: &str = "TX_TIMEOUT_SECS";
    pub const DEBUG: &str = "TX_DEBUG";
    pub const VERBOSE: &str = "TX_VERBOSE";
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub hostname: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub prefix: String,
    /// Per-request timeout; `None` leaves it to the HTTP client.
    pub timeout: Option<Duration>,
    pub debug: bool,
    pub verbose: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("prefix", &self.prefix)
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl Config {
    /// Config for `hostname` with no credentials and default settings.
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            username: None,
            password: None,
            prefix: DEFAULT_PREFIX.to_string(),
            timeout: None,
            debug: false,
            verbose: false,
        }
    }

    /// Try to load .env from the given path; then from cwd, home, and /etc.
    fn load_dotenv(custom_path: Option<PathBuf>) -> Option<PathBuf> {
        if let Some(path) = custom_path {
            if path.exists() && dotenvy::from_path(&path).is_ok() {
                return Some(path);
            }
            tracing::warn!("Custom config file not found: {}", path.display());
        }

        if let Ok(path) = dotenvy::dotenv() {
            return Some(path);
        }

        let home = env::var("HOME")
            .ok()
            .or_else(|| env::var("USERPROFILE").ok());
        if let Some(home) = home {
            let home_config = PathBuf::from(&home).join(".txlib.env");
            if home_config.exists() && dotenvy::from_path(&home_config).is_ok() {
                return Some(home_config);
            }
        }

        let etc_config = PathBuf::from("/etc/txlib/.env");
        if etc_config.exists() && dotenvy::from_path(&etc_config).is_ok() {
            return Some(etc_config);
        }

        None
    }

    /// Parse an env var as a boolean (true, 1, yes => true).
    fn env_bool(key: &str) -> bool {
        env::var(key)
            .map(|v| {
                let v = v.to_lowercase();
                v == "1" || v == "true" || v == "yes"
            })
            .unwrap_or(false)
    }

    fn env_non_empty(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    pub fn from_env() -> Result<Self> {
        Self::from_env_with_path(None)
    }

    pub fn from_env_with_path(custom_path: Option<PathBuf>) -> Result<Self> {
        use env_keys::*;

        if let Some(path) = Self::load_dotenv(custom_path) {
            tracing::debug!("Loaded config from: {}", path.display());
        } else {
            tracing::debug!("No .env file found, using environment variables only");
        }

        let hostname = env::var(HOSTNAME)
            .context("TX_HOSTNAME is required. Set it to the API host (e.g. www.transifex.com)")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let timeout = match Self::env_non_empty(TIMEOUT_SECS) {
            Some(raw) => Some(Duration::from_secs(
                raw.parse()
                    .with_context(|| format!("TX_TIMEOUT_SECS must be a number of seconds, got {raw}"))?,
            )),
            None => None,
        };

        Ok(Config {
            hostname,
            username: Self::env_non_empty(USERNAME),
            password: Self::env_non_empty(PASSWORD),
            prefix: Self::env_non_empty(API_PREFIX).unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            timeout,
            debug: Self::env_bool(DEBUG),
            verbose: Self::env_bool(VERBOSE),
        })
    }
}
