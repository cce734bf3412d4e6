//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `BOTBOARD_*` environment variable overrides,
//! and resolves which API base address to use for a given execution context.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Where a request to the backend API originates.
///
/// A server-rendering process usually cannot resolve the hostname a user's
/// machine uses for the API, so the two contexts carry separate addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    /// Server-side rendering (the dashboard web service)
    Server,
    /// Client side (terminal client, anything running on the user's machine)
    Client,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub web: WebConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API addresses
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Address used while rendering on the server
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Address used by client-side code
    #[serde(default = "default_public_url")]
    pub public_url: String,

    /// Per-request timeout; 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://api:8000".to_string()
}

fn default_public_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            public_url: default_public_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Base address for the given execution context, without a trailing slash
    pub fn base_url(&self, context: ExecutionContext) -> String {
        let url = match context {
            ExecutionContext::Server => &self.server_url,
            ExecutionContext::Client => &self.public_url,
        };
        url.trim_end_matches('/').to_string()
    }

    /// Request timeout as a [`std::time::Duration`]; zero means none
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

/// Dashboard web service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl WebConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Client-side session persistence
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// File holding the persisted session identifier
    pub store_path: Option<String>,
}

impl SessionConfig {
    /// Explicit path if configured, otherwise the user's local data directory
    pub fn resolved_store_path(&self) -> PathBuf {
        match &self.store_path {
            Some(path) => PathBuf::from(path),
            None => dirs::data_local_dir()
                .map(|p| p.join("botboard").join("session.json"))
                .unwrap_or_else(|| PathBuf::from("./botboard_session.json")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// Logs go to stderr. `RUST_LOG` wins over the configured level.
    /// Calling this twice is a no-op.
    pub fn init_tracing(&self) {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("botboard={},tower_http=info", self.level).into()
        });

        let registry = tracing_subscriber::registry().with(filter);
        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };

        if let Err(e) = result {
            tracing::debug!("Tracing already initialised: {}", e);
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from an explicit path, the default locations, or the environment
    pub fn load_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_with_env(path);
        }

        let config_paths = [
            dirs::config_dir().map(|p| p.join("botboard").join("config.toml")),
            Some(PathBuf::from("/etc/botboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return Ok(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Ok(Self::from_env())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup. Empty values count as unset.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        // API overrides
        if let Some(url) = get("BOTBOARD_API_URL_SERVER") {
            self.api.server_url = url;
        }
        if let Some(url) = get("BOTBOARD_PUBLIC_API_URL") {
            self.api.public_url = url;
        }
        if let Some(timeout) = get("BOTBOARD_API_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        // Web overrides
        if let Some(host) = get("BOTBOARD_WEB_HOST") {
            self.web.host = host;
        }
        if let Some(port) = get("BOTBOARD_WEB_PORT") {
            if let Ok(p) = port.parse() {
                self.web.port = p;
            }
        }

        // Session overrides
        if let Some(path) = get("BOTBOARD_SESSION_FILE") {
            self.session.store_path = Some(path);
        }

        // Logging overrides
        if let Some(level) = get("BOTBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = get("BOTBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Botboard Configuration
#
# Environment variables override these settings:
# - BOTBOARD_API_URL_SERVER
# - BOTBOARD_PUBLIC_API_URL
# - BOTBOARD_API_TIMEOUT_SECS
# - BOTBOARD_WEB_HOST
# - BOTBOARD_WEB_PORT
# - BOTBOARD_SESSION_FILE
# - BOTBOARD_LOG_LEVEL
# - BOTBOARD_LOG_FORMAT

[api]
# API address used when rendering pages on the server
server_url = "http://api:8000"

# API address used by client-side code (terminal chat, history)
public_url = "http://localhost:8000"

# Request timeout in seconds (0 disables the timeout)
request_timeout_secs = 30

[web]
# Dashboard web service host
host = "0.0.0.0"

# Dashboard web service port
port = 3000

[session]
# File holding the chat session identifier
# store_path = "~/.local/share/botboard/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
