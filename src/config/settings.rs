//! Application settings and configuration structures.

use std::collections::HashSet;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port, static assets)
    pub server: ServerSettings,

    /// WebSocket session configuration
    pub websocket: WebSocketSettings,

    /// Hub configuration
    pub hub: HubSettings,

    /// History retrieval configuration
    pub history: HistorySettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Login accounts and their channel assignment
    #[serde(default = "default_accounts")]
    pub accounts: Vec<AccountSettings>,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,

    /// Directory served for any path no route matches
    pub static_dir: String,
}

/// WebSocket session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebSocketSettings {
    /// Maximum inbound message size in bytes (default: 512)
    pub read_limit: usize,

    /// Seconds without a pong before the connection is dropped (default: 60)
    pub pong_wait_secs: u64,

    /// Seconds between server pings; must be below `pong_wait_secs` (default: 54)
    pub ping_period_secs: u64,

    /// Seconds allowed for a single frame write (default: 10)
    pub write_wait_secs: u64,

    /// Capacity of each session's outbound queue (default: 256)
    pub send_buffer: usize,
}

/// Hub configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HubSettings {
    /// Capacity of the hub's command intake (default: 256)
    pub intake_buffer: usize,
}

/// History retrieval configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HistorySettings {
    /// Number of messages returned by the history endpoint (default: 50)
    pub default_limit: usize,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins; empty allows any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// A configured login account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountSettings {
    pub username: String,
    pub password: String,
    pub channel: String,
}

/// Built-in accounts used when configuration provides none.
pub fn default_accounts() -> Vec<AccountSettings> {
    [("alice", "general"), ("bob", "tech"), ("charlie", "random")]
        .into_iter()
        .map(|(username, channel)| AccountSettings {
            username: username.to_string(),
            password: "password123".to_string(),
            channel: channel.to_string(),
        })
        .collect()
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the loaded values are inconsistent (see [`Settings::validate`]).
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=8080 -> server.port = 8080
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    /// Settings built from defaults only, without files or environment.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder("test")?
            .build()?
            .try_deserialize()
            .and_then(|settings: Self| settings.validate().map(|_| settings))
    }

    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.static_dir", "./static")?
            .set_default("websocket.read_limit", 512_i64)?
            .set_default("websocket.pong_wait_secs", 60_i64)?
            .set_default("websocket.ping_period_secs", 54_i64)?
            .set_default("websocket.write_wait_secs", 10_i64)?
            .set_default("websocket.send_buffer", 256_i64)?
            .set_default("hub.intake_buffer", 256_i64)?
            .set_default("history.default_limit", 50_i64)?
            .set_default("cors.allowed_origins", Vec::<String>::new())
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ws = &self.websocket;
        if ws.ping_period_secs >= ws.pong_wait_secs {
            return Err(ConfigError::Message(format!(
                "websocket.ping_period_secs ({}) must be less than websocket.pong_wait_secs ({})",
                ws.ping_period_secs, ws.pong_wait_secs
            )));
        }
        if ws.send_buffer == 0 {
            return Err(ConfigError::Message(
                "websocket.send_buffer must be greater than zero".into(),
            ));
        }
        if self.hub.intake_buffer == 0 {
            return Err(ConfigError::Message(
                "hub.intake_buffer must be greater than zero".into(),
            ));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.username.is_empty() || account.channel.is_empty() {
                return Err(ConfigError::Message(
                    "accounts require a non-empty username and channel".into(),
                ));
            }
            if !seen.insert(account.username.as_str()) {
                return Err(ConfigError::Message(format!(
                    "duplicate account username: {}",
                    account.username
                )));
            }
        }

        Ok(())
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl WebSocketSettings {
    pub fn pong_wait(&self) -> Duration {
        Duration::from_secs(self.pong_wait_secs)
    }

    pub fn ping_period(&self) -> Duration {
        Duration::from_secs(self.ping_period_secs)
    }

    pub fn write_wait(&self) -> Duration {
        Duration::from_secs(self.write_wait_secs)
    }
}
