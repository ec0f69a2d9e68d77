use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::AppError;

/// Runtime settings for the content server.
///
/// Layered lowest to highest: built-in defaults, an optional config file,
/// `CONTENTDESK__*` environment variables (`__` separates nesting levels),
/// then the conventional `MONGODB_URI` / `MONGODB_DATABASE` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// MongoDB connection string. Without it every database operation fails
    /// with a connection error.
    #[serde(default)]
    pub uri: Option<String>,
    pub name: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            name: "contentdesk".to_string(),
            username: None,
            password: None,
        }
    }
}

impl DatabaseSettings {
    /// The connection string to hand to the driver, with credentials
    /// injected when they are configured separately from the URI.
    pub fn connection_uri(&self) -> Result<String, AppError> {
        let uri = self
            .uri
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| AppError::Connection("MONGODB_URI is not set".into()))?;

        if self.username.is_none() && self.password.is_none() {
            return Ok(uri.to_string());
        }

        let mut url = url::Url::parse(uri)
            .map_err(|e| AppError::Connection(format!("Invalid MongoDB URI: {e}")))?;

        if let Some(username) = &self.username {
            url.set_username(username)
                .map_err(|_| AppError::Connection("Cannot set username on MongoDB URI".into()))?;
        }
        if let Some(password) = &self.password {
            url.set_password(Some(password))
                .map_err(|_| AppError::Connection("Cannot set password on MongoDB URI".into()))?;
        }

        Ok(url.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "contentdesk=info,tower_http=info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given, else an optional
    /// `contentdesk.{toml,yaml,json}` in the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("contentdesk").required(false),
        };

        let defaults = Settings::default();

        Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default("storage.backend", "mongo")?
            .set_default("database.name", defaults.database.name)?
            .set_default("log.filter", defaults.log.filter)?
            .add_source(file)
            .add_source(Environment::with_prefix("CONTENTDESK").separator("__"))
            .set_override_option("database.uri", std::env::var("MONGODB_URI").ok())?
            .set_override_option("database.name", std::env::var("MONGODB_DATABASE").ok())?
            .build()?
            .try_deserialize()
    }
}
