use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::errors::{Error, ErrorKind};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub db: DbConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub token: TokenConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DbBackend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DbConfig {
    #[serde(default)]
    pub backend: DbBackend,
    pub mongodb: MongoDbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MongoDbConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
}

impl MongoDbConfig {
    pub fn server_url(&self) -> String {
        match (self.user.is_empty(), self.password.is_empty()) {
            (true, _) => format!("mongodb://{}:{}", self.host, self.port),
            (false, true) => format!("mongodb://{}@{}:{}", self.user, self.host, self.port),
            (false, false) => format!(
                "mongodb://{}:{}@{}:{}",
                self.user, self.password, self.host, self.port
            ),
        }
    }

    pub fn url(&self) -> String {
        format!("{}/{}", self.server_url(), self.database)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub client_url: String,
    pub public_url: String,
}

impl ServerConfig {
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// token lifetimes, in seconds
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TokenConfig {
    #[serde(default = "default_verification_ttl")]
    pub verification_ttl: i64,
    #[serde(default = "default_reset_ttl")]
    pub reset_ttl: i64,
}

fn default_verification_ttl() -> i64 {
    60 * 60
}

fn default_reset_ttl() -> i64 {
    10 * 60
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            verification_ttl: default_verification_ttl(),
            reset_ttl: default_reset_ttl(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default)]
    pub output: LogOutput,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_level() -> String {
    String::from("info")
}

fn default_log_dir() -> String {
    String::from("./logs")
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            output: LogOutput::default(),
            dir: default_log_dir(),
        }
    }
}

impl LogConfig {
    pub fn level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

impl Config {
    pub fn load(filename: impl AsRef<Path>) -> Result<Self, Error> {
        let content = fs::read_to_string(filename.as_ref()).map_err(|e| {
            Error::new(
                ErrorKind::ConfigReadError,
                filename.as_ref().display().to_string(),
                e,
            )
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }
}
