use serde::Deserialize;
use std::env;
use thiserror::Error;

/// Fixed Atlas cluster coordinates. Only the credentials vary by
/// environment; host, database name and write-concern options do not.
pub const ATLAS_HOST: &str = "online-bookstore.ql6vl.mongodb.net";
pub const DATABASE_NAME: &str = "online-bookstore";
pub const CONNECTION_OPTIONS: &str = "retryWrites=true&w=majority&appName=online-bookstore";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub atlas_user_name: String,
    pub atlas_password: String,
    pub server_port: String,
    pub covers_dir: String,
}

impl Config {
    /// Load and validate configuration from the environment. Credentials
    /// are required and checked here, before any connection attempt, so a
    /// misconfigured deployment fails with a named variable instead of a
    /// malformed-URI handshake error later.
    pub fn from_env() -> Result<Self, ConfigError> {
        let atlas_user_name = require("ATLAS_USER_NAME")?;
        let atlas_password = require("ATLAS_PASSWORD")?;
        let server_port = env::var("SERVER_PORT").unwrap_or_else(|_| "3000".into());
        let covers_dir = env::var("COVERS_DIR").unwrap_or_else(|_| "uploads".into());
        Ok(Self {
            atlas_user_name,
            atlas_password,
            server_port,
            covers_dir,
        })
    }

    /// Connection URI for the cluster, derived deterministically from the
    /// credentials plus the fixed constants above.
    pub fn connection_uri(&self) -> String {
        format!(
            "mongodb+srv://{}:{}@{}/{}?{}",
            self.atlas_user_name, self.atlas_password, ATLAS_HOST, DATABASE_NAME, CONNECTION_OPTIONS
        )
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(name)),
    }
}
