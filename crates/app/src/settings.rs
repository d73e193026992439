//! Process settings, read from `settings.toml` and layered with
//! `KASKROUT__*` environment variables (`KASKROUT__SERVER__PORT=8080`).
//!
//! See `settings.toml` at the workspace root for an example.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

fn default_level() -> String {
    String::from("info")
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

/// `database = "memory"` or `database = { sqlite = "kaskrout.db" }`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub database: Database,
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("KASKROUT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
