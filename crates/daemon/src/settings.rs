//! Daemon settings
//!
//! Defaults, then an optional TOML file, then `WAITLINE_*` environment variables.

use anyhow::{bail, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use waitline_api_http::HttpServerConfig;

pub const CONFIG_PATH_ENV: &str = "WAITLINE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "waitline.toml";
const DEFAULT_DB_PATH: &str = "~/.waitline/waitline.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub format: String,
}

impl LogSettings {
    pub fn format(&self) -> Result<LogFormat> {
        match self.format.as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => bail!("Unknown log format '{}' (expected pretty or json)", other),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    #[serde(default)]
    pub api_key: String,
    pub http: HttpSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Load from `$WAITLINE_CONFIG` (or `waitline.toml`) and the environment
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = File::with_name(&path).format(FileFormat::Toml).required(false);

        let builder = Self::defaults()?.add_source(file).add_source(
            Environment::with_prefix("WAITLINE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("database_url", DEFAULT_DB_PATH)?
            .set_default("http.host", "127.0.0.1")?
            .set_default("http.port", 8080)?
            .set_default("log.format", "pretty")?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let mut settings: Settings = builder
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.database_url = shellexpand::tilde(&settings.database_url).into_owned();
        Ok(settings)
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("api_key must be set (WAITLINE_API_KEY)");
        }
        if self.http.port == 0 {
            bail!("http.port must be non-zero");
        }
        if self.database_url.is_empty() {
            bail!("database_url must not be empty");
        }
        self.log.format()?;
        Ok(())
    }

    pub fn http_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.http.host.clone(),
            port: self.http.port,
        }
    }
}
