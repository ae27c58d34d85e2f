//! Layered CLI configuration
//!
//! Lowest to highest precedence: built-in defaults, the TOML file
//! (`--config PATH`, else an optional `docanchor.toml` in the working
//! directory), then `DOCANCHOR_*` environment variables with `__` between
//! path segments (`DOCANCHOR_LEDGER__BACKEND=http`).

use crate::error::CliError;
use ::config::{Config, Environment, File};
use docanchor_core_types::Sensitive;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Sqlite,
    Http,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerSettings {
    pub backend: Backend,
    pub sqlite_path: PathBuf,
    #[serde(default)]
    pub http_url: Option<String>,
    #[serde(default)]
    pub http_token: Option<Sensitive<String>>,
    pub timeout_secs: u64,
    pub confirmation_poll_ms: u64,
    pub confirmation_max_polls: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    pub profile: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub ledger: LedgerSettings,
    /// Default issuing identity
    #[serde(default)]
    pub identity: Option<String>,
    pub log: LogSettings,
}

impl AppConfig {
    pub fn load(path: Option<&Path>) -> Result<Self, CliError> {
        let builder = Config::builder()
            .set_default("ledger.backend", "sqlite")?
            .set_default("ledger.sqlite_path", "docanchor-ledger.db")?
            .set_default("ledger.timeout_secs", 30)?
            .set_default("ledger.confirmation_poll_ms", 1000)?
            .set_default("ledger.confirmation_max_polls", 60)?
            .set_default("log.profile", "production")?;

        let builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("docanchor").required(false)),
        };

        let config = builder
            .add_source(
                Environment::with_prefix("DOCANCHOR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
