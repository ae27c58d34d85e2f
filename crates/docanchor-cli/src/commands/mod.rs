//! CLI subcommands
//!
//! Each subcommand returns the process exit code on completion.

pub mod digest;
pub mod issue;
pub mod verify;

use crate::config::{AppConfig, Backend};
use crate::error::CliError;
use docanchor_core::classifier::{is_cancellation, truncate_for_display};
use docanchor_core::{Identity, LedgerClient, LedgerFailure, Outcome};
use docanchor_store::{HttpLedgerClient, HttpLedgerConfig, SqliteLedger};
use std::time::Duration;

/// Settings shared by every subcommand
pub struct CliContext {
    pub config: AppConfig,
    pub json: bool,
}

/// Build the configured Ledger Client
pub fn open_ledger(
    config: &AppConfig,
    identity: Option<Identity>,
) -> Result<Box<dyn LedgerClient>, CliError> {
    let settings = &config.ledger;
    match settings.backend {
        Backend::Sqlite => {
            if let Some(parent) = settings.sqlite_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        CliError::config(format!(
                            "cannot create ledger directory {}: {}",
                            parent.display(),
                            e
                        ))
                    })?;
                }
            }
            let ledger = SqliteLedger::open(&settings.sqlite_path)?;
            Ok(match identity {
                Some(identity) => Box::new(ledger.with_identity(identity)),
                None => Box::new(ledger),
            })
        }
        Backend::Http => {
            let url = settings
                .http_url
                .as_deref()
                .ok_or_else(|| CliError::config("ledger.http_url is required for the http backend"))?;
            let mut http = HttpLedgerConfig::new(url);
            http.timeout = Duration::from_secs(settings.timeout_secs);
            http.poll_interval = Duration::from_millis(settings.confirmation_poll_ms);
            http.max_polls = settings.confirmation_max_polls;
            http.token = settings.http_token.clone();
            http.identity = identity;
            Ok(Box::new(HttpLedgerClient::with_config(http)?))
        }
    }
}

/// Outcome for a failed `connect`, before any digest exists
pub fn connect_failure(failure: &LedgerFailure) -> Outcome {
    if is_cancellation(failure) {
        Outcome::UserCancelled
    } else {
        Outcome::ConnectivityFailure {
            detail: truncate_for_display(&failure.to_string()),
        }
    }
}
