//! CLI error types
//!
//! Workflow results are `Outcome`s, not errors; these cover everything that
//! stops the CLI before or outside a workflow.

use docanchor_core::errors::AnchorError;
use docanchor_core::ExError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{0}")]
    Document(AnchorError),

    #[error("{0}")]
    Store(ExError),
}

impl CliError {
    pub fn config(message: impl Into<String>) -> Self {
        CliError::Config {
            message: message.into(),
        }
    }

    pub fn invalid_arg(message: impl Into<String>) -> Self {
        CliError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Process exit code: 2 for configuration and usage errors, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } | CliError::InvalidArgument { .. } => 2,
            CliError::Document(_) | CliError::Store(_) => 1,
        }
    }
}

impl From<::config::ConfigError> for CliError {
    fn from(err: ::config::ConfigError) -> Self {
        CliError::config(err.to_string())
    }
}

impl From<ExError> for CliError {
    fn from(err: ExError) -> Self {
        CliError::Store(err)
    }
}
