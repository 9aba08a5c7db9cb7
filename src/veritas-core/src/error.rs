//! Error types for the controller, theme store and configuration.

use std::path::PathBuf;

use thiserror::Error;
use veritas_client::{AnalyzeError, ErrorKind};

/// Which part of the taxonomy a form error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The form refused the submission because it is disabled.
    Disabled,
    /// Input rejected locally; the server was never contacted.
    Validation,
    /// Network failure, empty or unparsable body, non-2xx status.
    Transport,
    /// Well-formed response carrying an explicit error field.
    Application,
}

/// A failed submission.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Analysis is disabled because the model is not loaded")]
    Disabled,

    #[error("Please enter some text to analyze.")]
    EmptyInput,

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl FormError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FormError::Disabled => ErrorCategory::Disabled,
            FormError::EmptyInput => ErrorCategory::Validation,
            FormError::Analyze(err) => match err.kind() {
                ErrorKind::Transport => ErrorCategory::Transport,
                ErrorKind::Application => ErrorCategory::Application,
            },
        }
    }

    /// The text shown in the error display.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Analyze(err) => format!("Analysis Failed: {err}"),
            other => other.to_string(),
        }
    }
}

/// Theme store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not find home directory")]
    NoHomeDir,

    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: String, value: String },
}
