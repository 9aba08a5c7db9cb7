//! Veritas classification client
//!
//! This crate talks to the comment classification backend: it posts a comment
//! to `/analyze_comment`, decodes whatever comes back and normalises every
//! failure into [`AnalyzeError`].

mod client;
pub mod http_client;
mod models;

pub use client::{Analyzer, AnalyzerClient, decode_response};
pub use models::{AnalysisResult, AnalyzeRequest, Sentiment, Verdict};

/// Default backend URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Path of the classification endpoint, relative to the server URL.
pub const ANALYZE_PATH: &str = "/analyze_comment";

/// Broad class of an analysis failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The exchange itself failed: network, empty/unparsable body, non-2xx status.
    Transport,
    /// A well-formed response carried an explicit `error` field.
    Application,
}

/// Error types for analysis requests
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned empty response (Status: {status})")]
    EmptyResponse { status: u16 },

    #[error("Server returned invalid data (Status: {status}). Check server logs.")]
    InvalidData { status: u16 },

    #[error("Request failed (Status: {status})")]
    RequestFailed { status: u16 },

    /// Non-2xx status whose body named the problem.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 2xx status whose body still carried an `error` field.
    #[error("{0}")]
    Application(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl AnalyzeError {
    /// Classify the failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyzeError::Application(_) => ErrorKind::Application,
            _ => ErrorKind::Transport,
        }
    }

    /// HTTP status of the response that produced this error, if one arrived.
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalyzeError::EmptyResponse { status }
            | AnalyzeError::InvalidData { status }
            | AnalyzeError::RequestFailed { status }
            | AnalyzeError::Rejected { status, .. } => Some(*status),
            AnalyzeError::Network(err) => err.status().map(|s| s.as_u16()),
            AnalyzeError::Application(_) | AnalyzeError::Client(_) => None,
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalyzeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_status() {
        let err = AnalyzeError::EmptyResponse { status: 500 };
        assert_eq!(err.to_string(), "Server returned empty response (Status: 500)");
        assert_eq!(err.status(), Some(500));

        let err = AnalyzeError::InvalidData { status: 502 };
        assert!(err.to_string().contains("invalid data"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            AnalyzeError::Application("boom".into()).kind(),
            ErrorKind::Application
        );
        assert_eq!(
            AnalyzeError::Rejected {
                status: 503,
                message: "down".into()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            AnalyzeError::RequestFailed { status: 404 }.kind(),
            ErrorKind::Transport
        );
    }
}
