use thiserror::Error;
use tracing::{error, warn};

/// Broad classification of a [`PreviewError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The user gave us nothing usable, or the service found nothing to preview.
    Validation,
    /// The request itself failed.
    Transport,
    /// Startup problems: bad endpoint, HTTP client construction.
    Config,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("No valid URLs found in input")]
    NoValidUrls,

    #[error("Preview service returned no results")]
    EmptyResult,

    #[error("Request timeout: {0}")]
    TimeoutError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("HTTP error {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    DecodeError(String),

    #[error("Failed to fetch previews: {0}")]
    FetchError(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    ClientBuildError(String),
}

impl PreviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreviewError::NoValidUrls | PreviewError::EmptyResult => ErrorKind::Validation,
            PreviewError::TimeoutError(_)
            | PreviewError::ConnectionError(_)
            | PreviewError::HttpStatus { .. }
            | PreviewError::DecodeError(_)
            | PreviewError::FetchError(_) => ErrorKind::Transport,
            PreviewError::InvalidEndpoint(_) | PreviewError::ClientBuildError(_) => {
                ErrorKind::Config
            }
        }
    }

    /// One-line message suitable for a toast.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::Validation => crate::notification::INVALID_URLS_MESSAGE,
            ErrorKind::Transport | ErrorKind::Config => crate::notification::REQUEST_FAILED_MESSAGE,
        }
    }

    pub fn log(&self) {
        match self {
            PreviewError::NoValidUrls => {
                warn!("No valid URLs in input");
            }
            PreviewError::EmptyResult => {
                warn!("Preview service returned an empty result set");
            }
            PreviewError::TimeoutError(e) => {
                warn!(error = %e, "Request timed out");
            }
            PreviewError::ConnectionError(e) => {
                error!(error = %e, "Connection to preview service failed");
            }
            PreviewError::HttpStatus { status, message } => {
                error!(status = %status, error = %message, "Preview service returned an error status");
            }
            PreviewError::DecodeError(e) => {
                error!(error = %e, "Preview response could not be decoded");
            }
            PreviewError::FetchError(e) => {
                error!(error = %e, "Preview fetch failed");
            }
            PreviewError::InvalidEndpoint(e) => {
                error!(error = %e, "Preview endpoint is not a valid URL");
            }
            PreviewError::ClientBuildError(e) => {
                error!(error = %e, "HTTP client could not be created");
            }
        }
    }
}

impl From<reqwest::Error> for PreviewError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PreviewError::TimeoutError(e.to_string())
        } else if e.is_connect() {
            PreviewError::ConnectionError(e.to_string())
        } else if e.is_decode() {
            PreviewError::DecodeError(e.to_string())
        } else if let Some(status) = e.status() {
            PreviewError::HttpStatus {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            PreviewError::FetchError(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(PreviewError::NoValidUrls.kind(), ErrorKind::Validation);
        assert_eq!(PreviewError::EmptyResult.kind(), ErrorKind::Validation);
        assert_eq!(
            PreviewError::TimeoutError("slow".into()).kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            PreviewError::HttpStatus {
                status: 502,
                message: "bad gateway".into()
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(
            PreviewError::ClientBuildError("tls".into()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_user_messages_split_by_kind() {
        assert_eq!(
            PreviewError::EmptyResult.user_message(),
            PreviewError::NoValidUrls.user_message()
        );
        assert_ne!(
            PreviewError::DecodeError("eof".into()).user_message(),
            PreviewError::NoValidUrls.user_message()
        );
    }
}
