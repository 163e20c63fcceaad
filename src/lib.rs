use async_trait::async_trait;
use serde::{Deserialize, Serialize};

mod clipboard;
mod error;
mod extractor;
mod fetcher;
#[cfg(feature = "logging")]
mod logging;
mod notification;
mod render;
mod session;
mod state;
mod utils;

#[cfg(feature = "clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{ClipboardProvider, NoClipboard, StaticClipboard};
pub use error::{ErrorKind, PreviewError};
pub use extractor::{extract_urls, UrlExtractor};
pub use fetcher::{
    join_urls, Fetcher, FetcherConfig, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT, ENDPOINT_ENV,
    MAX_ERROR_BODY_WIDTH, PREVIEW_PATH, TIMEOUT_ENV,
};
#[cfg(feature = "logging")]
pub use logging::{log_error_card, log_preview_card, setup_logging, LogConfig, LogLevelGuard};
pub use notification::{
    Notification, NotificationKind, Notifications, DEFAULT_TOAST_DURATION, INVALID_URLS_MESSAGE,
    REQUEST_FAILED_MESSAGE,
};
pub use render::{render_card, render_cards, CardStyle, ERROR_BANNER, FALLBACK_IMAGE_URL};
pub use session::{PreviewSession, SessionConfig, SubmitOutcome, SubmitTicket};
pub use state::UiState;
pub use utils::truncate_str;

/// Metadata the preview service returns for a single URL.
///
/// Missing or `null` fields come through as empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewResult {
    #[serde(default, deserialize_with = "utils::null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "utils::null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "utils::null_as_empty")]
    pub favicon: String,
    #[serde(default, deserialize_with = "utils::null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "utils::null_as_empty")]
    pub image: String,
}

/// Anything that can turn a set of URLs into previews with a single request.
#[async_trait]
pub trait PreviewFetcher {
    async fn fetch_previews(&self, urls: &[String]) -> Result<Vec<PreviewResult>, PreviewError>;
}
