use crate::clipboard::ClipboardProvider;
use crate::extractor::UrlExtractor;
use crate::fetcher::join_urls;
use crate::notification::{
    Notification, NotificationKind, Notifications, DEFAULT_TOAST_DURATION, INVALID_URLS_MESSAGE,
};
use crate::state::UiState;
use crate::{ErrorKind, PreviewError, PreviewFetcher, PreviewResult};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub toast_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

impl SessionConfig {
    pub fn with_toast_duration(mut self, toast_duration: Duration) -> Self {
        self.toast_duration = toast_duration;
        self
    }
}

/// Handle for one in-flight request. Only the ticket from the most recent
/// submit can complete it; older tickets are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    urls: Vec<String>,
}

impl SubmitTicket {
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No URL in the input; nothing was sent.
    Rejected,
    /// A newer submit or a clear happened while this request was in flight.
    Superseded,
    Succeeded(usize),
    Failed(ErrorKind),
}

/// All state behind the previewer front-end.
///
/// The session owns the input text, the [`UiState`], the clipboard "paste"
/// affordance and the toast queue. Every transition goes through a method here.
pub struct PreviewSession<F> {
    fetcher: F,
    extractor: UrlExtractor,
    input: String,
    state: UiState,
    clipboard_urls: Vec<String>,
    notifications: Notifications,
    last_error: Option<PreviewError>,
    generation: u64,
}

impl<F: PreviewFetcher> PreviewSession<F> {
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, SessionConfig::default())
    }

    pub fn with_config(fetcher: F, config: SessionConfig) -> Self {
        Self {
            fetcher,
            extractor: UrlExtractor::new(),
            input: String::new(),
            state: UiState::Idle,
            clipboard_urls: Vec::new(),
            notifications: Notifications::new(config.toast_duration),
            last_error: None,
            generation: 0,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn results(&self) -> &[PreviewResult] {
        self.state.results()
    }

    pub fn clipboard_urls(&self) -> &[String] {
        &self.clipboard_urls
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// The error behind the current `Error` state, if any.
    pub fn last_error(&self) -> Option<&PreviewError> {
        self.last_error.as_ref()
    }

    pub fn active_notifications(&mut self, now: Instant) -> Vec<Notification> {
        self.notifications.active(now).cloned().collect()
    }

    pub fn can_paste(&self) -> bool {
        !self.clipboard_urls.is_empty() && !self.state.is_error()
    }

    pub fn can_clear(&self) -> bool {
        !self.results().is_empty() && !self.state.is_error()
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.notifications.dismiss_all();
        self.input = text.into();
    }

    /// Scans the clipboard for URLs to offer as a paste.
    ///
    /// Never touches the input. A failed or empty read leaves any earlier
    /// offer in place.
    pub fn focus(&mut self, clipboard: &mut dyn ClipboardProvider) -> &[String] {
        if let Some(text) = clipboard.read_text() {
            let urls = self.extractor.extract(&text);
            if !urls.is_empty() {
                debug!(count = urls.len(), "Found URLs on clipboard");
                self.clipboard_urls = urls;
            }
        }
        &self.clipboard_urls
    }

    /// Validates the input and, if it holds at least one URL, moves to
    /// `Loading` and hands out the ticket for the request.
    pub fn begin_submit(&mut self, now: Instant) -> Option<SubmitTicket> {
        self.notifications.dismiss_all();

        let urls = self.extractor.extract(&self.input);
        if urls.is_empty() {
            debug!("Submit rejected: no valid URLs in input");
            self.notifications
                .push(NotificationKind::Validation, INVALID_URLS_MESSAGE, now);
            return None;
        }

        self.generation += 1;
        self.last_error = None;
        self.state = UiState::Loading;
        debug!(generation = self.generation, count = urls.len(), "Submit accepted");

        Some(SubmitTicket {
            generation: self.generation,
            urls,
        })
    }

    /// Applies the response for `ticket` unless something newer replaced it.
    pub fn complete(
        &mut self,
        ticket: SubmitTicket,
        result: Result<Vec<PreviewResult>, PreviewError>,
        now: Instant,
    ) -> SubmitOutcome {
        if ticket.generation != self.generation || !self.state.is_loading() {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                state = self.state.name(),
                "Dropping stale response"
            );
            return SubmitOutcome::Superseded;
        }

        let result = result.and_then(|results| {
            if results.is_empty() {
                Err(PreviewError::EmptyResult)
            } else {
                Ok(results)
            }
        });

        match result {
            Ok(results) => {
                let count = results.len();
                info!(count, "Previews ready");
                self.state = UiState::Success(results);
                SubmitOutcome::Succeeded(count)
            }
            Err(e) => {
                e.log();
                let kind = e.kind();
                self.state = UiState::Error;
                let toast_kind = match kind {
                    ErrorKind::Validation => NotificationKind::Validation,
                    ErrorKind::Transport | ErrorKind::Config => {
                        self.input.clear();
                        NotificationKind::RequestFailed
                    }
                };
                self.notifications.push(toast_kind, e.user_message(), now);
                self.last_error = Some(e);
                SubmitOutcome::Failed(kind)
            }
        }
    }

    /// Submits the current input and waits for the response.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Some(ticket) = self.begin_submit(Instant::now()) else {
            return SubmitOutcome::Rejected;
        };
        let result = self.fetcher.fetch_previews(ticket.urls()).await;
        self.complete(ticket, result, Instant::now())
    }

    /// Replaces the input with the URLs found on the clipboard and submits them.
    ///
    /// Only available while [`can_paste`](Self::can_paste) holds; otherwise
    /// nothing changes and `Rejected` is returned.
    pub async fn paste_clipboard_urls(&mut self) -> SubmitOutcome {
        if !self.can_paste() {
            debug!(state = self.state.name(), "Paste not available");
            return SubmitOutcome::Rejected;
        }
        let joined = join_urls(&self.clipboard_urls);
        self.set_input(joined);
        self.submit().await
    }

    /// Back to an empty idle session. Any request still in flight is abandoned.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.input.clear();
        self.state = UiState::Idle;
        self.last_error = None;
        self.notifications.dismiss_all();
        debug!("Session cleared");
    }

    /// URL to open for the card at `index`.
    pub fn open_target(&self, index: usize) -> Option<&str> {
        self.results()
            .get(index)
            .map(|r| r.url.as_str())
            .filter(|url| !url.is_empty())
    }
}
