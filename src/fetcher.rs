use crate::utils::truncate_str;
use crate::{PreviewError, PreviewFetcher, PreviewResult};
use async_trait::async_trait;
use reqwest::{header::HeaderMap, Client};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://link-preview-api-ts.herokuapp.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);
pub const PREVIEW_PATH: &str = "preview-urls";

pub const ENDPOINT_ENV: &str = "LINK_PREVIEW_ENDPOINT";
pub const TIMEOUT_ENV: &str = "LINK_PREVIEW_TIMEOUT_MS";

/// Error bodies longer than this are cut before they land in `HttpStatus`.
pub const MAX_ERROR_BODY_WIDTH: usize = 200;

#[derive(Debug, Serialize)]
struct PreviewRequest<'a> {
    urls: &'a str,
}

/// Joins URLs into the single string the preview service expects.
pub fn join_urls<S: AsRef<str>>(urls: &[S]) -> String {
    urls.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Client for the remote link-preview service.
///
/// Every call to [`Fetcher::fetch`] issues exactly one `POST {endpoint}/preview-urls`.
/// There is no retry and no backoff; the only bound is the client timeout.
#[derive(Clone, Debug)]
pub struct Fetcher {
    client: Client,
    preview_url: Url,
}

impl Fetcher {
    pub fn new() -> Result<Self, PreviewError> {
        Self::new_with_config(FetcherConfig::default())
    }

    pub fn new_with_config(config: FetcherConfig) -> Result<Self, PreviewError> {
        let preview_url = preview_url(&config.endpoint)?;

        let mut client_builder = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout);

        if let Some(headers) = config.headers {
            client_builder = client_builder.default_headers(headers);
        }

        let client = client_builder.build().map_err(|e| {
            error!(error = %e, "Failed to create HTTP client");
            PreviewError::ClientBuildError(e.to_string())
        })?;

        debug!(endpoint = %preview_url, timeout_ms = config.timeout.as_millis() as u64, "Fetcher initialized");
        Ok(Self {
            client,
            preview_url,
        })
    }

    pub fn with_client(client: Client, endpoint: &str) -> Result<Self, PreviewError> {
        Ok(Self {
            client,
            preview_url: preview_url(endpoint)?,
        })
    }

    pub fn preview_url(&self) -> &Url {
        &self.preview_url
    }

    #[instrument(level = "debug", skip(self), err)]
    pub async fn fetch(&self, urls: &[String]) -> Result<Vec<PreviewResult>, PreviewError> {
        if urls.is_empty() {
            return Err(PreviewError::NoValidUrls);
        }

        let joined = join_urls(urls);
        debug!(count = urls.len(), "Requesting previews");

        let response = self
            .client
            .post(self.preview_url.clone())
            .json(&PreviewRequest { urls: &joined })
            .send()
            .await
            .map_err(|e| {
                let err = PreviewError::from(e);
                err.log();
                err
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, status = %status, "Failed to read error response body");
                    String::new()
                }
            };
            warn!(status = %status, "Preview service rejected request");
            let body = body.trim();
            return Err(PreviewError::HttpStatus {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.canonical_reason().unwrap_or("unknown status").to_string()
                } else {
                    truncate_str(body, MAX_ERROR_BODY_WIDTH)
                },
            });
        }

        let body = response.bytes().await.map_err(PreviewError::from)?;
        let results: Vec<PreviewResult> = serde_json::from_slice(&body).map_err(|e| {
            error!(error = %e, "Preview response is not a list of previews");
            PreviewError::DecodeError(e.to_string())
        })?;

        if results.is_empty() {
            debug!("Preview service found nothing to preview");
            return Err(PreviewError::EmptyResult);
        }

        debug!(count = results.len(), "Successfully fetched previews");
        Ok(results)
    }
}

#[async_trait]
impl PreviewFetcher for Fetcher {
    async fn fetch_previews(&self, urls: &[String]) -> Result<Vec<PreviewResult>, PreviewError> {
        self.fetch(urls).await
    }
}

fn preview_url(endpoint: &str) -> Result<Url, PreviewError> {
    let mut base = Url::parse(endpoint)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(PREVIEW_PATH)?)
}

/// Settings for [`Fetcher`].
///
/// # Examples
/// ```ignore
/// let fetcher = Fetcher::new_with_config(
///     FetcherConfig::from_env()
///         .with_endpoint("http://127.0.0.1:8080")
///         .with_timeout(Duration::from_secs(5)),
/// )?;
/// ```
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: Option<HeaderMap>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("link-previewer/", env!("CARGO_PKG_VERSION")).to_string(),
            headers: None,
        }
    }
}

impl FetcherConfig {
    /// Defaults overlaid with `LINK_PREVIEW_ENDPOINT` and `LINK_PREVIEW_TIMEOUT_MS`.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    fn overlay<F: Fn(&str) -> Option<String>>(mut self, lookup: F) -> Self {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.trim().is_empty()) {
            self.endpoint = endpoint.trim().to_string();
        }
        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => self.timeout = Duration::from_millis(ms),
                _ => warn!(value = %raw, "Ignoring invalid {}", TIMEOUT_ENV),
            }
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }
}
