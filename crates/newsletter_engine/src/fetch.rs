use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use newsletter_logging::{pipeline_debug, pipeline_trace};
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::decode::decode_html;
use crate::types::{FetchError, RawContent};

const GOOGLE_DOCS_HOST: &str = "docs.google.com";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted as an HTML export; parameters are ignored.
    pub html_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            html_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

/// Loads the exported newsletter document as UTF-8 HTML.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawContent, FetchError>;
}

/// Rewrites a Google Docs editor or view link to its HTML export.
///
/// Published (`/document/d/e/...`) links and every other URL are returned as
/// given.
pub fn document_export_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
    if parsed.host_str() != Some(GOOGLE_DOCS_HOST) {
        return Ok(parsed);
    }
    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();
    match segments.as_slice() {
        ["document", "d", id, ..] if !id.is_empty() && *id != "e" => {
            let export = format!("https://{GOOGLE_DOCS_HOST}/document/d/{id}/export?format=html");
            Url::parse(&export).map_err(|err| FetchError::InvalidUrl(err.to_string()))
        }
        _ => Ok(parsed),
    }
}

/// HTTP fetcher holding one client for the whole run.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn is_html(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or(content_type).trim();
        self.settings
            .html_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(media_type))
    }

    fn too_large(&self) -> FetchError {
        FetchError::TooLarge {
            max_bytes: self.settings.max_bytes,
        }
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_redirect() {
            FetchError::TooManyRedirects {
                limit: self.settings.redirect_limit,
            }
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl ContentFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<RawContent, FetchError> {
        let export_url = document_export_url(url)?;
        pipeline_debug!("Fetching newsletter source {export_url}");

        let response = self
            .client
            .get(export_url.clone())
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
            });
        }
        if response
            .content_length()
            .is_some_and(|len| len > self.settings.max_bytes)
        {
            return Err(self.too_large());
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        if let Some(ct) = content_type.as_deref() {
            if !self.is_html(ct) {
                return Err(FetchError::NotHtml(ct.to_string()));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|err| self.map_reqwest_error(err))?;
            if bytes.len() as u64 + chunk.len() as u64 > self.settings.max_bytes {
                return Err(self.too_large());
            }
            bytes.extend_from_slice(&chunk);
            pipeline_trace!("Downloaded {} bytes from {export_url}", bytes.len());
        }

        let content = decode_html(&bytes, content_type.as_deref())
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        if content.html.trim().is_empty() {
            return Err(FetchError::EmptyDocument);
        }
        pipeline_debug!(
            "Decoded {} bytes from {export_url} as {}",
            bytes.len(),
            content.encoding_label
        );
        Ok(content)
    }
}
