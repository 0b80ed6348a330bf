//! EIA v2 API integration for electric power operational data.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::data::envelope::{response_data, response_total};
use crate::domain::FetchWindow;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str =
    "https://api.eia.gov/v2/electricity/electric-power-operational-data/data/";

const API_KEY_VAR: &str = "EIA_API_KEY";
/// Unprefixed name read by earlier `.env` files; used when `EIA_API_KEY` is unset or blank.
const LEGACY_API_KEY_VAR: &str = "API_KEY";
const BASE_URL_VAR: &str = "EIA_BASE_URL";

const FREQUENCY: &str = "monthly";
const DATA_FIELD: &str = "cost";
const SORT_COLUMN: &str = "period";

/// Longest error body echoed back in a transport error.
const ERROR_BODY_PREVIEW: usize = 200;

/// Credential and endpoint for the EIA API.
#[derive(Clone)]
pub struct EiaConfig {
    api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

impl EiaConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self, AppError> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(AppError::config(format!(
                "Missing {API_KEY_VAR} (or {LEGACY_API_KEY_VAR}) in environment (.env)."
            )));
        }
        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        })
    }

    /// Read the credential (and optionally `EIA_BASE_URL`) from the environment,
    /// loading `.env` first if present.
    ///
    /// `EIA_API_KEY` wins over `API_KEY` when both are set and non-blank.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_key = [API_KEY_VAR, LEGACY_API_KEY_VAR]
            .into_iter()
            .filter_map(&lookup)
            .find(|key| !key.trim().is_empty())
            .unwrap_or_default();
        let mut config = Self::new(api_key)?;
        if let Some(url) = lookup(BASE_URL_VAR) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for EiaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EiaConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// One fetched page and the offset it was requested at.
#[derive(Debug, Clone)]
pub struct Page {
    pub offset: usize,
    pub document: Value,
}

pub struct EiaClient {
    client: Client,
    config: EiaConfig,
}

impl EiaClient {
    pub fn new(config: EiaConfig) -> Result<Self, AppError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Fetch the configured window.
    ///
    /// Without `all_pages` this is exactly one request. With it, pages are
    /// requested until one comes back empty, malformed, or the API's `total`
    /// has been reached.
    pub fn fetch(&self, window: &FetchWindow) -> Result<Vec<Page>, AppError> {
        let mut pages = Vec::new();
        let mut offset = window.offset;

        loop {
            let document = self.fetch_page(window, offset)?;
            let next = next_offset(&document, offset, window.length);
            pages.push(Page { offset, document });

            match next {
                Some(next) if window.all_pages => offset = next,
                _ => break,
            }
        }

        if let Some(last) = pages.last() {
            warn_if_truncated(last);
        }
        Ok(pages)
    }

    fn fetch_page(&self, window: &FetchWindow, offset: usize) -> Result<Value, AppError> {
        let params = build_query(&self.config.api_key, window, offset);
        debug!(url = %self.config.base_url, offset, length = window.length, "requesting page");

        // `without_url` keeps the api_key query parameter out of error messages.
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .map_err(|e| AppError::transport(format!("EIA request failed: {}", e.without_url())))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| {
            AppError::transport(format!("Failed to read EIA response body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(AppError::transport(format!(
                "EIA request failed with status {status}: {preview}"
            )));
        }

        let document = parse_document(&body)?;
        let records = response_data(&document).map(<[Value]>::len).unwrap_or(0);
        info!(offset, records, total = ?response_total(&document), "fetched page");
        Ok(document)
    }
}

/// Query parameters for one page request.
pub fn build_query(api_key: &str, window: &FetchWindow, offset: usize) -> Vec<(&'static str, String)> {
    vec![
        ("api_key", api_key.to_string()),
        ("frequency", FREQUENCY.to_string()),
        ("data[0]", DATA_FIELD.to_string()),
        ("start", window.start.to_string()),
        ("end", window.end.to_string()),
        ("sort[0][column]", SORT_COLUMN.to_string()),
        ("sort[0][direction]", window.sort_direction.as_str().to_string()),
        ("offset", offset.to_string()),
        ("length", window.length.to_string()),
    ]
}

pub fn parse_document(body: &str) -> Result<Value, AppError> {
    serde_json::from_str(body)
        .map_err(|e| AppError::response(format!("Failed to parse EIA response: {e}")))
}

/// Offset of the page after `document`, or `None` if this was the last one.
fn next_offset(document: &Value, offset: usize, length: usize) -> Option<usize> {
    let received = response_data(document).ok()?.len();
    if received == 0 {
        return None;
    }
    let next = offset.checked_add(received)?;
    match response_total(document) {
        Some(total) if next >= total => None,
        Some(_) => Some(next),
        // No total to go by: a short page is the last page.
        None if received < length => None,
        None => Some(next),
    }
}

fn warn_if_truncated(last: &Page) {
    let Ok(data) = response_data(&last.document) else {
        return;
    };
    let Some(total) = response_total(&last.document) else {
        return;
    };
    let reached = last.offset.saturating_add(data.len());
    if reached < total {
        warn!(
            fetched_through = reached,
            total, "result set truncated; pass --all-pages to fetch the remainder"
        );
    }
}
