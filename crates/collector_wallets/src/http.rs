//! Outbound HTTP and response-field extraction.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::WalletError;

/// The HTTP surface adapters need: GET a URL as JSON or as raw text.
///
/// Production code uses [`ReqwestFetcher`]; tests inject canned responses.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, WalletError>;

    async fn get_text(&self, url: &str) -> Result<String, WalletError>;
}

/// [`HttpFetch`] over a shared `reqwest` client with a per-request timeout.
#[derive(Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// Fails if the TLS backend cannot be initialised. There is no fallback
    /// client: every request must carry `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    fn map_reqwest_error(url: &str, e: reqwest::Error) -> WalletError {
        if e.is_timeout() {
            WalletError::UpstreamUnavailable(format!("request to {url} timed out"))
        } else if e.is_connect() {
            WalletError::UpstreamUnavailable(format!("connection to {url} failed: {e}"))
        } else {
            WalletError::UpstreamUnavailable(format!("request to {url} failed: {e}"))
        }
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetcher {
    async fn get_json(&self, url: &str) -> Result<Value, WalletError> {
        let body = self.get_text(url).await?;
        serde_json::from_str(&body)
            .map_err(|e| WalletError::UpstreamParse(format!("{url} returned invalid JSON: {e}")))
    }

    async fn get_text(&self, url: &str) -> Result<String, WalletError> {
        debug!(url = %url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WalletError::UpstreamUnavailable(format!(
                "{url} returned {status}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| Self::map_reqwest_error(url, e))
    }
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

/// Read the number at JSON `pointer` (e.g. `/data/0/rates/BTC`).
///
/// Explorers disagree on whether amounts are JSON numbers or numeric strings;
/// both are accepted.
pub fn number_at(body: &Value, pointer: &str) -> Result<f64, WalletError> {
    let field = body
        .pointer(pointer)
        .ok_or_else(|| WalletError::UpstreamParse(format!("missing field {pointer}")))?;
    match field {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| WalletError::UpstreamParse(format!("{pointer} is not a finite number"))),
        Value::String(s) => parse_number(s),
        other => Err(WalletError::UpstreamParse(format!(
            "{pointer} is not numeric: {other}"
        ))),
    }
}

/// Parse a raw response body (or string field) holding a single number.
pub fn parse_number(text: &str) -> Result<f64, WalletError> {
    let trimmed = text.trim();
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() => Ok(n),
        _ => Err(WalletError::UpstreamParse(format!(
            "expected a number, got {trimmed:?}"
        ))),
    }
}

/// Read the array at JSON `pointer`, preserving upstream order.
pub fn array_at(body: &Value, pointer: &str) -> Result<Vec<Value>, WalletError> {
    match body.pointer(pointer) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(WalletError::UpstreamParse(format!(
            "{pointer} is not an array: {other}"
        ))),
        None => Err(WalletError::UpstreamParse(format!("missing field {pointer}"))),
    }
}
