//! Synchronous client for the **ArcGIS COVID-19 case feature layer**.
//!
//! The dashboard needs exactly one snapshot per run, so the client issues a
//! single `query` request selecting every feature and every field in
//! WGS84 (`outSR=4326`) and hands back the parsed JSON document.
//!
//! ### Notes
//! - One attempt only: any network error, HTTP error
//!   status or non-JSON body is returned as an error.
//! - ArcGIS reports query failures as HTTP 200 with an `{"error": {...}}`
//!   body. These are surfaced as errors as well.
//! - Network timeouts default to 30s and can be changed with [`Client::with_timeout`].
//!
//! Typical usage:
//! ```no_run
//! # use cdash_rs::api::{Client, FeatureSource};
//! let client = Client::default();
//! let doc = client.load()?;
//! let records = cdash_rs::transform::records_from_json(&doc)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result, bail};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Feature layer holding the per-province case counts.
pub const DEFAULT_LAYER_URL: &str = "https://services1.arcgis.com/0MSEUqKaxRlEPj5g/arcgis/rest/services/Coronavirus_2019_nCoV_Cases/FeatureServer/1";

/// Fixed query: all rows, all fields, WGS84 coordinates, JSON output.
const QUERY_PARAMS: [(&str, &str); 4] = [
    ("where", "1=1"),
    ("outFields", "*"),
    ("outSR", "4326"),
    ("f", "json"),
];

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Anything that can produce the raw feature document.
///
/// The network client is the production source; [`FileSource`] replays a
/// saved response so the rest of the pipeline runs offline.
pub trait FeatureSource {
    fn load(&self) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_timeout(DEFAULT_LAYER_URL, DEFAULT_TIMEOUT)
            .expect("reqwest client build")
    }
}

// Allow -, _, ., * unescaped (`outFields=*` is sent literally)
const SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

fn enc(s: &str) -> String {
    percent_encoding::utf8_percent_encode(s.trim(), SAFE).to_string()
}

impl Client {
    /// Client for a given layer URL with a custom total request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(timeout) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("cdash_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full query URL, e.g. `.../FeatureServer/1/query?where=1%3D1&outFields=*&outSR=4326&f=json`.
    pub fn query_url(&self) -> String {
        let query = QUERY_PARAMS
            .iter()
            .map(|(k, v)| format!("{}={}", k, enc(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}/query?{}", self.base_url, query)
    }

    /// Issue the single GET and decode the body as JSON.
    pub fn fetch_json(&self) -> Result<Value> {
        let url = self.query_url();
        log::debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("request failed with HTTP {} (GET {})", status, url);
        }
        let v: Value = resp.json().context("decode json")?;
        check_api_error(&v)?;
        Ok(v)
    }
}

impl FeatureSource for Client {
    fn load(&self) -> Result<Value> {
        self.fetch_json()
    }
}

/// Replays a previously saved query response from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeatureSource for FileSource {
    fn load(&self) -> Result<Value> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("read {}", self.path.display()))?;
        let v: Value = serde_json::from_str(&text)
            .with_context(|| format!("parse json from {}", self.path.display()))?;
        check_api_error(&v)?;
        Ok(v)
    }
}

/// Surface an ArcGIS error payload (`{"error": {"code": ..., "message": ...}}`).
pub fn check_api_error(v: &Value) -> Result<()> {
    if let Some(err) = v.get("error") {
        let code = err.get("code").and_then(Value::as_i64);
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        match code {
            Some(c) => bail!("arcgis api error {}: {}", c, message),
            None => bail!("arcgis api error: {}", message),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_url_matches_layer_query() {
        let c = Client::with_timeout("https://example.test/FeatureServer/1/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(
            c.query_url(),
            "https://example.test/FeatureServer/1/query?where=1%3D1&outFields=*&outSR=4326&f=json"
        );
    }

    #[test]
    fn error_payload_is_rejected() {
        let v = json!({"error": {"code": 400, "message": "Invalid query", "details": []}});
        let err = check_api_error(&v).unwrap_err();
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("Invalid query"));
        assert!(check_api_error(&json!({"features": []})).is_ok());
    }
}
