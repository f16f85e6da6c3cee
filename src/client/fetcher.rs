//! Resource fetching: REST path + query → parsed XML document.

use reqwest::blocking::{Client, ClientBuilder};
use tracing::debug;

use crate::client::config::{ClientConfig, USER_AGENT};
use crate::error::{Result, SdwError};
use crate::xml::XmlDocument;

/// Query string parameters; absent values are left out of the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    params: Vec<(&'static str, Option<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<V: ToString>(mut self, name: &'static str, value: Option<V>) -> Self {
        self.params.push((name, value.map(|v| v.to_string())));
        self
    }

    /// Parameters that actually have a value, in insertion order.
    pub fn present(&self) -> Vec<(&'static str, &str)> {
        self.params
            .iter()
            .filter_map(|(name, value)| value.as_deref().map(|v| (*name, v)))
            .collect()
    }
}

/// Performs the network call for a resource and hands back the document.
///
/// The parsers only ever see the returned document, so tests substitute a
/// stub implementation.
pub trait ResourceFetcher {
    fn fetch(&self, resource_path: &str, query: &QueryParams) -> Result<XmlDocument>;
}

/// `ResourceFetcher` over HTTPS using a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::from_builder(Self::builder(config), config)
    }

    /// Client builder preset with the user agent and timeout from `config`.
    pub fn builder(config: &ClientConfig) -> ClientBuilder {
        Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
    }

    /// Build from a caller-adjusted builder (proxies, TLS roots, ...).
    pub fn from_builder(builder: ClientBuilder, config: &ClientConfig) -> Result<Self> {
        let client = builder
            .build()
            .map_err(|e| SdwError::Transport(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn url(&self, resource_path: &str) -> String {
        format!("{}/{}", self.base_url, resource_path.trim_start_matches('/'))
    }
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(&self, resource_path: &str, query: &QueryParams) -> Result<XmlDocument> {
        let url = self.url(resource_path);
        let params = query.present();
        debug!(%url, ?params, "GET");

        let resp = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .map_err(|e| SdwError::Transport(format!("Request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            // An unreadable error body must not hide the status.
            let body = resp.text().unwrap_or_default();
            return Err(SdwError::http(status.as_u16(), body));
        }

        let body = resp.text().map_err(|e| {
            SdwError::Transport(format!("Failed to read response from {url}: {e}"))
        })?;

        debug!(%url, bytes = body.len(), "response received");
        XmlDocument::parse(&body)
    }
}
