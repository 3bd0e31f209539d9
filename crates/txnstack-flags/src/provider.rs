//! Flag provider seam and the HTTP implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use crate::error::FlagError;

/// Provider reference type
pub type ProviderRef = Arc<dyn FlagProvider>;

/// Flags registered under one namespace, with their static defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagRegistration {
    pub namespace: String,
    pub flags: BTreeMap<String, bool>,
}

impl FlagRegistration {
    /// Fully-qualified flag names (`namespace.flag`)
    pub fn qualified_names(&self) -> Vec<String> {
        self.flags
            .keys()
            .map(|name| format!("{}.{}", self.namespace, name))
            .collect()
    }
}

/// Remote configuration service holding flag values
#[async_trait]
pub trait FlagProvider: Send + Sync {
    /// One-time handshake; registers flags and their defaults
    async fn setup(&self, registration: &FlagRegistration) -> Result<(), FlagError>;

    /// Current values keyed by qualified flag name
    async fn fetch(&self) -> Result<HashMap<String, bool>, FlagError>;

    /// Release provider resources
    async fn shutdown(&self);
}

#[derive(Debug, Deserialize)]
struct FlagsResponse {
    #[serde(default)]
    flags: HashMap<String, bool>,
}

/// Talks to a flag service over HTTP.
///
/// - setup: `POST {base}/v1/flags/register` with the registration as JSON
/// - fetch: `GET {base}/v1/flags`, expecting `{"flags": {"api.advancedFilters": true}}`
///
/// Both requests carry the API key in `X-API-Key`.
pub struct HttpFlagProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpFlagProvider {
    pub const API_KEY_HEADER: &'static str = "X-API-Key";

    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, FlagError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FlagError::Client { message: e.to_string() })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, url: String, request: reqwest::RequestBuilder) -> Result<reqwest::Response, FlagError> {
        let response = request
            .header(Self::API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|source| FlagError::Request { url: url.clone(), source })?;

        if !response.status().is_success() {
            return Err(FlagError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl FlagProvider for HttpFlagProvider {
    async fn setup(&self, registration: &FlagRegistration) -> Result<(), FlagError> {
        let url = self.url("/v1/flags/register");
        let request = self.client.post(&url).json(registration);
        self.send(url, request).await?;
        Ok(())
    }

    async fn fetch(&self) -> Result<HashMap<String, bool>, FlagError> {
        let url = self.url("/v1/flags");
        let request = self.client.get(&url);
        let response = self.send(url, request).await?;

        let body: FlagsResponse = response
            .json()
            .await
            .map_err(|e| FlagError::InvalidResponse { message: e.to_string() })?;

        Ok(body.flags)
    }

    async fn shutdown(&self) {
        log::debug!("HTTP flag provider for {} released", self.base_url);
    }
}
