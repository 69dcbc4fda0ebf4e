//! HTTP implementation of [`FhirStore`]
//!
//! One immutable `reqwest::Client` per store, with the configured timeout
//! applied to every request. No retries: a failed call is reported once and
//! the caller decides what to do with it.

use super::models::{Bundle, FHIR_JSON};
use super::store::FhirStore;
use crate::config::FhirConfig;
use crate::domain::{ClinisyncError, DocumentNumber, GatewayError, ResourceId, ResourceType, Result};
use crate::log_gateway_failure;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// FHIR store reached over HTTP
///
/// # Example
///
/// ```no_run
/// use clinisync::adapters::fhir::{FhirStore, HttpFhirStore};
/// use clinisync::config::FhirConfig;
/// use clinisync::domain::ResourceType;
/// use serde_json::json;
///
/// # async fn example() -> clinisync::domain::Result<()> {
/// let store = HttpFhirStore::new(&FhirConfig::default())?;
/// let ok = store
///     .upsert(ResourceType::Patient, "pac-123", &json!({"resourceType": "Patient", "id": "pac-123"}))
///     .await;
/// # Ok(())
/// # }
/// ```
pub struct HttpFhirStore {
    /// Base URL without trailing slash
    base_url: String,

    /// HTTP client for making requests
    client: Client,

    /// Precomputed `Authorization` header value
    auth_header: Option<String>,
}

impl HttpFhirStore {
    /// Create a new store from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &FhirConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);

        let mut client_builder = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout);

        if !config.tls_verify {
            tracing::warn!("TLS certificate verification disabled for FHIR server");
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ClinisyncError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let auth_header = match (&config.username, &config.password) {
            (Some(username), Some(password)) => {
                let credentials = format!("{username}:{}", password.expose_secret().as_ref());
                let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                Some(format!("Basic {encoded}"))
            }
            _ => None,
        };

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            auth_header,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether requests carry Basic credentials
    pub fn is_authenticated(&self) -> bool {
        self.auth_header.is_some()
    }

    /// Verify the server is reachable by fetching its capability statement
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] if `GET {base}/metadata` does not answer 200.
    pub async fn check(&self) -> std::result::Result<(), GatewayError> {
        let url = format!("{}/metadata", self.base_url);
        tracing::debug!(url = %url, "Checking FHIR server");

        let result = self.get_metadata(&url).await;

        if let Err(ref e) = result {
            log_gateway_failure!("GET", url, e);
        }
        result
    }

    async fn get_metadata(&self, url: &str) -> std::result::Result<(), GatewayError> {
        let resp = self
            .authorize(self.client.get(url))
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match resp.status() {
            StatusCode::OK => Ok(()),
            status => Err(bad_status(status, resp).await),
        }
    }

    async fn put_resource(
        &self,
        url: &str,
        document: &Value,
    ) -> std::result::Result<u16, GatewayError> {
        let body = serde_json::to_vec(document)
            .map_err(|e| GatewayError::Decode(format!("Unserializable document: {e}")))?;

        let resp = self
            .authorize(self.client.put(url))
            .header(CONTENT_TYPE, FHIR_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        match resp.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(resp.status().as_u16()),
            status => Err(bad_status(status, resp).await),
        }
    }

    async fn search(&self, url: &str) -> std::result::Result<Vec<Value>, GatewayError> {
        let resp = self
            .authorize(self.client.get(url))
            .header(ACCEPT, FHIR_JSON)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if resp.status() != StatusCode::OK {
            return Err(bad_status(resp.status(), resp).await);
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let bundle: Bundle =
            serde_json::from_slice(&bytes).map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(bundle.entry)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.auth_header {
            Some(ref auth) => request.header(AUTHORIZATION, auth),
            None => request,
        }
    }
}

async fn bad_status(status: StatusCode, resp: reqwest::Response) -> GatewayError {
    GatewayError::BadStatus {
        status: status.as_u16(),
        body: resp.text().await.unwrap_or_default(),
    }
}

#[async_trait]
impl FhirStore for HttpFhirStore {
    async fn try_upsert(
        &self,
        resource_type: ResourceType,
        id: &str,
        document: &Value,
    ) -> std::result::Result<u16, GatewayError> {
        let url = format!("{}/{}/{}", self.base_url, resource_type, id);
        tracing::debug!(url = %url, resource_type = %resource_type, id = %id, "PUT resource");

        let result = self.put_resource(&url, document).await;

        if let Err(ref e) = result {
            log_gateway_failure!("PUT", url, e);
        }
        result
    }

    async fn try_query(
        &self,
        resource_type: ResourceType,
        document: &DocumentNumber,
    ) -> std::result::Result<Vec<Value>, GatewayError> {
        let subject = ResourceId::patient(document).reference();
        let url = format!("{}/{}?subject={}", self.base_url, resource_type, subject);
        tracing::debug!(url = %url, resource_type = %resource_type, "Search resources");

        let result = self.search(&url).await;

        match result {
            Ok(ref entries) => {
                tracing::debug!(
                    resource_type = %resource_type,
                    count = entries.len(),
                    "Search returned entries"
                );
            }
            Err(ref e) => {
                log_gateway_failure!("GET", url, e);
            }
        }
        result
    }
}
