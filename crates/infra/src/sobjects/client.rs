//! sObject REST client
//!
//! Thin wrapper over `/services/data/{version}`:
//! - Reads the current credential before every call
//! - Sends exactly one request with `Authorization: Bearer ...`
//! - Fails any status above 299 with the response record as message

use std::sync::Arc;
use std::time::Duration;

use forcelink_common::auth::JwtBearerService;
use forcelink_domain::constants::DATA_PATH;
use forcelink_domain::{
    ApiConfig, Credential, ForceError, QueryResponse, Record, Result, SaveResult, SearchResponse,
};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use url::Url;

use super::provider::CredentialProvider;
use super::response::ResponseRecord;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Client for the sObject REST API
pub struct SObjectClient<P = JwtBearerService>
where
    P: CredentialProvider,
{
    provider: Arc<P>,
    http: HttpClient,
    api: ApiConfig,
    fallback_base_url: String,
}

impl<P: CredentialProvider> Clone for SObjectClient<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            http: self.http.clone(),
            api: self.api.clone(),
            fallback_base_url: self.fallback_base_url.clone(),
        }
    }
}

impl<P: CredentialProvider> std::fmt::Debug for SObjectClient<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SObjectClient")
            .field("api", &self.api)
            .field("fallback_base_url", &self.fallback_base_url)
            .finish_non_exhaustive()
    }
}

/// Successful response: status and raw body
struct ApiResponse {
    record: ResponseRecord,
    body: Vec<u8>,
}

impl<P: CredentialProvider> SObjectClient<P> {
    /// Create a client.
    ///
    /// # Arguments
    /// * `provider` - Source of the bearer credential
    /// * `api` - API version, request logging, timeout and client name
    /// * `fallback_base_url` - Used when the credential carries no
    ///   `instance_url`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        provider: Arc<P>,
        api: ApiConfig,
        fallback_base_url: impl Into<String>,
    ) -> Result<Self> {
        let mut builder = HttpClient::builder().timeout(Duration::from_secs(api.timeout_secs));
        if let Some(name) = &api.client_name {
            builder = builder.call_options_client(name.as_str());
        }
        let http = builder.build()?;
        Ok(Self::with_http_client(provider, api, fallback_base_url, http))
    }

    /// Create a client around an existing [`HttpClient`].
    #[must_use]
    pub fn with_http_client(
        provider: Arc<P>,
        api: ApiConfig,
        fallback_base_url: impl Into<String>,
        http: HttpClient,
    ) -> Self {
        Self { provider, http, api, fallback_base_url: fallback_base_url.into() }
    }

    #[must_use]
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    /// Create a record: `POST /sobjects/{object}`.
    ///
    /// # Errors
    /// `ForceError::Api` for a status above 299 or an undecodable body;
    /// `ForceError::Auth` / `ForceError::Network` from the credential and
    /// transport.
    #[instrument(skip(self, data))]
    pub async fn post_object<T>(&self, object: &str, data: &T) -> Result<SaveResult>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = to_json_value(data)?;
        let response =
            self.execute(Method::POST, &["sobjects", object], &[], Some(&body)).await?;
        let result: SaveResult = decode(&response)?;
        info!(id = %result.id, success = result.success, "Created record");
        Ok(result)
    }

    /// Fetch selected fields of a record: `GET /sobjects/{object}/{id}/?fields=a,b`.
    ///
    /// # Errors
    /// See [`SObjectClient::post_object`].
    #[instrument(skip(self, fields))]
    pub async fn get_object(
        &self,
        object: &str,
        id: &str,
        fields: &[&str],
    ) -> Result<Map<String, Value>> {
        let query = [("fields".to_string(), fields.join(","))];
        let response =
            self.execute(Method::GET, &["sobjects", object, id, ""], &query, None).await?;
        decode_map(&response)
    }

    /// Update a record: `PATCH /sobjects/{object}/{id}`.
    ///
    /// # Errors
    /// See [`SObjectClient::post_object`].
    #[instrument(skip(self, data))]
    pub async fn patch_object<T>(&self, object: &str, id: &str, data: &T) -> Result<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let body = to_json_value(data)?;
        self.execute(Method::PATCH, &["sobjects", object, id], &[], Some(&body)).await?;
        info!("Updated record");
        Ok(())
    }

    /// Delete a record: `DELETE /sobjects/{object}/{id}`.
    ///
    /// Returns the decoded body, or an empty map for the usual empty 204.
    ///
    /// # Errors
    /// See [`SObjectClient::post_object`].
    #[instrument(skip(self))]
    pub async fn delete_object(&self, object: &str, id: &str) -> Result<Map<String, Value>> {
        let response =
            self.execute(Method::DELETE, &["sobjects", object, id], &[], None).await?;
        info!("Deleted record");
        decode_map(&response)
    }

    /// Search one object type: `GET /parameterizedSearch/`.
    ///
    /// # Errors
    /// `ForceError::Api` when the body has no `searchRecords` array, plus the
    /// errors of [`SObjectClient::post_object`].
    #[instrument(skip(self, query, fields))]
    pub async fn search_object(
        &self,
        object: &str,
        query: &str,
        fields: &[&str],
        limit: u32,
    ) -> Result<Vec<Record>> {
        let params = [
            ("q".to_string(), query.to_string()),
            ("sobject".to_string(), object.to_string()),
            (format!("{object}.fields"), fields.join(",")),
            (format!("{object}.limit"), limit.to_string()),
        ];
        let response =
            self.execute(Method::GET, &["parameterizedSearch", ""], &params, None).await?;
        let search: SearchResponse =
            decode(&response).map_err(|_| response.record.clone().into_error())?;
        Ok(search.search_records)
    }

    /// Run a SOQL query: `GET /query/?q=...`.
    ///
    /// Returns the first batch of records.
    ///
    /// # Errors
    /// `ForceError::Api` when the body has no `records` array, plus the
    /// errors of [`SObjectClient::post_object`].
    #[instrument(skip(self, soql))]
    pub async fn query(&self, soql: &str) -> Result<Vec<Record>> {
        let params = [("q".to_string(), soql.to_string())];
        let response = self.execute(Method::GET, &["query", ""], &params, None).await?;
        let result: QueryResponse =
            decode(&response).map_err(|_| response.record.clone().into_error())?;
        info!(total_size = result.total_size, done = result.done, "Query returned");
        Ok(result.records)
    }

    /// `{instance_url}/services/data/{version}/{segments...}?{query}`
    ///
    /// An empty trailing segment produces a trailing slash.
    ///
    /// # Errors
    /// Returns `ForceError::Config` if the base URL cannot be parsed.
    pub fn resource_url(
        &self,
        credential: &Credential,
        segments: &[&str],
        query: &[(String, String)],
    ) -> Result<Url> {
        let base = if credential.instance_url.trim().is_empty() {
            self.fallback_base_url.as_str()
        } else {
            credential.instance_url.as_str()
        };

        let mut url = Url::parse(base.trim_end_matches('/'))
            .map_err(|e| ForceError::Config(format!("invalid base URL {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ForceError::Config(format!("base URL {base} cannot have a path")))?
            .pop_if_empty()
            .extend(DATA_PATH.split('/').filter(|s| !s.is_empty()))
            .push(&self.api.api_version)
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }

        Ok(url)
    }

    async fn execute(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<ApiResponse> {
        let credential = self.provider.credential().await?;
        let url = self.resource_url(&credential, segments, query)?;

        let mut builder = self
            .http
            .request(method, url.clone())
            .header(AUTHORIZATION, credential.authorization_header())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = self.http.send(builder).await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| ForceError::from(InfraError::from(e)))?;

        let record = ResponseRecord::new(url.as_str(), status, &bytes);
        if self.api.log_requests {
            info!(
                url = %record.url,
                status_code = record.status_code,
                body = %record.body,
                "salesforce_response"
            );
        }

        if record.is_failure() {
            warn!(url = %record.url, status_code = status, "Salesforce API call failed");
            return Err(record.into_error());
        }

        Ok(ApiResponse { record, body: bytes.to_vec() })
    }
}

fn to_json_value<T: Serialize + ?Sized>(data: &T) -> Result<Value> {
    serde_json::to_value(data).map_err(|e| ForceError::from(InfraError::from(e)))
}

fn decode<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        ForceError::Api(format!("unexpected response body from {}: {e}", response.record.url))
    })
}

fn decode_map(response: &ApiResponse) -> Result<Map<String, Value>> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    decode(response)
}
