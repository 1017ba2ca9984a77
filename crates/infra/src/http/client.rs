use std::time::{Duration, Instant};

use forcelink_domain::constants::DEFAULT_REQUEST_TIMEOUT_SECS;
use forcelink_domain::ForceError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Header Salesforce reads the calling client's name from
pub const CALL_OPTIONS_HEADER: &str = "sforce-call-options";

const USER_AGENT: &str = concat!("forcelink/", env!("CARGO_PKG_VERSION"));

/// Data API HTTP client
///
/// Every [`HttpClient::send`] is exactly one attempt; status codes are left to
/// the caller.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Client with the default timeout and user agent.
    pub fn new() -> Result<Self, ForceError> {
        Self::builder().build()
    }

    pub fn request(&self, method: Method, url: impl IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Send a prepared request once.
    ///
    /// # Errors
    /// `ForceError::InvalidInput` for a request that cannot be built,
    /// `ForceError::Network` when no response arrives.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ForceError> {
        let request = builder.build().map_err(|e| ForceError::from(InfraError::from(e)))?;
        let (method, url) = (request.method().clone(), request.url().clone());
        let started = Instant::now();
        debug!(%method, path = url.path(), "data API request");

        let result = self.inner.execute(request).await;
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match result {
            Ok(response) => {
                debug!(
                    %method,
                    path = url.path(),
                    status = response.status().as_u16(),
                    elapsed_ms,
                    "data API response"
                );
                Ok(response)
            }
            Err(e) => {
                debug!(%method, path = url.path(), error = %e, elapsed_ms, "data API request failed");
                Err(ForceError::from(InfraError::from(e)))
            }
        }
    }
}

/// Builder for [`HttpClient`]
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    call_options_client: Option<String>,
    headers: Vec<(String, String)>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            call_options_client: None,
            headers: Vec::new(),
        }
    }
}

impl HttpClientBuilder {
    /// Whole-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send `Sforce-Call-Options: client={name}` with every request.
    pub fn call_options_client(mut self, name: impl Into<String>) -> Self {
        self.call_options_client = Some(name.into());
        self
    }

    /// Extra header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// # Errors
    /// `ForceError::InvalidInput` for an invalid header name or value.
    pub fn build(self) -> Result<HttpClient, ForceError> {
        let mut headers = HeaderMap::new();
        let call_options = self
            .call_options_client
            .map(|name| (CALL_OPTIONS_HEADER.to_string(), format!("client={name}")));
        for (name, value) in self.headers.into_iter().chain(call_options) {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                ForceError::InvalidInput(format!("invalid header name {name}: {e}"))
            })?;
            let header_value = HeaderValue::from_str(&value).map_err(|e| {
                ForceError::InvalidInput(format!("invalid value for header {name}: {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let inner = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ForceError::from(InfraError::from(e)))?;

        Ok(HttpClient { inner })
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn quick_client() -> HttpClient {
        HttpClient::builder().timeout(Duration::from_secs(5)).build().unwrap()
    }

    #[tokio::test]
    async fn sends_identifying_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/services/data/"))
            .and(header("user-agent", USER_AGENT))
            .and(header(CALL_OPTIONS_HEADER, "client=nightly-sync"))
            .and(header("x-prettyprint", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .call_options_client("nightly-sync")
            .header("x-prettyprint", "1")
            .build()
            .unwrap();
        let url = format!("{}/services/data/", server.uri());
        let response = client.send(client.request(Method::GET, url)).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    #[tokio::test]
    async fn error_statuses_are_returned_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client = quick_client();
        let response = client.send(client.request(Method::POST, server.uri())).await.unwrap();

        assert_eq!(response.status().as_u16(), 503);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();

        let client = quick_client();
        let err = client
            .send(client.request(Method::GET, format!("http://{addr}/services/data/")))
            .await
            .unwrap_err();
        assert!(matches!(err, ForceError::Network(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn rejects_invalid_header_values() {
        let err = HttpClient::builder().header("x-trace", "bad\nvalue").build().unwrap_err();
        assert!(matches!(err, ForceError::InvalidInput(_)));

        let err = HttpClient::builder().call_options_client("line\rbreak").build().unwrap_err();
        assert!(matches!(err, ForceError::InvalidInput(_)));
    }
}
