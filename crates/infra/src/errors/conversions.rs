//! Conversions from external infrastructure errors into domain errors.

use forcelink_domain::ForceError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ForceError);

impl From<InfraError> for ForceError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ForceError> for InfraError {
    fn from(value: ForceError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoForceError {
    fn into_force(self) -> ForceError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ForceError */
/* -------------------------------------------------------------------------- */

impl IntoForceError for HttpError {
    fn into_force(self) -> ForceError {
        if self.is_timeout() {
            return ForceError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ForceError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return ForceError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ForceError::Auth(message),
                404 => ForceError::NotFound(message),
                400..=499 => ForceError::InvalidInput(message),
                _ => ForceError::Network(message),
            };
        }

        ForceError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_force())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml → ForceError */
/* -------------------------------------------------------------------------- */

impl IntoForceError for serde_json::Error {
    fn into_force(self) -> ForceError {
        ForceError::Internal(format!("JSON error: {self}"))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_force())
    }
}

impl IntoForceError for toml::de::Error {
    fn into_force(self) -> ForceError {
        ForceError::Config(format!("Invalid TOML format: {self}"))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        InfraError(value.into_force())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: ForceError = InfraError::from(error).into();
        match mapped {
            ForceError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: ForceError = InfraError::from(error).into();
        assert!(matches!(mapped, ForceError::Network(_)), "got {mapped:?}");
    }

    #[test]
    fn toml_error_maps_to_config() {
        let err = toml::from_str::<toml::Table>("key = ").unwrap_err();
        let mapped: ForceError = InfraError::from(err).into();
        assert!(matches!(mapped, ForceError::Config(_)));
    }

    #[test]
    fn json_error_maps_to_internal() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let mapped: ForceError = InfraError::from(err).into();
        assert!(matches!(mapped, ForceError::Internal(msg) if msg.contains("JSON")));
    }
}
