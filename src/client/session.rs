//! Authenticated backend session.
//!
//! One session is built per process from the `[Global]` options and shared
//! by all three service sub-clients. It owns the HTTP connection pool and
//! applies the credentials to every outgoing request.

use reqwest::{Client, Method, RequestBuilder, Url};
use std::time::Duration;

use crate::config::AuthOpts;
use crate::error::{DriverError, Result};

/// Request timeout applied to every backend call.
const REQUEST_TIMEOUT_MS: u64 = 5_000;

/// Authenticated session shared by the service sub-clients.
#[derive(Debug, Clone)]
pub struct BackendSession {
    http: Client,
    auth: AuthOpts,
}

impl BackendSession {
    /// Build a session from the authentication options.
    ///
    /// Fails when credentials are missing or the identity URL does not
    /// parse. No network traffic happens here; the first request performs
    /// the actual authentication round trip.
    pub fn connect(auth: &AuthOpts) -> Result<Self> {
        if auth.client_id.is_empty() || auth.client_secret.is_empty() {
            return Err(DriverError::connection(
                "client-id and client-secret must both be set in [Global]",
            ));
        }

        Url::parse(&auth.identity_url).map_err(|e| {
            DriverError::connection(format!(
                "identity-url {:?}: {}",
                auth.identity_url, e
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(REQUEST_TIMEOUT_MS))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DriverError::connection(format!("http client: {e}")))?;

        Ok(Self {
            http,
            auth: auth.clone(),
        })
    }

    /// Start a request with the session credentials applied.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .basic_auth(&self.auth.client_id, Some(&self.auth.client_secret))
    }

    /// Identity endpoint this session authenticates against.
    pub fn identity_url(&self) -> &str {
        &self.auth.identity_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_auth() -> AuthOpts {
        AuthOpts {
            client_id: "svc-account".to_string(),
            client_secret: "hunter2".to_string(),
            identity_url: "https://identity.example.com/v2".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_connect_with_valid_auth() {
        let session = BackendSession::connect(&valid_auth()).unwrap();
        assert_eq!(session.identity_url(), "https://identity.example.com/v2");
    }

    #[test]
    fn test_connect_rejects_missing_credentials() {
        let mut auth = valid_auth();
        auth.client_secret = String::new();

        let err = BackendSession::connect(&auth).unwrap_err();
        assert!(matches!(err, DriverError::Connection(_)));
    }

    #[test]
    fn test_connect_rejects_bad_identity_url() {
        let mut auth = valid_auth();
        auth.identity_url = "not a url".to_string();

        let err = BackendSession::connect(&auth).unwrap_err();
        assert!(err.to_string().contains("identity-url"));
    }
}
