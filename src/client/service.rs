//! Service sub-client bound to one backend endpoint.

use reqwest::{Method, RequestBuilder, Url};

use crate::client::session::BackendSession;
use crate::error::{DriverError, Result};

/// Client for one backend service (compute, block-storage or portal).
///
/// Shares the authenticated session with its siblings; only the endpoint
/// differs.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    session: BackendSession,
    endpoint: Url,
}

impl ServiceClient {
    /// Bind the session to a service endpoint URL.
    pub fn new(session: BackendSession, endpoint: &str) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| DriverError::connection(format!("endpoint {endpoint:?}: {e}")))?;
        Ok(Self { session, endpoint })
    }

    /// Endpoint URL this client is bound to.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Build an authenticated request for a path under the endpoint.
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let raw = format!(
            "{}/{}",
            self.endpoint.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let url = Url::parse(&raw)
            .map_err(|e| DriverError::connection(format!("request url {raw:?}: {e}")))?;
        Ok(self.session.request(method, url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthOpts;

    fn session() -> BackendSession {
        BackendSession::connect(&AuthOpts {
            client_id: "svc-account".to_string(),
            client_secret: "hunter2".to_string(),
            identity_url: "https://identity.example.com/v2".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        let err = ServiceClient::new(session(), "volume.example.com").unwrap_err();
        assert!(matches!(err, DriverError::Connection(_)));
    }

    #[test]
    fn test_request_joins_paths() {
        let client =
            ServiceClient::new(session(), "https://volume.example.com/v2/").unwrap();
        let request = client
            .request(Method::GET, "/volumes")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "https://volume.example.com/v2/volumes"
        );
    }

    #[test]
    fn test_endpoint_accessor() {
        let client = ServiceClient::new(session(), "https://portal.example.com/v1").unwrap();
        assert_eq!(client.endpoint(), "https://portal.example.com/v1");
    }
}
