use std::collections::HashMap;

use url::Url;

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: [&str; 3] = ["openid", "profile", "email"];

/// An implicit-flow authorization request. The token comes back directly in
/// the redirect, so there is no code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub scopes: Vec<String>,
    pub response_type: String,
    /// Random nonce echoed back by the provider; guards against stray redirects.
    pub state: String,
}

impl AuthorizationRequest {
    pub fn implicit<S: AsRef<str>>(scopes: &[S]) -> Self {
        AuthorizationRequest {
            scopes: scopes.iter().map(|s| s.as_ref().to_string()).collect(),
            response_type: "token".to_string(),
            state: uuid::Uuid::new_v4().simple().to_string(),
        }
    }

    pub fn scope(&self) -> String {
        self.scopes.join(" ")
    }

    /// Renders the full authorize URL for a client.
    pub fn to_url(&self, authorize_endpoint: &Url, client_id: &str, redirect_uri: &str) -> Url {
        let mut url = authorize_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("response_type", &self.response_type)
            .append_pair("scope", &self.scope())
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", &self.state);
        url
    }
}

impl Default for AuthorizationRequest {
    fn default() -> Self {
        Self::implicit(&DEFAULT_SCOPES)
    }
}

/// Parameters handed back by the provider in the redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationResponse {
    pub params: HashMap<String, String>,
}

impl AuthorizationResponse {
    pub fn new(params: HashMap<String, String>) -> Self {
        AuthorizationResponse { params }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.param("access_token")
    }

    pub fn state(&self) -> Option<&str> {
        self.param("state")
    }

    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// How the interactive prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Success(AuthorizationResponse),
    /// The user closed or abandoned the prompt.
    Cancelled,
    /// The provider redirected back with an `error` parameter.
    Error {
        code: String,
        description: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize_url_carries_every_parameter() {
        let endpoint = Url::parse("https://pantry.eu.auth0.com/authorize").unwrap();
        let request = AuthorizationRequest::default();
        let url = request.to_url(&endpoint, "client-1", "pantrychef://callback");

        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(url.path(), "/authorize");
        assert_eq!(pairs["client_id"], "client-1");
        assert_eq!(pairs["response_type"], "token");
        assert_eq!(pairs["scope"], "openid profile email");
        assert_eq!(pairs["redirect_uri"], "pantrychef://callback");
        assert_eq!(pairs["state"], request.state);
    }

    #[test]
    fn test_state_is_unique_per_request() {
        assert_ne!(
            AuthorizationRequest::default().state,
            AuthorizationRequest::default().state
        );
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let response = AuthorizationResponse::new(HashMap::from([(
            "access_token".to_string(),
            String::new(),
        )]));
        assert_eq!(response.access_token(), None);
    }
}
