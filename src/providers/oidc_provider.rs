use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::prompt::{parse_redirect, Prompt};
use super::request::{AuthorizationRequest, PromptOutcome, DEFAULT_SCOPES};
use super::IdentityProvider;
use crate::models::UserProfile;

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
}

/// Config for an OAuth2/OIDC authorization server such as Auth0.
#[derive(Deserialize, Serialize, Debug, JsonSchema, Clone, PartialEq, Eq)]
pub struct OidcProviderConfig {
    pub name: String,
    /// Bare host ("tenant.eu.auth0.com", https is assumed) or a full base URL.
    pub domain: String,
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default = "default_scopes")]
    pub scopes: Vec<String>,
}

impl OidcProviderConfig {
    /// Base URL of the authorization server.
    pub fn issuer(&self) -> Result<Url, String> {
        let raw = if self.domain.contains("://") {
            self.domain.clone()
        } else {
            format!("https://{}", self.domain)
        };
        let mut url = Url::parse(&raw)
            .map_err(|e| format!("Invalid identity domain '{}': {}", self.domain, e))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

/// Implicit-flow login against an OIDC server, with the interactive part
/// delegated to a [`Prompt`].
pub struct OidcProvider {
    config: OidcProviderConfig,
    authorize_endpoint: Url,
    userinfo_endpoint: Url,
    client: reqwest::Client,
    prompt: Arc<dyn Prompt>,
}

impl OidcProvider {
    pub fn new(
        config: &OidcProviderConfig,
        timeout: Duration,
        prompt: Arc<dyn Prompt>,
    ) -> Result<Self, String> {
        info!(
            "Creating OidcProvider '{}' for domain '{}'",
            config.name, config.domain
        );

        let issuer = config.issuer()?;
        let authorize_endpoint = issuer
            .join("authorize")
            .map_err(|e| format!("Invalid authorize endpoint: {}", e))?;
        let userinfo_endpoint = issuer
            .join("userinfo")
            .map_err(|e| format!("Invalid userinfo endpoint: {}", e))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            config: config.clone(),
            authorize_endpoint,
            userinfo_endpoint,
            client,
            prompt,
        })
    }

    pub fn authorize_url(&self, request: &AuthorizationRequest) -> Url {
        request.to_url(
            &self.authorize_endpoint,
            &self.config.client_id,
            &self.config.redirect_uri,
        )
    }
}

#[async_trait::async_trait]
impl IdentityProvider for OidcProvider {
    fn get_name(&self) -> &str {
        &self.config.name
    }

    fn scopes(&self) -> Vec<String> {
        self.config.scopes.clone()
    }

    async fn authorize(&self, request: &AuthorizationRequest) -> Result<PromptOutcome, String> {
        let url = self.authorize_url(request);
        debug!("Prompting for login at {}", self.authorize_endpoint);

        match self.prompt.prompt(&url, &self.config.redirect_uri).await? {
            Some(redirect) => parse_redirect(&redirect),
            None => Ok(PromptOutcome::Cancelled),
        }
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, String> {
        debug!("Fetching user profile from {}", self.userinfo_endpoint);
        let response = self
            .client
            .get(self.userinfo_endpoint.clone())
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| format!("Error sending userinfo request: {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Unexpected status code from userinfo: {}",
                response.status()
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("Error reading userinfo body: {}", e))?;
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(claims)) => Ok(UserProfile::new(claims)),
            Ok(_) => Err("Userinfo response is not a JSON object".to_string()),
            Err(e) => Err(format!("Error parsing userinfo JSON: {}", e)),
        }
    }
}
