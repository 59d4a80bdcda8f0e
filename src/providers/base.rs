use std::sync::Arc;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::oidc_provider::{OidcProvider, OidcProviderConfig};
use super::prompt::{ConsolePrompt, Prompt};
use super::request::{AuthorizationRequest, PromptOutcome, DEFAULT_SCOPES};
use crate::models::UserProfile;

/// Configuration options for the identity provider.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
#[serde(tag = "type")]
pub enum ProviderConfig {
    #[serde(rename = "oidc")]
    Oidc(OidcProviderConfig),
}

/// The two things the session needs from an identity provider.
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    fn get_name(&self) -> &str;

    /// Scopes to ask for when logging in.
    fn scopes(&self) -> Vec<String> {
        DEFAULT_SCOPES.iter().map(|s| s.to_string()).collect()
    }

    /// Runs the interactive authorization step. A user cancelling the prompt is an
    /// `Ok(PromptOutcome::Cancelled)`, not an error.
    async fn authorize(&self, request: &AuthorizationRequest) -> Result<PromptOutcome, String>;

    /// Fetches the profile of the user that owns `token`.
    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, String>;
}

/// Create an identity provider from a given config, prompting on the console.
pub fn create_identity_provider(
    config: &ProviderConfig,
    timeout: Duration,
) -> Result<Arc<dyn IdentityProvider>, String> {
    create_identity_provider_with_prompt(config, timeout, Arc::new(ConsolePrompt::new()))
}

/// Same as [`create_identity_provider`] with a caller-chosen prompt.
pub fn create_identity_provider_with_prompt(
    config: &ProviderConfig,
    timeout: Duration,
    prompt: Arc<dyn Prompt>,
) -> Result<Arc<dyn IdentityProvider>, String> {
    match config {
        ProviderConfig::Oidc(cfg) => Ok(Arc::new(OidcProvider::new(cfg, timeout, prompt)?)),
    }
}
