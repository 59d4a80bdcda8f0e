//! Application startup.
//!
//! Builds the store, identity provider, session manager and resource client
//! from configuration, and restores any persisted session before handing the
//! state out.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::ConfigV1;
use crate::providers::prompt::Prompt;
use crate::providers::{
    create_identity_provider, create_identity_provider_with_prompt, IdentityProvider,
};
use crate::resources::ResourceClient;
use crate::session::SessionManager;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes everything with the console login prompt.
///
/// # Errors
///
/// Returns an error if the identity provider or backend configuration is unusable.
pub async fn build_state(config: Arc<ConfigV1>) -> Result<AppState, Box<dyn std::error::Error>> {
    let timeout = Duration::from_millis(config.backend.timeout_in_ms);
    let provider = create_identity_provider(&config.identity, timeout)?;
    assemble(config, provider).await
}

/// Same as [`build_state`] with a caller-supplied login prompt.
pub async fn build_state_with_prompt(
    config: Arc<ConfigV1>,
    prompt: Arc<dyn Prompt>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let timeout = Duration::from_millis(config.backend.timeout_in_ms);
    let provider = create_identity_provider_with_prompt(&config.identity, timeout, prompt)?;
    assemble(config, provider).await
}

async fn assemble(
    config: Arc<ConfigV1>,
    provider: Arc<dyn IdentityProvider>,
) -> Result<AppState, Box<dyn std::error::Error>> {
    let store = create_store(&config.store);
    let session = SessionManager::new(store, provider)
        .with_login_timeout(config.session.login_timeout_in_ms.map(Duration::from_millis));
    let restored = session.restore().await;
    info!("Session status after restore: {}", restored.status());

    let resources = ResourceClient::new(&config.backend)?;

    Ok(AppState {
        config,
        session: Arc::new(session),
        resources: Arc::new(resources),
    })
}
