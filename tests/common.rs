#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use pantrychef::config::{load_config_str, ConfigV1};
use pantrychef::models::UserProfile;
use pantrychef::providers::prompt::Prompt;
use pantrychef::providers::{
    AuthorizationRequest, AuthorizationResponse, IdentityProvider, PromptOutcome,
};
use pantrychef::store::{MemoryStore, Store};
use url::Url;

pub const TEST_CONFIG: &str = r#"
version: "1.0.0"
logging:
  level: "debug"
  format: "json"
identity:
  type: "oidc"
  name: "TestOidc"
  domain: "IDENTITY_URL"
  client_id: "pantry-client"
  redirect_uri: "pantrychef://callback"
backend:
  base_url: "BACKEND_URL/api"
  timeout_in_ms: 3000
store:
  enabled: true
  type: "memory"
session:
  login_timeout_in_ms: 5000
"#;

/// Test config with both the identity server and the backend pointing at `url`.
pub fn test_config(url: &str) -> ConfigV1 {
    let yaml = TEST_CONFIG
        .replace("IDENTITY_URL", url)
        .replace("BACKEND_URL", url);
    load_config_str(&yaml).expect("test config should parse")
}

/// Identity provider double with a fixed prompt outcome.
pub struct ScriptedProvider {
    pub outcome: Result<PromptOutcome, String>,
    pub profile: Result<UserProfile, String>,
    pub authorize_calls: AtomicUsize,
    pub tokens_seen: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new(outcome: Result<PromptOutcome, String>, profile: Result<UserProfile, String>) -> Arc<Self> {
        Arc::new(ScriptedProvider {
            outcome,
            profile,
            authorize_calls: AtomicUsize::new(0),
            tokens_seen: Mutex::new(Vec::new()),
        })
    }

    /// Redirect carrying `token`, and `/userinfo` answering with `{"name": name}`.
    pub fn granting(token: &str, name: &str) -> Arc<Self> {
        Self::new(Ok(token_outcome(token)), Ok(profile(name)))
    }

    pub fn authorize_calls(&self) -> usize {
        self.authorize_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ScriptedProvider {
    fn get_name(&self) -> &str {
        "scripted"
    }

    async fn authorize(&self, _request: &AuthorizationRequest) -> Result<PromptOutcome, String> {
        self.authorize_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile, String> {
        self.tokens_seen.lock().unwrap().push(token.to_string());
        self.profile.clone()
    }
}

pub fn token_outcome(token: &str) -> PromptOutcome {
    response_outcome(&[("access_token", token), ("token_type", "Bearer")])
}

pub fn response_outcome(params: &[(&str, &str)]) -> PromptOutcome {
    PromptOutcome::Success(AuthorizationResponse::new(
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    ))
}

pub fn profile(name: &str) -> UserProfile {
    UserProfile::from_json(&format!(r#"{{"sub":"auth0|{0}","name":"{0}"}}"#, name)).unwrap()
}

/// Which store operations should fail.
#[derive(Default, Clone, Copy)]
pub struct Failures {
    pub get: bool,
    pub set: bool,
    pub remove: bool,
}

/// Wraps a `MemoryStore` and fails the chosen operations.
pub struct FailingStore {
    pub inner: MemoryStore,
    pub failures: Failures,
}

impl FailingStore {
    pub fn new(inner: MemoryStore, failures: Failures) -> Arc<Self> {
        Arc::new(FailingStore { inner, failures })
    }
}

#[async_trait::async_trait]
impl Store for FailingStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        if self.failures.get {
            return Err(format!("read of '{}' failed", key));
        }
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        if self.failures.set {
            return Err(format!("write of '{}' failed", key));
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), String> {
        if self.failures.remove {
            return Err(format!("delete of '{}' failed", key));
        }
        self.inner.remove_item(key).await
    }
}

/// Console stand-in that pastes back a fixed redirect.
pub struct PastePrompt {
    pub redirect: Option<String>,
}

#[async_trait::async_trait]
impl Prompt for PastePrompt {
    async fn prompt(&self, _url: &Url, _redirect_uri: &str) -> Result<Option<String>, String> {
        Ok(self.redirect.clone())
    }
}
