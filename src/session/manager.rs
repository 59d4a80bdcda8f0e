use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::error::LoginError;
use super::persisted;
use super::state::{mask_token, Credentials, Session, SessionStatus};
use crate::models::UserProfile;
use crate::providers::{AuthorizationRequest, IdentityProvider, PromptOutcome};
use crate::store::Store;

/// What consumers get to see of the session: a read-only view plus the two
/// entry points that change it.
#[async_trait::async_trait]
pub trait SessionContext: Send + Sync {
    fn current(&self) -> Session;
    fn subscribe(&self) -> watch::Receiver<Session>;
    async fn login(&self) -> Result<UserProfile, LoginError>;
    async fn logout(&self);
}

/// Owns the session and keeps the persisted copy in step with it.
///
/// State starts as [`Session::Restoring`]; call [`SessionManager::restore`] once
/// at startup. Only this type writes the session or the `auth_*` store keys.
pub struct SessionManager {
    state: watch::Sender<Session>,
    store: Arc<dyn Store>,
    provider: Arc<dyn IdentityProvider>,
    login_timeout: Option<Duration>,
    // held for the whole of a login or restore
    flight: Mutex<()>,
}

impl SessionManager {
    pub fn new(store: Arc<dyn Store>, provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(Session::Restoring);
        SessionManager {
            state,
            store,
            provider,
            login_timeout: None,
            flight: Mutex::new(()),
        }
    }

    /// Bounds a whole login attempt, interactive prompt included.
    pub fn with_login_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.login_timeout = timeout;
        self
    }

    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn status(&self) -> SessionStatus {
        self.state.borrow().status()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn login_in_progress(&self) -> bool {
        self.flight.try_lock().is_err()
    }

    /// Loads persisted credentials. Only has an effect while still `Restoring`.
    pub async fn restore(&self) -> Session {
        let _flight = self.flight.lock().await;
        if self.status() != SessionStatus::Restoring {
            return self.current();
        }

        match persisted::load(self.store.as_ref()).await {
            Some(credentials) if self.status() == SessionStatus::Restoring => {
                info!(
                    event_name = "session.restored",
                    user = credentials.user.display_name(),
                    "Restored persisted session"
                );
                self.enter_authenticated(credentials).await;
            }
            Some(_) => debug!("Session changed while restoring; ignoring persisted copy"),
            None => {
                self.state.send_if_modified(|session| {
                    if *session == Session::Restoring {
                        *session = Session::Unauthenticated;
                        true
                    } else {
                        false
                    }
                });
                info!(event_name = "session.restored", "No persisted session");
            }
        }
        self.current()
    }

    /// Runs the interactive login. On any failure the session is untouched.
    pub async fn login(&self) -> Result<UserProfile, LoginError> {
        let Ok(_flight) = self.flight.try_lock() else {
            warn!("Login requested while another login is still running");
            return Err(LoginError::InProgress);
        };

        let attempt = self.authenticate();
        let result = match self.login_timeout {
            Some(limit) => tokio::time::timeout(limit, attempt)
                .await
                .unwrap_or(Err(LoginError::TimedOut)),
            None => attempt.await,
        };

        match result {
            Ok(credentials) => {
                let user = credentials.user.clone();
                info!(
                    event_name = "session.login",
                    provider = self.provider.get_name(),
                    user = user.display_name(),
                    token = %mask_token(&credentials.access_token),
                    "Login succeeded"
                );
                self.enter_authenticated(credentials).await;
                Ok(user)
            }
            Err(e) if e.is_cancellation() => {
                info!(event_name = "session.login", "Login cancelled by user");
                Err(e)
            }
            Err(e) => {
                warn!(
                    event_name = "session.login",
                    provider = self.provider.get_name(),
                    "Login failed: {}",
                    e
                );
                Err(e)
            }
        }
    }

    /// Clears the session, then the persisted copy. Never fails.
    pub async fn logout(&self) {
        let previous = self.state.send_replace(Session::Unauthenticated);
        if let Some(user) = previous.user() {
            info!(
                event_name = "session.logout",
                user = user.display_name(),
                "Logged out"
            );
        }
        if !persisted::clear(self.store.as_ref()).await {
            debug!("Persisted session could not be fully removed");
        }
    }

    // Steps: build request, prompt, extract token, fetch profile.
    // Nothing is written until all of them have succeeded.
    async fn authenticate(&self) -> Result<Credentials, LoginError> {
        let request = AuthorizationRequest::implicit(&self.provider.scopes());
        debug!(
            "Starting login with '{}' (scope '{}')",
            self.provider.get_name(),
            request.scope()
        );

        let response = match self
            .provider
            .authorize(&request)
            .await
            .map_err(LoginError::Authorize)?
        {
            PromptOutcome::Success(response) => response,
            PromptOutcome::Cancelled => return Err(LoginError::Cancelled),
            PromptOutcome::Error { code, description } => {
                return Err(LoginError::ProviderError { code, description })
            }
        };

        if let Some(state) = response.state() {
            if state != request.state {
                return Err(LoginError::StateMismatch);
            }
        }

        let token = response
            .access_token()
            .ok_or(LoginError::MissingToken)?
            .to_string();
        let user = self
            .provider
            .fetch_profile(&token)
            .await
            .map_err(LoginError::Profile)?;

        Ok(Credentials::new(user, token))
    }

    // Persisting is part of entering the state, and is awaited before the
    // new session becomes visible.
    async fn enter_authenticated(&self, credentials: Credentials) {
        if !persisted::save(self.store.as_ref(), &credentials).await {
            debug!("Session will not survive a restart; store write failed");
        }
        self.state.send_replace(Session::Authenticated(credentials));
    }
}

#[async_trait::async_trait]
impl SessionContext for SessionManager {
    fn current(&self) -> Session {
        SessionManager::current(self)
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        SessionManager::subscribe(self)
    }

    async fn login(&self) -> Result<UserProfile, LoginError> {
        SessionManager::login(self).await
    }

    async fn logout(&self) {
        SessionManager::logout(self).await
    }
}
