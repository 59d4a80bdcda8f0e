//! The two store entries that make a session survive restarts.
//!
//! Every failure here is logged and swallowed: losing a cached session only
//! means the user has to log in again.

use tracing::{debug, warn};

use super::state::Credentials;
use crate::models::UserProfile;
use crate::store::Store;

pub const AUTH_USER_KEY: &str = "auth_user";
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Reads both entries. Anything short of two present, non-empty, parseable
/// values yields `None`.
pub async fn load(store: &dyn Store) -> Option<Credentials> {
    let user = read(store, AUTH_USER_KEY).await?;
    let token = read(store, AUTH_TOKEN_KEY).await?;

    match UserProfile::from_json(&user) {
        Ok(user) => Some(Credentials::new(user, token)),
        Err(e) => {
            warn!("Ignoring persisted session, '{}' is unusable: {}", AUTH_USER_KEY, e);
            None
        }
    }
}

async fn read(store: &dyn Store, key: &str) -> Option<String> {
    match store.get_item(key).await {
        Ok(Some(value)) if !value.is_empty() => Some(value),
        Ok(_) => {
            debug!("No persisted value for '{}'", key);
            None
        }
        Err(e) => {
            if store.is_enabled() {
                warn!("Failed to read '{}' from store: {}", key, e);
            } else {
                debug!("Store disabled, not reading '{}'", key);
            }
            None
        }
    }
}

/// Writes both entries. Returns whether both writes went through.
///
/// A half-written pair is removed again: a new user must never end up next to
/// an older token.
pub async fn save(store: &dyn Store, credentials: &Credentials) -> bool {
    let saved = write(store, AUTH_USER_KEY, &credentials.user.to_json()).await
        && write(store, AUTH_TOKEN_KEY, &credentials.access_token).await;
    if !saved && store.is_enabled() {
        warn!("Persisted session is incomplete, removing it");
        clear(store).await;
    }
    saved
}

async fn write(store: &dyn Store, key: &str, value: &str) -> bool {
    match store.set_item(key, value).await {
        Ok(()) => true,
        Err(e) => {
            if store.is_enabled() {
                warn!("Failed to persist '{}': {}", key, e);
            } else {
                debug!("Store disabled, not persisting '{}'", key);
            }
            false
        }
    }
}

/// Removes both entries, attempting the second even if the first fails.
pub async fn clear(store: &dyn Store) -> bool {
    let mut cleared = true;
    for key in [AUTH_USER_KEY, AUTH_TOKEN_KEY] {
        if let Err(e) = store.remove_item(key).await {
            if store.is_enabled() {
                warn!("Failed to remove '{}' from store: {}", key, e);
            }
            cleared = false;
        }
    }
    cleared
}
