//! Shared application state.
//!
//! What every command (or screen) gets handed: configuration, the session
//! behind its read-only interface, and the backend client.

use crate::config::ConfigV1;
use crate::resources::ResourceClient;
use crate::session::SessionContext;
use std::sync::Arc;

/// Application state shared across all consumers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Who is logged in; the only way to change it is `login`/`logout`.
    pub session: Arc<dyn SessionContext>,
    /// Gateway to the recipe/ingredient API.
    pub resources: Arc<ResourceClient>,
}
