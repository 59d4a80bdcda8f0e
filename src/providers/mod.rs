pub mod base;
pub mod oidc_provider;
pub mod prompt;
pub mod request;

// Re-export from base.rs so we can do "use crate::providers::*;"
pub use base::*;
pub use request::{AuthorizationRequest, AuthorizationResponse, PromptOutcome};
