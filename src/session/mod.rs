//! Client-side authentication state: who is logged in, with which token,
//! and how that survives restarts.

pub mod error;
pub mod manager;
pub mod persisted;
pub mod state;

pub use error::LoginError;
pub use manager::{SessionContext, SessionManager};
pub use state::{Credentials, Session, SessionStatus};
