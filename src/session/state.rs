use std::fmt;

use crate::models::UserProfile;

/// Coarse lifecycle status of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Restoring,
    Unauthenticated,
    Authenticated,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Restoring => write!(f, "restoring"),
            SessionStatus::Unauthenticated => write!(f, "unauthenticated"),
            SessionStatus::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// A user and the bearer token issued for them. They only ever travel together.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub user: UserProfile,
    pub access_token: String,
}

impl Credentials {
    pub fn new(user: UserProfile, access_token: impl Into<String>) -> Self {
        Credentials {
            user,
            access_token: access_token.into(),
        }
    }
}

/// The in-memory session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    /// Persisted credentials have not been looked at yet.
    #[default]
    Restoring,
    Unauthenticated,
    Authenticated(Credentials),
}

impl Session {
    pub fn status(&self) -> SessionStatus {
        match self {
            Session::Restoring => SessionStatus::Restoring,
            Session::Unauthenticated => SessionStatus::Unauthenticated,
            Session::Authenticated(_) => SessionStatus::Authenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match self {
            Session::Authenticated(credentials) => Some(credentials),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.credentials().map(|c| &c.user)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.credentials().map(|c| c.access_token.as_str())
    }
}

/// Short, log-safe form of a token.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(4).collect();
    if prefix.len() == token.len() {
        "****".to_string()
    } else {
        format!("{}…", prefix)
    }
}
