use thiserror::Error;

/// Why a login attempt ended without a session. None of these are fatal;
/// the session is left exactly as it was.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("login was cancelled")]
    Cancelled,
    #[error("identity provider returned '{code}'{}", .description.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    ProviderError {
        code: String,
        description: Option<String>,
    },
    #[error("identity provider did not return an access token")]
    MissingToken,
    #[error("authorization response does not belong to this login attempt")]
    StateMismatch,
    #[error("authorization failed: {0}")]
    Authorize(String),
    #[error("could not fetch user profile: {0}")]
    Profile(String),
    #[error("another login is already in progress")]
    InProgress,
    #[error("login timed out")]
    TimedOut,
}

impl LoginError {
    /// True for outcomes the user chose, as opposed to things that went wrong.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, LoginError::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let with = LoginError::ProviderError {
            code: "access_denied".into(),
            description: Some("nope".into()),
        };
        let without = LoginError::ProviderError {
            code: "access_denied".into(),
            description: None,
        };
        assert_eq!(with.to_string(), "identity provider returned 'access_denied': nope");
        assert_eq!(without.to_string(), "identity provider returned 'access_denied'");
    }
}
