use thiserror::Error;

/// Failures talking to the backend. Only two kinds matter to callers: the
/// server answered with a non-success status, or we never got an answer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("HTTP error! status: {status}")]
    Status { status: u16 },
    #[error("Network error: {0}")]
    Network(String),
    /// The server said yes but the body was not what we expected.
    #[error("Invalid response body: {0}")]
    Decode(String),
    /// Bad base URL or client settings; nothing was sent.
    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ResourceError {
    /// The HTTP status, only for errors that carry one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ResourceError::Status { status } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ResourceError::Network(_))
    }

    /// Text fit for showing to a user instead of the raw transport error.
    pub fn user_message(&self) -> String {
        match self {
            ResourceError::Network(_) => {
                "Cannot reach the server. Check the API URL and your network connection.".into()
            }
            ResourceError::Status { status: 400 } => "The request was rejected by the server.".into(),
            ResourceError::Status { status: 401 | 403 } => {
                "You are not allowed to do that. Try logging in again.".into()
            }
            ResourceError::Status { status: 404 } => "That item could not be found.".into(),
            ResourceError::Status { status: 413 } => "The upload is too large.".into(),
            ResourceError::Status { status } if *status >= 500 => {
                "Server error. Please try again later.".into()
            }
            ResourceError::Status { status } => {
                format!("The server returned an unexpected status ({}).", status)
            }
            ResourceError::Decode(_) => "The server sent a response we could not read.".into(),
            ResourceError::Config(_) => "The app is misconfigured (check the API URL).".into(),
        }
    }
}

/// Transport errors that came with a response keep its status; the rest are network errors.
impl From<reqwest::Error> for ResourceError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => ResourceError::Status {
                status: status.as_u16(),
            },
            None => ResourceError::Network(e.to_string()),
        }
    }
}
