use thiserror::Error;
use tix_checkin::AuthorityError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Base URL or path could not be turned into a request URL
    #[error("invalid API URL: {0}")]
    Url(String),

    /// No response was received
    #[error("request failed: {0}")]
    Transport(String),

    /// Response body was not the expected JSON
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The API answered `success: false` (or a GraphQL error)
    #[error("API error (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// Local file for an upload could not be read
    #[error("failed to read upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Server-provided message, for showing to the operator.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<ApiError> for AuthorityError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Rejected { status, message } => AuthorityError::Rejected {
                status: Some(status),
                message,
            },
            ApiError::Transport(m) => AuthorityError::Transport(m),
            ApiError::Malformed(m) => AuthorityError::Malformed(m),
            ApiError::Url(m) => AuthorityError::Transport(m),
            ApiError::Io(e) => AuthorityError::Transport(e.to_string()),
        }
    }
}
