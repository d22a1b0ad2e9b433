use std::future::Future;

use thiserror::Error;
use tix_models::{BearerToken, Ticket};

/// Failure reported by the ticket authority.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthorityError {
    /// The authority answered with `success: false`.
    #[error("rejected by ticket authority (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(String),

    /// A response arrived but could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl AuthorityError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthorityError::Rejected { status: Some(404), .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AuthorityError::Rejected { status: Some(409), .. })
    }

    /// Message supplied by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            AuthorityError::Rejected { message, .. } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }
}

/// Remote service of record for tickets.
///
/// The credential is passed on every call; implementations hold no ambient
/// session state.
pub trait TicketAuthority: Send + Sync {
    /// Resolve a code to its current ticket snapshot. Must not mutate the ticket.
    fn resolve(
        &self,
        token: &BearerToken,
        code: &str,
    ) -> impl Future<Output = Result<Ticket, AuthorityError>> + Send;

    /// Mark the ticket consumed.
    ///
    /// Returns the updated snapshot when the authority sends one back.
    fn mark_used(
        &self,
        token: &BearerToken,
        code: &str,
    ) -> impl Future<Output = Result<Option<Ticket>, AuthorityError>> + Send;
}
