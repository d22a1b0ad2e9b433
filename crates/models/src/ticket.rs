use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Issued,
    Used,
    Void,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TicketStatus::Issued => "ISSUED",
            TicketStatus::Used => "USED",
            TicketStatus::Void => "VOID",
        }
    }
}

impl std::fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Snapshot of a ticket as returned by `GET /tickets/{code}/validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub code: String,
    pub status: TicketStatus,
    pub issued_at: DateTime<Utc>,
    #[serde(default)]
    pub used_at: Option<DateTime<Utc>>,
    pub concert: TicketConcert,
    pub ticket_type: TicketTypeSummary,
    pub user: Holder,
}

impl Ticket {
    /// Local copy of the ticket after a successful check-in.
    pub fn marked_used(&self, at: DateTime<Utc>) -> Ticket {
        Ticket {
            status: TicketStatus::Used,
            used_at: Some(at),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketConcert {
    pub title: String,
    pub venue: String,
    pub start_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeSummary {
    pub name: String,
    pub price: Amount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holder {
    pub name: String,
    pub email: String,
}
