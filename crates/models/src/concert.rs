use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConcertStatus {
    Draft,
    Published,
    Ended,
}

impl ConcertStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConcertStatus::Draft => "DRAFT",
            ConcertStatus::Published => "PUBLISHED",
            ConcertStatus::Ended => "ENDED",
        }
    }
}

impl std::fmt::Display for ConcertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub start_at: DateTime<Utc>,
    #[serde(default)]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub status: ConcertStatus,
    #[serde(default)]
    pub ticket_types: Vec<TicketType>,
}

impl Concert {
    /// Cheapest ticket type price, or zero when none are on sale.
    pub fn lowest_price(&self) -> Amount {
        self.ticket_types
            .iter()
            .map(|t| t.price)
            .reduce(|a, b| if b < a { b } else { a })
            .unwrap_or_default()
    }

    pub fn total_quota(&self) -> u64 {
        self.ticket_types.iter().map(|t| u64::from(t.quota_total)).sum()
    }

    pub fn total_sold(&self) -> u64 {
        self.ticket_types.iter().map(|t| u64::from(t.quota_sold)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketType {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub price: Amount,
    pub quota_total: u32,
    pub quota_sold: u32,
    #[serde(default)]
    pub sales_start_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sales_end_at: Option<DateTime<Utc>>,
}

/// The `n` concerts with the latest start, newest first.
pub fn recent_concerts(concerts: &[Concert], n: usize) -> Vec<&Concert> {
    let mut recent: Vec<&Concert> = concerts.iter().collect();
    recent.sort_by(|a, b| b.start_at.cmp(&a.start_at));
    recent.truncate(n);
    recent
}

/// Dashboard figures computed over a concert listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewStats {
    pub total_concerts: usize,
    pub published_concerts: usize,
    pub draft_concerts: usize,
    pub ended_concerts: usize,
    pub total_tickets_sold: u64,
    pub total_revenue: f64,
}

impl OverviewStats {
    pub fn from_concerts(concerts: &[Concert]) -> Self {
        let count = |status| concerts.iter().filter(|c| c.status == status).count();

        let mut stats = OverviewStats {
            total_concerts: concerts.len(),
            published_concerts: count(ConcertStatus::Published),
            draft_concerts: count(ConcertStatus::Draft),
            ended_concerts: count(ConcertStatus::Ended),
            ..Default::default()
        };

        for tt in concerts.iter().flat_map(|c| &c.ticket_types) {
            stats.total_tickets_sold += u64::from(tt.quota_sold);
            stats.total_revenue += f64::from(tt.quota_sold) * tt.price.value();
        }

        stats
    }
}
