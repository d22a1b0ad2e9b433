//! HTTP client for the concert console API.

mod client;
mod concerts;
mod error;
mod orders;
mod tickets;

pub use client::ApiClient;
pub use concerts::{ConcertForm, ConcertQuery, DEFAULT_LIST_LIMIT, TicketTypeForm};
pub use error::ApiError;
