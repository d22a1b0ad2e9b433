//! Ticket check-in session.
//!
//! A client-local state machine for one operator: enter a code, resolve it
//! against the ticket authority, show the snapshot, and optionally ask the
//! authority to mark it used. Ticket truth stays with the authority; the
//! session only holds a transient copy for display.

mod authority;
mod clock;
pub mod messages;
mod session;

pub use authority::{AuthorityError, TicketAuthority};
pub use clock::{Clock, FixedClock, SystemClock};
pub use session::{CheckInSession, Offer, PendingRequest, SessionState, UnknownPolicy, UsePolicy};
